use serde::{Deserialize, Serialize};

use crate::domain::entities::conversion::{ConversionEntry, ConversionKind, ConversionTable};
use crate::domain::entities::row::{FieldKey, GridRow};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHeader {
    pub description: String,
    pub pricing_type: String,
    pub price_priority: String,
    pub conversion_kind: ConversionKind,
    pub conversions: Vec<ConversionEntry>,
}

impl PriceHeader {
    pub fn with_conversion(mut self, table: &ConversionTable) -> Self {
        self.conversion_kind = table.kind();
        self.conversions = table.entries().to_vec();
        self
    }
}

/// Backend-oriented shape of one grid row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingLine {
    pub line_id: u64,
    pub pricing_type: Option<String>,
    pub price_priority: Option<i64>,
    pub customer_id: Option<String>,
    pub product_id: Option<String>,
    pub region_id: Option<String>,
    pub profile_id: Option<String>,
    pub generator_id: Option<String>,
    pub contract_id: Option<String>,
    pub quote_id: Option<String>,
    pub job_id: Option<String>,
    pub container_size: Option<String>,
    pub billing_uom: Option<String>,
    pub unit_price: Option<f64>,
    pub minimum_price: Option<f64>,
    pub effective_date: Option<String>,
    pub expiration_date: Option<String>,
}

fn text(row: &GridRow, key: FieldKey) -> Option<String> {
    let value = row.get(key).trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| *ch != ',' && *ch != '$')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

impl PricingLine {
    pub fn from_row(row: &GridRow, header: &PriceHeader) -> Self {
        let pricing_type = text(row, FieldKey::PricingType).or_else(|| {
            let fallback = header.pricing_type.trim();
            (!fallback.is_empty()).then(|| fallback.to_string())
        });
        let priority_text = text(row, FieldKey::PricePriority)
            .unwrap_or_else(|| header.price_priority.trim().to_string());

        Self {
            line_id: row.id.0,
            pricing_type,
            price_priority: priority_text.parse::<i64>().ok(),
            customer_id: text(row, FieldKey::CustomerId),
            product_id: text(row, FieldKey::ProductId),
            region_id: text(row, FieldKey::RegionId),
            profile_id: text(row, FieldKey::ProfileId),
            generator_id: text(row, FieldKey::GeneratorId),
            contract_id: text(row, FieldKey::ContractId),
            quote_id: text(row, FieldKey::QuoteId),
            job_id: text(row, FieldKey::JobId),
            container_size: text(row, FieldKey::ContainerSize),
            billing_uom: text(row, FieldKey::BillingUom),
            unit_price: parse_amount(row.get(FieldKey::UnitPrice)),
            minimum_price: parse_amount(row.get(FieldKey::MinimumPrice)),
            effective_date: text(row, FieldKey::EffectiveDate),
            expiration_date: text(row, FieldKey::ExpirationDate),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub header: PriceHeader,
    pub lines: Vec<PricingLine>,
    pub facilities: Vec<String>,
    pub generators: Vec<String>,
}

impl PricingRequest {
    pub fn from_rows<'a>(
        header: PriceHeader,
        rows: impl IntoIterator<Item = &'a GridRow>,
        facilities: Vec<String>,
        generators: Vec<String>,
    ) -> Self {
        let lines = rows
            .into_iter()
            .map(|row| PricingLine::from_row(row, &header))
            .collect();
        Self {
            header,
            lines,
            facilities,
            generators,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub price_header_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::row::RowId;

    #[test]
    fn line_maps_empty_text_to_none_and_parses_amounts() {
        let mut row = GridRow::new(RowId(4));
        row.set(FieldKey::ProductId, " Widget ");
        row.set(FieldKey::UnitPrice, "$1,250.50");
        row.set(FieldKey::MinimumPrice, "n/a");

        let header = PriceHeader {
            pricing_type: "Contract".to_string(),
            price_priority: "2".to_string(),
            ..PriceHeader::default()
        };
        let line = PricingLine::from_row(&row, &header);

        assert_eq!(line.line_id, 4);
        assert_eq!(line.product_id.as_deref(), Some("Widget"));
        assert_eq!(line.customer_id, None);
        assert_eq!(line.unit_price, Some(1250.5));
        assert_eq!(line.minimum_price, None);
        assert_eq!(line.pricing_type.as_deref(), Some("Contract"));
        assert_eq!(line.price_priority, Some(2));
    }

    #[test]
    fn request_serializes_in_camel_case() {
        let request = PricingRequest::from_rows(
            PriceHeader::default(),
            &[GridRow::new(RowId(1))],
            vec!["Plant 9".to_string()],
            Vec::new(),
        );
        let json = serde_json::to_value(&request).expect("request should serialize");

        assert!(json.get("lines").is_some());
        assert_eq!(
            json.pointer("/header/conversionKind").and_then(|v| v.as_str()),
            Some("standard")
        );
        assert_eq!(
            json.pointer("/lines/0/lineId").and_then(|v| v.as_u64()),
            Some(1)
        );
    }
}
