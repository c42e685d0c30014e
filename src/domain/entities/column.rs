use crate::domain::entities::row::FieldKey;

/// Reference-data list that feeds a dropdown column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionSource {
    Regions,
    ContainerSizes,
    UnitsOfMeasure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Number,
    Dropdown(OptionSource),
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidthClass {
    Narrow,
    Medium,
    Wide,
}

impl WidthClass {
    pub fn css_width(self) -> &'static str {
        match self {
            WidthClass::Narrow => "96px",
            WidthClass::Medium => "132px",
            WidthClass::Wide => "180px",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub key: FieldKey,
    pub label: &'static str,
    pub width: WidthClass,
    pub kind: ValueKind,
    pub required: bool,
}

const fn column(
    key: FieldKey,
    label: &'static str,
    width: WidthClass,
    kind: ValueKind,
    required: bool,
) -> ColumnDefinition {
    ColumnDefinition {
        key,
        label,
        width,
        kind,
        required,
    }
}

// Order is both the on-screen order and the positional paste mapping.
static PRICING_COLUMNS: [ColumnDefinition; 14] = [
    column(FieldKey::ProductId, "Product", WidthClass::Wide, ValueKind::Text, true),
    column(
        FieldKey::RegionId,
        "Region",
        WidthClass::Medium,
        ValueKind::Dropdown(OptionSource::Regions),
        true,
    ),
    column(FieldKey::CustomerId, "Customer", WidthClass::Medium, ValueKind::Text, false),
    column(FieldKey::ProfileId, "Profile", WidthClass::Medium, ValueKind::Text, false),
    column(FieldKey::GeneratorId, "Generator", WidthClass::Medium, ValueKind::Text, false),
    column(FieldKey::ContractId, "Contract", WidthClass::Medium, ValueKind::Text, false),
    column(FieldKey::QuoteId, "Quote", WidthClass::Narrow, ValueKind::Text, false),
    column(FieldKey::JobId, "Job", WidthClass::Narrow, ValueKind::Text, false),
    column(
        FieldKey::ContainerSize,
        "Container",
        WidthClass::Medium,
        ValueKind::Dropdown(OptionSource::ContainerSizes),
        true,
    ),
    column(
        FieldKey::BillingUom,
        "UOM",
        WidthClass::Narrow,
        ValueKind::Dropdown(OptionSource::UnitsOfMeasure),
        true,
    ),
    column(FieldKey::UnitPrice, "Unit Price", WidthClass::Narrow, ValueKind::Number, true),
    column(FieldKey::MinimumPrice, "Min Price", WidthClass::Narrow, ValueKind::Number, false),
    column(FieldKey::EffectiveDate, "Effective", WidthClass::Medium, ValueKind::Date, true),
    column(FieldKey::ExpirationDate, "Expires", WidthClass::Medium, ValueKind::Date, false),
];

pub fn pricing_columns() -> &'static [ColumnDefinition] {
    &PRICING_COLUMNS
}

pub fn column_index(columns: &[ColumnDefinition], key: FieldKey) -> Option<usize> {
    columns.iter().position(|column| column.key == key)
}

pub fn column_for(columns: &[ColumnDefinition], key: FieldKey) -> Option<&ColumnDefinition> {
    columns.iter().find(|column| column.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_starts_with_product_and_ends_with_expiration() {
        let columns = pricing_columns();
        assert_eq!(columns.first().map(|c| c.key), Some(FieldKey::ProductId));
        assert_eq!(columns.last().map(|c| c.key), Some(FieldKey::ExpirationDate));
        assert_eq!(column_index(columns, FieldKey::UnitPrice), Some(10));
    }

    #[test]
    fn header_only_fields_are_not_columns() {
        let columns = pricing_columns();
        assert!(column_for(columns, FieldKey::PricingType).is_none());
        assert!(column_for(columns, FieldKey::PricePriority).is_none());
    }
}
