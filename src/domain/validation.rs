//! Advisory field checks.
//!
//! Nothing here blocks an edit. Warnings are recomputed from the current row
//! every time they are asked for, so there is no error state to keep in sync.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::entities::column::{ColumnDefinition, ValueKind};
use crate::domain::entities::reference::ReferenceData;
use crate::domain::entities::request::parse_amount;
use crate::domain::entities::row::{FieldKey, GridRow};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWarning {
    Required,
    NotANumber,
    Negative,
    NotAnOption,
    InvalidDate,
    ExpiresBeforeEffective,
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            FieldWarning::Required => "required",
            FieldWarning::NotANumber => "not a number",
            FieldWarning::Negative => "must not be negative",
            FieldWarning::NotAnOption => "not one of the available options",
            FieldWarning::InvalidDate => "expected a yyyy-mm-dd date",
            FieldWarning::ExpiresBeforeEffective => "expires before it becomes effective",
        };
        f.write_str(message)
    }
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn validate_cell(
    row: &GridRow,
    column: &ColumnDefinition,
    reference: &ReferenceData,
) -> Option<FieldWarning> {
    let value = row.get(column.key).trim();
    if value.is_empty() {
        return column.required.then_some(FieldWarning::Required);
    }

    match column.kind {
        ValueKind::Text => None,
        ValueKind::Number => match parse_amount(value) {
            None => Some(FieldWarning::NotANumber),
            Some(amount) if amount < 0.0 => Some(FieldWarning::Negative),
            Some(_) => None,
        },
        ValueKind::Dropdown(source) => {
            // An empty option list means reference data is missing, not that
            // the value is wrong.
            let options = reference.options(source);
            if options.is_empty() || reference.contains(source, value) {
                None
            } else {
                Some(FieldWarning::NotAnOption)
            }
        }
        ValueKind::Date => match parse_iso_date(value) {
            None => Some(FieldWarning::InvalidDate),
            Some(date) if column.key == FieldKey::ExpirationDate => {
                let effective = parse_iso_date(row.get(FieldKey::EffectiveDate));
                effective
                    .is_some_and(|effective| date < effective)
                    .then_some(FieldWarning::ExpiresBeforeEffective)
            }
            Some(_) => None,
        },
    }
}

pub fn row_warnings(
    row: &GridRow,
    columns: &[ColumnDefinition],
    reference: &ReferenceData,
) -> Vec<(FieldKey, FieldWarning)> {
    columns
        .iter()
        .filter_map(|column| validate_cell(row, column, reference).map(|warning| (column.key, warning)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::column::{column_for, pricing_columns};
    use crate::domain::entities::reference::ReferenceItem;
    use crate::domain::entities::row::RowId;
    use test_case::test_case;

    fn reference() -> ReferenceData {
        ReferenceData {
            regions: vec![ReferenceItem::new(1, "Northeast", "NE")],
            ..ReferenceData::default()
        }
    }

    fn check(key: FieldKey, value: &str) -> Option<FieldWarning> {
        let mut row = GridRow::new(RowId(1));
        row.set(key, value);
        let column = column_for(pricing_columns(), key).copied()?;
        validate_cell(&row, &column, &reference())
    }

    #[test_case(FieldKey::UnitPrice, "", Some(FieldWarning::Required) ; "required empty")]
    #[test_case(FieldKey::MinimumPrice, "", None ; "optional empty")]
    #[test_case(FieldKey::UnitPrice, "abc", Some(FieldWarning::NotANumber) ; "not numeric")]
    #[test_case(FieldKey::UnitPrice, "-1", Some(FieldWarning::Negative) ; "negative")]
    #[test_case(FieldKey::UnitPrice, "10.50", None ; "valid price")]
    #[test_case(FieldKey::RegionId, "Mars", Some(FieldWarning::NotAnOption) ; "unknown region")]
    #[test_case(FieldKey::RegionId, "northeast", None ; "region any case")]
    #[test_case(FieldKey::EffectiveDate, "01/02/2024", Some(FieldWarning::InvalidDate) ; "us date")]
    #[test_case(FieldKey::EffectiveDate, "2024-01-02", None ; "iso date")]
    fn cell_checks(key: FieldKey, value: &str, expected: Option<FieldWarning>) {
        assert_eq!(check(key, value), expected);
    }

    #[test]
    fn missing_options_do_not_flag_dropdowns() {
        let mut row = GridRow::new(RowId(1));
        row.set(FieldKey::ContainerSize, "Drum");
        let column = column_for(pricing_columns(), FieldKey::ContainerSize).copied();
        let warning = column.and_then(|column| validate_cell(&row, &column, &reference()));
        assert_eq!(warning, None);
    }

    #[test]
    fn expiration_before_effective_is_flagged() {
        let mut row = GridRow::new(RowId(1));
        row.set(FieldKey::EffectiveDate, "2024-06-01");
        row.set(FieldKey::ExpirationDate, "2024-01-01");

        let warnings = row_warnings(&row, pricing_columns(), &reference());
        assert!(warnings.contains(&(FieldKey::ExpirationDate, FieldWarning::ExpiresBeforeEffective)));
        assert!(warnings.contains(&(FieldKey::ProductId, FieldWarning::Required)));
    }

    #[test]
    fn warnings_are_a_pure_function_of_the_row() {
        let mut row = GridRow::new(RowId(1));
        row.set(FieldKey::UnitPrice, "x");
        let first = row_warnings(&row, pricing_columns(), &reference());
        let second = row_warnings(&row, pricing_columns(), &reference());
        assert_eq!(first, second);
    }
}
