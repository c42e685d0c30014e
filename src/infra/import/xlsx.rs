use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};

use crate::domain::validation::format_iso_date;

/// Excel stores dates as days since 1899-12-30.
fn excel_serial_to_iso(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = serial.trunc();
    if !days.is_finite() || days.abs() > 2_958_465.0 {
        return None;
    }
    epoch
        .checked_add_signed(Duration::days(days as i64))
        .map(format_iso_date)
}

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => excel_serial_to_iso(v.as_f64()).unwrap_or_else(|| v.to_string()),
        Data::DateTimeIso(v) => v.split('T').next().unwrap_or(v).to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

/// Reads the first worksheet of a workbook as raw cells.
pub fn read_first_sheet_rows(xlsx_path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open workbook: {}", xlsx_path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("workbook has no sheets: {}", xlsx_path.display()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|r| r.iter().map(cell_to_string).collect())
        .collect();

    log::debug!(
        "read {} row(s) from sheet {sheet_name} of {}",
        rows.len(),
        xlsx_path.display()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_dates_become_iso() {
        assert_eq!(excel_serial_to_iso(45292.0).as_deref(), Some("2024-01-01"));
        assert_eq!(excel_serial_to_iso(f64::NAN), None);
    }

    #[test]
    fn plain_cells_render_as_text() {
        assert_eq!(cell_to_string(&Data::String("Drum".to_string())), "Drum");
        assert_eq!(cell_to_string(&Data::Float(10.5)), "10.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(
            cell_to_string(&Data::DateTimeIso("2024-03-04T00:00:00".to_string())),
            "2024-03-04"
        );
    }
}
