use std::path::Path;

use anyhow::{Context, Result};

/// Reads every record of a CSV file as raw cells. No header handling here;
/// the import service decides whether the first record is a header.
pub fn read_csv_rows(csv_path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .with_context(|| format!("failed to parse csv record in {}", csv_path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    log::debug!("read {} csv record(s) from {}", rows.len(), csv_path.display());
    Ok(rows)
}
