use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::domain::entities::column::ColumnDefinition;
use crate::domain::entities::staging::ImportError;
use crate::infra::import::clipboard::split_clipboard_text;
use crate::infra::import::csv::read_csv_rows;
use crate::infra::import::xlsx::read_first_sheet_rows;
use crate::usecase::services::grid_store::GridStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Csv,
    Delimited,
    Workbook,
}

fn file_kind(path: &Path) -> Result<FileKind, ImportError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => Ok(FileKind::Csv),
        "tsv" | "txt" => Ok(FileKind::Delimited),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileKind::Workbook),
        _ => Err(ImportError::UnsupportedFile(path.display().to_string())),
    }
}

/// A first row whose non-empty cells all equal the column labels at the same
/// positions is a header, not data.
pub fn is_header_row(cells: &[String], columns: &[ColumnDefinition]) -> bool {
    let mut labelled = 0;
    for (cell, column) in cells.iter().zip(columns.iter()) {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        if !cell.eq_ignore_ascii_case(column.label) {
            return false;
        }
        labelled += 1;
    }
    labelled > 0
}

/// Reads pasted text and spreadsheet files into the store's staging buffer.
/// File columns map positionally onto the grid layout, as pasted text does.
#[derive(Debug, Clone, Copy)]
pub struct ImportService {
    skip_header_row: bool,
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportService {
    pub fn new() -> Self {
        Self {
            skip_header_row: true,
        }
    }

    pub fn keep_header_row(mut self) -> Self {
        self.skip_header_row = false;
        self
    }

    pub fn read_file(&self, path: &Path) -> Result<Vec<Vec<String>>, ImportError> {
        let kind = file_kind(path)?;
        let rows = match kind {
            FileKind::Csv => read_csv_rows(path),
            FileKind::Workbook => read_first_sheet_rows(path),
            FileKind::Delimited => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))
                .map(|text| split_clipboard_text(&text)),
        };
        rows.map_err(|err| ImportError::Unreadable {
            source_name: path.display().to_string(),
            message: format!("{err:#}"),
        })
    }

    pub fn stage_text(&self, store: &mut GridStore, text: &str) -> usize {
        store.stage_text(text)
    }

    /// Stages a file. A file with no data rows is reported up front and
    /// leaves any earlier staging untouched.
    pub fn stage_file(&self, store: &mut GridStore, path: &Path) -> Result<usize, ImportError> {
        let mut rows = self.read_file(path)?;
        if self.skip_header_row
            && rows
                .first()
                .is_some_and(|first| is_header_row(first, store.columns()))
        {
            log::debug!("dropping header row from {}", path.display());
            rows.remove(0);
        }
        if rows
            .iter()
            .all(|row| row.iter().all(|cell| cell.trim().is_empty()))
        {
            log::warn!("{} contains no rows to import", path.display());
            return Err(ImportError::Empty);
        }

        let source = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(store.stage_raw(&source, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::column::pricing_columns;
    use std::path::PathBuf;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn header_detection_ignores_case_and_blanks() {
        let columns = pricing_columns();
        assert!(is_header_row(&cells(&["PRODUCT", "", "customer"]), columns));
        assert!(!is_header_row(&cells(&["Product", "West"]), columns));
        assert!(!is_header_row(&cells(&["", ""]), columns));
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let service = ImportService::new();
        let result = service.read_file(&PathBuf::from("prices.pdf"));
        assert!(matches!(result, Err(ImportError::UnsupportedFile(_))));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let service = ImportService::new();
        let result = service.read_file(&PathBuf::from("/nonexistent/prices.csv"));
        assert!(matches!(result, Err(ImportError::Unreadable { .. })));
    }
}
