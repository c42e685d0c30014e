use thiserror::Error;

use crate::domain::entities::column::ColumnDefinition;
use crate::domain::entities::conversion::{ConversionKind, ConversionTable};
use crate::domain::entities::row::RowSeed;

/// Structural import failures. These block the commit; nothing is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("nothing to import: no rows were found")]
    Empty,
    #[error("there is no staged import to confirm")]
    NothingStaged,
    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),
    #[error("failed to read {source_name}: {message}")]
    Unreadable {
        source_name: String,
        message: String,
    },
}

/// Parsed rows waiting for the user to confirm or cancel. Each row has been
/// trimmed and sized to the column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct StagingBuffer {
    source: String,
    rows: Vec<Vec<String>>,
    conversion: ConversionTable,
}

impl StagingBuffer {
    pub fn from_raw_rows(
        source: impl Into<String>,
        raw_rows: Vec<Vec<String>>,
        columns: &[ColumnDefinition],
        conversion: ConversionTable,
    ) -> Self {
        let width = columns.len();
        let mut rows: Vec<Vec<String>> = raw_rows
            .into_iter()
            .map(|raw| {
                let mut cells: Vec<String> = raw
                    .into_iter()
                    .take(width)
                    .map(|cell| cell.trim().to_string())
                    .collect();
                cells.resize(width, String::new());
                cells
            })
            .collect();
        // Blank lines inside a copied range are real rows; only the trailing
        // ones left by the final line break are dropped.
        while rows
            .last()
            .is_some_and(|cells| cells.iter().all(String::is_empty))
        {
            rows.pop();
        }

        Self {
            source: source.into(),
            rows,
            conversion,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn can_commit(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn conversion(&self) -> &ConversionTable {
        &self.conversion
    }

    pub fn conversion_kind(&self) -> ConversionKind {
        self.conversion.kind()
    }

    /// Switching to custom keeps an existing custom working copy.
    pub fn set_conversion_kind(&mut self, kind: ConversionKind) {
        if self.conversion.kind() != kind {
            self.conversion = ConversionTable::for_kind(kind);
        }
    }

    pub fn edit_conversion(&mut self, container: &str, multiplier: f64) -> bool {
        self.conversion.set_multiplier(container, multiplier)
    }

    pub fn to_seeds(&self, columns: &[ColumnDefinition]) -> Vec<RowSeed> {
        self.rows
            .iter()
            .map(|cells| {
                columns
                    .iter()
                    .zip(cells.iter())
                    .map(|(column, value)| (column.key, value.clone()))
                    .collect()
            })
            .collect()
    }

    pub fn into_conversion(self) -> ConversionTable {
        self.conversion
    }
}
