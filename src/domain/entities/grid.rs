use crate::domain::entities::filter::{FilterPredicate, FilterSet};
use crate::domain::entities::row::{FieldKey, GridRow, RowId, RowSeed};

/// Authoritative row collection. Rows keep insertion order; filters only
/// change which of them are visible.
#[derive(Debug, Clone, Default)]
pub struct GridModel {
    rows: Vec<GridRow>,
    last_id: u64,
    filters: FilterSet,
}

impl GridModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row. Ids come from a counter that never goes backwards, so
    /// an id freed by `delete_row` is never handed out again.
    pub fn add_row(&mut self, seed: RowSeed) -> RowId {
        self.last_id += 1;
        let id = RowId(self.last_id);
        self.rows.push(GridRow::seeded(id, seed));
        id
    }

    pub fn update_cell(&mut self, id: RowId, key: FieldKey, value: impl Into<String>) -> bool {
        match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.set(key, value);
                true
            }
            None => false,
        }
    }

    /// Removes the row if it exists. Unknown ids are ignored.
    pub fn delete_row(&mut self, id: RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    pub fn row(&self, id: RowId) -> Option<&GridRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last_assigned_id(&self) -> Option<RowId> {
        (self.last_id > 0).then_some(RowId(self.last_id))
    }

    pub fn apply_filter(&mut self, key: FieldKey, predicate: FilterPredicate) {
        self.filters.apply(key, predicate);
    }

    pub fn clear_filter(&mut self, key: FieldKey) -> bool {
        self.filters.clear(key)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear_all();
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn visible_rows(&self) -> Vec<&GridRow> {
        self.rows
            .iter()
            .filter(|row| self.filters.matches(row))
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| self.filters.matches(row))
            .count()
    }

    pub fn visible_row(&self, index: usize) -> Option<&GridRow> {
        self.rows
            .iter()
            .filter(|row| self.filters.matches(row))
            .nth(index)
    }

    pub fn visible_index_of(&self, id: RowId) -> Option<usize> {
        self.rows
            .iter()
            .filter(|row| self.filters.matches(row))
            .position(|row| row.id == id)
    }
}
