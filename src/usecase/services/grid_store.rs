//! The pricing grid session: rows, selection, filters, the staged import and
//! the active container conversion table, behind one owner.
//!
//! Every mutation goes through a method here and is announced to
//! subscribers as a [`GridEvent`]. Nothing in the store rejects a value for
//! being malformed; warnings are computed on demand from the current rows.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::entities::column::{column_for, pricing_columns, ColumnDefinition, ValueKind};
use crate::domain::entities::conversion::{ConversionKind, ConversionTable};
use crate::domain::entities::filter::{FilterPredicate, FilterSet};
use crate::domain::entities::grid::GridModel;
use crate::domain::entities::navigation::{CellPosition, EditState, GridBounds, KeyOutcome, NavKey};
use crate::domain::entities::reference::ReferenceData;
use crate::domain::entities::request::parse_amount;
use crate::domain::entities::row::{FieldKey, GridRow, RowId, RowSeed};
use crate::domain::entities::staging::{ImportError, StagingBuffer};
use crate::domain::validation::{format_iso_date, row_warnings, validate_cell, FieldWarning};
use crate::infra::import::clipboard::{join_clipboard_rows, split_clipboard_text};

/// Filter columns whose single value is copied into rows added by hand.
const SEEDED_FROM_FILTERS: [FieldKey; 4] = [
    FieldKey::QuoteId,
    FieldKey::GeneratorId,
    FieldKey::ContractId,
    FieldKey::JobId,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    RowAdded(RowId),
    CellUpdated { row: RowId, key: FieldKey },
    RowDeleted(RowId),
    FiltersChanged,
    StateChanged(EditState),
    Staged { rows: usize },
    StagingCommitted(Vec<RowId>),
    StagingCancelled,
    ConversionReplaced(ConversionKind),
    ReferenceDataChanged,
}

type Listener = Box<dyn FnMut(&GridEvent)>;

pub struct GridStore {
    columns: Vec<ColumnDefinition>,
    model: GridModel,
    state: EditState,
    anchor: Option<RowId>,
    staging: Option<StagingBuffer>,
    conversion: ConversionTable,
    reference: ReferenceData,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for GridStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridStore")
            .field("rows", &self.model.len())
            .field("state", &self.state)
            .field("anchor", &self.anchor)
            .field("staged", &self.staging.as_ref().map(StagingBuffer::len))
            .field("conversion", &self.conversion.kind())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for GridStore {
    fn default() -> Self {
        Self::new(pricing_columns().to_vec())
    }
}

impl GridStore {
    pub fn new(columns: Vec<ColumnDefinition>) -> Self {
        Self {
            columns,
            model: GridModel::new(),
            state: EditState::Idle,
            anchor: None,
            staging: None,
            conversion: ConversionTable::standard(),
            reference: ReferenceData::default(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn with_conversion(mut self, conversion: ConversionTable) -> Self {
        self.conversion = conversion;
        self
    }

    // ---- observers ----------------------------------------------------

    pub fn subscribe(&mut self, listener: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: GridEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    // ---- reads --------------------------------------------------------

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn rows(&self) -> &[GridRow] {
        self.model.rows()
    }

    pub fn row(&self, id: RowId) -> Option<&GridRow> {
        self.model.row(id)
    }

    pub fn len(&self) -> usize {
        self.model.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    pub fn visible_rows(&self) -> Vec<&GridRow> {
        self.model.visible_rows()
    }

    pub fn visible_len(&self) -> usize {
        self.model.visible_len()
    }

    pub fn filters(&self) -> &FilterSet {
        self.model.filters()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn selected_row_id(&self) -> Option<RowId> {
        self.anchor
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn conversion(&self) -> &ConversionTable {
        &self.conversion
    }

    pub fn staging(&self) -> Option<&StagingBuffer> {
        self.staging.as_ref()
    }

    pub fn can_commit_staging(&self) -> bool {
        self.staging.as_ref().is_some_and(StagingBuffer::can_commit)
    }

    /// Rows exactly as they are now, for export.
    pub fn snapshot(&self) -> Vec<GridRow> {
        self.model.rows().to_vec()
    }

    fn bounds(&self) -> GridBounds<'_> {
        GridBounds::new(self.model.visible_len(), &self.columns)
    }

    fn column(&self, key: FieldKey) -> Option<&ColumnDefinition> {
        column_for(&self.columns, key)
    }

    // ---- grid model ---------------------------------------------------

    pub fn add_row(&mut self, seed: RowSeed) -> RowId {
        let id = self.model.add_row(seed);
        log::debug!("added row {id}");
        self.emit(GridEvent::RowAdded(id));
        id
    }

    /// Adds a row carrying the single-valued quote/generator/contract/job
    /// filters, so the new row stays visible in the filtered view. Values in
    /// `seed` take precedence.
    pub fn add_row_from_filters(&mut self, mut seed: RowSeed) -> RowId {
        for key in SEEDED_FROM_FILTERS {
            let value = self
                .model
                .filters()
                .get(key)
                .and_then(FilterPredicate::seed_value)
                .map(str::to_string);
            if let Some(value) = value {
                seed.entry(key).or_insert(value);
            }
        }
        self.add_row(seed)
    }

    pub fn update_cell(&mut self, id: RowId, key: FieldKey, value: impl Into<String>) -> bool {
        let updated = self.model.update_cell(id, key, value);
        if updated {
            self.emit(GridEvent::CellUpdated { row: id, key });
            if self.model.filters().get(key).is_some() {
                self.reanchor();
            }
        } else {
            log::debug!("ignored update of {} on missing row {id}", key.as_str());
        }
        updated
    }

    /// Live write from the editor: called on every keystroke while a text or
    /// number cell is being edited. There is no draft to revert. Dropdown and
    /// date cells only change through `commit_option` and `commit_date`.
    pub fn commit_field(&mut self, value: impl Into<String>) -> bool {
        let EditState::Editing(position) = self.state else {
            return false;
        };
        if !self.accepts_typed_text(position.column) {
            return false;
        }
        match self.anchor {
            Some(id) => self.update_cell(id, position.column, value),
            None => false,
        }
    }

    fn accepts_typed_text(&self, key: FieldKey) -> bool {
        matches!(
            self.column(key).map(|column| column.kind),
            Some(ValueKind::Text | ValueKind::Number)
        )
    }

    /// Dropdown commit. Only names from the column's option list are written.
    pub fn commit_option(&mut self, id: RowId, key: FieldKey, value: &str) -> bool {
        let Some(ValueKind::Dropdown(source)) = self.column(key).map(|column| column.kind) else {
            return false;
        };
        let chosen = self
            .reference
            .options(source)
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(value.trim()))
            .map(|item| item.name.clone());
        match chosen {
            Some(name) => self.update_cell(id, key, name),
            None => false,
        }
    }

    /// Date-picker commit, always stored as `yyyy-mm-dd`.
    pub fn commit_date(&mut self, id: RowId, key: FieldKey, date: NaiveDate) -> bool {
        if self.column(key).map(|column| column.kind) != Some(ValueKind::Date) {
            return false;
        }
        self.update_cell(id, key, format_iso_date(date))
    }

    /// Deleting an id that is already gone does nothing.
    pub fn delete_row(&mut self, id: RowId) -> bool {
        if !self.model.delete_row(id) {
            log::debug!("delete of missing row {id} ignored");
            return false;
        }
        log::info!("deleted row {id}");
        self.emit(GridEvent::RowDeleted(id));
        self.reanchor();
        true
    }

    pub fn apply_filter(&mut self, key: FieldKey, predicate: FilterPredicate) {
        self.model.apply_filter(key, predicate);
        self.emit(GridEvent::FiltersChanged);
        self.reanchor();
    }

    pub fn clear_filter(&mut self, key: FieldKey) -> bool {
        let cleared = self.model.clear_filter(key);
        if cleared {
            self.emit(GridEvent::FiltersChanged);
            self.reanchor();
        }
        cleared
    }

    pub fn clear_filters(&mut self) {
        if self.model.filters().is_empty() {
            return;
        }
        self.model.clear_filters();
        self.emit(GridEvent::FiltersChanged);
        self.reanchor();
    }

    pub fn set_reference_data(&mut self, reference: ReferenceData) {
        self.reference = reference;
        self.emit(GridEvent::ReferenceDataChanged);
    }

    // ---- navigation ---------------------------------------------------

    fn set_state(&mut self, next: EditState) {
        if next == self.state {
            return;
        }
        self.state = next;
        self.anchor = next
            .position()
            .and_then(|position| self.model.visible_row(position.row))
            .map(|row| row.id);
        self.emit(GridEvent::StateChanged(next));
    }

    /// Keeps the selection on the same logical row after the visible set
    /// changed. A row that is no longer visible drops the selection.
    fn reanchor(&mut self) {
        if self.state == EditState::Idle {
            return;
        }
        let next = match self
            .anchor
            .and_then(|id| self.model.visible_index_of(id))
        {
            Some(row) => self.state.with_row(row),
            None => EditState::Idle,
        };
        self.set_state(next);
    }

    pub fn click(&mut self, position: CellPosition) {
        let next = self.state.click(position, self.bounds());
        self.set_state(next);
    }

    pub fn double_click(&mut self, position: CellPosition) {
        let next = self.state.double_click(position, self.bounds());
        self.set_state(next);
    }

    pub fn clear_selection(&mut self) {
        self.set_state(EditState::Idle);
    }

    pub fn handle_key(&mut self, key: NavKey) -> KeyOutcome {
        let (next, outcome) = self.state.on_key(key, self.bounds());
        self.set_state(next);
        outcome
    }

    pub fn row_id_at(&self, visible_index: usize) -> Option<RowId> {
        self.model.visible_row(visible_index).map(|row| row.id)
    }

    // ---- import pipeline ----------------------------------------------

    /// Stages pasted text. Blank input stages an empty buffer that cannot be
    /// committed.
    pub fn stage_text(&mut self, text: &str) -> usize {
        self.stage_raw("clipboard", split_clipboard_text(text))
    }

    /// Stages already-split rows, replacing the rows of any earlier staged
    /// import. A conversion choice already made for the pending import is
    /// kept; otherwise it starts from the active table.
    pub fn stage_raw(&mut self, source: &str, raw_rows: Vec<Vec<String>>) -> usize {
        let conversion = match self.staging.take() {
            Some(previous) => previous.into_conversion(),
            None => self.conversion.clone(),
        };
        let buffer = StagingBuffer::from_raw_rows(source, raw_rows, &self.columns, conversion);
        let rows = buffer.len();
        log::info!("staged {rows} row(s) from {source}");
        self.staging = Some(buffer);
        self.emit(GridEvent::Staged { rows });
        rows
    }

    pub fn set_staging_conversion_kind(&mut self, kind: ConversionKind) -> bool {
        match self.staging.as_mut() {
            Some(buffer) => {
                buffer.set_conversion_kind(kind);
                true
            }
            None => false,
        }
    }

    pub fn edit_staging_conversion(&mut self, container: &str, multiplier: f64) -> bool {
        self.staging
            .as_mut()
            .is_some_and(|buffer| buffer.edit_conversion(container, multiplier))
    }

    /// Appends every staged row in order and makes the staged conversion
    /// table the active one. An empty buffer stays staged and is refused.
    pub fn commit_staging(&mut self) -> Result<Vec<RowId>, ImportError> {
        let buffer = self.staging.take().ok_or(ImportError::NothingStaged)?;
        if !buffer.can_commit() {
            self.staging = Some(buffer);
            return Err(ImportError::Empty);
        }

        let ids: Vec<RowId> = buffer
            .to_seeds(&self.columns)
            .into_iter()
            .map(|seed| self.model.add_row(seed))
            .collect();
        for id in &ids {
            self.emit(GridEvent::RowAdded(*id));
        }
        log::info!("committed {} staged row(s) from {}", ids.len(), buffer.source());

        self.conversion = buffer.into_conversion();
        let kind = self.conversion.kind();
        log::info!("active container conversion is now {kind:?}");
        self.emit(GridEvent::ConversionReplaced(kind));
        self.emit(GridEvent::StagingCommitted(ids.clone()));
        Ok(ids)
    }

    pub fn cancel_staging(&mut self) -> bool {
        let cancelled = self.staging.take().is_some();
        if cancelled {
            log::info!("staged import cancelled");
            self.emit(GridEvent::StagingCancelled);
        }
        cancelled
    }

    // ---- derived values -----------------------------------------------

    pub fn warnings_for(&self, id: RowId) -> Vec<(FieldKey, FieldWarning)> {
        self.model
            .row(id)
            .map(|row| row_warnings(row, &self.columns, &self.reference))
            .unwrap_or_default()
    }

    pub fn cell_warning(&self, id: RowId, key: FieldKey) -> Option<FieldWarning> {
        let row = self.model.row(id)?;
        let column = self.column(key)?;
        validate_cell(row, column, &self.reference)
    }

    /// Minimum price per container, scaling the row's base minimum by the
    /// active conversion multiplier.
    pub fn minimum_price_hint(&self, id: RowId) -> Option<f64> {
        let row = self.model.row(id)?;
        let base_minimum = parse_amount(row.get(FieldKey::MinimumPrice))?;
        self.conversion
            .scaled_minimum(row.get(FieldKey::ContainerSize), base_minimum)
    }

    /// Visible rows as tab/newline text, in column order.
    pub fn copy_visible_as_tsv(&self) -> String {
        join_clipboard_rows(self.model.visible_rows().into_iter().map(|row| {
            self.columns
                .iter()
                .map(|column| row.get(column.key).to_string())
                .collect::<Vec<_>>()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn seed(pairs: &[(FieldKey, &str)]) -> RowSeed {
        pairs
            .iter()
            .map(|(key, value)| (*key, value.to_string()))
            .collect()
    }

    #[test]
    fn subscribers_see_mutations_until_unsubscribed() {
        let mut store = GridStore::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let row = store.add_row(RowSeed::new());
        store.update_cell(row, FieldKey::JobId, "J-1");
        assert!(store.unsubscribe(id));
        store.delete_row(row);

        assert_eq!(
            *seen.borrow(),
            vec![
                GridEvent::RowAdded(row),
                GridEvent::CellUpdated {
                    row,
                    key: FieldKey::JobId
                },
            ]
        );
    }

    #[test]
    fn add_row_inherits_single_valued_filters() {
        let mut store = GridStore::default();
        store.apply_filter(FieldKey::QuoteId, FilterPredicate::Contains("Q-7".to_string()));
        store.apply_filter(FieldKey::RegionId, FilterPredicate::Contains("West".to_string()));
        store.apply_filter(FieldKey::JobId, FilterPredicate::Contains("J-1".to_string()));

        let id = store.add_row_from_filters(seed(&[(FieldKey::JobId, "J-2")]));
        let row = store.row(id).expect("added row should exist");

        assert_eq!(row.get(FieldKey::QuoteId), "Q-7");
        assert_eq!(row.get(FieldKey::JobId), "J-2");
        assert_eq!(row.get(FieldKey::RegionId), "");
    }

    #[test]
    fn selection_follows_row_through_filter_changes() {
        let mut store = GridStore::default();
        store.add_row(seed(&[(FieldKey::RegionId, "East")]));
        let west = store.add_row(seed(&[(FieldKey::RegionId, "West")]));
        store.click(CellPosition::new(1, FieldKey::RegionId));
        assert_eq!(store.selected_row_id(), Some(west));

        store.apply_filter(FieldKey::RegionId, FilterPredicate::Contains("west".to_string()));
        assert_eq!(
            store.state(),
            EditState::Selected(CellPosition::new(0, FieldKey::RegionId))
        );

        store.apply_filter(FieldKey::RegionId, FilterPredicate::Contains("east".to_string()));
        assert_eq!(store.state(), EditState::Idle);
        assert_eq!(store.selected_row_id(), None);
    }

    #[test]
    fn deleting_selected_row_drops_selection() {
        let mut store = GridStore::default();
        let id = store.add_row(RowSeed::new());
        store.double_click(CellPosition::new(0, FieldKey::ProductId));
        assert!(store.state().is_editing());

        store.delete_row(id);
        assert_eq!(store.state(), EditState::Idle);
        assert!(!store.commit_field("late keystroke"));
    }

    #[test]
    fn commit_option_only_accepts_known_names() {
        let mut store = GridStore::default();
        store.set_reference_data(ReferenceData {
            regions: vec![crate::domain::entities::reference::ReferenceItem::new(
                1,
                "Northeast",
                "NE",
            )],
            ..ReferenceData::default()
        });
        let id = store.add_row(RowSeed::new());

        assert!(!store.commit_option(id, FieldKey::RegionId, "Atlantis"));
        assert!(store.commit_option(id, FieldKey::RegionId, "northeast"));
        assert!(!store.commit_option(id, FieldKey::UnitPrice, "Northeast"));
        assert_eq!(store.row(id).map(|row| row.get(FieldKey::RegionId)), Some("Northeast"));
    }

    #[test]
    fn commit_date_writes_iso_text() {
        let mut store = GridStore::default();
        let id = store.add_row(RowSeed::new());
        let date = NaiveDate::from_ymd_opt(2024, 2, 29);

        assert!(date.is_some_and(|date| store.commit_date(id, FieldKey::EffectiveDate, date)));
        assert_eq!(
            store.row(id).map(|row| row.get(FieldKey::EffectiveDate)),
            Some("2024-02-29")
        );
        assert!(!date.is_some_and(|date| store.commit_date(id, FieldKey::JobId, date)));
    }

    #[test]
    fn empty_staging_is_refused_and_kept() {
        let mut store = GridStore::default();
        assert_eq!(store.commit_staging(), Err(ImportError::NothingStaged));

        assert_eq!(store.stage_text("  \n\t\n"), 0);
        assert!(!store.can_commit_staging());
        assert_eq!(store.commit_staging(), Err(ImportError::Empty));
        assert!(store.staging().is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn cancel_discards_staging_and_conversion_edits() {
        let mut store = GridStore::default();
        store.stage_text("P-1\tWest");
        store.set_staging_conversion_kind(ConversionKind::Custom);
        assert!(store.edit_staging_conversion("275 Gallon Tote", 9.0));

        assert!(store.cancel_staging());
        assert!(store.is_empty());
        assert_eq!(store.conversion(), &ConversionTable::standard());
    }

    #[test]
    fn confirmed_custom_conversion_becomes_active() {
        let mut store = GridStore::default();
        store.stage_text("P-1\tWest");
        store.set_staging_conversion_kind(ConversionKind::Custom);
        store.edit_staging_conversion("275 Gallon Tote", 9.0);
        assert_eq!(store.conversion().multiplier("275 Gallon Tote"), Some(5.0));

        let ids = store.commit_staging().expect("commit should succeed");
        assert_eq!(ids.len(), 1);
        assert_eq!(store.conversion().kind(), ConversionKind::Custom);
        assert_eq!(store.conversion().multiplier("275 Gallon Tote"), Some(9.0));

        // The next import starts from the custom table.
        store.stage_text("P-2");
        let staged = store.staging().map(|buffer| buffer.conversion().multiplier("275 Gallon Tote"));
        assert_eq!(staged, Some(Some(9.0)));
    }

    #[test]
    fn minimum_price_hint_scales_by_container() {
        let mut store = GridStore::default();
        let id = store.add_row(seed(&[
            (FieldKey::ContainerSize, "275 Gallon Tote"),
            (FieldKey::MinimumPrice, "40"),
        ]));
        assert_eq!(store.minimum_price_hint(id), Some(200.0));

        store.update_cell(id, FieldKey::MinimumPrice, "");
        assert_eq!(store.minimum_price_hint(id), None);
    }

    #[test]
    fn copy_uses_visible_rows_in_column_order() {
        let mut store = GridStore::default();
        store.add_row(seed(&[(FieldKey::ProductId, "A"), (FieldKey::RegionId, "East")]));
        store.add_row(seed(&[(FieldKey::ProductId, "B"), (FieldKey::RegionId, "West")]));
        store.apply_filter(FieldKey::RegionId, FilterPredicate::Contains("West".to_string()));

        let text = store.copy_visible_as_tsv();
        assert!(text.starts_with("B\tWest\t"));
        assert_eq!(text.lines().count(), 1);
        assert_eq!(text.split('\t').count(), store.columns().len());
    }
}
