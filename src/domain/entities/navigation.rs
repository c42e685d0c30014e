//! Selection and edit-mode transitions over the visible row space.
//!
//! Positions address the filtered view: `row` is an index into the visible
//! rows, not a row id. Movement never wraps around the grid edges; a move
//! that would leave the grid leaves the state untouched.

use crate::domain::entities::column::{column_index, ColumnDefinition};
use crate::domain::entities::row::FieldKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub column: FieldKey,
}

impl CellPosition {
    pub fn new(row: usize, column: FieldKey) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Selected(CellPosition),
    Editing(CellPosition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Enter,
    ShiftEnter,
    F2,
    Escape,
    Char(char),
}

/// What the host should do with the key after the state machine saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed; the host should suppress its default handling.
    Handled,
    /// The input control owns the key (typing, caret movement).
    PassThrough,
    Ignored,
}

#[derive(Debug, Clone, Copy)]
pub struct GridBounds<'a> {
    pub rows: usize,
    pub columns: &'a [ColumnDefinition],
}

impl<'a> GridBounds<'a> {
    pub fn new(rows: usize, columns: &'a [ColumnDefinition]) -> Self {
        Self { rows, columns }
    }

    pub fn contains(&self, position: CellPosition) -> bool {
        position.row < self.rows && column_index(self.columns, position.column).is_some()
    }

    fn column_at(&self, index: usize) -> Option<FieldKey> {
        self.columns.get(index).map(|column| column.key)
    }

    fn last_column(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    fn step(&self, from: CellPosition, rows: isize, cols: isize) -> Option<CellPosition> {
        let col = column_index(self.columns, from.column)?;
        let next_row = from.row.checked_add_signed(rows)?;
        let next_col = col.checked_add_signed(cols)?;
        if next_row >= self.rows {
            return None;
        }
        let column = self.column_at(next_col)?;
        Some(CellPosition::new(next_row, column))
    }

    fn tab_forward(&self, from: CellPosition) -> Option<CellPosition> {
        let col = column_index(self.columns, from.column)?;
        if col < self.last_column() {
            return self.step(from, 0, 1);
        }
        let next_row = from.row + 1;
        if next_row >= self.rows {
            return None;
        }
        Some(CellPosition::new(next_row, self.column_at(0)?))
    }

    fn tab_backward(&self, from: CellPosition) -> Option<CellPosition> {
        let col = column_index(self.columns, from.column)?;
        if col > 0 {
            return self.step(from, 0, -1);
        }
        let prev_row = from.row.checked_sub(1)?;
        Some(CellPosition::new(prev_row, self.column_at(self.last_column())?))
    }
}

impl EditState {
    pub fn position(&self) -> Option<CellPosition> {
        match self {
            EditState::Idle => None,
            EditState::Selected(position) | EditState::Editing(position) => Some(*position),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditState::Editing(_))
    }

    pub fn is_selected(&self, position: CellPosition) -> bool {
        self.position() == Some(position)
    }

    pub fn is_editing_at(&self, position: CellPosition) -> bool {
        *self == EditState::Editing(position)
    }

    /// Same mode, different row. Used when the view re-indexes under a
    /// selection that is still visible.
    pub fn with_row(self, row: usize) -> Self {
        match self {
            EditState::Idle => EditState::Idle,
            EditState::Selected(position) => {
                EditState::Selected(CellPosition::new(row, position.column))
            }
            EditState::Editing(position) => {
                EditState::Editing(CellPosition::new(row, position.column))
            }
        }
    }

    pub fn click(self, position: CellPosition, bounds: GridBounds<'_>) -> Self {
        if bounds.contains(position) {
            EditState::Selected(position)
        } else {
            self
        }
    }

    pub fn double_click(self, position: CellPosition, bounds: GridBounds<'_>) -> Self {
        if bounds.contains(position) {
            EditState::Editing(position)
        } else {
            self
        }
    }

    pub fn on_key(self, key: NavKey, bounds: GridBounds<'_>) -> (Self, KeyOutcome) {
        let Some(position) = self.position() else {
            return (self, KeyOutcome::Ignored);
        };
        if !bounds.contains(position) {
            return (EditState::Idle, KeyOutcome::Ignored);
        }

        match (self, key) {
            (EditState::Selected(_), NavKey::Up) => self.select_or_stay(bounds.step(position, -1, 0)),
            (EditState::Selected(_), NavKey::Down) => self.select_or_stay(bounds.step(position, 1, 0)),
            (EditState::Selected(_), NavKey::Left) => self.select_or_stay(bounds.step(position, 0, -1)),
            (EditState::Selected(_), NavKey::Right) => self.select_or_stay(bounds.step(position, 0, 1)),
            (_, NavKey::Tab) => self.edit_or_stay(bounds.tab_forward(position)),
            (_, NavKey::BackTab) => self.edit_or_stay(bounds.tab_backward(position)),
            (_, NavKey::Enter) => self.edit_or_stay(bounds.step(position, 1, 0)),
            (_, NavKey::ShiftEnter) => self.edit_or_stay(bounds.step(position, -1, 0)),
            (EditState::Selected(_), NavKey::F2) => (EditState::Editing(position), KeyOutcome::Handled),
            (EditState::Selected(_), NavKey::Char(ch)) if !ch.is_control() => {
                (EditState::Editing(position), KeyOutcome::PassThrough)
            }
            (EditState::Editing(_), NavKey::Escape) => {
                (EditState::Selected(position), KeyOutcome::Handled)
            }
            (EditState::Editing(_), _) => (self, KeyOutcome::PassThrough),
            _ => (self, KeyOutcome::Ignored),
        }
    }

    fn select_or_stay(self, next: Option<CellPosition>) -> (Self, KeyOutcome) {
        match next {
            Some(position) => (EditState::Selected(position), KeyOutcome::Handled),
            None => (self, KeyOutcome::Handled),
        }
    }

    fn edit_or_stay(self, next: Option<CellPosition>) -> (Self, KeyOutcome) {
        match next {
            Some(position) => (EditState::Editing(position), KeyOutcome::Handled),
            None => (self, KeyOutcome::Handled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::column::pricing_columns;
    use test_case::test_case;

    fn bounds(rows: usize) -> GridBounds<'static> {
        GridBounds::new(rows, pricing_columns())
    }

    fn first_column() -> FieldKey {
        FieldKey::ProductId
    }

    fn last_column() -> FieldKey {
        FieldKey::ExpirationDate
    }

    #[test_case(NavKey::Up ; "up")]
    #[test_case(NavKey::Left ; "left")]
    fn top_left_clamps(key: NavKey) {
        let start = EditState::Selected(CellPosition::new(0, first_column()));
        let (next, outcome) = start.on_key(key, bounds(3));
        assert_eq!(next, start);
        assert_eq!(outcome, KeyOutcome::Handled);
    }

    #[test_case(NavKey::Down ; "down")]
    #[test_case(NavKey::Right ; "right")]
    fn bottom_right_clamps(key: NavKey) {
        let start = EditState::Selected(CellPosition::new(2, last_column()));
        let (next, _) = start.on_key(key, bounds(3));
        assert_eq!(next, start);
    }

    #[test]
    fn arrows_move_selection_by_one() {
        let start = EditState::Selected(CellPosition::new(1, FieldKey::UnitPrice));
        let (next, _) = start.on_key(NavKey::Right, bounds(3));
        assert_eq!(next, EditState::Selected(CellPosition::new(1, FieldKey::MinimumPrice)));
        let (next, _) = next.on_key(NavKey::Up, bounds(3));
        assert_eq!(next, EditState::Selected(CellPosition::new(0, FieldKey::MinimumPrice)));
    }

    #[test]
    fn tab_wraps_to_next_row_and_edits() {
        let start = EditState::Selected(CellPosition::new(0, last_column()));
        let (next, outcome) = start.on_key(NavKey::Tab, bounds(2));
        assert_eq!(next, EditState::Editing(CellPosition::new(1, first_column())));
        assert_eq!(outcome, KeyOutcome::Handled);
    }

    #[test]
    fn back_tab_wraps_to_previous_row() {
        let start = EditState::Editing(CellPosition::new(1, first_column()));
        let (next, _) = start.on_key(NavKey::BackTab, bounds(2));
        assert_eq!(next, EditState::Editing(CellPosition::new(0, last_column())));
    }

    #[test]
    fn tab_past_last_cell_is_a_no_op() {
        let start = EditState::Editing(CellPosition::new(1, last_column()));
        let (next, _) = start.on_key(NavKey::Tab, bounds(2));
        assert_eq!(next, start);
    }

    #[test]
    fn enter_moves_down_and_shift_enter_moves_up() {
        let start = EditState::Selected(CellPosition::new(0, FieldKey::JobId));
        let (down, _) = start.on_key(NavKey::Enter, bounds(2));
        assert_eq!(down, EditState::Editing(CellPosition::new(1, FieldKey::JobId)));
        let (up, _) = down.on_key(NavKey::ShiftEnter, bounds(2));
        assert_eq!(up, EditState::Editing(CellPosition::new(0, FieldKey::JobId)));
    }

    #[test]
    fn printable_char_starts_editing_without_swallowing() {
        let start = EditState::Selected(CellPosition::new(0, FieldKey::UnitPrice));
        let (next, outcome) = start.on_key(NavKey::Char('9'), bounds(1));
        assert_eq!(next, EditState::Editing(CellPosition::new(0, FieldKey::UnitPrice)));
        assert_eq!(outcome, KeyOutcome::PassThrough);
    }

    #[test]
    fn escape_leaves_editing_in_place() {
        let position = CellPosition::new(0, FieldKey::UnitPrice);
        let (next, _) = EditState::Editing(position).on_key(NavKey::Escape, bounds(1));
        assert_eq!(next, EditState::Selected(position));
    }

    #[test]
    fn arrows_inside_editor_belong_to_the_input() {
        let start = EditState::Editing(CellPosition::new(0, FieldKey::UnitPrice));
        let (next, outcome) = start.on_key(NavKey::Left, bounds(1));
        assert_eq!(next, start);
        assert_eq!(outcome, KeyOutcome::PassThrough);
    }

    #[test]
    fn idle_ignores_keys_and_out_of_range_clicks() {
        let (next, outcome) = EditState::Idle.on_key(NavKey::Down, bounds(3));
        assert_eq!(next, EditState::Idle);
        assert_eq!(outcome, KeyOutcome::Ignored);

        let clicked = EditState::Idle.click(CellPosition::new(5, first_column()), bounds(3));
        assert_eq!(clicked, EditState::Idle);
    }

    #[test]
    fn f2_edits_current_cell() {
        let position = CellPosition::new(0, FieldKey::QuoteId);
        let (next, _) = EditState::Selected(position).on_key(NavKey::F2, bounds(1));
        assert_eq!(next, EditState::Editing(position));
    }
}
