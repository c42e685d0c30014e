use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::row::{FieldKey, GridRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPredicate {
    /// Case-insensitive substring match. An empty needle matches everything.
    Contains(String),
    /// Exact membership, used by dropdown columns. An empty set matches nothing.
    OneOf(BTreeSet<String>),
}

impl FilterPredicate {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            FilterPredicate::Contains(needle) => {
                let needle = needle.trim();
                needle.is_empty() || value.to_lowercase().contains(&needle.to_lowercase())
            }
            FilterPredicate::OneOf(allowed) => allowed.contains(value.trim()),
        }
    }

    /// The single value a new row should inherit from this filter, if any.
    pub fn seed_value(&self) -> Option<&str> {
        match self {
            FilterPredicate::Contains(needle) => {
                let needle = needle.trim();
                (!needle.is_empty()).then_some(needle)
            }
            FilterPredicate::OneOf(allowed) if allowed.len() == 1 => {
                allowed.iter().next().map(String::as_str)
            }
            FilterPredicate::OneOf(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    active: BTreeMap<FieldKey, FilterPredicate>,
}

impl FilterSet {
    pub fn apply(&mut self, key: FieldKey, predicate: FilterPredicate) {
        self.active.insert(key, predicate);
    }

    pub fn clear(&mut self, key: FieldKey) -> bool {
        self.active.remove(&key).is_some()
    }

    pub fn clear_all(&mut self) {
        self.active.clear();
    }

    pub fn get(&self, key: FieldKey) -> Option<&FilterPredicate> {
        self.active.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &FilterPredicate)> {
        self.active.iter()
    }

    pub fn matches(&self, row: &GridRow) -> bool {
        self.active
            .iter()
            .all(|(key, predicate)| predicate.matches(row.get(*key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::row::RowId;

    fn row_with(key: FieldKey, value: &str) -> GridRow {
        let mut row = GridRow::new(RowId(1));
        row.set(key, value);
        row
    }

    #[test]
    fn contains_is_case_insensitive() {
        let predicate = FilterPredicate::Contains("north".to_string());
        assert!(predicate.matches("Northeast"));
        assert!(!predicate.matches("Southwest"));
    }

    #[test]
    fn blank_contains_matches_everything() {
        assert!(FilterPredicate::Contains("  ".to_string()).matches("anything"));
    }

    #[test]
    fn one_of_requires_membership() {
        let allowed: BTreeSet<String> = ["Drum".to_string(), "Tote".to_string()].into();
        let predicate = FilterPredicate::OneOf(allowed);
        assert!(predicate.matches("Drum"));
        assert!(!predicate.matches("Box"));
        assert!(!FilterPredicate::OneOf(BTreeSet::new()).matches("Drum"));
    }

    #[test]
    fn every_active_filter_must_match() {
        let mut filters = FilterSet::default();
        filters.apply(FieldKey::RegionId, FilterPredicate::Contains("East".to_string()));
        filters.apply(FieldKey::QuoteId, FilterPredicate::Contains("Q-1".to_string()));

        let mut row = row_with(FieldKey::RegionId, "Northeast");
        assert!(!filters.matches(&row));
        row.set(FieldKey::QuoteId, "Q-12");
        assert!(filters.matches(&row));
    }

    #[test]
    fn seed_value_only_for_single_values() {
        let two: BTreeSet<String> = ["A".to_string(), "B".to_string()].into();
        assert_eq!(FilterPredicate::OneOf(two).seed_value(), None);
        assert_eq!(
            FilterPredicate::Contains(" J-7 ".to_string()).seed_value(),
            Some("J-7")
        );
    }
}
