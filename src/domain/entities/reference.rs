use serde::{Deserialize, Serialize};

use crate::domain::entities::column::OptionSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: i64,
    pub name: String,
    pub code: String,
}

impl ReferenceItem {
    pub fn new(id: i64, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Read-only lookup lists. Empty lists are a valid state (still loading, or
/// the provider failed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub regions: Vec<ReferenceItem>,
    pub container_sizes: Vec<ReferenceItem>,
    pub units_of_measure: Vec<ReferenceItem>,
    pub customers: Vec<ReferenceItem>,
    pub products: Vec<ReferenceItem>,
    pub terms: Vec<ReferenceItem>,
}

impl ReferenceData {
    pub fn options(&self, source: OptionSource) -> &[ReferenceItem] {
        match source {
            OptionSource::Regions => &self.regions,
            OptionSource::ContainerSizes => &self.container_sizes,
            OptionSource::UnitsOfMeasure => &self.units_of_measure,
        }
    }

    pub fn option_names(&self, source: OptionSource) -> Vec<String> {
        self.options(source)
            .iter()
            .map(|item| item.name.clone())
            .collect()
    }

    /// Committed dropdown values are option names.
    pub fn contains(&self, source: OptionSource, value: &str) -> bool {
        let value = value.trim();
        self.options(source)
            .iter()
            .any(|item| item.name.eq_ignore_ascii_case(value))
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
            && self.container_sizes.is_empty()
            && self.units_of_measure.is_empty()
            && self.customers.is_empty()
            && self.products.is_empty()
            && self.terms.is_empty()
    }
}
