use serde::{Deserialize, Serialize};

/// Container every other multiplier is expressed against.
pub const BASE_CONTAINER: &str = "31-55 Gallon";
const BASE_ALIASES: [&str; 2] = ["55 Gallon", "31-55 gallon"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionKind {
    #[default]
    Standard,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionEntry {
    pub container: String,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionTable {
    kind: ConversionKind,
    entries: Vec<ConversionEntry>,
}

const STANDARD_MULTIPLIERS: [(&str, f64); 8] = [
    ("1-5 Gallon", 0.1),
    ("6-30 Gallon", 0.5),
    (BASE_CONTAINER, 1.0),
    ("85 Gallon Overpack", 1.5),
    ("Cubic Yard Box", 4.0),
    ("275 Gallon Tote", 5.0),
    ("330 Gallon Tote", 6.0),
    ("Bulk (per ton)", 20.0),
];

pub fn is_base_container(label: &str) -> bool {
    let label = label.trim();
    label.eq_ignore_ascii_case(BASE_CONTAINER)
        || BASE_ALIASES
            .iter()
            .any(|alias| label.eq_ignore_ascii_case(alias))
}

impl Default for ConversionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ConversionTable {
    pub fn standard() -> Self {
        Self {
            kind: ConversionKind::Standard,
            entries: STANDARD_MULTIPLIERS
                .iter()
                .map(|(container, multiplier)| ConversionEntry {
                    container: (*container).to_string(),
                    multiplier: *multiplier,
                })
                .collect(),
        }
    }

    /// Editable working copy initialised from the standard multipliers.
    pub fn custom_from_standard() -> Self {
        Self {
            kind: ConversionKind::Custom,
            ..Self::standard()
        }
    }

    pub fn for_kind(kind: ConversionKind) -> Self {
        match kind {
            ConversionKind::Standard => Self::standard(),
            ConversionKind::Custom => Self::custom_from_standard(),
        }
    }

    pub fn kind(&self) -> ConversionKind {
        self.kind
    }

    pub fn entries(&self) -> &[ConversionEntry] {
        &self.entries
    }

    pub fn multiplier(&self, container: &str) -> Option<f64> {
        if is_base_container(container) {
            return Some(1.0);
        }
        let container = container.trim();
        self.entries
            .iter()
            .find(|entry| entry.container.eq_ignore_ascii_case(container))
            .map(|entry| entry.multiplier)
    }

    /// Changes one multiplier of a custom table. The standard table, the base
    /// container and invalid values are left as they are.
    pub fn set_multiplier(&mut self, container: &str, multiplier: f64) -> bool {
        if self.kind != ConversionKind::Custom || is_base_container(container) {
            return false;
        }
        if !multiplier.is_finite() || multiplier < 0.0 {
            return false;
        }
        let container = container.trim();
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.container.eq_ignore_ascii_case(container))
        {
            Some(entry) => {
                entry.multiplier = multiplier;
                true
            }
            None => false,
        }
    }

    pub fn scaled_minimum(&self, container: &str, base_minimum: f64) -> Option<f64> {
        self.multiplier(container)
            .map(|multiplier| base_minimum * multiplier)
    }
}
