use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u64);

impl From<u64> for RowId {
    fn from(value: u64) -> Self {
        RowId(value)
    }
}

impl From<RowId> for u64 {
    fn from(value: RowId) -> Self {
        value.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Named attributes of a pricing line, in storage order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumCount,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    PricingType,
    PricePriority,
    CustomerId,
    ProductId,
    RegionId,
    ProfileId,
    GeneratorId,
    ContractId,
    QuoteId,
    JobId,
    ContainerSize,
    BillingUom,
    UnitPrice,
    MinimumPrice,
    EffectiveDate,
    ExpirationDate,
}

impl FieldKey {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    fn slot(self) -> usize {
        self as usize
    }
}

pub type RowSeed = BTreeMap<FieldKey, String>;

/// One editable pricing line. Every field is raw text until a column
/// definition interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub id: RowId,
    fields: [String; FieldKey::COUNT],
}

impl GridRow {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            fields: std::array::from_fn(|_| String::new()),
        }
    }

    pub fn seeded(id: RowId, seed: RowSeed) -> Self {
        let mut row = Self::new(id);
        for (key, value) in seed {
            row.set(key, value);
        }
        row
    }

    pub fn get(&self, key: FieldKey) -> &str {
        self.fields
            .get(key.slot())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(key.slot()) {
            *field = value.into();
        }
    }

    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|value| value.trim().is_empty())
    }
}
