use crate::domain::entities::reference::{ReferenceData, ReferenceItem};
use crate::usecase::ports::reference::{ReferenceDataProvider, ServiceError};

fn items(rows: &[(&str, &str)]) -> Vec<ReferenceItem> {
    rows.iter()
        .zip(1_i64..)
        .map(|((name, code), id)| ReferenceItem::new(id, *name, *code))
        .collect()
}

/// Static lookup lists standing in for the reference-data backend.
#[derive(Debug, Clone, Default)]
pub struct MockReferenceData {
    pub fail: bool,
}

impl MockReferenceData {
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl ReferenceDataProvider for MockReferenceData {
    fn load(&self) -> Result<ReferenceData, ServiceError> {
        if self.fail {
            return Err(ServiceError::Unavailable(
                "reference data backend did not respond".to_string(),
            ));
        }

        Ok(ReferenceData {
            regions: items(&[
                ("Northeast", "NE"),
                ("Southeast", "SE"),
                ("Midwest", "MW"),
                ("Southwest", "SW"),
                ("West", "W"),
            ]),
            container_sizes: items(&[
                ("1-5 Gallon", "P05"),
                ("6-30 Gallon", "P30"),
                ("31-55 Gallon", "DM55"),
                ("85 Gallon Overpack", "OP85"),
                ("Cubic Yard Box", "CYB"),
                ("275 Gallon Tote", "T275"),
                ("330 Gallon Tote", "T330"),
                ("Bulk (per ton)", "BULK"),
                ("Drum", "DRUM"),
            ]),
            units_of_measure: items(&[
                ("Each", "EA"),
                ("Gallon", "GAL"),
                ("Pound", "LB"),
                ("Ton", "TON"),
                ("Hour", "HR"),
            ]),
            customers: items(&[
                ("Acme Manufacturing", "C-1001"),
                ("Blue River Labs", "C-1002"),
                ("Cedar Hospital", "C-1003"),
            ]),
            products: items(&[
                ("Non-Haz Solids", "NHS"),
                ("Used Oil", "UO"),
                ("Lab Pack", "LP"),
                ("Aerosols", "AER"),
            ]),
            terms: items(&[("Net 30", "N30"), ("Net 45", "N45"), ("Due on Receipt", "DOR")]),
        })
    }
}
