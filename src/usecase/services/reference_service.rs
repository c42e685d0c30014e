use std::sync::Arc;

use crate::domain::entities::reference::ReferenceData;
use crate::usecase::ports::reference::{ReferenceDataProvider, ServiceError};

pub struct ReferenceService {
    provider: Arc<dyn ReferenceDataProvider>,
}

impl ReferenceService {
    pub fn new(provider: Arc<dyn ReferenceDataProvider>) -> Self {
        Self { provider }
    }

    pub fn load(&self) -> Result<ReferenceData, ServiceError> {
        self.provider.load()
    }

    /// A failed load leaves the dropdowns empty; the grid keeps working.
    pub fn load_or_empty(&self) -> ReferenceData {
        match self.provider.load() {
            Ok(data) => {
                log::info!(
                    "loaded reference data: {} regions, {} container sizes, {} units",
                    data.regions.len(),
                    data.container_sizes.len(),
                    data.units_of_measure.len()
                );
                data
            }
            Err(err) => {
                log::warn!("reference data unavailable, dropdowns will be empty: {err}");
                ReferenceData::default()
            }
        }
    }
}
