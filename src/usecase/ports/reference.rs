use thiserror::Error;

use crate::domain::entities::reference::ReferenceData;

/// Failures reported by the out-of-process collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("request rejected: {0}")]
    Rejected(String),
}

pub trait ReferenceDataProvider: Send + Sync {
    fn load(&self) -> Result<ReferenceData, ServiceError>;
}
