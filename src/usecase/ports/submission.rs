use crate::domain::entities::request::{PricingRequest, SubmitReceipt, ValidationReport};
use crate::usecase::ports::reference::ServiceError;

pub trait PricingSubmitter: Send + Sync {
    fn save_draft(&self, request: &PricingRequest) -> Result<SubmitReceipt, ServiceError>;
    fn submit_pricing(&self, request: &PricingRequest) -> Result<SubmitReceipt, ServiceError>;
    fn validate_pricing(&self, request: &PricingRequest)
        -> Result<ValidationReport, ServiceError>;
}
