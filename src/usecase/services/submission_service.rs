use std::sync::Arc;

use crate::domain::entities::request::{
    PriceHeader, PricingRequest, SubmitReceipt, ValidationReport,
};
use crate::usecase::ports::reference::ServiceError;
use crate::usecase::ports::submission::PricingSubmitter;
use crate::usecase::services::grid_store::GridStore;

/// Header-level inputs that travel with the grid rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionContext {
    pub header: PriceHeader,
    pub facilities: Vec<String>,
    pub generators: Vec<String>,
}

pub struct SubmissionService {
    submitter: Arc<dyn PricingSubmitter>,
}

impl SubmissionService {
    pub fn new(submitter: Arc<dyn PricingSubmitter>) -> Self {
        Self { submitter }
    }

    /// Every row in the store goes out, filtered or not, along with the
    /// active conversion table.
    pub fn build_request(store: &GridStore, context: &SubmissionContext) -> PricingRequest {
        let header = context.header.clone().with_conversion(store.conversion());
        PricingRequest::from_rows(
            header,
            store.rows(),
            context.facilities.clone(),
            context.generators.clone(),
        )
    }

    pub fn save_draft(
        &self,
        store: &GridStore,
        context: &SubmissionContext,
    ) -> Result<SubmitReceipt, ServiceError> {
        let request = Self::build_request(store, context);
        let receipt = self.submitter.save_draft(&request)?;
        log::info!(
            "saved draft with {} line(s) as price header {}",
            request.lines.len(),
            receipt.price_header_id
        );
        Ok(receipt)
    }

    pub fn submit(
        &self,
        store: &GridStore,
        context: &SubmissionContext,
    ) -> Result<SubmitReceipt, ServiceError> {
        let request = Self::build_request(store, context);
        match self.submitter.submit_pricing(&request) {
            Ok(receipt) => {
                log::info!(
                    "submitted {} line(s) as price header {}",
                    request.lines.len(),
                    receipt.price_header_id
                );
                Ok(receipt)
            }
            Err(err) => {
                log::warn!("submission failed: {err}");
                Err(err)
            }
        }
    }

    pub fn validate(
        &self,
        store: &GridStore,
        context: &SubmissionContext,
    ) -> Result<ValidationReport, ServiceError> {
        let request = Self::build_request(store, context);
        let report = self.submitter.validate_pricing(&request)?;
        log::debug!(
            "validation returned {} error(s) for {} line(s)",
            report.errors.len(),
            request.lines.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::conversion::ConversionKind;
    use crate::domain::entities::filter::FilterPredicate;
    use crate::domain::entities::row::{FieldKey, RowSeed};
    use crate::infra::mock::pricing_service::MockPricingService;

    #[test]
    fn request_covers_hidden_rows_and_active_conversion() {
        let mut store = GridStore::default();
        store.add_row(RowSeed::from([(FieldKey::RegionId, "East".to_string())]));
        store.add_row(RowSeed::from([(FieldKey::RegionId, "West".to_string())]));
        store.apply_filter(FieldKey::RegionId, FilterPredicate::Contains("West".to_string()));

        let request = SubmissionService::build_request(&store, &SubmissionContext::default());
        assert_eq!(request.lines.len(), 2);
        assert_eq!(request.header.conversion_kind, ConversionKind::Standard);
        assert!(!request.header.conversions.is_empty());
    }

    #[test]
    fn incomplete_rows_are_rejected_but_drafts_are_kept() {
        let backend = Arc::new(MockPricingService::default());
        let service = SubmissionService::new(backend.clone());
        let mut store = GridStore::default();
        store.add_row(RowSeed::new());
        let context = SubmissionContext::default();

        assert!(matches!(
            service.submit(&store, &context),
            Err(ServiceError::Rejected(_))
        ));
        let report = service.validate(&store, &context);
        assert!(report.is_ok_and(|report| !report.is_valid));
        assert!(service.save_draft(&store, &context).is_ok());
        assert_eq!(backend.accepted().len(), 1);
    }
}
