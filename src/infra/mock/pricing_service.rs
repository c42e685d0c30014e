use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::Mutex;

use crate::domain::entities::request::{
    PricingLine, PricingRequest, SubmitReceipt, ValidationReport,
};
use crate::usecase::ports::reference::ServiceError;
use crate::usecase::ports::submission::PricingSubmitter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedCall {
    Draft,
    Submit,
}

/// In-memory submission backend. Assigns increasing price header ids and
/// keeps every accepted request for inspection.
#[derive(Debug)]
pub struct MockPricingService {
    next_header_id: AtomicI64,
    accepted: Mutex<Vec<(RecordedCall, i64, PricingRequest)>>,
}

impl Default for MockPricingService {
    fn default() -> Self {
        Self {
            next_header_id: AtomicI64::new(1000),
            accepted: Mutex::new(Vec::new()),
        }
    }
}

fn line_errors(position: usize, line: &PricingLine) -> Vec<String> {
    let label = format!("line {} (row #{})", position + 1, line.line_id);
    let mut errors = Vec::new();
    if line.product_id.is_none() {
        errors.push(format!("{label}: product is required"));
    }
    if line.region_id.is_none() {
        errors.push(format!("{label}: region is required"));
    }
    if line.container_size.is_none() {
        errors.push(format!("{label}: container size is required"));
    }
    if line.billing_uom.is_none() {
        errors.push(format!("{label}: unit of measure is required"));
    }
    match line.unit_price {
        None => errors.push(format!("{label}: unit price must be a number")),
        Some(price) if price < 0.0 => {
            errors.push(format!("{label}: unit price must not be negative"))
        }
        Some(_) => {}
    }
    if line.effective_date.is_none() {
        errors.push(format!("{label}: effective date is required"));
    }
    errors
}

impl MockPricingService {
    pub fn accepted(&self) -> Vec<(RecordedCall, i64, PricingRequest)> {
        self.accepted.lock().clone()
    }

    fn record(&self, call: RecordedCall, request: &PricingRequest) -> SubmitReceipt {
        let price_header_id = self.next_header_id.fetch_add(1, Ordering::SeqCst);
        self.accepted
            .lock()
            .push((call, price_header_id, request.clone()));
        SubmitReceipt { price_header_id }
    }

    fn check(request: &PricingRequest) -> ValidationReport {
        let mut errors = Vec::new();
        if request.lines.is_empty() {
            errors.push("at least one pricing line is required".to_string());
        }
        for (position, line) in request.lines.iter().enumerate() {
            errors.extend(line_errors(position, line));
        }
        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

impl PricingSubmitter for MockPricingService {
    fn save_draft(&self, request: &PricingRequest) -> Result<SubmitReceipt, ServiceError> {
        Ok(self.record(RecordedCall::Draft, request))
    }

    fn submit_pricing(&self, request: &PricingRequest) -> Result<SubmitReceipt, ServiceError> {
        let report = Self::check(request);
        if !report.is_valid {
            return Err(ServiceError::Rejected(report.errors.join("; ")));
        }
        Ok(self.record(RecordedCall::Submit, request))
    }

    fn validate_pricing(
        &self,
        request: &PricingRequest,
    ) -> Result<ValidationReport, ServiceError> {
        Ok(Self::check(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_line(line_id: u64) -> PricingLine {
        PricingLine {
            line_id,
            product_id: Some("Used Oil".to_string()),
            region_id: Some("West".to_string()),
            container_size: Some("Drum".to_string()),
            billing_uom: Some("Each".to_string()),
            unit_price: Some(12.0),
            effective_date: Some("2024-01-01".to_string()),
            ..PricingLine::default()
        }
    }

    #[test]
    fn drafts_accept_incomplete_requests() {
        let service = MockPricingService::default();
        let first = service.save_draft(&PricingRequest::default());
        let second = service.save_draft(&PricingRequest::default());

        let first = first.expect("first draft should be saved").price_header_id;
        let second = second.expect("second draft should be saved").price_header_id;
        assert!(second > first);
        assert_eq!(service.accepted().len(), 2);
    }

    #[test]
    fn submit_rejects_invalid_lines() {
        let service = MockPricingService::default();
        let request = PricingRequest {
            lines: vec![PricingLine {
                line_id: 3,
                ..PricingLine::default()
            }],
            ..PricingRequest::default()
        };

        let result = service.submit_pricing(&request);
        assert!(matches!(result, Err(ServiceError::Rejected(_))));
        assert!(service.accepted().is_empty());
    }

    #[test]
    fn validate_reports_each_problem() {
        let service = MockPricingService::default();
        let mut broken = complete_line(2);
        broken.unit_price = None;
        let request = PricingRequest {
            lines: vec![complete_line(1), broken],
            ..PricingRequest::default()
        };

        let report = service
            .validate_pricing(&request)
            .expect("validation should run");
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors.iter().any(|e| e.contains("line 2")));
    }
}
