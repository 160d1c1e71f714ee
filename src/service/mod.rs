pub mod reconciliation_service;
pub mod webhook_intake;

use std::sync::Arc;
use crate::repository::*;
use crate::auth::ImpersonationService;
use reconciliation_service::ReconciliationService;
use webhook_intake::WebhookIntake;

pub use reconciliation_service::ReconcileOutcome;
pub use webhook_intake::{IntakeFailure, IntakeReport, RequestMeta};

pub struct ServiceContext {
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub enrollment_repo: Arc<dyn EnrollmentRepository>,
    pub webhook_log_repo: Arc<dyn WebhookLogRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub reconciliation_service: Arc<ReconciliationService>,
    pub webhook_intake: Arc<WebhookIntake>,
    pub impersonation_service: Arc<ImpersonationService>,
}

impl ServiceContext {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository>,
        enrollment_repo: Arc<dyn EnrollmentRepository>,
        webhook_log_repo: Arc<dyn WebhookLogRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        impersonation_service: Arc<ImpersonationService>,
    ) -> Self {
        let reconciliation_service = Arc::new(ReconciliationService::new(
            payment_repo.clone(),
            enrollment_repo.clone(),
        ));
        let webhook_intake = Arc::new(WebhookIntake::new(
            webhook_log_repo.clone(),
            reconciliation_service.clone(),
        ));

        Self {
            payment_repo,
            enrollment_repo,
            webhook_log_repo,
            profile_repo,
            reconciliation_service,
            webhook_intake,
            impersonation_service,
        }
    }
}
