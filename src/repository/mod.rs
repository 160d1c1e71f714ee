use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod enrollment_repository;
pub mod payment_repository;
pub mod profile_repository;
pub mod webhook_log_repository;

pub use enrollment_repository::SqliteEnrollmentRepository;
pub use payment_repository::SqlitePaymentRepository;
pub use profile_repository::SqliteProfileRepository;
pub use webhook_log_repository::SqliteWebhookLogRepository;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert-or-update keyed by the gateway's charge id, in one statement.
    async fn upsert(&self, payment: NewPayment) -> Result<Payment>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>>;
    async fn find_by_gateway_id(&self, gateway_payment_id: &str) -> Result<Option<Payment>>;
    /// Applies a webhook update atomically. `None` when no payment carries
    /// that gateway id.
    async fn apply_gateway_update(
        &self,
        gateway_payment_id: &str,
        update: GatewayPaymentUpdate,
    ) -> Result<Option<Payment>>;
    async fn list_by_enrollment(&self, enrollment_id: Uuid) -> Result<Vec<Payment>>;
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn create(&self, request: CreateEnrollmentRequest) -> Result<Enrollment>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enrollment>>;
    /// Moves the enrollment from `from` to `to`. Returns `None` when the row
    /// is no longer in `from`, so only one concurrent caller wins.
    async fn transition_status(
        &self,
        id: Uuid,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> Result<Option<Enrollment>>;
}

#[async_trait]
pub trait WebhookLogRepository: Send + Sync {
    async fn insert(&self, entry: NewWebhookLog) -> Result<WebhookLogEntry>;
    async fn mark_processed(&self, id: Uuid) -> Result<()>;
    /// Records the failure and bumps `retry_count`.
    async fn mark_failed(&self, id: Uuid, error_message: &str) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WebhookLogEntry>>;
    async fn list(&self, filter: &WebhookLogFilter) -> Result<WebhookLogPage>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, request: CreateProfileRequest) -> Result<Profile>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>>;
}
