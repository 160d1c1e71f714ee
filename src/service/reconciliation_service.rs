use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{Enrollment, NewPayment, Payment},
    error::Result,
    payments::GatewayWebhookEvent,
    repository::{EnrollmentRepository, PaymentRepository},
};

#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    /// The payment row was updated; `activated_enrollment` is set when this
    /// delivery unlocked course access.
    Updated {
        payment: Payment,
        activated_enrollment: Option<Enrollment>,
    },
    /// No payment carries this gateway id. Nothing to reconcile.
    UnknownCharge,
}

/// Applies gateway status changes to payments and opens enrollments.
pub struct ReconciliationService {
    payment_repo: Arc<dyn PaymentRepository>,
    enrollment_repo: Arc<dyn EnrollmentRepository>,
}

impl ReconciliationService {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository>,
        enrollment_repo: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self { payment_repo, enrollment_repo }
    }

    pub async fn process(
        &self,
        event: &GatewayWebhookEvent,
        raw: &serde_json::Value,
        log_id: Option<Uuid>,
    ) -> Result<ReconcileOutcome> {
        let charge_id = event.payment.id.as_str();
        let update = event.payment.to_update(raw);
        let status = update.status;

        let Some(payment) = self.payment_repo
            .apply_gateway_update(charge_id, update)
            .await?
        else {
            tracing::warn!(
                "No payment found for gateway charge {} (event {}, log {:?})",
                charge_id,
                event.event,
                log_id
            );
            return Ok(ReconcileOutcome::UnknownCharge);
        };

        tracing::info!(
            "Payment {} set to {} by {} (version {})",
            charge_id,
            status.as_str(),
            event.event,
            payment.version
        );

        let activated_enrollment = self.activate_enrollment(&payment).await?;

        Ok(ReconcileOutcome::Updated { payment, activated_enrollment })
    }

    /// Moves the linked enrollment forward when the payment status unlocks it.
    async fn activate_enrollment(&self, payment: &Payment) -> Result<Option<Enrollment>> {
        let Some(enrollment_id) = payment.enrollment_id else {
            return Ok(None);
        };

        let Some(enrollment) = self.enrollment_repo.find_by_id(enrollment_id).await? else {
            tracing::warn!(
                "Payment {} references missing enrollment {}",
                payment.gateway_payment_id,
                enrollment_id
            );
            return Ok(None);
        };

        let Some(next) = enrollment.status.on_payment_status(payment.status) else {
            return Ok(None);
        };

        match self.enrollment_repo
            .transition_status(enrollment.id, enrollment.status, next)
            .await?
        {
            Some(updated) => {
                tracing::info!(
                    "Enrollment {} activated by payment {}",
                    updated.id,
                    payment.gateway_payment_id
                );
                Ok(Some(updated))
            }
            None => {
                tracing::debug!("Enrollment {} already moved by another delivery", enrollment.id);
                Ok(None)
            }
        }
    }

    /// Records a charge created at the gateway. Safe to repeat.
    pub async fn register_charge(&self, payment: NewPayment) -> Result<Payment> {
        let payment = self.payment_repo.upsert(payment).await?;
        tracing::debug!("Registered charge {} (version {})", payment.gateway_payment_id, payment.version);
        Ok(payment)
    }
}
