use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::NewWebhookLog,
    error::AppError,
    payments::GatewayWebhookEvent,
    repository::WebhookLogRepository,
    service::reconciliation_service::{ReconcileOutcome, ReconciliationService},
};

/// Caller details recorded next to each delivery.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub struct IntakeReport {
    pub log_id: Option<Uuid>,
    pub outcome: ReconcileOutcome,
}

#[derive(Debug)]
pub struct IntakeFailure {
    pub log_id: Option<Uuid>,
    pub error: AppError,
}

/// Receives one gateway delivery: audit first, then reconcile.
///
/// The log insert always precedes reconciliation and is never rolled back.
/// Log writes are best-effort; reconciliation errors are returned so the
/// gateway sees a 5xx and redelivers.
pub struct WebhookIntake {
    log_repo: Arc<dyn WebhookLogRepository>,
    reconciliation: Arc<ReconciliationService>,
}

impl WebhookIntake {
    pub fn new(
        log_repo: Arc<dyn WebhookLogRepository>,
        reconciliation: Arc<ReconciliationService>,
    ) -> Self {
        Self { log_repo, reconciliation }
    }

    pub async fn receive(
        &self,
        body: &[u8],
        meta: RequestMeta,
    ) -> Result<IntakeReport, IntakeFailure> {
        let raw: serde_json::Value = serde_json::from_slice(body).map_err(|e| IntakeFailure {
            log_id: None,
            error: AppError::BadPayload(e.to_string()),
        })?;

        let log_id = self.record(&raw, meta).await;

        let result = match serde_json::from_value::<GatewayWebhookEvent>(raw.clone()) {
            Ok(event) => self.reconciliation.process(&event, &raw, log_id).await,
            Err(e) => Err(AppError::BadPayload(e.to_string())),
        };

        match result {
            Ok(outcome) => {
                if let Some(id) = log_id {
                    if let Err(e) = self.log_repo.mark_processed(id).await {
                        tracing::warn!("Failed to mark webhook log {} processed: {}", id, e);
                    }
                }
                Ok(IntakeReport { log_id, outcome })
            }
            Err(error) => {
                tracing::error!("Webhook processing failed: {}", error);
                if let Some(id) = log_id {
                    if let Err(e) = self.log_repo.mark_failed(id, &error.to_string()).await {
                        tracing::warn!("Failed to record error on webhook log {}: {}", id, e);
                    }
                }
                Err(IntakeFailure { log_id, error })
            }
        }
    }

    async fn record(&self, raw: &serde_json::Value, meta: RequestMeta) -> Option<Uuid> {
        let event_type = raw.get("event")
            .and_then(|v| v.as_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let gateway_payment_id = raw.pointer("/payment/id")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let entry = NewWebhookLog {
            event_type,
            gateway_payment_id,
            payload: raw.clone(),
            source_ip: meta.source_ip,
            user_agent: meta.user_agent,
        };

        match self.log_repo.insert(entry).await {
            Ok(logged) => {
                tracing::debug!("Logged webhook {} as {}", logged.event_type, logged.id);
                Some(logged.id)
            }
            Err(e) => {
                tracing::warn!("Failed to write webhook log, continuing: {}", e);
                None
            }
        }
    }
}
