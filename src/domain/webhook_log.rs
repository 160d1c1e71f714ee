use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookLogEntry {
    pub id: Uuid,
    pub event_type: String,
    pub gateway_payment_id: Option<String>,
    pub payload: serde_json::Value,
    pub processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub retry_count: i64,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWebhookLog {
    pub event_type: String,
    pub gateway_payment_id: Option<String>,
    pub payload: serde_json::Value,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Processed,
    /// Processing failed and the error was recorded.
    Error,
    /// Inserted but never marked either way.
    Pending,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookLogFilter {
    pub event_type: Option<String>,
    #[serde(alias = "payment_id")]
    pub gateway_payment_id: Option<String>,
    pub status: Option<LogStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl WebhookLogFilter {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookLogPage {
    pub entries: Vec<WebhookLogEntry>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_paging_defaults() {
        let filter = WebhookLogFilter::default();
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.per_page(), DEFAULT_PAGE_SIZE);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_filter_paging_clamps() {
        let filter = WebhookLogFilter {
            page: Some(0),
            per_page: Some(1000),
            ..Default::default()
        };
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.per_page(), MAX_PAGE_SIZE);

        let filter = WebhookLogFilter {
            page: Some(3),
            per_page: Some(10),
            ..Default::default()
        };
        assert_eq!(filter.offset(), 20);
    }
}
