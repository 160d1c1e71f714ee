use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{LogStatus, NewWebhookLog, WebhookLogEntry, WebhookLogFilter, WebhookLogPage},
    error::{AppError, Result},
    repository::WebhookLogRepository,
};

const LOG_COLUMNS: &str = r#"
    id, event_type, gateway_payment_id, payload, processed, processed_at,
    error_message, retry_count, source_ip, user_agent, created_at
"#;

#[derive(FromRow)]
struct WebhookLogRow {
    id: String,
    event_type: String,
    gateway_payment_id: Option<String>,
    payload: String,
    processed: bool,
    processed_at: Option<NaiveDateTime>,
    error_message: Option<String>,
    retry_count: i64,
    source_ip: Option<String>,
    user_agent: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqliteWebhookLogRepository {
    pool: SqlitePool,
}

impl SqliteWebhookLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: WebhookLogRow) -> Result<WebhookLogEntry> {
        // Older rows may hold payloads we could not parse; keep them as text
        let payload = serde_json::from_str(&row.payload)
            .unwrap_or(serde_json::Value::String(row.payload));

        Ok(WebhookLogEntry {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            event_type: row.event_type,
            gateway_payment_id: row.gateway_payment_id,
            payload,
            processed: row.processed,
            processed_at: row.processed_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            error_message: row.error_message,
            retry_count: row.retry_count,
            source_ip: row.source_ip,
            user_agent: row.user_agent,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &WebhookLogFilter) {
        builder.push(" WHERE 1 = 1");

        if let Some(event_type) = &filter.event_type {
            builder.push(" AND event_type = ").push_bind(event_type.clone());
        }

        if let Some(payment_id) = &filter.gateway_payment_id {
            builder.push(" AND gateway_payment_id = ").push_bind(payment_id.clone());
        }

        match filter.status {
            Some(LogStatus::Processed) => {
                builder.push(" AND processed = 1");
            }
            Some(LogStatus::Error) => {
                builder.push(" AND processed = 0 AND error_message IS NOT NULL");
            }
            Some(LogStatus::Pending) => {
                builder.push(" AND processed = 0 AND error_message IS NULL");
            }
            None => {}
        }
    }
}

#[async_trait]
impl WebhookLogRepository for SqliteWebhookLogRepository {
    async fn insert(&self, entry: NewWebhookLog) -> Result<WebhookLogEntry> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();
        let payload = serde_json::to_string(&entry.payload)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let sql = format!(
            r#"
            INSERT INTO webhook_logs (
                id, event_type, gateway_payment_id, payload, processed,
                retry_count, source_ip, user_agent, created_at
            ) VALUES (?, ?, ?, ?, 0, 0, ?, ?, ?)
            RETURNING {}
            "#,
            LOG_COLUMNS
        );

        let row = sqlx::query_as::<_, WebhookLogRow>(&sql)
            .bind(id.to_string())
            .bind(&entry.event_type)
            .bind(&entry.gateway_payment_id)
            .bind(payload)
            .bind(&entry.source_ip)
            .bind(&entry.user_agent)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Self::row_to_entry(row)
    }

    async fn mark_processed(&self, id: Uuid) -> Result<()> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE webhook_logs
            SET processed = 1, processed_at = ?, error_message = NULL
            WHERE id = ?
            "#
        )
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error_message: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE webhook_logs
            SET processed = 0,
                processed_at = ?,
                error_message = ?,
                retry_count = retry_count + 1
            WHERE id = ?
            "#
        )
        .bind(now)
        .bind(error_message)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WebhookLogEntry>> {
        let sql = format!("SELECT {} FROM webhook_logs WHERE id = ?", LOG_COLUMNS);
        let row = sqlx::query_as::<_, WebhookLogRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_entry).transpose()
    }

    async fn list(&self, filter: &WebhookLogFilter) -> Result<WebhookLogPage> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM webhook_logs");
        Self::push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut list_query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM webhook_logs", LOG_COLUMNS));
        Self::push_filters(&mut list_query, filter);
        list_query
            .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
            .push_bind(filter.per_page())
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let rows = list_query
            .build_query_as::<WebhookLogRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let entries = rows.into_iter()
            .map(Self::row_to_entry)
            .collect::<Result<Vec<_>>>()?;

        Ok(WebhookLogPage {
            entries,
            total,
            page: filter.page(),
            per_page: filter.per_page(),
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM webhook_logs WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Webhook log not found".to_string()));
        }

        Ok(())
    }
}
