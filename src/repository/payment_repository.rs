use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{BillingType, GatewayPaymentUpdate, NewPayment, Payment, PaymentStatus},
    error::{AppError, Result},
    repository::PaymentRepository,
};

const PAYMENT_COLUMNS: &str = r#"
    id, gateway_payment_id, enrollment_id, customer_id,
    value_cents, net_value_cents, discount_cents, interest_cents, fine_cents,
    due_date, payment_date, confirmed_date, status, billing_type,
    description, invoice_url, bank_slip_url, installment, installment_count,
    metadata, version, created_at, updated_at
"#;

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    gateway_payment_id: String,
    enrollment_id: Option<String>,
    customer_id: Option<String>,
    value_cents: i64,
    net_value_cents: Option<i64>,
    discount_cents: i64,
    interest_cents: i64,
    fine_cents: i64,
    due_date: Option<NaiveDate>,
    payment_date: Option<NaiveDate>,
    confirmed_date: Option<NaiveDate>,
    status: String,
    billing_type: String,
    description: Option<String>,
    invoice_url: Option<String>,
    bank_slip_url: Option<String>,
    installment: Option<String>,
    installment_count: Option<i64>,
    metadata: Option<String>,
    version: i64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        let enrollment_id = row.enrollment_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|e| AppError::Database(e.to_string()))?;

        let metadata = row.metadata
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| AppError::Database(format!("Invalid payment metadata: {}", e)))?;

        Ok(Payment {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            gateway_payment_id: row.gateway_payment_id,
            enrollment_id,
            customer_id: row.customer_id,
            value_cents: row.value_cents,
            net_value_cents: row.net_value_cents,
            discount_cents: row.discount_cents,
            interest_cents: row.interest_cents,
            fine_cents: row.fine_cents,
            due_date: row.due_date,
            payment_date: row.payment_date,
            confirmed_date: row.confirmed_date,
            status: PaymentStatus::parse(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid payment status: {}", row.status)))?,
            billing_type: BillingType::parse(&row.billing_type),
            description: row.description,
            invoice_url: row.invoice_url,
            bank_slip_url: row.bank_slip_url,
            installment: row.installment,
            installment_count: row.installment_count,
            metadata,
            version: row.version,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn upsert(&self, payment: NewPayment) -> Result<Payment> {
        let now = Utc::now().naive_utc();

        // Re-registering a charge never touches its status: that column
        // belongs to the webhook flow.
        let sql = format!(
            r#"
            INSERT INTO payments (
                id, gateway_payment_id, enrollment_id, customer_id, value_cents,
                due_date, status, billing_type, description, invoice_url,
                installment_count, version, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, 'PENDING', ?, ?, ?, ?, 1, ?, ?)
            ON CONFLICT (gateway_payment_id) DO UPDATE SET
                enrollment_id = COALESCE(excluded.enrollment_id, payments.enrollment_id),
                customer_id = COALESCE(excluded.customer_id, payments.customer_id),
                value_cents = excluded.value_cents,
                due_date = COALESCE(excluded.due_date, payments.due_date),
                billing_type = excluded.billing_type,
                description = COALESCE(excluded.description, payments.description),
                invoice_url = COALESCE(excluded.invoice_url, payments.invoice_url),
                installment_count = COALESCE(excluded.installment_count, payments.installment_count),
                version = payments.version + 1,
                updated_at = excluded.updated_at
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        );

        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(&payment.gateway_payment_id)
            .bind(payment.enrollment_id.map(|id| id.to_string()))
            .bind(&payment.customer_id)
            .bind(payment.value_cents)
            .bind(payment.due_date)
            .bind(payment.billing_type.as_str())
            .bind(&payment.description)
            .bind(&payment.invoice_url)
            .bind(payment.installment_count)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Self::row_to_payment(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let sql = format!("SELECT {} FROM payments WHERE id = ?", PAYMENT_COLUMNS);
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_payment).transpose()
    }

    async fn find_by_gateway_id(&self, gateway_payment_id: &str) -> Result<Option<Payment>> {
        let sql = format!(
            "SELECT {} FROM payments WHERE gateway_payment_id = ?",
            PAYMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(gateway_payment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_payment).transpose()
    }

    async fn apply_gateway_update(
        &self,
        gateway_payment_id: &str,
        update: GatewayPaymentUpdate,
    ) -> Result<Option<Payment>> {
        let now = Utc::now().naive_utc();
        let metadata = serde_json::to_string(&update.metadata)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        // Single statement: concurrent redeliveries serialize on the row and
        // the last writer wins. `version` counts applied updates.
        let sql = format!(
            r#"
            UPDATE payments
            SET status = ?,
                billing_type = COALESCE(?, billing_type),
                value_cents = COALESCE(?, value_cents),
                net_value_cents = COALESCE(?, net_value_cents),
                discount_cents = COALESCE(?, discount_cents),
                interest_cents = COALESCE(?, interest_cents),
                fine_cents = COALESCE(?, fine_cents),
                due_date = COALESCE(?, due_date),
                payment_date = COALESCE(?, payment_date),
                confirmed_date = COALESCE(?, confirmed_date),
                invoice_url = COALESCE(?, invoice_url),
                bank_slip_url = COALESCE(?, bank_slip_url),
                installment = COALESCE(?, installment),
                installment_count = COALESCE(?, installment_count),
                metadata = ?,
                version = version + 1,
                updated_at = ?
            WHERE gateway_payment_id = ?
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        );

        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(update.status.as_str())
            .bind(update.billing_type.map(|b| b.as_str()))
            .bind(update.value_cents)
            .bind(update.net_value_cents)
            .bind(update.discount_cents)
            .bind(update.interest_cents)
            .bind(update.fine_cents)
            .bind(update.due_date)
            .bind(update.payment_date)
            .bind(update.confirmed_date)
            .bind(&update.invoice_url)
            .bind(&update.bank_slip_url)
            .bind(&update.installment)
            .bind(update.installment_count)
            .bind(metadata)
            .bind(now)
            .bind(gateway_payment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_payment).transpose()
    }

    async fn list_by_enrollment(&self, enrollment_id: Uuid) -> Result<Vec<Payment>> {
        let sql = format!(
            "SELECT {} FROM payments WHERE enrollment_id = ? ORDER BY created_at DESC",
            PAYMENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(enrollment_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_payment)
            .collect()
    }
}
