use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub gateway_payment_id: String,
    pub enrollment_id: Option<Uuid>,
    pub customer_id: Option<String>,
    pub value_cents: i64,
    pub net_value_cents: Option<i64>,
    pub discount_cents: i64,
    pub interest_cents: i64,
    pub fine_cents: i64,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub confirmed_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub billing_type: BillingType,
    pub description: Option<String>,
    pub invoice_url: Option<String>,
    pub bank_slip_url: Option<String>,
    pub installment: Option<String>,
    pub installment_count: Option<i64>,
    /// Raw gateway payload from the most recent webhook delivery.
    pub metadata: Option<serde_json::Value>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Internal payment status. The string tags match the gateway's vocabulary
/// so rows stay readable next to the gateway dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Received,
    ReceivedInCash,
    Confirmed,
    Overdue,
    AwaitingRiskAnalysis,
    DunningRequested,
    DunningReceived,
    Refunded,
    RefundRequested,
    RefundInProgress,
    ChargebackRequested,
    ChargebackDispute,
    AwaitingChargebackReversal,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Received => "RECEIVED",
            PaymentStatus::ReceivedInCash => "RECEIVED_IN_CASH",
            PaymentStatus::Confirmed => "CONFIRMED",
            PaymentStatus::Overdue => "OVERDUE",
            PaymentStatus::AwaitingRiskAnalysis => "AWAITING_RISK_ANALYSIS",
            PaymentStatus::DunningRequested => "DUNNING_REQUESTED",
            PaymentStatus::DunningReceived => "DUNNING_RECEIVED",
            PaymentStatus::Refunded => "REFUNDED",
            PaymentStatus::RefundRequested => "REFUND_REQUESTED",
            PaymentStatus::RefundInProgress => "REFUND_IN_PROGRESS",
            PaymentStatus::ChargebackRequested => "CHARGEBACK_REQUESTED",
            PaymentStatus::ChargebackDispute => "CHARGEBACK_DISPUTE",
            PaymentStatus::AwaitingChargebackReversal => "AWAITING_CHARGEBACK_REVERSAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(PaymentStatus::Pending),
            "RECEIVED" => Some(PaymentStatus::Received),
            "RECEIVED_IN_CASH" => Some(PaymentStatus::ReceivedInCash),
            "CONFIRMED" => Some(PaymentStatus::Confirmed),
            "OVERDUE" => Some(PaymentStatus::Overdue),
            "AWAITING_RISK_ANALYSIS" => Some(PaymentStatus::AwaitingRiskAnalysis),
            "DUNNING_REQUESTED" => Some(PaymentStatus::DunningRequested),
            "DUNNING_RECEIVED" => Some(PaymentStatus::DunningReceived),
            "REFUNDED" => Some(PaymentStatus::Refunded),
            "REFUND_REQUESTED" => Some(PaymentStatus::RefundRequested),
            "REFUND_IN_PROGRESS" => Some(PaymentStatus::RefundInProgress),
            "CHARGEBACK_REQUESTED" => Some(PaymentStatus::ChargebackRequested),
            "CHARGEBACK_DISPUTE" => Some(PaymentStatus::ChargebackDispute),
            "AWAITING_CHARGEBACK_REVERSAL" => Some(PaymentStatus::AwaitingChargebackReversal),
            _ => None,
        }
    }

    /// Statuses that mean the money has arrived and course access may open.
    pub fn unlocks_enrollment(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Received | PaymentStatus::ReceivedInCash | PaymentStatus::Confirmed
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingType {
    Boleto,
    CreditCard,
    DebitCard,
    Pix,
    Undefined,
}

impl BillingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingType::Boleto => "BOLETO",
            BillingType::CreditCard => "CREDIT_CARD",
            BillingType::DebitCard => "DEBIT_CARD",
            BillingType::Pix => "PIX",
            BillingType::Undefined => "UNDEFINED",
        }
    }

    /// Unrecognized billing tags fall back to `Undefined`.
    pub fn parse(s: &str) -> Self {
        match s {
            "BOLETO" => BillingType::Boleto,
            "CREDIT_CARD" => BillingType::CreditCard,
            "DEBIT_CARD" => BillingType::DebitCard,
            "PIX" => BillingType::Pix,
            _ => BillingType::Undefined,
        }
    }
}

/// Columns a webhook delivery is allowed to overwrite on an existing payment.
#[derive(Debug, Clone)]
pub struct GatewayPaymentUpdate {
    pub status: PaymentStatus,
    pub billing_type: Option<BillingType>,
    pub value_cents: Option<i64>,
    pub net_value_cents: Option<i64>,
    pub discount_cents: Option<i64>,
    pub interest_cents: Option<i64>,
    pub fine_cents: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub confirmed_date: Option<NaiveDate>,
    pub invoice_url: Option<String>,
    pub bank_slip_url: Option<String>,
    /// Gateway id of the installment plan this charge belongs to.
    pub installment: Option<String>,
    pub installment_count: Option<i64>,
    pub metadata: serde_json::Value,
}

/// A charge registered at purchase time, before any webhook arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub gateway_payment_id: String,
    pub enrollment_id: Option<Uuid>,
    pub customer_id: Option<String>,
    pub value_cents: i64,
    pub due_date: Option<NaiveDate>,
    #[serde(default = "default_billing_type")]
    pub billing_type: BillingType,
    pub description: Option<String>,
    pub invoice_url: Option<String>,
    pub installment_count: Option<i64>,
}

fn default_billing_type() -> BillingType {
    BillingType::Undefined
}

/// Gateway amounts are decimal currency units; we store integer cents.
pub fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tags_round_trip_through_parse() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::ReceivedInCash,
            PaymentStatus::AwaitingChargebackReversal,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PaymentStatus::parse("pending"), None);
    }

    #[test]
    fn test_unlocking_statuses() {
        assert!(PaymentStatus::Confirmed.unlocks_enrollment());
        assert!(PaymentStatus::Received.unlocks_enrollment());
        assert!(!PaymentStatus::Pending.unlocks_enrollment());
        assert!(!PaymentStatus::Refunded.unlocks_enrollment());
        assert!(!PaymentStatus::Overdue.unlocks_enrollment());
    }

    #[test]
    fn test_billing_type_fallback() {
        assert_eq!(BillingType::parse("PIX"), BillingType::Pix);
        assert_eq!(BillingType::parse("CRYPTO"), BillingType::Undefined);
    }

    #[test]
    fn test_to_cents_rounds() {
        assert_eq!(to_cents(297.0), 29700);
        assert_eq!(to_cents(19.99), 1999);
        assert_eq!(to_cents(0.1 + 0.2), 30);
    }
}
