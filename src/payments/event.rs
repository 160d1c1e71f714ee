use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{to_cents, BillingType, GatewayPaymentUpdate};
use super::status::GatewayStatus;

/// Body of a gateway webhook call.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayWebhookEvent {
    pub event: String,
    pub payment: GatewayPayment,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayPayment {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub billing_type: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub net_value: Option<f64>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub confirmed_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default)]
    pub invoice_url: Option<String>,
    #[serde(default)]
    pub bank_slip_url: Option<String>,
    #[serde(default)]
    pub installment: Option<String>,
    #[serde(default)]
    pub installment_count: Option<i64>,
    #[serde(default)]
    pub installment_value: Option<f64>,
    #[serde(default)]
    pub discount: Option<Amount>,
    #[serde(default)]
    pub interest: Option<Amount>,
    #[serde(default)]
    pub fine: Option<Amount>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Amount {
    #[serde(default)]
    pub value: f64,
}

impl GatewayPayment {
    pub fn gateway_status(&self) -> GatewayStatus {
        GatewayStatus::parse(&self.status)
    }

    /// Builds the column update for this delivery. `raw` is stored verbatim.
    pub fn to_update(&self, raw: &serde_json::Value) -> GatewayPaymentUpdate {
        GatewayPaymentUpdate {
            status: self.gateway_status().to_internal(),
            billing_type: self.billing_type.as_deref().map(BillingType::parse),
            value_cents: self.value.map(to_cents),
            net_value_cents: self.net_value.map(to_cents),
            discount_cents: self.discount.map(|a| to_cents(a.value)),
            interest_cents: self.interest.map(|a| to_cents(a.value)),
            fine_cents: self.fine.map(|a| to_cents(a.value)),
            due_date: self.due_date,
            payment_date: self.payment_date,
            confirmed_date: self.confirmed_date,
            invoice_url: self.invoice_url.clone(),
            bank_slip_url: self.bank_slip_url.clone(),
            installment: self.installment.clone(),
            installment_count: self.installment_count,
            metadata: raw.clone(),
        }
    }
}
