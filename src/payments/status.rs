use crate::domain::PaymentStatus;

/// Payment status as reported by the gateway.
///
/// Known tags map 1:1 onto [`PaymentStatus`]. Anything else is kept as
/// `Unknown` and reconciled as `PENDING`, so a status the gateway adds later
/// does not fail the webhook. The gateway does not version this vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayStatus {
    Known(PaymentStatus),
    Unknown(String),
}

impl GatewayStatus {
    pub fn parse(raw: &str) -> Self {
        match PaymentStatus::parse(raw.trim()) {
            Some(status) => GatewayStatus::Known(status),
            None => GatewayStatus::Unknown(raw.to_string()),
        }
    }

    pub fn to_internal(&self) -> PaymentStatus {
        match self {
            GatewayStatus::Known(status) => *status,
            GatewayStatus::Unknown(raw) => {
                tracing::warn!("Unrecognized gateway status {:?}, recording as PENDING", raw);
                PaymentStatus::Pending
            }
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, GatewayStatus::Known(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_map_one_to_one() {
        let cases = [
            ("PENDING", PaymentStatus::Pending),
            ("RECEIVED", PaymentStatus::Received),
            ("CONFIRMED", PaymentStatus::Confirmed),
            ("OVERDUE", PaymentStatus::Overdue),
            ("AWAITING_RISK_ANALYSIS", PaymentStatus::AwaitingRiskAnalysis),
            ("DUNNING_REQUESTED", PaymentStatus::DunningRequested),
            ("DUNNING_RECEIVED", PaymentStatus::DunningReceived),
            ("REFUNDED", PaymentStatus::Refunded),
            ("REFUND_REQUESTED", PaymentStatus::RefundRequested),
            ("CHARGEBACK_REQUESTED", PaymentStatus::ChargebackRequested),
            ("CHARGEBACK_DISPUTE", PaymentStatus::ChargebackDispute),
            ("AWAITING_CHARGEBACK_REVERSAL", PaymentStatus::AwaitingChargebackReversal),
        ];

        for (raw, expected) in cases {
            let status = GatewayStatus::parse(raw);
            assert!(status.is_known(), "{} should be known", raw);
            assert_eq!(status.to_internal(), expected);
        }
    }

    #[test]
    fn test_unknown_status_falls_back_to_pending() {
        let status = GatewayStatus::parse("SOME_NEW_GATEWAY_STATUS");
        assert_eq!(status, GatewayStatus::Unknown("SOME_NEW_GATEWAY_STATUS".to_string()));
        assert_eq!(status.to_internal(), PaymentStatus::Pending);
    }

    #[test]
    fn test_lowercase_is_not_recognized() {
        assert_eq!(GatewayStatus::parse("confirmed").to_internal(), PaymentStatus::Pending);
    }
}
