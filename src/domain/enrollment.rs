use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PaymentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_offering_id: Uuid,
    pub status: EnrollmentStatus,
    pub activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Pending,
    Active,
    Cancelled,
}

impl EnrollmentStatus {
    /// Transition an enrollment takes when its payment reaches `payment`.
    ///
    /// Only `Pending -> Active` exists here. Payment reversals never move an
    /// enrollment backward; revoking access is a manual admin decision.
    pub fn on_payment_status(self, payment: PaymentStatus) -> Option<EnrollmentStatus> {
        match self {
            EnrollmentStatus::Pending if payment.unlocks_enrollment() => {
                Some(EnrollmentStatus::Active)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: Uuid,
    pub course_offering_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_activates_on_confirmation() {
        assert_eq!(
            EnrollmentStatus::Pending.on_payment_status(PaymentStatus::Confirmed),
            Some(EnrollmentStatus::Active)
        );
        assert_eq!(
            EnrollmentStatus::Pending.on_payment_status(PaymentStatus::ReceivedInCash),
            Some(EnrollmentStatus::Active)
        );
    }

    #[test]
    fn test_pending_stays_on_non_unlocking_status() {
        assert_eq!(EnrollmentStatus::Pending.on_payment_status(PaymentStatus::Overdue), None);
        assert_eq!(EnrollmentStatus::Pending.on_payment_status(PaymentStatus::Pending), None);
    }

    #[test]
    fn test_never_moves_backward() {
        assert_eq!(EnrollmentStatus::Active.on_payment_status(PaymentStatus::Refunded), None);
        assert_eq!(
            EnrollmentStatus::Active.on_payment_status(PaymentStatus::ChargebackRequested),
            None
        );
        assert_eq!(EnrollmentStatus::Active.on_payment_status(PaymentStatus::Confirmed), None);
        assert_eq!(EnrollmentStatus::Cancelled.on_payment_status(PaymentStatus::Confirmed), None);
    }
}
