//! Registration records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{RegistrantKind, RegistrationId, UserId};

use crate::error::RegistrationError;

/// Registration lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Submitted, fee unpaid
    PendingPayment,
    /// Fee settled, awaiting federation review
    PendingReview,
    /// Approved by the federation
    Approved,
    /// Rejected by the federation
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::PendingPayment => "pending_payment",
            RegistrationStatus::PendingReview => "pending_review",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RegistrationError> {
        match s {
            "pending_payment" => Ok(RegistrationStatus::PendingPayment),
            "pending_review" => Ok(RegistrationStatus::PendingReview),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            other => Err(RegistrationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A seasonal registration of a player, club, official, or referee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Unique identifier
    pub id: RegistrationId,
    /// Human-readable number (e.g. PLA-20260115-0001)
    pub registration_number: String,
    /// Kind of record being registered
    pub kind: RegistrantKind,
    /// The registered record's id
    pub entity_id: Uuid,
    /// Season label (e.g. "2026")
    pub season: String,
    /// Lifecycle status
    pub status: RegistrationStatus,
    /// User who submitted the registration
    pub submitted_by: Option<UserId>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Creates a new registration awaiting payment
    pub fn new(
        registration_number: impl Into<String>,
        kind: RegistrantKind,
        entity_id: Uuid,
        season: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RegistrationId::new_v7(),
            registration_number: registration_number.into(),
            kind,
            entity_id,
            season: season.into(),
            status: RegistrationStatus::PendingPayment,
            submitted_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the submitting user
    pub fn submitted_by(mut self, user_id: UserId) -> Self {
        self.submitted_by = Some(user_id);
        self
    }

    /// Moves the registration to review after its invoice settles
    pub fn mark_fee_paid(&mut self) -> Result<(), RegistrationError> {
        if self.status != RegistrationStatus::PendingPayment {
            return Err(RegistrationError::invalid_transition(
                self.status.as_str(),
                "pending_review",
            ));
        }
        self.status = RegistrationStatus::PendingReview;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Approves the registration
    pub fn approve(&mut self) -> Result<(), RegistrationError> {
        if self.status != RegistrationStatus::PendingReview {
            return Err(RegistrationError::invalid_transition(
                self.status.as_str(),
                "approved",
            ));
        }
        self.status = RegistrationStatus::Approved;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Rejects the registration
    pub fn reject(&mut self) -> Result<(), RegistrationError> {
        if self.status != RegistrationStatus::PendingReview {
            return Err(RegistrationError::invalid_transition(
                self.status.as_str(),
                "rejected",
            ));
        }
        self.status = RegistrationStatus::Rejected;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Formats a registration number: `{KIND}-YYYYMMDD-NNNN`
pub fn registration_number(kind: RegistrantKind, date: NaiveDate, sequence: i64) -> String {
    format!(
        "{}-{}-{:04}",
        kind.reference_prefix(),
        date.format("%Y%m%d"),
        sequence
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut registration = Registration::new(
            "PLA-20260115-0001",
            RegistrantKind::Player,
            Uuid::new_v4(),
            "2026",
        );

        assert_eq!(registration.status, RegistrationStatus::PendingPayment);

        registration.mark_fee_paid().unwrap();
        assert_eq!(registration.status, RegistrationStatus::PendingReview);

        registration.approve().unwrap();
        assert_eq!(registration.status, RegistrationStatus::Approved);
    }

    #[test]
    fn test_cannot_approve_unpaid() {
        let mut registration = Registration::new(
            "PLA-20260115-0002",
            RegistrantKind::Player,
            Uuid::new_v4(),
            "2026",
        );

        assert!(registration.approve().is_err());
        assert_eq!(registration.status, RegistrationStatus::PendingPayment);
    }

    #[test]
    fn test_number_format() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(
            registration_number(RegistrantKind::Club, date, 3),
            "CLU-20260115-0003"
        );
    }
}
