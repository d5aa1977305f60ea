//! Club affiliation records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AffiliationId, ClubId};

use crate::error::RegistrationError;

/// Affiliation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffiliationStatus {
    /// Created, fee unpaid
    Pending,
    /// Paid and in force for the season
    Active,
    /// Season ended without renewal
    Expired,
}

impl AffiliationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AffiliationStatus::Pending => "pending",
            AffiliationStatus::Active => "active",
            AffiliationStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RegistrationError> {
        match s {
            "pending" => Ok(AffiliationStatus::Pending),
            "active" => Ok(AffiliationStatus::Active),
            "expired" => Ok(AffiliationStatus::Expired),
            other => Err(RegistrationError::UnknownStatus(other.to_string())),
        }
    }
}

/// Payment state tracked alongside the affiliation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Pending,
    Paid,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Pending => "pending",
            PaymentState::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RegistrationError> {
        match s {
            "pending" => Ok(PaymentState::Pending),
            "paid" => Ok(PaymentState::Paid),
            other => Err(RegistrationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A club's affiliation for one season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Affiliation {
    /// Unique identifier
    pub id: AffiliationId,
    /// The affiliating club
    pub club_id: ClubId,
    /// Season label (e.g. "2026")
    pub season: String,
    /// Affiliation status
    pub status: AffiliationStatus,
    /// Whether the affiliation fee has settled
    pub payment_status: PaymentState,
    /// Date the affiliation lapses
    pub expiry_date: NaiveDate,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Affiliation {
    /// Creates a pending affiliation expiring at season end
    pub fn new(club_id: ClubId, season: impl Into<String>, expiry_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: AffiliationId::new_v7(),
            club_id,
            season: season.into(),
            status: AffiliationStatus::Pending,
            payment_status: PaymentState::Pending,
            expiry_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Activates the affiliation after its invoice settles
    ///
    /// The owning club's activation (status + affiliation_expiry) happens
    /// in the same transaction in the settlement workflow.
    pub fn mark_paid(&mut self) -> Result<(), RegistrationError> {
        if self.status != AffiliationStatus::Pending {
            return Err(RegistrationError::invalid_transition(
                self.status.as_str(),
                "active",
            ));
        }
        self.status = AffiliationStatus::Active;
        self.payment_status = PaymentState::Paid;
        self.updated_at = Utc::now();
        Ok(())
    }
}
