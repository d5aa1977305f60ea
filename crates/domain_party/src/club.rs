//! Club records and affiliation status

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ClubId;

use crate::error::PartyError;

/// Club affiliation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubStatus {
    /// Applied, affiliation fee unpaid
    Pending,
    /// Affiliated for the current season
    Active,
    /// Suspended by a disciplinary ruling
    Suspended,
    /// Expelled from the federation
    Expelled,
}

impl ClubStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubStatus::Pending => "pending",
            ClubStatus::Active => "active",
            ClubStatus::Suspended => "suspended",
            ClubStatus::Expelled => "expelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, PartyError> {
        match s {
            "pending" => Ok(ClubStatus::Pending),
            "active" => Ok(ClubStatus::Active),
            "suspended" => Ok(ClubStatus::Suspended),
            "expelled" => Ok(ClubStatus::Expelled),
            other => Err(PartyError::UnknownStatus(other.to_string())),
        }
    }
}

/// A member club
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    /// Unique identifier
    pub id: ClubId,
    /// Club name
    pub name: String,
    /// Home province/region
    pub province: String,
    /// Affiliation status
    pub status: ClubStatus,
    /// Date the current affiliation lapses
    pub affiliation_expiry: Option<NaiveDate>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Club {
    /// Creates a new pending club
    pub fn new(name: impl Into<String>, province: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ClubId::new_v7(),
            name: name.into(),
            province: province.into(),
            status: ClubStatus::Pending,
            affiliation_expiry: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the status
    pub fn with_status(mut self, status: ClubStatus) -> Self {
        self.status = status;
        self
    }

    /// Activates the club after its affiliation invoice settles
    pub fn activate(&mut self, affiliation_expiry: NaiveDate) {
        self.status = ClubStatus::Active;
        self.affiliation_expiry = Some(affiliation_expiry);
        self.updated_at = Utc::now();
    }

    /// An active club with a current affiliation may register players and
    /// receive transfers
    pub fn is_affiliated(&self, today: NaiveDate) -> bool {
        self.status == ClubStatus::Active
            && self.affiliation_expiry.is_some_and(|expiry| expiry >= today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_club_is_pending() {
        let club = Club::new("Highlanders FC", "Bulawayo");
        assert_eq!(club.status, ClubStatus::Pending);
        assert!(club.affiliation_expiry.is_none());
    }

    #[test]
    fn test_activation_sets_expiry() {
        let mut club = Club::new("Dynamos FC", "Harare");
        let expiry = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();

        club.activate(expiry);

        assert_eq!(club.status, ClubStatus::Active);
        assert_eq!(club.affiliation_expiry, Some(expiry));
    }

    #[test]
    fn test_affiliation_lapses() {
        let mut club = Club::new("CAPS United", "Harare");
        club.activate(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());

        assert!(club.is_affiliated(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()));
        assert!(!club.is_affiliated(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()));
    }
}
