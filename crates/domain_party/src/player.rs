//! Player records and lifecycle status

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClubId, PlayerId};

use crate::error::PartyError;

/// Player lifecycle status
///
/// Registration review moves a player from `Pending` through `UnderReview`
/// to `Approved`. Only approved players and free agents may be transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Record created, registration not yet submitted
    Draft,
    /// Registration submitted, fee unpaid
    Pending,
    /// Registration fee paid, awaiting federation review
    UnderReview,
    /// Registered and cleared to play
    Approved,
    /// Suspended by a disciplinary ruling
    Suspended,
    /// Registered but not attached to any club
    FreeAgent,
    /// No longer active
    Retired,
}

impl PlayerStatus {
    /// Returns the storage discriminant
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Draft => "draft",
            PlayerStatus::Pending => "pending",
            PlayerStatus::UnderReview => "under_review",
            PlayerStatus::Approved => "approved",
            PlayerStatus::Suspended => "suspended",
            PlayerStatus::FreeAgent => "free_agent",
            PlayerStatus::Retired => "retired",
        }
    }

    /// Reconstructs from the storage discriminant
    pub fn parse(s: &str) -> Result<Self, PartyError> {
        match s {
            "draft" => Ok(PlayerStatus::Draft),
            "pending" => Ok(PlayerStatus::Pending),
            "under_review" => Ok(PlayerStatus::UnderReview),
            "approved" => Ok(PlayerStatus::Approved),
            "suspended" => Ok(PlayerStatus::Suspended),
            "free_agent" => Ok(PlayerStatus::FreeAgent),
            "retired" => Ok(PlayerStatus::Retired),
            other => Err(PartyError::UnknownStatus(other.to_string())),
        }
    }
}

/// A registered (or registering) player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: PlayerId,
    /// Federation registration number, assigned on approval
    pub federation_id: Option<String>,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Nationality (ISO 3166-1 alpha-2)
    pub nationality: String,
    /// Current club; None for free agents
    pub current_club_id: Option<ClubId>,
    /// Lifecycle status
    pub status: PlayerStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Creates a new draft player
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        nationality: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PlayerId::new_v7(),
            federation_id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            nationality: nationality.into(),
            current_club_id: None,
            status: PlayerStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches the player to a club
    pub fn with_club(mut self, club_id: ClubId) -> Self {
        self.current_club_id = Some(club_id);
        self
    }

    /// Sets the lifecycle status
    pub fn with_status(mut self, status: PlayerStatus) -> Self {
        self.status = status;
        self
    }

    /// A player may be transferred only when approved or a free agent
    pub fn is_eligible_for_transfer(&self) -> bool {
        matches!(
            self.status,
            PlayerStatus::Approved | PlayerStatus::FreeAgent
        )
    }

    /// Marks the registration fee as paid and queues the player for review
    pub fn submit_for_review(&mut self) -> Result<(), PartyError> {
        match self.status {
            PlayerStatus::Draft | PlayerStatus::Pending => {
                self.status = PlayerStatus::UnderReview;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(PartyError::IneligibleStatus {
                operation: "submit_for_review",
                status: self.status.as_str(),
            }),
        }
    }

    /// Reassigns the player to a new club (on transfer completion)
    pub fn reassign_club(&mut self, club_id: ClubId) {
        self.current_club_id = Some(club_id);
        if self.status == PlayerStatus::FreeAgent {
            self.status = PlayerStatus::Approved;
        }
        self.updated_at = Utc::now();
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_player() -> Player {
        Player::new(
            "Knowledge",
            "Musona",
            NaiveDate::from_ymd_opt(1990, 6, 21).unwrap(),
            "ZW",
        )
    }

    #[test]
    fn test_new_player_is_draft() {
        let player = test_player();
        assert_eq!(player.status, PlayerStatus::Draft);
        assert!(player.current_club_id.is_none());
    }

    #[test]
    fn test_transfer_eligibility() {
        let mut player = test_player();
        assert!(!player.is_eligible_for_transfer());

        player.status = PlayerStatus::Approved;
        assert!(player.is_eligible_for_transfer());

        player.status = PlayerStatus::FreeAgent;
        assert!(player.is_eligible_for_transfer());

        player.status = PlayerStatus::Suspended;
        assert!(!player.is_eligible_for_transfer());
    }

    #[test]
    fn test_reassign_club_clears_free_agency() {
        let mut player = test_player().with_status(PlayerStatus::FreeAgent);
        let club = ClubId::new();

        player.reassign_club(club);

        assert_eq!(player.current_club_id, Some(club));
        assert_eq!(player.status, PlayerStatus::Approved);
    }

    #[test]
    fn test_submit_for_review_guards_status() {
        let mut player = test_player().with_status(PlayerStatus::Approved);
        assert!(player.submit_for_review().is_err());
        assert_eq!(player.status, PlayerStatus::Approved);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            PlayerStatus::Draft,
            PlayerStatus::Pending,
            PlayerStatus::UnderReview,
            PlayerStatus::Approved,
            PlayerStatus::Suspended,
            PlayerStatus::FreeAgent,
            PlayerStatus::Retired,
        ] {
            assert_eq!(PlayerStatus::parse(status.as_str()).unwrap(), status);
        }
    }
}
