//! Transfer Aggregate Root
//!
//! The Transfer aggregate governs a player's movement between clubs. It
//! ensures transitions follow the allowed lifecycle and accumulates
//! domain events for the caller to publish.
//!
//! # Invariants
//!
//! - Initiation requires an eligible player, a different destination
//!   club, and an open transfer window
//! - `completed` is terminal; reaching it yields the club reassignment
//!   and tenure-history instructions the persistence layer must apply
//!   atomically with the status change

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClubId, Money, PlayerId, TransferId, UserId};
use domain_party::Player;

use crate::error::TransferError;
use crate::events::TransferEvent;
use crate::window::TransferWindows;

/// Transfer lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Created, routing not yet decided
    Requested,
    /// Awaiting release approval from the player's current club
    PendingFromClub,
    /// Awaiting settlement of the transfer-fee invoice
    PendingPayment,
    /// Fee settled, awaiting federation review
    PendingZifaReview,
    /// Approved (legacy status retained for stored rows; no transition
    /// produces it)
    Approved,
    /// Rejected with a recorded reason
    Rejected,
    /// Withdrawn by the requesting club
    Cancelled,
    /// Completed; player reassigned
    Completed,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Requested => "requested",
            TransferStatus::PendingFromClub => "pending_from_club",
            TransferStatus::PendingPayment => "pending_payment",
            TransferStatus::PendingZifaReview => "pending_zifa_review",
            TransferStatus::Approved => "approved",
            TransferStatus::Rejected => "rejected",
            TransferStatus::Cancelled => "cancelled",
            TransferStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, TransferError> {
        match s {
            "requested" => Ok(TransferStatus::Requested),
            "pending_from_club" => Ok(TransferStatus::PendingFromClub),
            "pending_payment" => Ok(TransferStatus::PendingPayment),
            "pending_zifa_review" => Ok(TransferStatus::PendingZifaReview),
            "approved" => Ok(TransferStatus::Approved),
            "rejected" => Ok(TransferStatus::Rejected),
            "cancelled" => Ok(TransferStatus::Cancelled),
            "completed" => Ok(TransferStatus::Completed),
            other => Err(TransferError::UnknownStatus(other.to_string())),
        }
    }

    /// Rejected, cancelled, and completed transfers accept no further
    /// transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferStatus::Rejected | TransferStatus::Cancelled | TransferStatus::Completed
        )
    }
}

/// Transfer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    Local,
    International,
    Loan,
    Free,
}

impl TransferType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::Local => "local",
            TransferType::International => "international",
            TransferType::Loan => "loan",
            TransferType::Free => "free",
        }
    }

    pub fn parse(s: &str) -> Result<Self, TransferError> {
        match s {
            "local" => Ok(TransferType::Local),
            "international" => Ok(TransferType::International),
            "loan" => Ok(TransferType::Loan),
            "free" => Ok(TransferType::Free),
            other => Err(TransferError::UnknownType(other.to_string())),
        }
    }
}

/// Instructions produced by the terminal transition
///
/// The persistence layer must apply these atomically with the status
/// update: reassign the player, close the open tenure record, open a new
/// one. The international-sync enqueue is best-effort and happens after
/// commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCompletion {
    pub transfer_id: TransferId,
    pub player_id: PlayerId,
    pub from_club_id: Option<ClubId>,
    pub to_club_id: ClubId,
    pub transfer_type: TransferType,
    pub effective_date: NaiveDate,
    /// Whether an external federation sync should be enqueued
    pub requires_international_sync: bool,
}

/// The Transfer aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    /// Unique identifier
    pub id: TransferId,
    /// Human-readable reference (TRF-YYYYMMDD-NNNNN)
    pub transfer_reference: String,
    /// Player being transferred
    pub player_id: PlayerId,
    /// Releasing club; None for free agents
    pub from_club_id: Option<ClubId>,
    /// Destination club
    pub to_club_id: ClubId,
    /// Transfer type
    pub transfer_type: TransferType,
    /// Window label the transfer was initiated in (e.g. 2026_summer)
    pub transfer_window: String,
    /// Lifecycle status
    pub status: TransferStatus,
    /// Fee negotiated between the clubs
    pub transfer_fee: Money,
    /// Federation admin fee from the fee schedule
    pub admin_fee: Money,
    /// User who requested the transfer
    pub requested_by: UserId,
    /// From-club approval
    pub from_club_approved_by: Option<UserId>,
    pub from_club_approved_at: Option<DateTime<Utc>>,
    /// Federation approval
    pub zifa_approved_by: Option<UserId>,
    pub zifa_approved_at: Option<DateTime<Utc>>,
    /// Date the completed transfer takes effect
    pub effective_date: Option<NaiveDate>,
    /// Free-form notes from the requester
    pub notes: Option<String>,
    /// Reason recorded on rejection
    pub rejection_reason: Option<String>,
    /// Certificate reference generated on completion
    pub certificate_reference: Option<String>,
    /// Domain events awaiting publication; empty on rehydrated aggregates
    #[serde(skip)]
    pub events: Vec<TransferEvent>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Transfer {
    /// Initiates a transfer for a player
    ///
    /// Routing depends on the player's situation: a player with a current
    /// club must be released by it first; a free agent goes straight to
    /// the payment stage.
    ///
    /// # Errors
    ///
    /// - `IneligiblePlayer` if the player is not approved or a free agent
    /// - `DuplicateClub` if the destination is the player's current club
    /// - `WindowClosed` if no transfer window contains today
    #[allow(clippy::too_many_arguments)]
    pub fn initiate(
        transfer_reference: impl Into<String>,
        player: &Player,
        to_club_id: ClubId,
        transfer_type: TransferType,
        transfer_fee: Money,
        admin_fee: Money,
        notes: Option<String>,
        requested_by: UserId,
        windows: &TransferWindows,
    ) -> Result<Self, TransferError> {
        if !player.is_eligible_for_transfer() {
            return Err(TransferError::IneligiblePlayer {
                status: player.status.as_str(),
            });
        }
        if player.current_club_id == Some(to_club_id) {
            return Err(TransferError::DuplicateClub);
        }
        let today = windows.today();
        if !windows.is_open_on(today) {
            return Err(TransferError::WindowClosed);
        }

        let status = if player.current_club_id.is_some() {
            TransferStatus::PendingFromClub
        } else {
            TransferStatus::PendingPayment
        };

        let now = Utc::now();
        let id = TransferId::new_v7();

        Ok(Self {
            id,
            transfer_reference: transfer_reference.into(),
            player_id: player.id,
            from_club_id: player.current_club_id,
            to_club_id,
            transfer_type,
            transfer_window: windows.window_label(today),
            status,
            transfer_fee,
            admin_fee,
            requested_by,
            from_club_approved_by: None,
            from_club_approved_at: None,
            zifa_approved_by: None,
            zifa_approved_at: None,
            effective_date: None,
            notes,
            rejection_reason: None,
            certificate_reference: None,
            events: vec![TransferEvent::Requested {
                transfer_id: id,
                player_id: player.id,
                to_club_id,
                timestamp: now,
            }],
            created_at: now,
            updated_at: now,
        })
    }

    /// Total amount invoiced for this transfer (admin fee + transfer fee)
    pub fn total_fees(&self) -> Result<Money, TransferError> {
        self.admin_fee
            .checked_add(&self.transfer_fee)
            .map_err(|e| TransferError::Internal(e.to_string()))
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<TransferEvent> {
        std::mem::take(&mut self.events)
    }

    /// Releasing club approves the player's departure
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless status is `pending_from_club`
    pub fn approve_by_club(&mut self, approver: UserId) -> Result<(), TransferError> {
        if self.status != TransferStatus::PendingFromClub {
            return Err(self.invalid_transition("pending_payment"));
        }

        let now = Utc::now();
        self.status = TransferStatus::PendingPayment;
        self.from_club_approved_by = Some(approver);
        self.from_club_approved_at = Some(now);
        self.updated_at = now;

        self.events.push(TransferEvent::ApprovedByClub {
            transfer_id: self.id,
            approver,
            timestamp: now,
        });

        Ok(())
    }

    /// Records settlement of the transfer-fee invoice
    ///
    /// Invoked by the billing settlement workflow; a settlement arriving
    /// in any other state is ignored there, so this transition is strict.
    pub fn mark_fee_paid(&mut self) -> Result<(), TransferError> {
        if self.status != TransferStatus::PendingPayment {
            return Err(self.invalid_transition("pending_zifa_review"));
        }

        let now = Utc::now();
        self.status = TransferStatus::PendingZifaReview;
        self.updated_at = now;

        self.events.push(TransferEvent::FeePaid {
            transfer_id: self.id,
            timestamp: now,
        });

        Ok(())
    }

    /// Federation approves the transfer (terminal transition)
    ///
    /// Marks the transfer completed and returns the reassignment
    /// instructions the persistence layer must apply in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless status is `pending_zifa_review`;
    /// nothing is mutated on error.
    pub fn approve_by_zifa(&mut self, approver: UserId) -> Result<TransferCompletion, TransferError> {
        if self.status != TransferStatus::PendingZifaReview {
            return Err(self.invalid_transition("completed"));
        }

        let now = Utc::now();
        let effective_date = now.date_naive();

        self.status = TransferStatus::Completed;
        self.zifa_approved_by = Some(approver);
        self.zifa_approved_at = Some(now);
        self.effective_date = Some(effective_date);
        self.certificate_reference = Some(format!(
            "/certificates/transfers/{}.pdf",
            self.transfer_reference
        ));
        self.updated_at = now;

        self.events.push(TransferEvent::Completed {
            transfer_id: self.id,
            player_id: self.player_id,
            to_club_id: self.to_club_id,
            approver,
            timestamp: now,
        });

        Ok(TransferCompletion {
            transfer_id: self.id,
            player_id: self.player_id,
            from_club_id: self.from_club_id,
            to_club_id: self.to_club_id,
            transfer_type: self.transfer_type,
            effective_date,
            requires_international_sync: self.transfer_type == TransferType::International,
        })
    }

    /// Rejects the transfer with a reason
    pub fn reject(&mut self, reason: &str, rejected_by: UserId) -> Result<(), TransferError> {
        if reason.trim().is_empty() {
            return Err(TransferError::ReasonRequired);
        }
        if self.status.is_terminal() {
            return Err(self.invalid_transition("rejected"));
        }

        let now = Utc::now();
        self.status = TransferStatus::Rejected;
        self.rejection_reason = Some(reason.to_string());
        self.updated_at = now;

        self.events.push(TransferEvent::Rejected {
            transfer_id: self.id,
            rejected_by,
            reason: reason.to_string(),
            timestamp: now,
        });

        Ok(())
    }

    /// Withdraws the transfer
    pub fn cancel(&mut self, cancelled_by: UserId) -> Result<(), TransferError> {
        if self.status.is_terminal() {
            return Err(self.invalid_transition("cancelled"));
        }

        let now = Utc::now();
        self.status = TransferStatus::Cancelled;
        self.updated_at = now;

        self.events.push(TransferEvent::Cancelled {
            transfer_id: self.id,
            cancelled_by,
            timestamp: now,
        });

        Ok(())
    }

    fn invalid_transition(&self, to: &str) -> TransferError {
        TransferError::InvalidTransition {
            from: self.status.as_str().to_string(),
            to: to.to_string(),
        }
    }
}

/// Formats a transfer reference: `TRF-YYYYMMDD-NNNNN`
pub fn transfer_reference(date: NaiveDate, sequence: i64) -> String {
    format!("TRF-{}-{:05}", date.format("%Y%m%d"), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::Currency;
    use domain_party::{Player, PlayerStatus};

    fn approved_player(club: ClubId) -> Player {
        Player::new(
            "Khama",
            "Billiat",
            NaiveDate::from_ymd_opt(1990, 8, 19).unwrap(),
            "ZW",
        )
        .with_club(club)
        .with_status(PlayerStatus::Approved)
    }

    fn free_agent() -> Player {
        Player::new(
            "Tino",
            "Kadewere",
            NaiveDate::from_ymd_opt(1996, 1, 5).unwrap(),
            "ZW",
        )
        .with_status(PlayerStatus::FreeAgent)
    }

    fn usd(minor: i64) -> Money {
        Money::from_minor(minor, Currency::USD)
    }

    fn open_windows() -> TransferWindows {
        // Covers the whole year so tests are date-independent
        TransferWindows::new(
            vec![TransferWindow {
                label: "always".to_string(),
                start: MonthDay { month: 1, day: 1 },
                end: MonthDay { month: 12, day: 31 },
            }],
            chrono_tz::Africa::Harare,
        )
        .unwrap()
    }

    use crate::window::{MonthDay, TransferWindow};

    fn initiate(player: &Player, to_club: ClubId) -> Transfer {
        Transfer::initiate(
            "TRF-20260115-00001",
            player,
            to_club,
            TransferType::Local,
            usd(0),
            usd(10_000),
            None,
            UserId::new(),
            &open_windows(),
        )
        .unwrap()
    }

    #[test]
    fn test_clubbed_player_routes_to_club_approval() {
        let from_club = ClubId::new();
        let player = approved_player(from_club);
        let transfer = initiate(&player, ClubId::new());

        assert_eq!(transfer.status, TransferStatus::PendingFromClub);
        assert_eq!(transfer.from_club_id, Some(from_club));
    }

    #[test]
    fn test_free_agent_routes_to_payment() {
        let transfer = initiate(&free_agent(), ClubId::new());
        assert_eq!(transfer.status, TransferStatus::PendingPayment);
        assert_eq!(transfer.from_club_id, None);
    }

    #[test]
    fn test_same_club_rejected() {
        let club = ClubId::new();
        let player = approved_player(club);

        let result = Transfer::initiate(
            "TRF-20260115-00002",
            &player,
            club,
            TransferType::Local,
            usd(0),
            usd(10_000),
            None,
            UserId::new(),
            &open_windows(),
        );

        assert!(matches!(result, Err(TransferError::DuplicateClub)));
    }

    #[test]
    fn test_suspended_player_rejected() {
        let player = approved_player(ClubId::new()).with_status(PlayerStatus::Suspended);

        let result = Transfer::initiate(
            "TRF-20260115-00003",
            &player,
            ClubId::new(),
            TransferType::Local,
            usd(0),
            usd(10_000),
            None,
            UserId::new(),
            &open_windows(),
        );

        assert!(matches!(result, Err(TransferError::IneligiblePlayer { .. })));
    }

    #[test]
    fn test_full_lifecycle() {
        let player = approved_player(ClubId::new());
        let to_club = ClubId::new();
        let mut transfer = initiate(&player, to_club);

        transfer.approve_by_club(UserId::new()).unwrap();
        assert_eq!(transfer.status, TransferStatus::PendingPayment);

        transfer.mark_fee_paid().unwrap();
        assert_eq!(transfer.status, TransferStatus::PendingZifaReview);

        let completion = transfer.approve_by_zifa(UserId::new()).unwrap();
        assert_eq!(transfer.status, TransferStatus::Completed);
        assert_eq!(completion.to_club_id, to_club);
        assert!(!completion.requires_international_sync);
        assert!(transfer.certificate_reference.is_some());
        assert!(transfer.effective_date.is_some());
    }

    #[test]
    fn test_zifa_approval_requires_review_status() {
        let player = approved_player(ClubId::new());
        let mut transfer = initiate(&player, ClubId::new());
        let snapshot = transfer.status;

        let result = transfer.approve_by_zifa(UserId::new());

        assert!(matches!(result, Err(TransferError::InvalidTransition { .. })));
        assert_eq!(transfer.status, snapshot);
        assert!(transfer.zifa_approved_by.is_none());
        assert!(transfer.certificate_reference.is_none());
    }

    #[test]
    fn test_international_transfer_requires_sync() {
        let player = free_agent();
        let mut transfer = Transfer::initiate(
            "TRF-20260115-00004",
            &player,
            ClubId::new(),
            TransferType::International,
            usd(500_000),
            usd(50_000),
            None,
            UserId::new(),
            &open_windows(),
        )
        .unwrap();

        transfer.mark_fee_paid().unwrap();
        let completion = transfer.approve_by_zifa(UserId::new()).unwrap();

        assert!(completion.requires_international_sync);
    }

    #[test]
    fn test_reject_requires_reason() {
        let player = approved_player(ClubId::new());
        let mut transfer = initiate(&player, ClubId::new());

        assert!(matches!(
            transfer.reject("  ", UserId::new()),
            Err(TransferError::ReasonRequired)
        ));

        transfer
            .reject("Missing release letter", UserId::new())
            .unwrap();
        assert_eq!(transfer.status, TransferStatus::Rejected);
        assert_eq!(
            transfer.rejection_reason.as_deref(),
            Some("Missing release letter")
        );
    }

    #[test]
    fn test_completed_transfer_is_terminal() {
        let player = free_agent();
        let mut transfer = initiate(&player, ClubId::new());
        transfer.mark_fee_paid().unwrap();
        transfer.approve_by_zifa(UserId::new()).unwrap();

        assert!(transfer.reject("late", UserId::new()).is_err());
        assert!(transfer.cancel(UserId::new()).is_err());
        assert_eq!(transfer.status, TransferStatus::Completed);
    }

    #[test]
    fn test_events_accumulate_and_drain() {
        let player = approved_player(ClubId::new());
        let mut transfer = initiate(&player, ClubId::new());
        transfer.approve_by_club(UserId::new()).unwrap();

        let events = transfer.take_events();
        assert_eq!(events.len(), 2);
        assert!(transfer.take_events().is_empty());
    }

    #[test]
    fn test_reference_format() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(transfer_reference(date, 7), "TRF-20260115-00007");
    }
}
