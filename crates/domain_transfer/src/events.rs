//! Transfer domain events
//!
//! Events are accumulated by the aggregate and drained by the caller
//! after a successful persist, typically to feed notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClubId, PlayerId, TransferId, UserId};

/// Events emitted by the Transfer aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferEvent {
    /// Transfer was initiated
    Requested {
        transfer_id: TransferId,
        player_id: PlayerId,
        to_club_id: ClubId,
        timestamp: DateTime<Utc>,
    },
    /// Releasing club approved the departure
    ApprovedByClub {
        transfer_id: TransferId,
        approver: UserId,
        timestamp: DateTime<Utc>,
    },
    /// Transfer-fee invoice settled
    FeePaid {
        transfer_id: TransferId,
        timestamp: DateTime<Utc>,
    },
    /// Federation approved; transfer completed
    Completed {
        transfer_id: TransferId,
        player_id: PlayerId,
        to_club_id: ClubId,
        approver: UserId,
        timestamp: DateTime<Utc>,
    },
    /// Transfer rejected
    Rejected {
        transfer_id: TransferId,
        rejected_by: UserId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    /// Transfer withdrawn
    Cancelled {
        transfer_id: TransferId,
        cancelled_by: UserId,
        timestamp: DateTime<Utc>,
    },
}
