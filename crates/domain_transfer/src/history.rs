//! Club tenure history
//!
//! An append-only ledger of which club a player belonged to and when.
//! Records are only created on transfer completion; the previous
//! open-ended record is closed (left_date set) atomically with the new
//! record's creation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{ClubId, PlayerId, TransferId};

use crate::transfer::TransferType;

/// One club tenure for a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenureRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Player
    pub player_id: PlayerId,
    /// Club the player belonged to
    pub club_id: ClubId,
    /// Date the tenure started
    pub joined_date: NaiveDate,
    /// Date the tenure ended; None while current
    pub left_date: Option<NaiveDate>,
    /// Transfer type that started the tenure
    pub transfer_type: Option<TransferType>,
    /// Transfer that started the tenure
    pub transfer_id: Option<TransferId>,
}

impl TenureRecord {
    /// Opens a new tenure record
    pub fn open(
        player_id: PlayerId,
        club_id: ClubId,
        joined_date: NaiveDate,
        transfer_type: TransferType,
        transfer_id: TransferId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            club_id,
            joined_date,
            left_date: None,
            transfer_type: Some(transfer_type),
            transfer_id: Some(transfer_id),
        }
    }

    /// Whether this tenure is the player's current club spell
    pub fn is_open(&self) -> bool {
        self.left_date.is_none()
    }

    /// Closes the tenure
    pub fn close(&mut self, left_date: NaiveDate) {
        self.left_date = Some(left_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_then_close() {
        let mut record = TenureRecord::open(
            PlayerId::new(),
            ClubId::new(),
            NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            TransferType::Local,
            TransferId::new(),
        );

        assert!(record.is_open());

        record.close(NaiveDate::from_ymd_opt(2026, 7, 15).unwrap());
        assert!(!record.is_open());
        assert_eq!(
            record.left_date,
            Some(NaiveDate::from_ymd_opt(2026, 7, 15).unwrap())
        );
    }
}
