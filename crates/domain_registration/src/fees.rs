//! Federation fee schedule
//!
//! Fees are configuration, passed in as an immutable struct at service
//! construction. Amounts are whole-currency values from the federation's
//! published schedule.

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, RegistrantKind};
use domain_transfer::TransferType;

/// The federation's published fee schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Invoicing currency
    pub currency: Currency,
    /// Player registration fee, minor units
    pub player_registration: i64,
    /// Club affiliation fee, minor units
    pub club_affiliation: i64,
    /// Official registration fee, minor units
    pub official_registration: i64,
    /// Referee registration fee, minor units
    pub referee_registration: i64,
    /// Admin fee for domestic transfers, minor units
    pub transfer_local_admin: i64,
    /// Admin fee for international transfers, minor units
    pub transfer_international_admin: i64,
}

impl Default for FeeSchedule {
    /// The schedule published for the current season (USD)
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            player_registration: 50_00,
            club_affiliation: 500_00,
            official_registration: 30_00,
            referee_registration: 50_00,
            transfer_local_admin: 100_00,
            transfer_international_admin: 500_00,
        }
    }
}

impl FeeSchedule {
    /// Registration fee for a registrant kind
    pub fn registration_fee(&self, kind: RegistrantKind) -> Money {
        let minor = match kind {
            RegistrantKind::Player => self.player_registration,
            RegistrantKind::Club => self.club_affiliation,
            RegistrantKind::Official => self.official_registration,
            RegistrantKind::Referee => self.referee_registration,
        };
        Money::from_minor(minor, self.currency)
    }

    /// Affiliation fee for a club season
    pub fn affiliation_fee(&self) -> Money {
        Money::from_minor(self.club_affiliation, self.currency)
    }

    /// Admin fee for a transfer type
    ///
    /// International transfers carry the higher fee; every other type is
    /// billed at the domestic rate.
    pub fn transfer_admin_fee(&self, transfer_type: TransferType) -> Money {
        let minor = match transfer_type {
            TransferType::International => self.transfer_international_admin,
            _ => self.transfer_local_admin,
        };
        Money::from_minor(minor, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_schedule_amounts() {
        let fees = FeeSchedule::default();

        assert_eq!(
            fees.registration_fee(RegistrantKind::Player).amount(),
            dec!(50)
        );
        assert_eq!(fees.affiliation_fee().amount(), dec!(500));
    }

    #[test]
    fn test_transfer_admin_fee_by_type() {
        let fees = FeeSchedule::default();

        assert_eq!(
            fees.transfer_admin_fee(TransferType::Local).amount(),
            dec!(100)
        );
        assert_eq!(
            fees.transfer_admin_fee(TransferType::International).amount(),
            dec!(500)
        );
        assert_eq!(
            fees.transfer_admin_fee(TransferType::Loan).amount(),
            dec!(100)
        );
        assert_eq!(
            fees.transfer_admin_fee(TransferType::Free).amount(),
            dec!(100)
        );
    }
}
