//! Registration and invoicing orchestration
//!
//! Pure glue between the fee schedule and the billing domain: given an
//! entity, produce the registration/affiliation record and its companion
//! invoice. Reference numbers are allocated by the caller from the
//! transactional sequence service and passed in.

use chrono::{Days, NaiveDate};

use core_kernel::{BilledEntity, RegistrantKind};
use domain_billing::{Invoice, InvoiceCategory};
use domain_party::{Club, Player};
use domain_transfer::Transfer;

use crate::affiliation::Affiliation;
use crate::fees::FeeSchedule;
use crate::registration::Registration;

/// Payment terms per invoice category, in days
const REGISTRATION_TERMS_DAYS: u64 = 14;
const AFFILIATION_TERMS_DAYS: u64 = 30;
const TRANSFER_TERMS_DAYS: u64 = 7;

/// Orchestrates registration and affiliation invoicing
///
/// Constructed once with the season's fee schedule; holds no mutable
/// state.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    fees: FeeSchedule,
    season: String,
}

impl RegistrationService {
    /// Creates the service for a season
    pub fn new(fees: FeeSchedule, season: impl Into<String>) -> Self {
        Self {
            fees,
            season: season.into(),
        }
    }

    /// The season this service registers for
    pub fn season(&self) -> &str {
        &self.season
    }

    /// The fee schedule in force
    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Creates a player registration and its fee invoice
    ///
    /// # Arguments
    ///
    /// * `registration_number` / `invoice_number` - allocated from the
    ///   daily sequences
    /// * `today` - invoice date, in the federation's timezone
    pub fn create_player_registration(
        &self,
        player: &Player,
        registration_number: String,
        invoice_number: String,
        today: NaiveDate,
    ) -> (Registration, Invoice) {
        let registration = Registration::new(
            registration_number,
            RegistrantKind::Player,
            *player.id.as_uuid(),
            &self.season,
        );

        let mut invoice = Invoice::new(
            invoice_number,
            BilledEntity::Registration(registration.id),
            format!(
                "Player Registration - {}",
                registration.registration_number
            ),
            InvoiceCategory::Registration,
            self.fees.registration_fee(RegistrantKind::Player),
            due_date(today, REGISTRATION_TERMS_DAYS),
        );
        if let Some(club_id) = player.current_club_id {
            invoice = invoice.issued_to_club(club_id);
        }

        (registration, invoice)
    }

    /// Creates a club affiliation and its fee invoice
    pub fn create_affiliation(
        &self,
        club: &Club,
        invoice_number: String,
        today: NaiveDate,
        expiry_date: NaiveDate,
    ) -> (Affiliation, Invoice) {
        let affiliation = Affiliation::new(club.id, &self.season, expiry_date);

        let invoice = Invoice::new(
            invoice_number,
            BilledEntity::Affiliation(affiliation.id),
            format!("Club Affiliation - Season {}", self.season),
            InvoiceCategory::Affiliation,
            self.fees.affiliation_fee(),
            due_date(today, AFFILIATION_TERMS_DAYS),
        )
        .issued_to_club(club.id);

        (affiliation, invoice)
    }

    /// Creates the fee invoice for a transfer
    ///
    /// Returns `None` when the combined admin and transfer fee is zero:
    /// no invoice row is created and the transfer proceeds without a
    /// payment stage.
    pub fn create_transfer_invoice(
        &self,
        transfer: &Transfer,
        invoice_number: String,
        today: NaiveDate,
    ) -> Option<Invoice> {
        let total = transfer.total_fees().ok()?;
        if !total.is_positive() {
            return None;
        }

        Some(
            Invoice::new(
                invoice_number,
                BilledEntity::Transfer(transfer.id),
                format!("Transfer Fee - {}", transfer.transfer_reference),
                InvoiceCategory::Transfer,
                total,
                due_date(today, TRANSFER_TERMS_DAYS),
            )
            .issued_to_club(transfer.to_club_id),
        )
    }
}

fn due_date(today: NaiveDate, terms_days: u64) -> NaiveDate {
    today
        .checked_add_days(Days::new(terms_days))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::{ClubId, Currency, Money, UserId};
    use domain_party::PlayerStatus;
    use domain_transfer::{MonthDay, TransferType, TransferWindow, TransferWindows};
    use rust_decimal_macros::dec;

    fn service() -> RegistrationService {
        RegistrationService::new(FeeSchedule::default(), "2026")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_player_registration_invoice() {
        let club = ClubId::new();
        let player = Player::new(
            "Walter",
            "Musona",
            NaiveDate::from_ymd_opt(1995, 12, 22).unwrap(),
            "ZW",
        )
        .with_club(club)
        .with_status(PlayerStatus::Pending);

        let (registration, invoice) = service().create_player_registration(
            &player,
            "PLA-20260115-0001".to_string(),
            "INV-20260115-000001".to_string(),
            today(),
        );

        assert_eq!(
            invoice.entity,
            BilledEntity::Registration(registration.id)
        );
        assert_eq!(invoice.amount.amount(), dec!(50));
        assert_eq!(invoice.issued_to_club_id, Some(club));
        assert_eq!(
            invoice.due_date,
            NaiveDate::from_ymd_opt(2026, 1, 29).unwrap()
        );
    }

    #[test]
    fn test_affiliation_invoice() {
        let club = Club::new("Ngezi Platinum Stars", "Mhondoro");
        let expiry = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();

        let (affiliation, invoice) = service().create_affiliation(
            &club,
            "INV-20260115-000002".to_string(),
            today(),
            expiry,
        );

        assert_eq!(affiliation.expiry_date, expiry);
        assert_eq!(invoice.amount.amount(), dec!(500));
        assert_eq!(
            invoice.due_date,
            NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()
        );
    }

    #[test]
    fn test_zero_fee_transfer_produces_no_invoice() {
        let windows = TransferWindows::new(
            vec![TransferWindow {
                label: "always".to_string(),
                start: MonthDay { month: 1, day: 1 },
                end: MonthDay { month: 12, day: 31 },
            }],
            chrono_tz::Africa::Harare,
        )
        .unwrap();

        let player = Player::new(
            "Gerald",
            "Takwara",
            NaiveDate::from_ymd_opt(1994, 10, 13).unwrap(),
            "ZW",
        )
        .with_status(PlayerStatus::FreeAgent);

        let transfer = Transfer::initiate(
            "TRF-20260115-00001",
            &player,
            ClubId::new(),
            TransferType::Free,
            Money::zero(Currency::USD),
            Money::zero(Currency::USD),
            None,
            UserId::new(),
            &windows,
        )
        .unwrap();

        let invoice = service().create_transfer_invoice(
            &transfer,
            "INV-20260115-000003".to_string(),
            today(),
        );

        assert!(invoice.is_none());
    }

    #[test]
    fn test_transfer_invoice_bills_combined_fees() {
        let windows = TransferWindows::new(
            vec![TransferWindow {
                label: "always".to_string(),
                start: MonthDay { month: 1, day: 1 },
                end: MonthDay { month: 12, day: 31 },
            }],
            chrono_tz::Africa::Harare,
        )
        .unwrap();

        let player = Player::new(
            "Jordan",
            "Zemura",
            NaiveDate::from_ymd_opt(1999, 11, 14).unwrap(),
            "ZW",
        )
        .with_status(PlayerStatus::FreeAgent);

        let to_club = ClubId::new();
        let transfer = Transfer::initiate(
            "TRF-20260115-00002",
            &player,
            to_club,
            TransferType::International,
            Money::from_minor(1_000_00, Currency::USD),
            Money::from_minor(500_00, Currency::USD),
            None,
            UserId::new(),
            &windows,
        )
        .unwrap();

        let invoice = service()
            .create_transfer_invoice(&transfer, "INV-20260115-000004".to_string(), today())
            .unwrap();

        assert_eq!(invoice.amount.amount(), dec!(1500));
        assert_eq!(invoice.issued_to_club_id, Some(to_club));
        assert_eq!(
            invoice.due_date,
            NaiveDate::from_ymd_opt(2026, 1, 22).unwrap()
        );
    }
}
