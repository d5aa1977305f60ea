//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the platform.
//! Fixtures are consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{
    AffiliationId, ClubId, Currency, InvoiceId, Money, PaymentId, PlayerId, RegistrationId,
    TransferId, UserId,
};
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The player registration fee
    pub fn registration_fee() -> Money {
        Money::new(dec!(50.00), Currency::USD)
    }

    /// The club affiliation fee
    pub fn affiliation_fee() -> Money {
        Money::new(dec!(500.00), Currency::USD)
    }

    /// The domestic transfer admin fee
    pub fn local_admin_fee() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// The international transfer admin fee
    pub fn international_admin_fee() -> Money {
        Money::new(dec!(500.00), Currency::USD)
    }

    /// A zero USD amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// A ZAR amount for currency-mismatch tests
    pub fn zar_100() -> Money {
        Money::new(dec!(100.00), Currency::ZAR)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A date inside the January transfer window
    pub fn january_window_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    /// A date inside the July transfer window
    pub fn july_window_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()
    }

    /// A date with every transfer window closed
    pub fn closed_window_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    /// Standard invoice due date for the January fixtures
    pub fn january_due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 29).unwrap()
    }

    /// End of the 2026 season
    pub fn season_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()
    }

    /// A date of birth for an adult player
    pub fn player_date_of_birth() -> NaiveDate {
        NaiveDate::from_ymd_opt(1998, 4, 12).unwrap()
    }
}

/// Fixture for reference strings
pub struct StringFixtures;

impl StringFixtures {
    pub fn transfer_reference() -> &'static str {
        "TRF-20260115-00001"
    }

    pub fn invoice_number() -> &'static str {
        "INV-20260115-000001"
    }

    pub fn receipt_number() -> &'static str {
        "RCP-20260115-000001"
    }

    pub fn payment_reference() -> &'static str {
        "PAY-20260115-9F3A2C1B"
    }

    pub fn gateway_reference() -> &'static str {
        "PSP-20260115-000042"
    }

    pub fn registration_number() -> &'static str {
        "PLA-20260115-0001"
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn player_id() -> PlayerId {
        PlayerId::new()
    }

    pub fn club_id() -> ClubId {
        ClubId::new()
    }

    pub fn user_id() -> UserId {
        UserId::new()
    }

    pub fn transfer_id() -> TransferId {
        TransferId::new()
    }

    pub fn invoice_id() -> InvoiceId {
        InvoiceId::new()
    }

    pub fn payment_id() -> PaymentId {
        PaymentId::new()
    }

    pub fn registration_id() -> RegistrationId {
        RegistrationId::new()
    }

    pub fn affiliation_id() -> AffiliationId {
        AffiliationId::new()
    }
}
