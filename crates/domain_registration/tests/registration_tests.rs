//! Integration tests for the registration domain

use chrono::NaiveDate;
use core_kernel::{BilledEntity, RegistrantKind};
use domain_billing::InvoiceCategory;
use domain_party::{Club, Player, PlayerStatus};
use domain_registration::{
    registration_number, Affiliation, AffiliationStatus, FeeSchedule, PaymentState,
    Registration, RegistrationService, RegistrationStatus,
};
use uuid::Uuid;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
}

#[test]
fn test_registration_numbers_by_kind() {
    assert_eq!(
        registration_number(RegistrantKind::Player, today(), 12),
        "PLA-20260120-0012"
    );
    assert_eq!(
        registration_number(RegistrantKind::Official, today(), 1),
        "OFF-20260120-0001"
    );
    assert_eq!(
        registration_number(RegistrantKind::Referee, today(), 450),
        "REF-20260120-0450"
    );
}

#[test]
fn test_registration_fee_paid_then_reviewed() {
    let mut registration = Registration::new(
        "PLA-20260120-0001",
        RegistrantKind::Player,
        Uuid::new_v4(),
        "2026",
    );

    registration.mark_fee_paid().unwrap();
    assert_eq!(registration.status, RegistrationStatus::PendingReview);

    // A second settlement of the same invoice must not advance again
    assert!(registration.mark_fee_paid().is_err());
    assert_eq!(registration.status, RegistrationStatus::PendingReview);
}

#[test]
fn test_affiliation_activation_flow() {
    let mut affiliation = Affiliation::new(
        core_kernel::ClubId::new(),
        "2026",
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
    );

    assert_eq!(affiliation.status, AffiliationStatus::Pending);
    assert_eq!(affiliation.payment_status, PaymentState::Pending);

    affiliation.mark_paid().unwrap();

    assert_eq!(affiliation.status, AffiliationStatus::Active);
    assert_eq!(affiliation.payment_status, PaymentState::Paid);
}

#[test]
fn test_service_ties_invoice_to_registration() {
    let service = RegistrationService::new(FeeSchedule::default(), "2026");
    let player = Player::new(
        "Divine",
        "Lunga",
        NaiveDate::from_ymd_opt(1995, 7, 31).unwrap(),
        "ZW",
    )
    .with_status(PlayerStatus::Pending);

    let (registration, invoice) = service.create_player_registration(
        &player,
        "PLA-20260120-0002".to_string(),
        "INV-20260120-000010".to_string(),
        today(),
    );

    assert_eq!(registration.season, "2026");
    assert_eq!(invoice.category, InvoiceCategory::Registration);
    assert_eq!(invoice.entity, BilledEntity::Registration(registration.id));
    // Free agents and unattached players have no club to bill
    assert!(invoice.issued_to_club_id.is_none());
}

#[test]
fn test_affiliation_invoice_is_billed_to_club() {
    let service = RegistrationService::new(FeeSchedule::default(), "2026");
    let club = Club::new("Chicken Inn FC", "Bulawayo");

    let (affiliation, invoice) = service.create_affiliation(
        &club,
        "INV-20260120-000011".to_string(),
        today(),
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
    );

    assert_eq!(invoice.entity, BilledEntity::Affiliation(affiliation.id));
    assert_eq!(invoice.issued_to_club_id, Some(club.id));
    assert_eq!(invoice.category, InvoiceCategory::Affiliation);
}
