//! Cross-domain workflow tests
//!
//! Exercises the transfer and settlement state machines together, the
//! way the transactional workflows drive them, without a database.

use chrono::Utc;
use core_kernel::{BilledEntity, ClubId, Currency, Money, UserId};
use domain_billing::{
    apply_gateway_outcome, settle_invoice, GatewayOutcome, InvoiceTransition, PaymentTransition,
    PostPaymentEffect,
};
use domain_registration::{FeeSchedule, RegistrationService};
use domain_transfer::TransferStatus;

use test_utils::assertions::*;
use test_utils::builders::*;
use test_utils::fixtures::TemporalFixtures;

fn service() -> RegistrationService {
    RegistrationService::new(FeeSchedule::default(), "2026")
}

/// The full paid-transfer path: initiate, invoice, settle, review,
/// complete.
#[test]
fn test_paid_transfer_settles_then_completes() {
    let from_club = ClubId::new();
    let to_club = ClubId::new();
    let player = TestPlayerBuilder::new().with_club(from_club).build();

    let mut transfer = TestTransferBuilder::local(player.clone(), to_club)
        .with_transfer_fee(Money::new(rust_decimal_macros::dec!(400.00), Currency::USD))
        .build();
    assert_transfer_status(&transfer, TransferStatus::PendingFromClub);

    // Releasing club signs off
    transfer.approve_by_club(UserId::new()).unwrap();
    assert_transfer_status(&transfer, TransferStatus::PendingPayment);

    // The orchestrator bills admin + transfer fee on one invoice
    let mut invoice = service()
        .create_transfer_invoice(
            &transfer,
            "INV-20260115-000020".to_string(),
            TemporalFixtures::january_window_day(),
        )
        .expect("non-zero fees produce an invoice");
    assert_eq!(invoice.amount, transfer.total_fees().unwrap());

    // Gateway settles the payment in full
    let mut payment = TestPaymentBuilder::new().for_invoice(&invoice).build();
    let now = Utc::now();
    let payment_transition = apply_gateway_outcome(
        &mut payment,
        GatewayOutcome::Success {
            transaction_id: Some("TXN-500".into()),
        },
        "RCP-20260115-000021",
        now,
    )
    .unwrap();
    assert_eq!(payment_transition, PaymentTransition::Settled);
    assert_payment_settled(&payment);

    let invoice_transition = settle_invoice(&mut invoice, payment.amount, now).unwrap();
    let InvoiceTransition::Paid { effect } = invoice_transition else {
        panic!("expected full settlement, got {invoice_transition:?}");
    };
    assert_invoice_settled(&invoice);
    assert_eq!(effect, Some(PostPaymentEffect::TransferFeePaid(transfer.id)));

    // The settlement workflow applies the effect
    transfer.mark_fee_paid().unwrap();
    assert_transfer_status(&transfer, TransferStatus::PendingZifaReview);

    // Federation approval completes and hands back the reassignment
    let completion = transfer.approve_by_zifa(UserId::new()).unwrap();
    assert_transfer_status(&transfer, TransferStatus::Completed);
    assert_eq!(completion.from_club_id, Some(from_club));
    assert_eq!(completion.to_club_id, to_club);
    assert!(!completion.requires_international_sync);
}

/// A duplicate SUCCESS delivery must produce exactly one invoice
/// transition and one post-payment effect.
#[test]
fn test_duplicate_success_yields_one_effect() {
    let mut invoice = TestInvoiceBuilder::new().build();
    let mut payment = TestPaymentBuilder::new().for_invoice(&invoice).build();
    let now = Utc::now();

    // First delivery
    let first = apply_gateway_outcome(
        &mut payment,
        GatewayOutcome::Success {
            transaction_id: Some("TXN-1".into()),
        },
        "RCP-20260115-000030",
        now,
    )
    .unwrap();
    assert_eq!(first, PaymentTransition::Settled);

    let first_invoice = settle_invoice(&mut invoice, payment.amount, now).unwrap();
    assert!(matches!(first_invoice, InvoiceTransition::Paid { effect: Some(_) }));

    let settled_snapshot = payment.clone();

    // Second delivery of the same payload
    let second = apply_gateway_outcome(
        &mut payment,
        GatewayOutcome::Success {
            transaction_id: Some("TXN-1".into()),
        },
        "RCP-20260115-000031",
        Utc::now(),
    )
    .unwrap();
    assert_eq!(second, PaymentTransition::AlreadySettled);
    assert_settlement_unchanged(&settled_snapshot, &payment);

    let second_invoice = settle_invoice(&mut invoice, payment.amount, Utc::now()).unwrap();
    assert_eq!(second_invoice, InvoiceTransition::Unchanged);
}

/// The free-agent, zero-fee scenario: pending_payment at creation, no
/// invoice row, federation approval completes the transfer with a single
/// new tenure record.
#[test]
fn test_free_agent_zero_fee_transfer() {
    let to_club = ClubId::new();
    let free_agent = TestPlayerBuilder::free_agent().build();

    let mut transfer = TestTransferBuilder::free(free_agent.clone(), to_club).build();
    assert_transfer_status(&transfer, TransferStatus::PendingPayment);

    // Zero fees: the orchestrator declines to create an invoice
    let invoice = service().create_transfer_invoice(
        &transfer,
        "INV-20260115-000040".to_string(),
        TemporalFixtures::january_window_day(),
    );
    assert!(invoice.is_none());

    // The approval workflow advances zero-fee transfers through the
    // fee-paid stage itself
    transfer.mark_fee_paid().unwrap();
    let completion = transfer.approve_by_zifa(UserId::new()).unwrap();

    assert_transfer_status(&transfer, TransferStatus::Completed);
    assert_eq!(completion.from_club_id, None);

    // One new tenure record, open-ended at the destination club
    let record = domain_transfer::TenureRecord::open(
        completion.player_id,
        completion.to_club_id,
        completion.effective_date,
        completion.transfer_type,
        completion.transfer_id,
    );
    assert!(record.is_open());
    assert_eq!(record.club_id, to_club);
}

/// A registration invoice's settlement effect targets the registration,
/// not the transfer machinery.
#[test]
fn test_registration_settlement_effect() {
    let player = TestPlayerBuilder::new()
        .with_status(domain_party::PlayerStatus::Pending)
        .build();

    let (mut registration, mut invoice) = service().create_player_registration(
        &player,
        "PLA-20260115-0009".to_string(),
        "INV-20260115-000050".to_string(),
        TemporalFixtures::january_window_day(),
    );

    let invoice_amount = invoice.amount;
    let transition = settle_invoice(&mut invoice, invoice_amount, Utc::now()).unwrap();
    let InvoiceTransition::Paid { effect } = transition else {
        panic!("expected settlement");
    };
    assert_eq!(
        effect,
        Some(PostPaymentEffect::RegistrationPaid(registration.id))
    );
    assert_eq!(invoice.entity, BilledEntity::Registration(registration.id));

    // The workflow advances the registration and, for players, the
    // player record
    registration.mark_fee_paid().unwrap();
    assert_eq!(
        registration.status,
        domain_registration::RegistrationStatus::PendingReview
    );
}

/// Failed gateway verdicts leave the invoice untouched and the transfer
/// parked at the payment stage.
#[test]
fn test_failed_payment_does_not_advance_transfer() {
    let player = TestPlayerBuilder::free_agent().build();
    let transfer = TestTransferBuilder::local(player, ClubId::new()).build();

    let mut invoice = service()
        .create_transfer_invoice(
            &transfer,
            "INV-20260115-000060".to_string(),
            TemporalFixtures::january_window_day(),
        )
        .unwrap();
    let mut payment = TestPaymentBuilder::new().for_invoice(&invoice).build();

    let transition = apply_gateway_outcome(
        &mut payment,
        GatewayOutcome::Failed,
        "",
        Utc::now(),
    )
    .unwrap();
    assert_eq!(transition, PaymentTransition::Failed);

    // Nothing was paid, so the invoice stays put
    let invoice_transition =
        settle_invoice(&mut invoice, Money::zero(Currency::USD), Utc::now()).unwrap();
    assert_eq!(invoice_transition, InvoiceTransition::Unchanged);
    assert_transfer_status(&transfer, TransferStatus::PendingPayment);
}
