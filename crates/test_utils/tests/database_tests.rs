//! Database-backed integration tests
//!
//! These run against a disposable PostgreSQL container and skip
//! themselves when no Docker daemon is present.

use chrono::NaiveDate;
use core_kernel::{BilledEntity, Currency, FineId, Money, UserId};
use domain_billing::{
    GatewayOutcome, Invoice, InvoiceCategory, InvoiceStatus, PaymentTransition,
};
use infra_db::{sequences, BillingRepository};

use test_utils::database::{create_isolated_test_database, DOCKER_AVAILABLE};

fn fine_invoice(amount_minor: i64) -> Invoice {
    Invoice::new(
        format!("INV-20260115-{:06}", amount_minor % 1_000_000),
        BilledEntity::Fine(FineId::new()),
        "Disciplinary fine",
        InvoiceCategory::Fine,
        Money::from_minor(amount_minor, Currency::USD),
        NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
    )
}

/// Concurrent same-day allocations must never collide; the counter
/// upsert serializes on the row lock.
#[tokio::test]
async fn test_concurrent_sequence_allocations_are_distinct() {
    if !*DOCKER_AVAILABLE {
        eprintln!("skipping: no Docker daemon for testcontainers");
        return;
    }

    let db = create_isolated_test_database().await.unwrap();
    let pool = db.pool().clone();
    let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();

    let mut handles = Vec::new();
    for _ in 0..32 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let mut conn = pool.acquire().await.unwrap();
            sequences::next_value(&mut conn, sequences::scope::INVOICE, date)
                .await
                .unwrap()
        }));
    }

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap());
    }

    values.sort_unstable();
    let mut deduped = values.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), values.len(), "duplicate sequence values: {values:?}");
    assert_eq!(*values.last().unwrap(), 32);
}

/// Concurrent duplicate webhook deliveries settle exactly once.
#[tokio::test]
async fn test_concurrent_duplicate_webhooks_settle_once() {
    if !*DOCKER_AVAILABLE {
        eprintln!("skipping: no Docker daemon for testcontainers");
        return;
    }

    let db = create_isolated_test_database().await.unwrap();
    let billing = BillingRepository::new(db.pool().clone());

    let invoice = fine_invoice(25_000);
    billing.create_invoice(&invoice).await.unwrap();

    let (payment, _) = billing
        .begin_payment(invoice.id, "ecocash", UserId::new())
        .await
        .unwrap();
    billing
        .record_gateway_acceptance(payment.id, "PSP-DUP-001")
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let billing = billing.clone();
        handles.push(tokio::spawn(async move {
            billing
                .settle_from_gateway(
                    "PSP-DUP-001",
                    GatewayOutcome::Success {
                        transaction_id: Some("TXN-DUP".into()),
                    },
                )
                .await
                .unwrap()
        }));
    }

    let mut settled = 0;
    let mut duplicates = 0;
    for handle in handles {
        let report = handle.await.unwrap();
        match report.payment_transition {
            PaymentTransition::Settled => settled += 1,
            PaymentTransition::AlreadySettled => duplicates += 1,
            other => panic!("unexpected transition {other:?}"),
        }
    }

    assert_eq!(settled, 1, "exactly one delivery settles");
    assert_eq!(duplicates, 7);

    let refreshed = billing.get_invoice(invoice.id).await.unwrap();
    assert_eq!(refreshed.status, InvoiceStatus::Paid);

    let total = billing.invoice_paid_total(invoice.id).await.unwrap();
    assert_eq!(total, Money::from_minor(25_000, Currency::USD));
}

/// The balance invariant holds across a partial then full settlement.
#[tokio::test]
async fn test_balance_invariant_across_settlements() {
    if !*DOCKER_AVAILABLE {
        eprintln!("skipping: no Docker daemon for testcontainers");
        return;
    }

    let db = create_isolated_test_database().await.unwrap();
    let billing = BillingRepository::new(db.pool().clone());

    let invoice = fine_invoice(50_000);
    billing.create_invoice(&invoice).await.unwrap();

    // First attempt fails at the gateway, so nothing settles
    let (first, _) = billing
        .begin_payment(invoice.id, "ecocash", UserId::new())
        .await
        .unwrap();
    billing
        .record_gateway_acceptance(first.id, "PSP-BAL-001")
        .await
        .unwrap();
    billing
        .settle_from_gateway("PSP-BAL-001", GatewayOutcome::Failed)
        .await
        .unwrap();

    let total = billing.invoice_paid_total(invoice.id).await.unwrap();
    assert!(total.is_zero());

    // Second attempt succeeds and settles the invoice in full
    let (second, _) = billing
        .begin_payment(invoice.id, "visa", UserId::new())
        .await
        .unwrap();
    billing
        .record_gateway_acceptance(second.id, "PSP-BAL-002")
        .await
        .unwrap();
    let report = billing
        .settle_from_gateway(
            "PSP-BAL-002",
            GatewayOutcome::Success {
                transaction_id: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(report.payment_transition, PaymentTransition::Settled);

    let refreshed = billing.get_invoice(invoice.id).await.unwrap();
    let total = billing.invoice_paid_total(invoice.id).await.unwrap();
    let balance = refreshed.balance(total).unwrap();

    assert_eq!(refreshed.status, InvoiceStatus::Paid);
    assert!(balance.is_zero());
}
