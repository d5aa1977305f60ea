//! Custom Test Assertions
//!
//! Specialized assertion helpers for domain types with more meaningful
//! error messages than standard assertions.

use core_kernel::Money;
use domain_billing::{Invoice, InvoiceStatus, Payment, PaymentStatus};
use domain_transfer::{Transfer, TransferStatus};

/// Asserts that two Money values are equal, reporting currency and
/// amount separately on failure
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );
    assert_eq!(
        actual.amount(),
        expected.amount(),
        "Amount mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts a transfer is in the expected status
pub fn assert_transfer_status(transfer: &Transfer, expected: TransferStatus) {
    assert_eq!(
        transfer.status,
        expected,
        "Transfer {} expected status {:?}, got {:?}",
        transfer.transfer_reference,
        expected,
        transfer.status
    );
}

/// Asserts an invoice has fully settled
pub fn assert_invoice_settled(invoice: &Invoice) {
    assert_eq!(
        invoice.status,
        InvoiceStatus::Paid,
        "Invoice {} expected paid, got {:?}",
        invoice.invoice_number,
        invoice.status
    );
    assert!(
        invoice.paid_date.is_some(),
        "Invoice {} is paid but has no paid_date",
        invoice.invoice_number
    );
}

/// Asserts a payment settled with a receipt and timestamp
pub fn assert_payment_settled(payment: &Payment) {
    assert_eq!(
        payment.status,
        PaymentStatus::Paid,
        "Payment {} expected paid, got {:?}",
        payment.payment_reference,
        payment.status
    );
    assert!(
        payment.paid_at.is_some(),
        "Payment {} is paid but has no paid_at",
        payment.payment_reference
    );
    assert!(
        payment.receipt_number.is_some(),
        "Payment {} is paid but has no receipt number",
        payment.payment_reference
    );
}

/// Asserts two payments carry identical settlement state
///
/// Used by idempotency tests: a redelivered webhook must leave every
/// settlement field untouched.
pub fn assert_settlement_unchanged(before: &Payment, after: &Payment) {
    assert_eq!(before.status, after.status, "status changed");
    assert_eq!(before.paid_at, after.paid_at, "paid_at changed");
    assert_eq!(
        before.gateway_transaction_id, after.gateway_transaction_id,
        "gateway_transaction_id changed"
    );
    assert_eq!(
        before.receipt_number, after.receipt_number,
        "receipt_number changed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{TestInvoiceBuilder, TestPaymentBuilder};
    use chrono::Utc;
    use core_kernel::Currency;

    #[test]
    fn test_assert_money_eq_passes_for_equal() {
        let a = Money::from_minor(1000, Currency::USD);
        let b = Money::from_minor(1000, Currency::USD);
        assert_money_eq(&a, &b);
    }

    #[test]
    #[should_panic(expected = "Currency mismatch")]
    fn test_assert_money_eq_panics_on_currency() {
        let a = Money::from_minor(1000, Currency::USD);
        let b = Money::from_minor(1000, Currency::ZAR);
        assert_money_eq(&a, &b);
    }

    #[test]
    fn test_assert_payment_settled() {
        let invoice = TestInvoiceBuilder::new().build();
        let mut payment = TestPaymentBuilder::new().for_invoice(&invoice).build();
        payment
            .settle(Some("TXN-1".into()), "RCP-20260115-000001", Utc::now())
            .unwrap();

        assert_payment_settled(&payment);
    }
}
