//! Billing Domain - Invoices, Payments, and Settlement
//!
//! This crate models the federation's receivables. An `Invoice` bills a
//! registration, affiliation, transfer, or fine; `Payment` records are
//! settlement attempts against an invoice through the payment gateway.
//!
//! # Invariants
//!
//! - An invoice's balance is always `amount - sum(payments where status = paid)`
//! - An invoice becomes `paid` only when that balance reaches zero
//! - Settling an already-paid payment is a no-op (webhook idempotency)
//! - Invoices are never deleted (financial record retention)
//!
//! The transition logic here is pure; the database layer wraps it in
//! transactions and recomputes paid totals from the payment rows.

pub mod invoice;
pub mod payment;
pub mod settlement;
pub mod numbering;
pub mod error;

pub use invoice::{Invoice, InvoiceCategory, InvoiceStatus};
pub use payment::{Gateway, Payment, PaymentStatus};
pub use settlement::{
    GatewayOutcome, InvoiceTransition, PaymentTransition, PostPaymentEffect,
    apply_gateway_outcome, settle_invoice,
};
pub use error::BillingError;
