//! Settlement transitions
//!
//! Pure decision logic for interpreting a gateway verdict against a
//! payment and its invoice. The database layer loads the rows, locks the
//! payment, applies these transitions, and persists the result in one
//! transaction; keeping the decisions here keeps webhook and poll
//! settlement single-sourced.

use chrono::{DateTime, Utc};

use core_kernel::{AffiliationId, BilledEntity, Money, RegistrationId, TransferId};

use crate::error::BillingError;
use crate::invoice::{Invoice, InvoiceStatus};
use crate::payment::Payment;

/// The gateway's verdict on a payment, normalized from its status strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// Transaction succeeded
    Success {
        /// Gateway transaction id, when supplied
        transaction_id: Option<String>,
    },
    /// Transaction failed or was cancelled by the payer
    Failed,
    /// Still in flight; nothing to record yet
    Pending,
}

/// What happened to the payment row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTransition {
    /// Payment settled now
    Settled,
    /// Payment was already settled; nothing changed
    AlreadySettled,
    /// Payment marked failed
    Failed,
    /// No state change
    Unchanged,
}

/// What happened to the invoice row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceTransition {
    /// Invoice fully settled; entity-specific follow-up required
    Paid { effect: Option<PostPaymentEffect> },
    /// Some balance remains
    Partial,
    /// No state change
    Unchanged,
}

/// Entity-specific follow-up after an invoice settles in full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostPaymentEffect {
    /// Registration moves to pending_review (player → under_review)
    RegistrationPaid(RegistrationId),
    /// Affiliation activates; owning club becomes active
    AffiliationPaid(AffiliationId),
    /// Transfer fee settled; transfer moves to ZIFA review
    TransferFeePaid(TransferId),
}

/// Applies a gateway verdict to a payment
///
/// Idempotent: a `Success` for an already-paid payment reports
/// `AlreadySettled` and mutates nothing; a `Failed` after settlement is
/// ignored.
pub fn apply_gateway_outcome(
    payment: &mut Payment,
    outcome: GatewayOutcome,
    receipt_number: &str,
    now: DateTime<Utc>,
) -> Result<PaymentTransition, BillingError> {
    match outcome {
        GatewayOutcome::Success { transaction_id } => {
            if payment.settle(transaction_id, receipt_number, now)? {
                Ok(PaymentTransition::Settled)
            } else {
                Ok(PaymentTransition::AlreadySettled)
            }
        }
        GatewayOutcome::Failed => {
            if payment.mark_failed() {
                Ok(PaymentTransition::Failed)
            } else {
                Ok(PaymentTransition::Unchanged)
            }
        }
        GatewayOutcome::Pending => Ok(PaymentTransition::Unchanged),
    }
}

/// Settles an invoice against the recomputed paid total
///
/// `total_paid` is the sum over all the invoice's `paid` payments,
/// recomputed inside the settlement transaction. Returns the transition
/// and, on full payment, the entity effect the caller must dispatch.
pub fn settle_invoice(
    invoice: &mut Invoice,
    total_paid: Money,
    now: DateTime<Utc>,
) -> Result<InvoiceTransition, BillingError> {
    if invoice.status == InvoiceStatus::Paid {
        return Ok(InvoiceTransition::Unchanged);
    }

    let balance = invoice.balance(total_paid)?;

    if balance.is_positive() {
        if total_paid.is_positive() {
            invoice.status = InvoiceStatus::Partial;
            invoice.updated_at = now;
            return Ok(InvoiceTransition::Partial);
        }
        return Ok(InvoiceTransition::Unchanged);
    }

    invoice.status = InvoiceStatus::Paid;
    invoice.paid_date = Some(now.date_naive());
    invoice.updated_at = now;

    let effect = post_payment_effect(&invoice.entity);
    Ok(InvoiceTransition::Paid { effect })
}

/// Maps a billed entity to its post-payment effect
fn post_payment_effect(entity: &BilledEntity) -> Option<PostPaymentEffect> {
    match entity {
        BilledEntity::Registration(id) => Some(PostPaymentEffect::RegistrationPaid(*id)),
        BilledEntity::Affiliation(id) => Some(PostPaymentEffect::AffiliationPaid(*id)),
        BilledEntity::Transfer(id) => Some(PostPaymentEffect::TransferFeePaid(*id)),
        // Fines settle the invoice and nothing else
        BilledEntity::Fine(_) => None,
    }
}
