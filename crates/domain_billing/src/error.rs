//! Billing domain errors

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Status string in storage does not match any known variant
    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    /// Requested transition is not valid from the current status
    #[error("Invalid transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// Money arithmetic failed (currency mismatch)
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Invoice not found
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    /// Payment not found
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// Invoice cannot accept further payments
    #[error("Invoice {0} is not payable")]
    NotPayable(String),
}

impl BillingError {
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        BillingError::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }
}
