//! Payment processing
//!
//! A payment is one settlement attempt against an invoice via an external
//! gateway. The gateway reference is globally unique and is the key the
//! webhook uses to find the payment again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{InvoiceId, Money, PaymentId, UserId};

use crate::error::BillingError;

/// Payment gateway / channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gateway {
    Pesepay,
    BankTransfer,
    Cash,
    Cheque,
    Other,
}

impl Gateway {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gateway::Pesepay => "pesepay",
            Gateway::BankTransfer => "bank_transfer",
            Gateway::Cash => "cash",
            Gateway::Cheque => "cheque",
            Gateway::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Result<Self, BillingError> {
        match s {
            "pesepay" => Ok(Gateway::Pesepay),
            "bank_transfer" => Ok(Gateway::BankTransfer),
            "cash" => Ok(Gateway::Cash),
            "cheque" => Ok(Gateway::Cheque),
            "other" => Ok(Gateway::Other),
            other => Err(BillingError::UnknownStatus(other.to_string())),
        }
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Created locally, not yet submitted to the gateway
    Initiated,
    /// Submitted to the gateway, awaiting confirmation
    Pending,
    /// Gateway reports the transaction in progress
    Processing,
    /// Settled
    Paid,
    /// Gateway reported failure or cancellation
    Failed,
    /// Settled and subsequently refunded
    Refunded,
    /// Reversed by the payer's bank
    Chargeback,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Initiated => "initiated",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Chargeback => "chargeback",
        }
    }

    pub fn parse(s: &str) -> Result<Self, BillingError> {
        match s {
            "initiated" => Ok(PaymentStatus::Initiated),
            "pending" => Ok(PaymentStatus::Pending),
            "processing" => Ok(PaymentStatus::Processing),
            "paid" => Ok(PaymentStatus::Paid),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            "chargeback" => Ok(PaymentStatus::Chargeback),
            other => Err(BillingError::UnknownStatus(other.to_string())),
        }
    }
}

/// A payment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Invoice being paid
    pub invoice_id: InvoiceId,
    /// Internal reference (PAY-YYYYMMDD-XXXXXXXX)
    pub payment_reference: String,
    /// Payment amount
    pub amount: Money,
    /// Status
    pub status: PaymentStatus,
    /// Gateway / channel
    pub gateway: Gateway,
    /// Gateway method (ecocash, onemoney, visa, ...)
    pub gateway_method: Option<String>,
    /// Gateway-assigned reference; globally unique
    pub gateway_reference: Option<String>,
    /// Gateway transaction id recorded at settlement
    pub gateway_transaction_id: Option<String>,
    /// Receipt number assigned at settlement (RCP-YYYYMMDD-NNNNNN)
    pub receipt_number: Option<String>,
    /// User who initiated the payment
    pub initiated_by: Option<UserId>,
    /// When the payment was initiated
    pub initiated_at: DateTime<Utc>,
    /// When the payment settled
    pub paid_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment in `Initiated` status
    pub fn new(
        invoice_id: InvoiceId,
        payment_reference: impl Into<String>,
        amount: Money,
        gateway: Gateway,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PaymentId::new_v7(),
            invoice_id,
            payment_reference: payment_reference.into(),
            amount,
            status: PaymentStatus::Initiated,
            gateway,
            gateway_method: None,
            gateway_reference: None,
            gateway_transaction_id: None,
            receipt_number: None,
            initiated_by: None,
            initiated_at: now,
            paid_at: None,
            created_at: now,
        }
    }

    /// Sets the gateway method
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.gateway_method = Some(method.into());
        self
    }

    /// Sets the initiating user
    pub fn initiated_by(mut self, user_id: UserId) -> Self {
        self.initiated_by = Some(user_id);
        self
    }

    /// Records the gateway reference after the gateway accepts the payment
    pub fn submitted_to_gateway(&mut self, gateway_reference: impl Into<String>) {
        self.gateway_reference = Some(gateway_reference.into());
        self.status = PaymentStatus::Pending;
    }

    /// Whether the payment has settled
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// Whether the payment is awaiting a gateway verdict
    pub fn is_pending(&self) -> bool {
        matches!(
            self.status,
            PaymentStatus::Initiated | PaymentStatus::Pending | PaymentStatus::Processing
        )
    }

    /// Settles the payment
    ///
    /// Idempotent: settling an already-paid payment returns `Ok(false)`
    /// and changes nothing.
    pub fn settle(
        &mut self,
        transaction_id: Option<String>,
        receipt_number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<bool, BillingError> {
        match self.status {
            PaymentStatus::Paid => Ok(false),
            PaymentStatus::Refunded | PaymentStatus::Chargeback => Err(
                BillingError::invalid_transition(self.status.as_str(), "paid"),
            ),
            _ => {
                self.status = PaymentStatus::Paid;
                self.paid_at = Some(now);
                self.gateway_transaction_id = transaction_id;
                self.receipt_number = Some(receipt_number.into());
                Ok(true)
            }
        }
    }

    /// Records a gateway failure
    ///
    /// A failure report for an already-settled payment is ignored; the
    /// webhook is authoritative only until settlement.
    pub fn mark_failed(&mut self) -> bool {
        if self.is_pending() {
            self.status = PaymentStatus::Failed;
            true
        } else {
            false
        }
    }

    /// Refunds a settled payment
    pub fn refund(&mut self) -> Result<(), BillingError> {
        if self.status != PaymentStatus::Paid {
            return Err(BillingError::invalid_transition(
                self.status.as_str(),
                "refunded",
            ));
        }
        self.status = PaymentStatus::Refunded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;

    fn test_payment() -> Payment {
        Payment::new(
            InvoiceId::new(),
            "PAY-20260115-9F3A2C1B",
            Money::from_minor(10_000, Currency::USD),
            Gateway::Pesepay,
        )
    }

    #[test]
    fn test_new_payment_is_initiated() {
        let payment = test_payment();
        assert_eq!(payment.status, PaymentStatus::Initiated);
        assert!(payment.is_pending());
        assert!(payment.gateway_reference.is_none());
    }

    #[test]
    fn test_gateway_submission_moves_to_pending() {
        let mut payment = test_payment();
        payment.submitted_to_gateway("PSP-REF-001");

        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.gateway_reference.as_deref(), Some("PSP-REF-001"));
    }

    #[test]
    fn test_settle_is_idempotent() {
        let mut payment = test_payment();
        payment.submitted_to_gateway("PSP-REF-001");

        let now = Utc::now();
        assert!(payment
            .settle(Some("TXN-1".into()), "RCP-20260115-000001", now)
            .unwrap());

        let paid_at = payment.paid_at;
        let changed = payment
            .settle(Some("TXN-2".into()), "RCP-20260115-000002", Utc::now())
            .unwrap();

        assert!(!changed);
        assert_eq!(payment.paid_at, paid_at);
        assert_eq!(payment.gateway_transaction_id.as_deref(), Some("TXN-1"));
        assert_eq!(
            payment.receipt_number.as_deref(),
            Some("RCP-20260115-000001")
        );
    }

    #[test]
    fn test_failure_after_settlement_is_ignored() {
        let mut payment = test_payment();
        payment
            .settle(None, "RCP-20260115-000003", Utc::now())
            .unwrap();

        assert!(!payment.mark_failed());
        assert_eq!(payment.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_refund_requires_settlement() {
        let mut payment = test_payment();
        assert!(payment.refund().is_err());

        payment
            .settle(None, "RCP-20260115-000004", Utc::now())
            .unwrap();
        payment.refund().unwrap();
        assert_eq!(payment.status, PaymentStatus::Refunded);
    }
}
