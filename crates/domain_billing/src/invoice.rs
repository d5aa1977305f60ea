//! Invoice management
//!
//! An invoice bills a fixed amount owed by a club or user for a
//! categorized reason. Status reflects the settlement lifecycle; the
//! amount never changes after issue.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BilledEntity, ClubId, InvoiceId, Money, UserId};

use crate::error::BillingError;

/// Invoice status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Invoice is being drafted
    Draft,
    /// Invoice has been issued to the payer
    Sent,
    /// A payment attempt is in flight
    Pending,
    /// Fully paid
    Paid,
    /// Partial payment received
    Partial,
    /// Past due date without full payment
    Overdue,
    /// Cancelled/voided before payment
    Cancelled,
    /// Paid and subsequently refunded
    Refunded,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Partial => "partial",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
            InvoiceStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Result<Self, BillingError> {
        match s {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "partial" => Ok(InvoiceStatus::Partial),
            "overdue" => Ok(InvoiceStatus::Overdue),
            "cancelled" => Ok(InvoiceStatus::Cancelled),
            "refunded" => Ok(InvoiceStatus::Refunded),
            other => Err(BillingError::UnknownStatus(other.to_string())),
        }
    }

    /// States from which a payment may still be initiated
    pub fn is_payable(&self) -> bool {
        matches!(
            self,
            InvoiceStatus::Sent
                | InvoiceStatus::Pending
                | InvoiceStatus::Partial
                | InvoiceStatus::Overdue
        )
    }
}

/// Fee category the invoice bills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceCategory {
    Registration,
    Affiliation,
    Transfer,
    Fine,
}

impl InvoiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceCategory::Registration => "registration",
            InvoiceCategory::Affiliation => "affiliation",
            InvoiceCategory::Transfer => "transfer",
            InvoiceCategory::Fine => "fine",
        }
    }

    pub fn parse(s: &str) -> Result<Self, BillingError> {
        match s {
            "registration" => Ok(InvoiceCategory::Registration),
            "affiliation" => Ok(InvoiceCategory::Affiliation),
            "transfer" => Ok(InvoiceCategory::Transfer),
            "fine" => Ok(InvoiceCategory::Fine),
            other => Err(BillingError::UnknownStatus(other.to_string())),
        }
    }
}

/// An invoice for federation fees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Human-readable invoice number (INV-YYYYMMDD-NNNNNN)
    pub invoice_number: String,
    /// The record being billed
    pub entity: BilledEntity,
    /// Description shown to the payer
    pub description: String,
    /// Fee category
    pub category: InvoiceCategory,
    /// Total amount owed
    pub amount: Money,
    /// Status
    pub status: InvoiceStatus,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Date full payment was confirmed
    pub paid_date: Option<NaiveDate>,
    /// Club the invoice is issued to, if any
    pub issued_to_club_id: Option<ClubId>,
    /// User the invoice is issued to, if any
    pub issued_to_user_id: Option<UserId>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new invoice in `Sent` status
    ///
    /// # Arguments
    ///
    /// * `invoice_number` - allocated from the daily sequence
    /// * `entity` - the record being billed
    /// * `category` - fee category
    /// * `amount` - total owed
    /// * `due_date` - payment deadline
    pub fn new(
        invoice_number: impl Into<String>,
        entity: BilledEntity,
        description: impl Into<String>,
        category: InvoiceCategory,
        amount: Money,
        due_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: InvoiceId::new_v7(),
            invoice_number: invoice_number.into(),
            entity,
            description: description.into(),
            category,
            amount,
            status: InvoiceStatus::Sent,
            due_date,
            paid_date: None,
            issued_to_club_id: None,
            issued_to_user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Issues the invoice to a club
    pub fn issued_to_club(mut self, club_id: ClubId) -> Self {
        self.issued_to_club_id = Some(club_id);
        self
    }

    /// Issues the invoice to a user
    pub fn issued_to_user(mut self, user_id: UserId) -> Self {
        self.issued_to_user_id = Some(user_id);
        self
    }

    /// Whether the invoice is fully paid
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    /// Outstanding balance given the settled payment total
    ///
    /// The total is recomputed from payment rows by the caller; the
    /// invariant `balance = amount - sum(paid payments)` lives here.
    pub fn balance(&self, total_paid: Money) -> Result<Money, BillingError> {
        self.amount
            .checked_sub(&total_paid)
            .map_err(BillingError::from)
    }

    /// Whether the invoice is past due without full payment
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        today > self.due_date
            && !matches!(
                self.status,
                InvoiceStatus::Paid | InvoiceStatus::Cancelled | InvoiceStatus::Refunded
            )
    }

    /// Flags the invoice overdue
    pub fn mark_overdue(&mut self, today: NaiveDate) -> Result<(), BillingError> {
        if !self.is_overdue(today) {
            return Err(BillingError::invalid_transition(
                self.status.as_str(),
                "overdue",
            ));
        }
        self.status = InvoiceStatus::Overdue;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Cancels an unpaid invoice
    pub fn cancel(&mut self) -> Result<(), BillingError> {
        match self.status {
            InvoiceStatus::Draft
            | InvoiceStatus::Sent
            | InvoiceStatus::Pending
            | InvoiceStatus::Overdue => {
                self.status = InvoiceStatus::Cancelled;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(BillingError::invalid_transition(
                self.status.as_str(),
                "cancelled",
            )),
        }
    }

    /// Flags a paid invoice as refunded
    pub fn mark_refunded(&mut self) -> Result<(), BillingError> {
        match self.status {
            InvoiceStatus::Paid | InvoiceStatus::Partial => {
                self.status = InvoiceStatus::Refunded;
                self.paid_date = None;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(BillingError::invalid_transition(
                self.status.as_str(),
                "refunded",
            )),
        }
    }
}
