//! Invoice DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use core_kernel::Money;
use domain_billing::Invoice;

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub invoice_number: String,
    pub entity_kind: String,
    pub entity_id: Uuid,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub balance: Decimal,
    pub currency: String,
    pub status: String,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

impl InvoiceResponse {
    /// Builds the response with the balance derived from the settled
    /// payment total
    pub fn from_invoice(invoice: &Invoice, balance: Money) -> Self {
        Self {
            id: *invoice.id.as_uuid(),
            invoice_number: invoice.invoice_number.clone(),
            entity_kind: invoice.entity.kind().to_string(),
            entity_id: invoice.entity.entity_uuid(),
            description: invoice.description.clone(),
            category: invoice.category.as_str().to_string(),
            amount: invoice.amount.amount(),
            balance: balance.amount(),
            currency: invoice.amount.currency().code().to_string(),
            status: invoice.status.as_str().to_string(),
            due_date: invoice.due_date,
            paid_date: invoice.paid_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MarkOverdueResponse {
    pub flagged: u64,
}
