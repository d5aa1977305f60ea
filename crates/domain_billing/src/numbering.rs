//! Reference-number formatting
//!
//! Numbers are formatted from a date plus a value allocated by the
//! transactional sequence service; formatting never reads storage, so two
//! writers can never reconstruct the same number.

use chrono::NaiveDate;
use uuid::Uuid;

/// Formats an invoice number: `INV-YYYYMMDD-NNNNNN`
pub fn invoice_number(date: NaiveDate, sequence: i64) -> String {
    format!("INV-{}-{:06}", date.format("%Y%m%d"), sequence)
}

/// Formats a receipt number: `RCP-YYYYMMDD-NNNNNN`
pub fn receipt_number(date: NaiveDate, sequence: i64) -> String {
    format!("RCP-{}-{:06}", date.format("%Y%m%d"), sequence)
}

/// Formats an internal payment reference: `PAY-YYYYMMDD-XXXXXXXX`
///
/// Payment references are random rather than sequential; they are shown
/// to payers before the gateway assigns its own reference.
pub fn payment_reference(date: NaiveDate) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!(
        "PAY-{}-{}",
        date.format("%Y%m%d"),
        token[..8].to_uppercase()
    )
}
