//! Payment DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_billing::Payment;

#[derive(Debug, Deserialize, Validate)]
pub struct InitiatePaymentRequest {
    /// ecocash | onemoney | telecash | visa | mastercard | zipit
    #[validate(length(min = 1, max = 32))]
    pub payment_method: String,
}

#[derive(Debug, Serialize)]
pub struct InitiatePaymentResponse {
    pub payment_id: Uuid,
    pub payment_url: String,
    pub reference: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub receipt_number: Option<String>,
}

impl From<&Payment> for PaymentStatusResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            status: payment.status.as_str().to_string(),
            paid_at: payment.paid_at,
            receipt_number: payment.receipt_number.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub payment_reference: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub gateway_reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            invoice_id: *payment.invoice_id.as_uuid(),
            payment_reference: payment.payment_reference.clone(),
            amount: payment.amount.amount(),
            currency: payment.amount.currency().code().to_string(),
            status: payment.status.as_str().to_string(),
            gateway_reference: payment.gateway_reference.clone(),
            paid_at: payment.paid_at,
        }
    }
}

/// Acknowledgement returned to the gateway's webhook delivery
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub message: String,
}
