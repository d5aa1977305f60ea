//! Webhook payload types

use serde::{Deserialize, Serialize};

use crate::client::TransactionStatus;

/// Body of a PesePay result webhook
///
/// Deserialized only after the signature over the raw body has verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// Gateway reference identifying the payment
    pub reference_number: String,
    /// Gateway status string (SUCCESS, FAILED, CANCELLED, ...)
    pub transaction_status: String,
    /// Gateway transaction id, present on success
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl WebhookPayload {
    /// The parsed transaction status
    pub fn status(&self) -> TransactionStatus {
        TransactionStatus::from_gateway(&self.transaction_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_gateway_body() {
        let body = r#"{
            "referenceNumber": "PSP-20260115-001",
            "transactionStatus": "SUCCESS",
            "transactionId": "TXN-884213"
        }"#;

        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.reference_number, "PSP-20260115-001");
        assert_eq!(payload.status(), TransactionStatus::Success);
        assert_eq!(payload.transaction_id.as_deref(), Some("TXN-884213"));
    }

    #[test]
    fn test_transaction_id_is_optional() {
        let body = r#"{
            "referenceNumber": "PSP-20260115-002",
            "transactionStatus": "FAILED"
        }"#;

        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        assert!(payload.transaction_id.is_none());
        assert!(payload.status().is_failure());
    }
}
