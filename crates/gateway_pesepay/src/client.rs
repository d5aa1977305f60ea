//! PesePay API client
//!
//! Wraps the payments-engine endpoints used by the platform:
//! `POST /payments/initiate` and `GET /payments/check-payment`.

use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PesepayConfig;
use crate::error::GatewayError;
use crate::signature;

/// PesePay client
#[derive(Debug, Clone)]
pub struct PesepayClient {
    client: Client,
    config: PesepayConfig,
}

/// Request to initiate a payment
#[derive(Debug, Clone)]
pub struct InitiatePaymentRequest {
    /// Amount in major units
    pub amount: Decimal,
    /// ISO currency code
    pub currency_code: String,
    /// Shown to the payer at checkout
    pub reason: String,
    /// Internal payment reference, appended to the return URL
    pub payment_reference: String,
}

/// Gateway response to a successful initiation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatedPayment {
    /// Gateway-assigned reference; globally unique
    pub reference_number: String,
    /// Checkout URL the payer is redirected to
    pub redirect_url: String,
    /// Optional poll URL
    #[serde(default)]
    pub poll_url: Option<String>,
}

/// Gateway transaction status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Failed,
    Cancelled,
    Pending,
    Processing,
    /// A status string this client does not recognize
    Other(String),
}

impl TransactionStatus {
    /// Parses the gateway's status string
    pub fn from_gateway(status: &str) -> Self {
        match status {
            "SUCCESS" => TransactionStatus::Success,
            "FAILED" => TransactionStatus::Failed,
            "CANCELLED" => TransactionStatus::Cancelled,
            "PENDING" => TransactionStatus::Pending,
            "PROCESSING" => TransactionStatus::Processing,
            other => TransactionStatus::Other(other.to_string()),
        }
    }

    /// Terminal failure statuses
    pub fn is_failure(&self) -> bool {
        matches!(self, TransactionStatus::Failed | TransactionStatus::Cancelled)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitiateBody {
    amount_details: AmountDetails,
    reason_for_payment: String,
    result_url: String,
    return_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmountDetails {
    amount: Decimal,
    currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckPaymentResponse {
    transaction_status: String,
}

impl PesepayClient {
    /// Creates a new client with a bounded request timeout
    pub fn new(config: PesepayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GatewayError::Transport)?;

        Ok(Self { client, config })
    }

    /// Whether credentials are present
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Initiates a payment at the gateway
    ///
    /// Deliberately unretried: the payer is waiting for the redirect URL,
    /// so any failure is surfaced immediately.
    ///
    /// # Errors
    ///
    /// `GatewayError::NotConfigured` without credentials,
    /// `GatewayError::Transport` on connection/timeout failures,
    /// `GatewayError::UnexpectedStatus` on a non-2xx response.
    pub async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> Result<InitiatedPayment, GatewayError> {
        if !self.is_configured() {
            return Err(GatewayError::NotConfigured);
        }

        let body = InitiateBody {
            amount_details: AmountDetails {
                amount: request.amount,
                currency_code: request.currency_code,
            },
            reason_for_payment: request.reason,
            result_url: self.config.result_url.clone(),
            return_url: format!(
                "{}?reference={}",
                self.config.return_url, request.payment_reference
            ),
        };

        let url = format!("{}/payments/initiate", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.config.integration_key)
            .json(&body)
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = response.status();
        let text = response.text().await.map_err(GatewayError::Transport)?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text,
                reference = %request.payment_reference,
                "PesePay initiation failed"
            );
            return Err(GatewayError::UnexpectedStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let initiated: InitiatedPayment = serde_json::from_str(&text)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            gateway_reference = %initiated.reference_number,
            reference = %request.payment_reference,
            "PesePay payment initiated"
        );

        Ok(initiated)
    }

    /// Polls the gateway for a transaction's current status
    ///
    /// Fallback only; the webhook remains the authoritative settlement
    /// path.
    pub async fn check_status(
        &self,
        reference_number: &str,
    ) -> Result<TransactionStatus, GatewayError> {
        if !self.is_configured() {
            return Err(GatewayError::NotConfigured);
        }

        let url = format!("{}/payments/check-payment", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.config.integration_key)
            .query(&[("referenceNumber", reference_number)])
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = response.status();
        let text = response.text().await.map_err(GatewayError::Transport)?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text,
                reference = %reference_number,
                "PesePay status check failed"
            );
            return Err(GatewayError::UnexpectedStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: CheckPaymentResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(TransactionStatus::from_gateway(&parsed.transaction_status))
    }

    /// Verifies a webhook signature against the configured secret
    pub fn verify_webhook_signature(&self, raw_body: &[u8], header_signature: &str) -> bool {
        signature::verify_signature(raw_body, header_signature, &self.config.webhook_secret)
    }
}
