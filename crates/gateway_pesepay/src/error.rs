//! Gateway adapter errors

use thiserror::Error;

/// Errors from the PesePay adapter
///
/// All variants are treated as "fail closed": an unreachable or
/// misbehaving gateway never settles a payment.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Credentials are missing
    #[error("PesePay credentials not configured")]
    NotConfigured,

    /// Connection, TLS, or timeout failure
    #[error("Gateway transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Gateway returned a non-2xx response
    #[error("Gateway returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Gateway returned a body this client cannot parse
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}
