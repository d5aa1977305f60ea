//! PesePay Gateway Adapter
//!
//! This crate translates internal payment records into calls against the
//! PesePay payments-engine REST API and interprets its asynchronous
//! webhook callbacks.
//!
//! # Settlement authority
//!
//! The webhook is the authoritative settlement path; `check_status` is a
//! fallback poll for clients asking before the webhook lands. Both feed
//! the same settlement logic upstream.
//!
//! # Failure posture
//!
//! Initiation is a synchronous call the payer is waiting on, so it is
//! never retried here: any transport failure or non-2xx response is a
//! `GatewayError` surfaced to the caller. Webhooks failing signature
//! verification are rejected before any payload field is read.

pub mod config;
pub mod client;
pub mod signature;
pub mod webhook;
pub mod error;

pub use config::PesepayConfig;
pub use client::{InitiatePaymentRequest, InitiatedPayment, PesepayClient, TransactionStatus};
pub use signature::{compute_signature, verify_signature};
pub use webhook::WebhookPayload;
pub use error::GatewayError;
