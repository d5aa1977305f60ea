//! Registration Domain - Registrations, Affiliations, and Invoicing
//!
//! The producer feeding the billing and transfer state machines: given an
//! entity and the fee schedule, this crate creates Registration or
//! Affiliation records plus their companion invoices. No business logic
//! beyond fee lookup and number formatting.

pub mod registration;
pub mod affiliation;
pub mod fees;
pub mod service;
pub mod error;

pub use registration::{Registration, RegistrationStatus, registration_number};
pub use affiliation::{Affiliation, AffiliationStatus, PaymentState};
pub use fees::FeeSchedule;
pub use service::RegistrationService;
pub use error::RegistrationError;
