//! Core Kernel - Foundational types and utilities for the federation platform
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - The billed-entity sum type linking invoices to the records they bill

pub mod money;
pub mod identifiers;
pub mod entity;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{
    PlayerId, ClubId, UserId, TransferId, InvoiceId, PaymentId,
    RegistrationId, AffiliationId, FineId,
};
pub use entity::{BilledEntity, RegistrantKind};
pub use error::CoreError;
