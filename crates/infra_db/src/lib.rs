//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the federation
//! platform, implementing the repository pattern on SQLx.
//!
//! # Transactional workflows
//!
//! Every state transition that touches multiple rows runs inside one
//! database transaction:
//!
//! - payment settlement locks the payment row, recomputes the invoice's
//!   paid total, and applies the post-payment entity effect
//! - transfer completion updates the transfer, reassigns the player, and
//!   rewrites the tenure history together
//! - reference numbers come from a per-day counter table updated with
//!   `INSERT ... ON CONFLICT ... RETURNING`, so concurrent allocations
//!   can never collide
//!
//! Domain crates supply the pure transition logic; this crate supplies
//! the rows and the atomicity.

pub mod pool;
pub mod error;
pub mod sequences;
pub mod repositories;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::{DatabaseError, WorkflowError};
pub use repositories::billing::{BillingRepository, SettlementReport};
pub use repositories::party::PartyRepository;
pub use repositories::registration::RegistrationRepository;
pub use repositories::sync_queue::SyncQueueRepository;
pub use repositories::transfer::{NewTransferRequest, TransferRepository};
