//! Transfer Domain - Player Movement Between Clubs
//!
//! The Transfer aggregate is the consistency boundary for moving a player
//! from one club to another. A transfer advances through a linear state
//! machine gated by club approval, fee settlement, and federation review.
//!
//! # State Machine
//!
//! ```text
//! requested ─┬─> pending_from_club ──> pending_payment ──> pending_zifa_review ──> completed
//!            └─────────(free agent)──────────^
//! any non-terminal ──> rejected | cancelled
//! ```
//!
//! # Invariants
//!
//! - Transitions are strictly forward except explicit reject/cancel
//! - `completed` is terminal and carries the player's club reassignment
//!   plus a new tenure-history record
//! - A transfer may only be initiated inside a configured transfer window

pub mod transfer;
pub mod window;
pub mod history;
pub mod events;
pub mod error;

pub use transfer::{
    Transfer, TransferCompletion, TransferStatus, TransferType, transfer_reference,
};
pub use window::{MonthDay, TransferWindow, TransferWindows};
pub use history::TenureRecord;
pub use events::TransferEvent;
pub use error::TransferError;
