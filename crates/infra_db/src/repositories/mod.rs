//! Repository implementations
//!
//! One repository per aggregate family. Methods that advance a state
//! machine run the full read-transition-write cycle inside a single
//! transaction.

pub mod party;
pub mod billing;
pub mod transfer;
pub mod registration;
pub mod sync_queue;
