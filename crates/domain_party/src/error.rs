//! Party domain errors

use thiserror::Error;

/// Errors that can occur in the party domain
#[derive(Debug, Error)]
pub enum PartyError {
    /// Status string in storage does not match any known variant
    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    /// Operation not permitted for the entity's current status
    #[error("Cannot {operation}: status is '{status}'")]
    IneligibleStatus {
        operation: &'static str,
        status: &'static str,
    },

    /// Player not found
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    /// Club not found
    #[error("Club not found: {0}")]
    ClubNotFound(String),
}
