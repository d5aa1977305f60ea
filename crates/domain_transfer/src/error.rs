//! Transfer domain errors

use thiserror::Error;

/// Errors that can occur in the transfer domain
#[derive(Debug, Error)]
pub enum TransferError {
    /// Player status does not permit a transfer
    #[error("Player is not eligible for transfer (status: {status})")]
    IneligiblePlayer { status: &'static str },

    /// Destination equals the player's current club
    #[error("Player is already at the destination club")]
    DuplicateClub,

    /// No transfer window contains today
    #[error("Transfer window is closed")]
    WindowClosed,

    /// Requested transition is not valid from the current status
    #[error("Invalid transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// Rejection requires a non-empty reason
    #[error("A rejection reason is required")]
    ReasonRequired,

    /// Window configuration is unusable
    #[error("Invalid transfer window configuration")]
    InvalidWindowConfig,

    /// Status string in storage does not match any known variant
    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    /// Type string in storage does not match any known variant
    #[error("Unknown transfer type: {0}")]
    UnknownType(String),

    /// Transfer not found
    #[error("Transfer not found: {0}")]
    NotFound(String),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}
