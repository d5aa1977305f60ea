//! Registration domain errors

use thiserror::Error;

/// Errors that can occur in the registration domain
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Status string in storage does not match any known variant
    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    /// Requested transition is not valid from the current status
    #[error("Invalid transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// Registration not found
    #[error("Registration not found: {0}")]
    NotFound(String),

    /// Affiliation not found
    #[error("Affiliation not found: {0}")]
    AffiliationNotFound(String),
}

impl RegistrationError {
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        RegistrationError::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }
}
