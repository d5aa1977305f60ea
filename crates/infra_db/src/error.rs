//! Database error types
//!
//! This module defines the error types that can occur during database
//! operations, plus the combined error type returned by transactional
//! workflows that also run domain transitions.

use thiserror::Error;

use core_kernel::CoreError;
use domain_billing::BillingError;
use domain_party::PartyError;
use domain_registration::RegistrationError;
use domain_transfer::TransferError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Generic SQL error
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
///
/// Maps the PostgreSQL error code to the matching variant.
/// https://www.postgresql.org/docs/current/errcodes-appendix.html
pub fn classify_sqlx_error(error: sqlx::Error) -> DatabaseError {
    match &error {
        sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
        sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                    "23503" => DatabaseError::ForeignKeyViolation(db_err.message().to_string()),
                    "23514" => DatabaseError::ConstraintViolation(db_err.message().to_string()),
                    _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                }
            } else {
                DatabaseError::QueryFailed(db_err.message().to_string())
            }
        }
        _ => DatabaseError::SqlError(error),
    }
}

/// Combined error for transactional workflows
///
/// Workflows load rows, run domain transitions, and persist the result;
/// either side can fail and the caller needs to tell them apart for
/// status-code mapping.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Party(#[from] PartyError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<sqlx::Error> for WorkflowError {
    fn from(error: sqlx::Error) -> Self {
        WorkflowError::Database(classify_sqlx_error(error))
    }
}

impl WorkflowError {
    /// Whether the failure is a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WorkflowError::Database(DatabaseError::NotFound(_))
                | WorkflowError::Billing(BillingError::InvoiceNotFound(_))
                | WorkflowError::Billing(BillingError::PaymentNotFound(_))
                | WorkflowError::Transfer(TransferError::NotFound(_))
                | WorkflowError::Party(PartyError::PlayerNotFound(_))
                | WorkflowError::Party(PartyError::ClubNotFound(_))
                | WorkflowError::Registration(RegistrationError::NotFound(_))
        )
    }

    /// Whether the failure is a domain-state conflict (wrong status for
    /// the requested transition)
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            WorkflowError::Billing(BillingError::InvalidTransition { .. })
                | WorkflowError::Billing(BillingError::NotPayable(_))
                | WorkflowError::Transfer(TransferError::InvalidTransition { .. })
                | WorkflowError::Transfer(TransferError::IneligiblePlayer { .. })
                | WorkflowError::Transfer(TransferError::DuplicateClub)
                | WorkflowError::Transfer(TransferError::WindowClosed)
                | WorkflowError::Transfer(TransferError::ReasonRequired)
                | WorkflowError::Registration(RegistrationError::InvalidTransition { .. })
                | WorkflowError::Party(PartyError::IneligibleStatus { .. })
        )
    }
}
