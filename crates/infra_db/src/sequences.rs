//! Transactional reference sequences
//!
//! Reference numbers (TRF-, INV-, RCP-, registration prefixes) are
//! allocated from a per-scope, per-day counter row. The upsert below is
//! atomic under concurrent writers: each caller gets a distinct value,
//! unlike the count-rows-then-format pattern it replaces. Allocations
//! participate in the caller's transaction, so an aborted workflow may
//! leave gaps but never duplicates.

use chrono::NaiveDate;
use sqlx::PgConnection;
use sqlx::Row;

use crate::error::DatabaseError;

/// Sequence scopes in use
pub mod scope {
    pub const INVOICE: &str = "invoice";
    pub const RECEIPT: &str = "receipt";
    pub const TRANSFER: &str = "transfer";
    pub const REGISTRATION_PLAYER: &str = "registration_player";
    pub const REGISTRATION_CLUB: &str = "registration_club";
    pub const REGISTRATION_OFFICIAL: &str = "registration_official";
    pub const REGISTRATION_REFEREE: &str = "registration_referee";
}

/// Allocates the next value for a scope on a given day
///
/// Runs on the caller's connection so the allocation commits or rolls
/// back with the surrounding workflow.
pub async fn next_value(
    conn: &mut PgConnection,
    scope: &str,
    date: NaiveDate,
) -> Result<i64, DatabaseError> {
    let row = sqlx::query(
        r#"
        INSERT INTO reference_sequences (scope, seq_date, value)
        VALUES ($1, $2, 1)
        ON CONFLICT (scope, seq_date)
        DO UPDATE SET value = reference_sequences.value + 1
        RETURNING value
        "#,
    )
    .bind(scope)
    .bind(date)
    .fetch_one(conn)
    .await?;

    let value: i64 = row.try_get("value")?;
    Ok(value)
}
