//! FIFA sync queue
//!
//! Fire-and-forget enqueue of external federation sync tasks. An external
//! worker (out of scope here) drains the table, honoring the attempt
//! counter and next-attempt timestamp. Enqueue failures are the caller's
//! to log; they must never roll back the transaction that produced the
//! work.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for the external sync queue
#[derive(Debug, Clone)]
pub struct SyncQueueRepository {
    pool: PgPool,
}

impl SyncQueueRepository {
    /// Creates a new SyncQueueRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enqueues a sync task
    ///
    /// # Arguments
    ///
    /// * `entity_kind` - e.g. "transfer", "player"
    /// * `entity_id` - the record to sync
    /// * `action` - e.g. "create", "update"
    pub async fn enqueue(
        &self,
        entity_kind: &str,
        entity_id: Uuid,
        action: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO fifa_sync_queue (
                id, entity_kind, entity_id, action, status, attempts,
                next_attempt_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, 'pending', 0, $5, $5, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entity_kind)
        .bind(entity_id)
        .bind(action)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
