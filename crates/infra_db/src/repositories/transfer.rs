//! Transfer repository
//!
//! Database access for transfers and tenure history, including the
//! initiation and completion workflows.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use core_kernel::{ClubId, Currency, Money, PlayerId, TransferId, UserId};
use domain_party::Player;
use domain_registration::RegistrationService;
use domain_transfer::{
    transfer_reference, Transfer, TransferCompletion, TransferError, TransferStatus,
    TransferType, TransferWindows,
};

use crate::error::{DatabaseError, WorkflowError};
use crate::repositories::billing::insert_invoice;
use crate::repositories::party::reassign_player_club;
use crate::sequences::{self, scope};

/// Parameters for initiating a transfer
#[derive(Debug, Clone)]
pub struct NewTransferRequest {
    pub to_club_id: ClubId,
    pub transfer_type: TransferType,
    pub transfer_fee: Money,
    pub notes: Option<String>,
    pub requested_by: UserId,
}

#[derive(sqlx::FromRow)]
struct TransferRow {
    id: Uuid,
    transfer_reference: String,
    player_id: Uuid,
    from_club_id: Option<Uuid>,
    to_club_id: Uuid,
    transfer_type: String,
    transfer_window: String,
    status: String,
    transfer_fee_cents: i64,
    admin_fee_cents: i64,
    currency: String,
    requested_by: Uuid,
    from_club_approved_by: Option<Uuid>,
    from_club_approved_at: Option<DateTime<Utc>>,
    zifa_approved_by: Option<Uuid>,
    zifa_approved_at: Option<DateTime<Utc>>,
    effective_date: Option<NaiveDate>,
    notes: Option<String>,
    rejection_reason: Option<String>,
    certificate_reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TransferRow {
    fn into_domain(self) -> Result<Transfer, DatabaseError> {
        let currency = Currency::from_code(&self.currency)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let transfer = Transfer {
            id: TransferId::from_uuid(self.id),
            transfer_reference: self.transfer_reference,
            player_id: PlayerId::from_uuid(self.player_id),
            from_club_id: self.from_club_id.map(ClubId::from_uuid),
            to_club_id: ClubId::from_uuid(self.to_club_id),
            transfer_type: TransferType::parse(&self.transfer_type)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            transfer_window: self.transfer_window,
            status: TransferStatus::parse(&self.status)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            transfer_fee: Money::from_minor(self.transfer_fee_cents, currency),
            admin_fee: Money::from_minor(self.admin_fee_cents, currency),
            requested_by: UserId::from_uuid(self.requested_by),
            from_club_approved_by: self.from_club_approved_by.map(UserId::from_uuid),
            from_club_approved_at: self.from_club_approved_at,
            zifa_approved_by: self.zifa_approved_by.map(UserId::from_uuid),
            zifa_approved_at: self.zifa_approved_at,
            effective_date: self.effective_date,
            notes: self.notes,
            rejection_reason: self.rejection_reason,
            certificate_reference: self.certificate_reference,
            created_at: self.created_at,
            updated_at: self.updated_at,
            events: Vec::new(),
        };
        Ok(transfer)
    }
}

const SELECT_TRANSFER: &str = r#"
    SELECT id, transfer_reference, player_id, from_club_id, to_club_id,
           transfer_type, transfer_window, status, transfer_fee_cents,
           admin_fee_cents, currency, requested_by, from_club_approved_by,
           from_club_approved_at, zifa_approved_by, zifa_approved_at,
           effective_date, notes, rejection_reason, certificate_reference,
           created_at, updated_at
    FROM transfers
"#;

/// Repository for transfers and tenure history
#[derive(Debug, Clone)]
pub struct TransferRepository {
    pool: PgPool,
}

impl TransferRepository {
    /// Creates a new TransferRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches a transfer by id
    pub async fn get_transfer(&self, id: TransferId) -> Result<Transfer, DatabaseError> {
        let row: Option<TransferRow> =
            sqlx::query_as(&format!("{SELECT_TRANSFER} WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| DatabaseError::not_found("Transfer", id))?
            .into_domain()
    }

    /// Initiates a transfer, allocating its reference and creating the
    /// fee invoice in the same transaction
    ///
    /// The admin fee comes from the service's fee schedule by transfer
    /// type; when admin + transfer fee is zero no invoice row is created.
    ///
    /// # Errors
    ///
    /// Domain preconditions (`IneligiblePlayer`, `DuplicateClub`,
    /// `WindowClosed`) surface unchanged.
    pub async fn initiate_transfer(
        &self,
        player: &Player,
        request: NewTransferRequest,
        windows: &TransferWindows,
        service: &RegistrationService,
    ) -> Result<Transfer, WorkflowError> {
        let today = windows.today();
        let mut tx = self.pool.begin().await?;

        let seq = sequences::next_value(&mut *tx, scope::TRANSFER, today).await?;
        let reference = transfer_reference(today, seq);

        let admin_fee = service.fees().transfer_admin_fee(request.transfer_type);
        let mut transfer = Transfer::initiate(
            reference,
            player,
            request.to_club_id,
            request.transfer_type,
            request.transfer_fee,
            admin_fee,
            request.notes,
            request.requested_by,
            windows,
        )?;

        sqlx::query(
            r#"
            INSERT INTO transfers (
                id, transfer_reference, player_id, from_club_id, to_club_id,
                transfer_type, transfer_window, status, transfer_fee_cents,
                admin_fee_cents, currency, requested_by, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(transfer.id.as_uuid())
        .bind(&transfer.transfer_reference)
        .bind(transfer.player_id.as_uuid())
        .bind(transfer.from_club_id.map(|id| *id.as_uuid()))
        .bind(transfer.to_club_id.as_uuid())
        .bind(transfer.transfer_type.as_str())
        .bind(&transfer.transfer_window)
        .bind(transfer.status.as_str())
        .bind(transfer.transfer_fee.to_minor())
        .bind(transfer.admin_fee.to_minor())
        .bind(transfer.transfer_fee.currency().code())
        .bind(transfer.requested_by.as_uuid())
        .bind(&transfer.notes)
        .bind(transfer.created_at)
        .bind(transfer.updated_at)
        .execute(&mut *tx)
        .await?;

        let invoice_seq = sequences::next_value(&mut *tx, scope::INVOICE, today).await?;
        let invoice_number = domain_billing::numbering::invoice_number(today, invoice_seq);
        if let Some(invoice) = service.create_transfer_invoice(&transfer, invoice_number, today) {
            insert_invoice(&mut *tx, &invoice).await?;
        }

        tx.commit().await?;

        tracing::info!(
            reference = %transfer.transfer_reference,
            player = %transfer.player_id,
            status = transfer.status.as_str(),
            "transfer initiated"
        );

        transfer.take_events();
        Ok(transfer)
    }

    /// Releasing club approves the player's departure
    pub async fn approve_by_club(
        &self,
        id: TransferId,
        approver: UserId,
    ) -> Result<Transfer, WorkflowError> {
        self.transition(id, |transfer| transfer.approve_by_club(approver))
            .await
    }

    /// Rejects a transfer with a reason
    pub async fn reject(
        &self,
        id: TransferId,
        reason: &str,
        rejected_by: UserId,
    ) -> Result<Transfer, WorkflowError> {
        self.transition(id, |transfer| transfer.reject(reason, rejected_by))
            .await
    }

    /// Withdraws a transfer
    pub async fn cancel(
        &self,
        id: TransferId,
        cancelled_by: UserId,
    ) -> Result<Transfer, WorkflowError> {
        self.transition(id, |transfer| transfer.cancel(cancelled_by))
            .await
    }

    /// Federation approval: the terminal transition
    ///
    /// One transaction applies, in order: the transfer's completion, the
    /// player's club reassignment, closing the open tenure record, and
    /// opening the new one. A zero-fee transfer still parked in
    /// `pending_payment` (no invoice was ever raised) is advanced through
    /// the fee-paid stage first.
    ///
    /// The returned completion tells the caller whether an international
    /// sync must be enqueued; that enqueue is best-effort and happens
    /// after this transaction commits.
    pub async fn approve_by_zifa(
        &self,
        id: TransferId,
        approver: UserId,
    ) -> Result<(Transfer, TransferCompletion), WorkflowError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<TransferRow> =
            sqlx::query_as(&format!("{SELECT_TRANSFER} WHERE id = $1 FOR UPDATE"))
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        let mut transfer = row
            .ok_or_else(|| DatabaseError::not_found("Transfer", id))?
            .into_domain()?;

        // Zero-fee fast path: nothing was invoiced, so no settlement will
        // ever advance this transfer out of pending_payment
        if transfer.status == TransferStatus::PendingPayment
            && !transfer.total_fees()?.is_positive()
        {
            transfer.mark_fee_paid()?;
        }

        let completion = transfer.approve_by_zifa(approver)?;

        sqlx::query(
            r#"
            UPDATE transfers
            SET status = $2, zifa_approved_by = $3, zifa_approved_at = $4,
                effective_date = $5, certificate_reference = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(transfer.id.as_uuid())
        .bind(transfer.status.as_str())
        .bind(transfer.zifa_approved_by.map(|id| *id.as_uuid()))
        .bind(transfer.zifa_approved_at)
        .bind(transfer.effective_date)
        .bind(&transfer.certificate_reference)
        .bind(transfer.updated_at)
        .execute(&mut *tx)
        .await?;

        reassign_player_club(
            &mut *tx,
            *completion.player_id.as_uuid(),
            *completion.to_club_id.as_uuid(),
        )
        .await?;

        // Close the open tenure record, then open the new one
        sqlx::query(
            r#"
            UPDATE transfer_history SET left_date = $2
            WHERE player_id = $1 AND left_date IS NULL
            "#,
        )
        .bind(completion.player_id.as_uuid())
        .bind(completion.effective_date)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO transfer_history (
                id, player_id, club_id, joined_date, transfer_type, transfer_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(completion.player_id.as_uuid())
        .bind(completion.to_club_id.as_uuid())
        .bind(completion.effective_date)
        .bind(completion.transfer_type.as_str())
        .bind(completion.transfer_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            reference = %transfer.transfer_reference,
            player = %completion.player_id,
            to_club = %completion.to_club_id,
            "transfer completed"
        );

        transfer.take_events();
        Ok((transfer, completion))
    }

    /// Number of open tenure records for a player (0 or 1 when history is
    /// consistent)
    pub async fn open_tenure_count(&self, player_id: PlayerId) -> Result<i64, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*)::BIGINT AS open_count FROM transfer_history
            WHERE player_id = $1 AND left_date IS NULL
            "#,
        )
        .bind(player_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("open_count")?;
        Ok(count)
    }

    /// Loads a transfer, applies a domain transition, and persists the
    /// mutable columns, all under a row lock
    async fn transition<F>(&self, id: TransferId, apply: F) -> Result<Transfer, WorkflowError>
    where
        F: FnOnce(&mut Transfer) -> Result<(), TransferError>,
    {
        let mut tx = self.pool.begin().await?;

        let row: Option<TransferRow> =
            sqlx::query_as(&format!("{SELECT_TRANSFER} WHERE id = $1 FOR UPDATE"))
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        let mut transfer = row
            .ok_or_else(|| DatabaseError::not_found("Transfer", id))?
            .into_domain()?;

        apply(&mut transfer)?;

        sqlx::query(
            r#"
            UPDATE transfers
            SET status = $2, from_club_approved_by = $3, from_club_approved_at = $4,
                rejection_reason = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(transfer.id.as_uuid())
        .bind(transfer.status.as_str())
        .bind(transfer.from_club_approved_by.map(|id| *id.as_uuid()))
        .bind(transfer.from_club_approved_at)
        .bind(&transfer.rejection_reason)
        .bind(transfer.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        transfer.take_events();
        Ok(transfer)
    }
}
