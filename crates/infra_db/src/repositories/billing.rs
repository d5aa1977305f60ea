//! Billing repository
//!
//! Database access for invoices and payments, including the settlement
//! workflow. Settlement is the one path with real concurrency exposure:
//! the gateway retries webhooks and a status poll can race a webhook, so
//! the payment row is locked and the idempotency check happens inside
//! the same transaction that performs the settlement.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use core_kernel::{BilledEntity, Currency, InvoiceId, Money, PaymentId, UserId};
use domain_billing::{
    apply_gateway_outcome, numbering, settle_invoice, BillingError, Gateway, GatewayOutcome,
    Invoice, InvoiceCategory, InvoiceStatus, InvoiceTransition, Payment, PaymentStatus,
    PaymentTransition, PostPaymentEffect,
};

use crate::error::{DatabaseError, WorkflowError};
use crate::sequences::{self, scope};

/// Result of running a gateway verdict through the settlement workflow
#[derive(Debug)]
pub struct SettlementReport {
    /// The payment after the workflow
    pub payment: Payment,
    /// What happened to the payment row
    pub payment_transition: PaymentTransition,
    /// What happened to the invoice row, when settlement reached it
    pub invoice_transition: Option<InvoiceTransition>,
}

impl SettlementReport {
    /// Whether the webhook was a duplicate of an already-processed one
    pub fn already_processed(&self) -> bool {
        self.payment_transition == PaymentTransition::AlreadySettled
    }
}

#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    invoice_number: String,
    entity_kind: String,
    entity_id: Uuid,
    description: String,
    category: String,
    amount_cents: i64,
    currency: String,
    status: String,
    due_date: NaiveDate,
    paid_date: Option<NaiveDate>,
    issued_to_club_id: Option<Uuid>,
    issued_to_user_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_domain(self) -> Result<Invoice, DatabaseError> {
        let currency = Currency::from_code(&self.currency)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        Ok(Invoice {
            id: InvoiceId::from_uuid(self.id),
            invoice_number: self.invoice_number,
            entity: BilledEntity::from_columns(&self.entity_kind, self.entity_id)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            description: self.description,
            category: InvoiceCategory::parse(&self.category)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            amount: Money::from_minor(self.amount_cents, currency),
            status: InvoiceStatus::parse(&self.status)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            due_date: self.due_date,
            paid_date: self.paid_date,
            issued_to_club_id: self.issued_to_club_id.map(Into::into),
            issued_to_user_id: self.issued_to_user_id.map(Into::into),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    invoice_id: Uuid,
    payment_reference: String,
    amount_cents: i64,
    currency: String,
    status: String,
    gateway: String,
    gateway_method: Option<String>,
    gateway_reference: Option<String>,
    gateway_transaction_id: Option<String>,
    receipt_number: Option<String>,
    initiated_by: Option<Uuid>,
    initiated_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_domain(self) -> Result<Payment, DatabaseError> {
        let currency = Currency::from_code(&self.currency)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        Ok(Payment {
            id: PaymentId::from_uuid(self.id),
            invoice_id: InvoiceId::from_uuid(self.invoice_id),
            payment_reference: self.payment_reference,
            amount: Money::from_minor(self.amount_cents, currency),
            status: PaymentStatus::parse(&self.status)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            gateway: Gateway::parse(&self.gateway)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            gateway_method: self.gateway_method,
            gateway_reference: self.gateway_reference,
            gateway_transaction_id: self.gateway_transaction_id,
            receipt_number: self.receipt_number,
            initiated_by: self.initiated_by.map(UserId::from_uuid),
            initiated_at: self.initiated_at,
            paid_at: self.paid_at,
            created_at: self.created_at,
        })
    }
}

const SELECT_INVOICE: &str = r#"
    SELECT id, invoice_number, entity_kind, entity_id, description, category,
           amount_cents, currency, status, due_date, paid_date,
           issued_to_club_id, issued_to_user_id, created_at, updated_at
    FROM invoices
"#;

const SELECT_PAYMENT: &str = r#"
    SELECT id, invoice_id, payment_reference, amount_cents, currency, status,
           gateway, gateway_method, gateway_reference, gateway_transaction_id,
           receipt_number, initiated_by, initiated_at, paid_at, created_at
    FROM payments
"#;

/// Repository for invoices and payments
#[derive(Debug, Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    /// Creates a new BillingRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an invoice
    pub async fn create_invoice(&self, invoice: &Invoice) -> Result<(), DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        insert_invoice(&mut conn, invoice).await
    }

    /// Fetches an invoice by id
    pub async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, DatabaseError> {
        let row: Option<InvoiceRow> =
            sqlx::query_as(&format!("{SELECT_INVOICE} WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| DatabaseError::not_found("Invoice", id))?
            .into_domain()
    }

    /// Sum of the invoice's settled payments
    pub async fn invoice_paid_total(&self, id: InvoiceId) -> Result<Money, DatabaseError> {
        let invoice = self.get_invoice(id).await?;
        let mut conn = self.pool.acquire().await?;
        paid_total(&mut conn, id.as_uuid(), invoice.amount.currency()).await
    }

    /// Fetches a payment by id
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, DatabaseError> {
        let row: Option<PaymentRow> =
            sqlx::query_as(&format!("{SELECT_PAYMENT} WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| DatabaseError::not_found("Payment", id))?
            .into_domain()
    }

    /// Finds a payment by its gateway reference
    pub async fn find_payment_by_gateway_reference(
        &self,
        gateway_reference: &str,
    ) -> Result<Option<Payment>, DatabaseError> {
        let row: Option<PaymentRow> =
            sqlx::query_as(&format!("{SELECT_PAYMENT} WHERE gateway_reference = $1"))
                .bind(gateway_reference)
                .fetch_optional(&self.pool)
                .await?;

        row.map(PaymentRow::into_domain).transpose()
    }

    /// Creates a payment record for an invoice's outstanding balance
    ///
    /// The invoice row is locked while the balance is computed so two
    /// concurrent initiations cannot both bill the full balance. The
    /// returned payment is `initiated`; the caller submits it to the
    /// gateway and records the outcome with
    /// [`record_gateway_acceptance`](Self::record_gateway_acceptance) or
    /// [`record_gateway_failure`](Self::record_gateway_failure).
    ///
    /// # Errors
    ///
    /// `BillingError::NotPayable` when the invoice is already paid,
    /// cancelled, or has no outstanding balance.
    pub async fn begin_payment(
        &self,
        invoice_id: InvoiceId,
        gateway_method: &str,
        initiated_by: UserId,
    ) -> Result<(Payment, Invoice), WorkflowError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<InvoiceRow> =
            sqlx::query_as(&format!("{SELECT_INVOICE} WHERE id = $1 FOR UPDATE"))
                .bind(invoice_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        let invoice = row
            .ok_or_else(|| DatabaseError::not_found("Invoice", invoice_id))?
            .into_domain()?;

        if !invoice.status.is_payable() {
            return Err(BillingError::NotPayable(invoice.invoice_number.clone()).into());
        }

        let total = paid_total(&mut *tx, invoice_id.as_uuid(), invoice.amount.currency()).await?;
        let balance = invoice.balance(total)?;
        if !balance.is_positive() {
            return Err(BillingError::NotPayable(invoice.invoice_number.clone()).into());
        }

        let payment = Payment::new(
            invoice.id,
            numbering::payment_reference(Utc::now().date_naive()),
            balance,
            Gateway::Pesepay,
        )
        .with_method(gateway_method)
        .initiated_by(initiated_by);

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, invoice_id, payment_reference, amount_cents, currency, status,
                gateway, gateway_method, initiated_by, initiated_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.invoice_id.as_uuid())
        .bind(&payment.payment_reference)
        .bind(payment.amount.to_minor())
        .bind(payment.amount.currency().code())
        .bind(payment.status.as_str())
        .bind(payment.gateway.as_str())
        .bind(&payment.gateway_method)
        .bind(payment.initiated_by.map(|id| *id.as_uuid()))
        .bind(payment.initiated_at)
        .bind(payment.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((payment, invoice))
    }

    /// Records the gateway's acceptance of an initiated payment
    pub async fn record_gateway_acceptance(
        &self,
        payment_id: PaymentId,
        gateway_reference: &str,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET gateway_reference = $2, status = 'pending'
            WHERE id = $1 AND status = 'initiated'
            "#,
        )
        .bind(payment_id.as_uuid())
        .bind(gateway_reference)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Payment", payment_id));
        }
        Ok(())
    }

    /// Marks an initiated payment failed after a gateway error
    ///
    /// The row is kept as the audit trail of the attempt.
    pub async fn record_gateway_failure(
        &self,
        payment_id: PaymentId,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE payments SET status = 'failed' WHERE id = $1 AND status = 'initiated'",
        )
        .bind(payment_id.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Settles a payment from a gateway verdict (webhook or poll)
    ///
    /// One transaction end to end:
    ///
    /// 1. lock the payment row by gateway reference (`FOR UPDATE`)
    /// 2. apply the verdict; an already-paid payment short-circuits here,
    ///    which is the only defense against duplicate webhook deliveries
    /// 3. on settlement, lock the invoice, recompute the paid total over
    ///    `paid` payments, and move the invoice to paid/partial
    /// 4. on full payment, apply the entity-specific post-payment effect
    ///
    /// # Errors
    ///
    /// `DatabaseError::NotFound` when the gateway reference is unknown
    /// (the webhook handler turns this into a 404 so the gateway stops
    /// retrying).
    pub async fn settle_from_gateway(
        &self,
        gateway_reference: &str,
        outcome: GatewayOutcome,
    ) -> Result<SettlementReport, WorkflowError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "{SELECT_PAYMENT} WHERE gateway_reference = $1 FOR UPDATE"
        ))
        .bind(gateway_reference)
        .fetch_optional(&mut *tx)
        .await?;
        let mut payment = row
            .ok_or_else(|| DatabaseError::not_found("Payment", gateway_reference))?
            .into_domain()?;

        // Receipt numbers are only consumed on an actual settlement
        let receipt_number = match &outcome {
            GatewayOutcome::Success { .. } if !payment.is_paid() => {
                let seq =
                    sequences::next_value(&mut *tx, scope::RECEIPT, now.date_naive()).await?;
                numbering::receipt_number(now.date_naive(), seq)
            }
            _ => String::new(),
        };

        let payment_transition =
            apply_gateway_outcome(&mut payment, outcome, &receipt_number, now)?;

        if matches!(
            payment_transition,
            PaymentTransition::Settled | PaymentTransition::Failed
        ) {
            sqlx::query(
                r#"
                UPDATE payments
                SET status = $2, paid_at = $3, gateway_transaction_id = $4,
                    receipt_number = $5
                WHERE id = $1
                "#,
            )
            .bind(payment.id.as_uuid())
            .bind(payment.status.as_str())
            .bind(payment.paid_at)
            .bind(&payment.gateway_transaction_id)
            .bind(&payment.receipt_number)
            .execute(&mut *tx)
            .await?;
        }

        let invoice_transition = if payment_transition == PaymentTransition::Settled {
            Some(self.settle_owning_invoice(&mut tx, &payment, now).await?)
        } else {
            None
        };

        tx.commit().await?;

        tracing::info!(
            gateway_reference = %gateway_reference,
            payment = %payment.payment_reference,
            transition = ?payment_transition,
            "gateway verdict applied"
        );

        Ok(SettlementReport {
            payment,
            payment_transition,
            invoice_transition,
        })
    }

    /// Settles the invoice owning a just-settled payment (same transaction)
    async fn settle_owning_invoice(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        payment: &Payment,
        now: DateTime<Utc>,
    ) -> Result<InvoiceTransition, WorkflowError> {
        let row: Option<InvoiceRow> =
            sqlx::query_as(&format!("{SELECT_INVOICE} WHERE id = $1 FOR UPDATE"))
                .bind(payment.invoice_id.as_uuid())
                .fetch_optional(&mut **tx)
                .await?;
        let mut invoice = row
            .ok_or_else(|| DatabaseError::not_found("Invoice", payment.invoice_id))?
            .into_domain()?;

        let total = paid_total(
            &mut **tx,
            invoice.id.as_uuid(),
            invoice.amount.currency(),
        )
        .await?;

        let transition = settle_invoice(&mut invoice, total, now)?;

        if !matches!(transition, InvoiceTransition::Unchanged) {
            sqlx::query(
                "UPDATE invoices SET status = $2, paid_date = $3, updated_at = $4 WHERE id = $1",
            )
            .bind(invoice.id.as_uuid())
            .bind(invoice.status.as_str())
            .bind(invoice.paid_date)
            .bind(invoice.updated_at)
            .execute(&mut **tx)
            .await?;
        }

        if let InvoiceTransition::Paid {
            effect: Some(effect),
        } = &transition
        {
            apply_post_payment_effect(&mut **tx, effect).await?;
        }

        Ok(transition)
    }

    /// Cancels an unpaid invoice
    pub async fn cancel_invoice(&self, id: InvoiceId) -> Result<Invoice, WorkflowError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<InvoiceRow> =
            sqlx::query_as(&format!("{SELECT_INVOICE} WHERE id = $1 FOR UPDATE"))
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        let mut invoice = row
            .ok_or_else(|| DatabaseError::not_found("Invoice", id))?
            .into_domain()?;

        invoice.cancel()?;

        sqlx::query("UPDATE invoices SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(invoice.id.as_uuid())
            .bind(invoice.status.as_str())
            .bind(invoice.updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(invoice)
    }

    /// Flags every invoice past its due date as overdue
    ///
    /// Returns the number of invoices flagged. Reminder notifications are
    /// dispatched elsewhere.
    pub async fn mark_overdue_invoices(&self, today: NaiveDate) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices SET status = 'overdue', updated_at = NOW()
            WHERE due_date < $1 AND status IN ('sent', 'pending', 'partial')
            "#,
        )
        .bind(today)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Refunds a settled payment and re-derives the invoice status
    pub async fn refund_payment(&self, payment_id: PaymentId) -> Result<Payment, WorkflowError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<PaymentRow> =
            sqlx::query_as(&format!("{SELECT_PAYMENT} WHERE id = $1 FOR UPDATE"))
                .bind(payment_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        let mut payment = row
            .ok_or_else(|| DatabaseError::not_found("Payment", payment_id))?
            .into_domain()?;

        payment.refund()?;

        sqlx::query("UPDATE payments SET status = $2 WHERE id = $1")
            .bind(payment.id.as_uuid())
            .bind(payment.status.as_str())
            .execute(&mut *tx)
            .await?;

        // Re-derive the invoice status from what remains settled
        let invoice_row: Option<InvoiceRow> =
            sqlx::query_as(&format!("{SELECT_INVOICE} WHERE id = $1 FOR UPDATE"))
                .bind(payment.invoice_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        let invoice = invoice_row
            .ok_or_else(|| DatabaseError::not_found("Invoice", payment.invoice_id))?
            .into_domain()?;

        let total = paid_total(&mut *tx, invoice.id.as_uuid(), invoice.amount.currency()).await?;
        let status = if total.is_positive() {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Refunded
        };

        sqlx::query(
            "UPDATE invoices SET status = $2, paid_date = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(invoice.id.as_uuid())
        .bind(status.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(payment)
    }
}

/// Inserts an invoice on an open connection (joins the caller's transaction)
pub(crate) async fn insert_invoice(
    conn: &mut PgConnection,
    invoice: &Invoice,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO invoices (
            id, invoice_number, entity_kind, entity_id, description, category,
            amount_cents, currency, status, due_date, paid_date,
            issued_to_club_id, issued_to_user_id, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(invoice.id.as_uuid())
    .bind(&invoice.invoice_number)
    .bind(invoice.entity.kind())
    .bind(invoice.entity.entity_uuid())
    .bind(&invoice.description)
    .bind(invoice.category.as_str())
    .bind(invoice.amount.to_minor())
    .bind(invoice.amount.currency().code())
    .bind(invoice.status.as_str())
    .bind(invoice.due_date)
    .bind(invoice.paid_date)
    .bind(invoice.issued_to_club_id.map(|id| *id.as_uuid()))
    .bind(invoice.issued_to_user_id.map(|id| *id.as_uuid()))
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Sum over an invoice's `paid` payments, in the invoice currency
async fn paid_total(
    conn: &mut PgConnection,
    invoice_id: &Uuid,
    currency: Currency,
) -> Result<Money, DatabaseError> {
    let row = sqlx::query(
        r#"
        SELECT COALESCE(SUM(amount_cents), 0)::BIGINT AS total
        FROM payments
        WHERE invoice_id = $1 AND status = 'paid'
        "#,
    )
    .bind(invoice_id)
    .fetch_one(conn)
    .await?;

    let total: i64 = row.try_get("total")?;
    Ok(Money::from_minor(total, currency))
}

/// Applies the entity-specific effect of a fully settled invoice
///
/// Runs on the settlement transaction. Each arm is a guarded update: a
/// second settlement of the same invoice finds the guard already
/// consumed and does nothing.
async fn apply_post_payment_effect(
    conn: &mut PgConnection,
    effect: &PostPaymentEffect,
) -> Result<(), DatabaseError> {
    match effect {
        PostPaymentEffect::RegistrationPaid(registration_id) => {
            let row = sqlx::query(
                r#"
                UPDATE registrations SET status = 'pending_review', updated_at = NOW()
                WHERE id = $1 AND status = 'pending_payment'
                RETURNING kind, entity_id
                "#,
            )
            .bind(registration_id.as_uuid())
            .fetch_optional(&mut *conn)
            .await?;

            if let Some(row) = row {
                let kind: String = row.try_get("kind")?;
                let entity_id: Uuid = row.try_get("entity_id")?;
                if kind == "player" {
                    sqlx::query(
                        r#"
                        UPDATE players SET status = 'under_review', updated_at = NOW()
                        WHERE id = $1
                        "#,
                    )
                    .bind(entity_id)
                    .execute(&mut *conn)
                    .await?;
                }
            }
        }
        PostPaymentEffect::AffiliationPaid(affiliation_id) => {
            let row = sqlx::query(
                r#"
                UPDATE affiliations
                SET status = 'active', payment_status = 'paid', updated_at = NOW()
                WHERE id = $1 AND status = 'pending'
                RETURNING club_id, expiry_date
                "#,
            )
            .bind(affiliation_id.as_uuid())
            .fetch_optional(&mut *conn)
            .await?;

            if let Some(row) = row {
                let club_id: Uuid = row.try_get("club_id")?;
                let expiry: NaiveDate = row.try_get("expiry_date")?;
                sqlx::query(
                    r#"
                    UPDATE clubs
                    SET status = 'active', affiliation_expiry = $2, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(club_id)
                .bind(expiry)
                .execute(&mut *conn)
                .await?;
            }
        }
        PostPaymentEffect::TransferFeePaid(transfer_id) => {
            sqlx::query(
                r#"
                UPDATE transfers SET status = 'pending_zifa_review', updated_at = NOW()
                WHERE id = $1 AND status = 'pending_payment'
                "#,
            )
            .bind(transfer_id.as_uuid())
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(())
}
