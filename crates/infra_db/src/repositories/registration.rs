//! Registration repository
//!
//! Database access for registrations and affiliations, including the
//! registration-plus-invoice creation workflows.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{AffiliationId, ClubId, RegistrantKind, RegistrationId, UserId};
use domain_billing::{numbering, Invoice};
use domain_party::{Club, Player};
use domain_registration::{
    registration_number, Affiliation, AffiliationStatus, PaymentState, Registration,
    RegistrationService, RegistrationStatus,
};

use crate::error::{DatabaseError, WorkflowError};
use crate::repositories::billing::insert_invoice;
use crate::sequences::{self, scope};

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    id: Uuid,
    registration_number: String,
    kind: String,
    entity_id: Uuid,
    season: String,
    status: String,
    submitted_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RegistrationRow {
    fn into_domain(self) -> Result<Registration, DatabaseError> {
        Ok(Registration {
            id: RegistrationId::from_uuid(self.id),
            registration_number: self.registration_number,
            kind: RegistrantKind::from_str_opt(&self.kind).ok_or_else(|| {
                DatabaseError::SerializationError(format!("unknown registrant kind '{}'", self.kind))
            })?,
            entity_id: self.entity_id,
            season: self.season,
            status: RegistrationStatus::parse(&self.status)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            submitted_by: self.submitted_by.map(UserId::from_uuid),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AffiliationRow {
    id: Uuid,
    club_id: Uuid,
    season: String,
    status: String,
    payment_status: String,
    expiry_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AffiliationRow {
    fn into_domain(self) -> Result<Affiliation, DatabaseError> {
        Ok(Affiliation {
            id: AffiliationId::from_uuid(self.id),
            club_id: ClubId::from_uuid(self.club_id),
            season: self.season,
            status: AffiliationStatus::parse(&self.status)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            payment_status: PaymentState::parse(&self.payment_status)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            expiry_date: self.expiry_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_REGISTRATION: &str = r#"
    SELECT id, registration_number, kind, entity_id, season, status,
           submitted_by, created_at, updated_at
    FROM registrations
"#;

const SELECT_AFFILIATION: &str = r#"
    SELECT id, club_id, season, status, payment_status, expiry_date,
           created_at, updated_at
    FROM affiliations
"#;

/// Repository for registrations and affiliations
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new RegistrationRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches a registration by id
    pub async fn get_registration(
        &self,
        id: RegistrationId,
    ) -> Result<Registration, DatabaseError> {
        let row: Option<RegistrationRow> =
            sqlx::query_as(&format!("{SELECT_REGISTRATION} WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| DatabaseError::not_found("Registration", id))?
            .into_domain()
    }

    /// Fetches an affiliation by id
    pub async fn get_affiliation(
        &self,
        id: AffiliationId,
    ) -> Result<Affiliation, DatabaseError> {
        let row: Option<AffiliationRow> =
            sqlx::query_as(&format!("{SELECT_AFFILIATION} WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| DatabaseError::not_found("Affiliation", id))?
            .into_domain()
    }

    /// Creates a player registration and its fee invoice in one
    /// transaction
    pub async fn create_player_registration(
        &self,
        player: &Player,
        submitted_by: UserId,
        service: &RegistrationService,
        today: NaiveDate,
    ) -> Result<(Registration, Invoice), WorkflowError> {
        let mut tx = self.pool.begin().await?;

        let reg_seq =
            sequences::next_value(&mut *tx, scope::REGISTRATION_PLAYER, today).await?;
        let invoice_seq = sequences::next_value(&mut *tx, scope::INVOICE, today).await?;

        let (registration, invoice) = service.create_player_registration(
            player,
            registration_number(RegistrantKind::Player, today, reg_seq),
            numbering::invoice_number(today, invoice_seq),
            today,
        );
        let registration = registration.submitted_by(submitted_by);

        insert_registration(&mut *tx, &registration).await?;
        insert_invoice(&mut *tx, &invoice).await?;

        tx.commit().await?;
        Ok((registration, invoice))
    }

    /// Creates a club affiliation and its fee invoice in one transaction
    pub async fn create_affiliation(
        &self,
        club: &Club,
        service: &RegistrationService,
        today: NaiveDate,
        expiry_date: NaiveDate,
    ) -> Result<(Affiliation, Invoice), WorkflowError> {
        let mut tx = self.pool.begin().await?;

        let invoice_seq = sequences::next_value(&mut *tx, scope::INVOICE, today).await?;

        let (affiliation, invoice) = service.create_affiliation(
            club,
            numbering::invoice_number(today, invoice_seq),
            today,
            expiry_date,
        );

        sqlx::query(
            r#"
            INSERT INTO affiliations (
                id, club_id, season, status, payment_status, expiry_date,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(affiliation.id.as_uuid())
        .bind(affiliation.club_id.as_uuid())
        .bind(&affiliation.season)
        .bind(affiliation.status.as_str())
        .bind(affiliation.payment_status.as_str())
        .bind(affiliation.expiry_date)
        .bind(affiliation.created_at)
        .bind(affiliation.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_invoice(&mut *tx, &invoice).await?;

        tx.commit().await?;
        Ok((affiliation, invoice))
    }
}

async fn insert_registration(
    conn: &mut sqlx::PgConnection,
    registration: &Registration,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO registrations (
            id, registration_number, kind, entity_id, season, status,
            submitted_by, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(registration.id.as_uuid())
    .bind(&registration.registration_number)
    .bind(registration.kind.as_str())
    .bind(registration.entity_id)
    .bind(&registration.season)
    .bind(registration.status.as_str())
    .bind(registration.submitted_by.map(|id| *id.as_uuid()))
    .bind(registration.created_at)
    .bind(registration.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_fragments_name_all_columns() {
        assert!(SELECT_REGISTRATION.contains("registration_number"));
        assert!(SELECT_REGISTRATION.contains("submitted_by"));
        assert!(SELECT_AFFILIATION.contains("payment_status"));
        assert!(SELECT_AFFILIATION.contains("expiry_date"));
    }
}
