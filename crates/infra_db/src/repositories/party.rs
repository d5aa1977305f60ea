//! Party repository
//!
//! Database access for players, clubs, and club officials.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use core_kernel::{ClubId, PlayerId, UserId};
use domain_party::{Club, ClubStatus, Player, PlayerStatus};

use crate::error::DatabaseError;

/// Repository for players and clubs
#[derive(Debug, Clone)]
pub struct PartyRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: Uuid,
    federation_id: Option<String>,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    nationality: String,
    current_club_id: Option<Uuid>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlayerRow {
    fn into_domain(self) -> Result<Player, DatabaseError> {
        Ok(Player {
            id: PlayerId::from_uuid(self.id),
            federation_id: self.federation_id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            nationality: self.nationality,
            current_club_id: self.current_club_id.map(ClubId::from_uuid),
            status: PlayerStatus::parse(&self.status)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ClubRow {
    id: Uuid,
    name: String,
    province: String,
    status: String,
    affiliation_expiry: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClubRow {
    fn into_domain(self) -> Result<Club, DatabaseError> {
        Ok(Club {
            id: ClubId::from_uuid(self.id),
            name: self.name,
            province: self.province,
            status: ClubStatus::parse(&self.status)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            affiliation_expiry: self.affiliation_expiry,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_PLAYER: &str = r#"
    SELECT id, federation_id, first_name, last_name, date_of_birth,
           nationality, current_club_id, status, created_at, updated_at
    FROM players
"#;

const SELECT_CLUB: &str = r#"
    SELECT id, name, province, status, affiliation_expiry, created_at, updated_at
    FROM clubs
"#;

impl PartyRepository {
    /// Creates a new PartyRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a player
    pub async fn create_player(&self, player: &Player) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO players (
                id, federation_id, first_name, last_name, date_of_birth,
                nationality, current_club_id, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(player.id.as_uuid())
        .bind(&player.federation_id)
        .bind(&player.first_name)
        .bind(&player.last_name)
        .bind(player.date_of_birth)
        .bind(&player.nationality)
        .bind(player.current_club_id.map(|id| *id.as_uuid()))
        .bind(player.status.as_str())
        .bind(player.created_at)
        .bind(player.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetches a player by id
    pub async fn get_player(&self, id: PlayerId) -> Result<Player, DatabaseError> {
        let row: Option<PlayerRow> =
            sqlx::query_as(&format!("{SELECT_PLAYER} WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| DatabaseError::not_found("Player", id))?
            .into_domain()
    }

    /// Updates a player's status
    pub async fn update_player_status(
        &self,
        id: PlayerId,
        status: PlayerStatus,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE players SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Player", id));
        }
        Ok(())
    }

    /// Inserts a club
    pub async fn create_club(&self, club: &Club) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO clubs (id, name, province, status, affiliation_expiry, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(club.id.as_uuid())
        .bind(&club.name)
        .bind(&club.province)
        .bind(club.status.as_str())
        .bind(club.affiliation_expiry)
        .bind(club.created_at)
        .bind(club.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetches a club by id
    pub async fn get_club(&self, id: ClubId) -> Result<Club, DatabaseError> {
        let row: Option<ClubRow> = sqlx::query_as(&format!("{SELECT_CLUB} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| DatabaseError::not_found("Club", id))?
            .into_domain()
    }

    /// Registers a user as an active official of a club
    pub async fn add_club_official(
        &self,
        user_id: UserId,
        club_id: ClubId,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO club_officials (user_id, club_id, status)
            VALUES ($1, $2, 'active')
            ON CONFLICT (user_id, club_id) DO UPDATE SET status = 'active'
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(club_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Whether a user is an active official of a club
    ///
    /// Ownership check behind payment initiation and from-club approval.
    pub async fn is_club_official(
        &self,
        user_id: UserId,
        club_id: ClubId,
    ) -> Result<bool, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT 1 AS present FROM club_officials
            WHERE user_id = $1 AND club_id = $2 AND status = 'active'
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(club_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }
}

/// Reassigns a player's club inside an open transaction
///
/// Used by the transfer-completion workflow; free of its own transaction
/// so it joins the caller's.
pub(crate) async fn reassign_player_club(
    conn: &mut PgConnection,
    player_id: Uuid,
    club_id: Uuid,
) -> Result<(), DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE players
        SET current_club_id = $2,
            status = CASE WHEN status = 'free_agent' THEN 'approved' ELSE status END,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(player_id)
    .bind(club_id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Player", player_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_fragments_name_all_columns() {
        // Guard against drift between the row structs and the queries
        for column in [
            "federation_id",
            "current_club_id",
            "status",
            "created_at",
            "updated_at",
        ] {
            assert!(SELECT_PLAYER.contains(column), "missing {column}");
        }
        assert!(SELECT_CLUB.contains("affiliation_expiry"));
    }
}
