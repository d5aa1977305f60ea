//! Registration handlers
//!
//! The invoicing orchestrator's HTTP surface: submitting a player
//! registration or a club affiliation creates the record plus its fee
//! invoice in one transaction.

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{Datelike, NaiveDate};

use core_kernel::{ClubId, PlayerId};

use crate::auth::Claims;
use crate::dto::invoices::InvoiceResponse;
use crate::dto::registrations::*;
use crate::error::ApiError;
use crate::AppState;

/// Submits a player registration
///
/// `POST /api/v1/registrations/players`
pub async fn register_player(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<RegisterPlayerRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    let submitted_by = claims.user_id().map_err(|_| ApiError::Unauthorized)?;
    let player = state
        .party
        .get_player(PlayerId::from_uuid(request.player_id))
        .await?;

    let today = state.windows.today();
    let (registration, invoice) = state
        .registrations
        .create_player_registration(&player, submitted_by, &state.registration_service, today)
        .await?;

    let balance = invoice.amount;
    let response = RegistrationResponse::from_parts(
        &registration,
        InvoiceResponse::from_invoice(&invoice, balance),
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// Creates a club affiliation for the current season
///
/// `POST /api/v1/registrations/affiliations`
pub async fn create_affiliation(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(request): Json<CreateAffiliationRequest>,
) -> Result<(StatusCode, Json<AffiliationResponse>), ApiError> {
    let club = state
        .party
        .get_club(ClubId::from_uuid(request.club_id))
        .await?;

    let today = state.windows.today();
    // Affiliations run to the end of the calendar-year season
    let expiry = NaiveDate::from_ymd_opt(today.year(), 12, 31)
        .ok_or_else(|| ApiError::Internal("invalid season expiry".to_string()))?;

    let (affiliation, invoice) = state
        .registrations
        .create_affiliation(&club, &state.registration_service, today, expiry)
        .await?;

    let balance = invoice.amount;
    let response = AffiliationResponse::from_parts(
        &affiliation,
        InvoiceResponse::from_invoice(&invoice, balance),
    );

    Ok((StatusCode::CREATED, Json(response)))
}
