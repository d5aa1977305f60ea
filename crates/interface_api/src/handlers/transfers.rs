//! Transfer handlers
//!
//! Orchestrates the transfer lifecycle: initiation inside the transfer
//! window, release approval by the from-club, federation approval, and
//! rejection/withdrawal.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{Money, PlayerId, TransferId};
use domain_transfer::TransferType;
use infra_db::NewTransferRequest;

use crate::auth::{self, Claims};
use crate::dto::transfers::*;
use crate::error::ApiError;
use crate::AppState;

/// Initiates a transfer
///
/// `POST /api/v1/transfers`
pub async fn initiate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<InitiateTransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let transfer_type = TransferType::parse(&request.transfer_type)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let fee_amount = request.transfer_fee.unwrap_or(Decimal::ZERO);
    if fee_amount.is_sign_negative() {
        return Err(ApiError::Validation(
            "transfer_fee must not be negative".to_string(),
        ));
    }

    let player = state
        .party
        .get_player(PlayerId::from_uuid(request.player_id))
        .await?;

    let requested_by = claims.user_id().map_err(|_| ApiError::Unauthorized)?;
    let currency = state.registration_service.fees().currency;

    let transfer = state
        .transfers
        .initiate_transfer(
            &player,
            NewTransferRequest {
                to_club_id: request.to_club_id.into(),
                transfer_type,
                transfer_fee: Money::new(fee_amount, currency),
                notes: request.notes,
                requested_by,
            },
            &state.windows,
            &state.registration_service,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TransferResponse::from(&transfer))))
}

/// Fetches a transfer
///
/// `GET /api/v1/transfers/:id`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferResponse>, ApiError> {
    let transfer = state.transfers.get_transfer(TransferId::from_uuid(id)).await?;
    Ok(Json(TransferResponse::from(&transfer)))
}

/// Releasing club approves the departure
///
/// `POST /api/v1/transfers/:id/approve-club`
pub async fn approve_by_club(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferApprovalResponse>, ApiError> {
    let transfer_id = TransferId::from_uuid(id);
    let transfer = state.transfers.get_transfer(transfer_id).await?;

    let approver = claims.user_id().map_err(|_| ApiError::Unauthorized)?;

    // Only officials of the releasing club (or federation staff) may
    // approve the departure
    if !claims.is_federation_staff() {
        let from_club = transfer.from_club_id.ok_or_else(|| {
            ApiError::Validation("Transfer is not pending club approval".to_string())
        })?;
        if !state.party.is_club_official(approver, from_club).await? {
            tracing::warn!(
                user = %claims.sub,
                transfer = %transfer.transfer_reference,
                "club approval denied"
            );
            return Err(ApiError::Forbidden("Unauthorized".to_string()));
        }
    }

    let transfer = state.transfers.approve_by_club(transfer_id, approver).await?;

    Ok(Json(TransferApprovalResponse {
        message: "Transfer approved by club".to_string(),
        status: transfer.status.as_str().to_string(),
        certificate_reference: None,
    }))
}

/// Federation approves the transfer (terminal transition)
///
/// `POST /api/v1/transfers/:id/approve-zifa`
///
/// Completion, player reassignment, and the tenure-history rewrite are
/// one transaction; the international-sync enqueue afterwards is
/// best-effort and never fails the request.
pub async fn approve_by_zifa(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferApprovalResponse>, ApiError> {
    if !auth::has_role(&claims, auth::roles::ZIFA_ADMIN) {
        return Err(ApiError::Forbidden(
            "Federation approval requires a federation role".to_string(),
        ));
    }

    let approver = claims.user_id().map_err(|_| ApiError::Unauthorized)?;
    let (transfer, completion) = state
        .transfers
        .approve_by_zifa(TransferId::from_uuid(id), approver)
        .await?;

    if completion.requires_international_sync {
        if let Err(e) = state
            .sync_queue
            .enqueue("transfer", *completion.transfer_id.as_uuid(), "create")
            .await
        {
            tracing::error!(
                transfer = %transfer.transfer_reference,
                error = %e,
                "international sync enqueue failed"
            );
        }
    }

    Ok(Json(TransferApprovalResponse {
        message: "Transfer approved".to_string(),
        status: transfer.status.as_str().to_string(),
        certificate_reference: transfer.certificate_reference.clone(),
    }))
}

/// Rejects a transfer
///
/// `POST /api/v1/transfers/:id/reject`
pub async fn reject(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectTransferRequest>,
) -> Result<Json<TransferApprovalResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if !auth::has_role(&claims, auth::roles::ZIFA_ADMIN) {
        return Err(ApiError::Forbidden(
            "Rejection requires a federation role".to_string(),
        ));
    }

    let rejected_by = claims.user_id().map_err(|_| ApiError::Unauthorized)?;
    let transfer = state
        .transfers
        .reject(TransferId::from_uuid(id), &request.reason, rejected_by)
        .await?;

    Ok(Json(TransferApprovalResponse {
        message: "Transfer rejected".to_string(),
        status: transfer.status.as_str().to_string(),
        certificate_reference: None,
    }))
}

/// Withdraws a transfer
///
/// `POST /api/v1/transfers/:id/cancel`
pub async fn cancel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferApprovalResponse>, ApiError> {
    let cancelled_by = claims.user_id().map_err(|_| ApiError::Unauthorized)?;
    let transfer = state
        .transfers
        .cancel(TransferId::from_uuid(id), cancelled_by)
        .await?;

    Ok(Json(TransferApprovalResponse {
        message: "Transfer cancelled".to_string(),
        status: transfer.status.as_str().to_string(),
        certificate_reference: None,
    }))
}
