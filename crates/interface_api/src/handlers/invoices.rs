//! Invoice handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use core_kernel::InvoiceId;

use crate::auth::{self, Claims};
use crate::dto::invoices::*;
use crate::error::ApiError;
use crate::AppState;

/// Fetches an invoice with its outstanding balance
///
/// `GET /api/v1/invoices/:id`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let invoice_id = InvoiceId::from_uuid(id);
    let invoice = state.billing.get_invoice(invoice_id).await?;
    let total_paid = state.billing.invoice_paid_total(invoice_id).await?;
    let balance = invoice
        .balance(total_paid)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(InvoiceResponse::from_invoice(&invoice, balance)))
}

/// Cancels an unpaid invoice
///
/// `POST /api/v1/invoices/:id/cancel`
pub async fn cancel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    if !auth::has_role(&claims, auth::roles::ZIFA_FINANCE) {
        return Err(ApiError::Forbidden(
            "Invoice cancellation requires a finance role".to_string(),
        ));
    }

    let invoice = state.billing.cancel_invoice(InvoiceId::from_uuid(id)).await?;
    let balance = invoice.amount;

    Ok(Json(InvoiceResponse::from_invoice(&invoice, balance)))
}

/// Flags invoices past their due date as overdue
///
/// `POST /api/v1/invoices/mark-overdue`
pub async fn mark_overdue(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MarkOverdueResponse>, ApiError> {
    if !auth::has_role(&claims, auth::roles::ZIFA_FINANCE) {
        return Err(ApiError::Forbidden(
            "Overdue flagging requires a finance role".to_string(),
        ));
    }

    let flagged = state
        .billing
        .mark_overdue_invoices(Utc::now().date_naive())
        .await?;

    Ok(Json(MarkOverdueResponse { flagged }))
}
