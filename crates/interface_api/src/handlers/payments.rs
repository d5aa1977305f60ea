//! Payment handlers
//!
//! Payment initiation, status polling, and the gateway webhook. The
//! webhook is the authoritative settlement path; the status endpoint
//! polls the gateway as a fallback and routes a successful poll through
//! the same settlement workflow.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{InvoiceId, PaymentId};
use domain_billing::{GatewayOutcome, Invoice};
use gateway_pesepay::{InitiatePaymentRequest as GatewayInitiate, TransactionStatus, WebhookPayload};

use crate::auth::Claims;
use crate::dto::payments::*;
use crate::error::ApiError;
use crate::AppState;

const SIGNATURE_HEADER: &str = "X-Pesepay-Signature";

/// Whether the authenticated user may pay (or inspect payments for) an
/// invoice: federation staff, the invoice recipient, or an active
/// official of the invoiced club
async fn can_pay_invoice(
    state: &AppState,
    claims: &Claims,
    invoice: &Invoice,
) -> Result<bool, ApiError> {
    if claims.is_federation_staff() {
        return Ok(true);
    }

    let user_id = claims.user_id().map_err(|_| ApiError::Unauthorized)?;

    if invoice.issued_to_user_id == Some(user_id) {
        return Ok(true);
    }

    if let Some(club_id) = invoice.issued_to_club_id {
        return Ok(state.party.is_club_official(user_id, club_id).await?);
    }

    Ok(false)
}

/// Initiates a gateway payment for an invoice's outstanding balance
///
/// `POST /api/v1/invoices/:id/payments`
pub async fn initiate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(request): Json<InitiatePaymentRequest>,
) -> Result<Json<InitiatePaymentResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let invoice_id = InvoiceId::from_uuid(id);
    let invoice = state.billing.get_invoice(invoice_id).await?;

    if !can_pay_invoice(&state, &claims, &invoice).await? {
        tracing::warn!(
            user = %claims.sub,
            invoice = %invoice.invoice_number,
            "payment initiation denied"
        );
        return Err(ApiError::Forbidden(
            "Unauthorized to pay this invoice".to_string(),
        ));
    }

    let user_id = claims.user_id().map_err(|_| ApiError::Unauthorized)?;
    let (payment, invoice) = state
        .billing
        .begin_payment(invoice_id, &request.payment_method, user_id)
        .await?;

    let gateway_request = GatewayInitiate {
        amount: payment.amount.amount(),
        currency_code: payment.amount.currency().code().to_string(),
        reason: invoice.description.clone(),
        payment_reference: payment.payment_reference.clone(),
    };

    match state.gateway.initiate_payment(gateway_request).await {
        Ok(initiated) => {
            state
                .billing
                .record_gateway_acceptance(payment.id, &initiated.reference_number)
                .await?;

            Ok(Json(InitiatePaymentResponse {
                payment_id: *payment.id.as_uuid(),
                payment_url: initiated.redirect_url,
                reference: initiated.reference_number,
            }))
        }
        Err(e) => {
            tracing::error!(
                invoice = %invoice.invoice_number,
                error = %e,
                "payment initiation failed"
            );
            // Keep the failed attempt on record, then surface the error
            if let Err(mark_err) = state.billing.record_gateway_failure(payment.id).await {
                tracing::error!(error = %mark_err, "failed to record gateway failure");
            }
            Err(ApiError::Internal("Failed to initiate payment".to_string()))
        }
    }
}

/// Returns a payment's status, polling the gateway while it is pending
///
/// `GET /api/v1/payments/:id/status`
pub async fn status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let payment_id = PaymentId::from_uuid(id);
    let payment = state.billing.get_payment(payment_id).await?;

    let invoice = state.billing.get_invoice(payment.invoice_id).await?;
    if !can_pay_invoice(&state, &claims, &invoice).await? {
        tracing::warn!(
            user = %claims.sub,
            payment = %payment.payment_reference,
            "payment status denied"
        );
        return Err(ApiError::Forbidden(
            "Unauthorized to view this payment".to_string(),
        ));
    }

    // Fallback poll; settlement still goes through the one workflow
    if payment.is_pending() {
        if let Some(reference) = payment.gateway_reference.clone() {
            match state.gateway.check_status(&reference).await {
                Ok(status) => {
                    if let Some(outcome) = outcome_from_status(status, None) {
                        state.billing.settle_from_gateway(&reference, outcome).await?;
                    }
                }
                Err(e) => {
                    tracing::warn!(reference = %reference, error = %e, "status poll failed");
                }
            }
        }
    }

    let refreshed = state.billing.get_payment(payment_id).await?;
    Ok(Json(PaymentStatusResponse::from(&refreshed)))
}

/// Gateway result webhook
///
/// `POST /payments/webhook/pesepay`
///
/// Response codes drive the gateway's redelivery: 200 for processed or
/// already-processed, 401 for a bad signature, 404 for an unknown
/// reference, 500 when processing failed and a retry should come.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !state.gateway.verify_webhook_signature(&body, signature) {
        tracing::warn!("invalid webhook signature");
        return Err(ApiError::Unauthorized);
    }

    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("malformed webhook body: {e}")))?;

    let Some(outcome) =
        outcome_from_status(payload.status(), payload.transaction_id.clone())
    else {
        // Non-terminal statuses are acknowledged without processing
        return Ok(Json(WebhookAck {
            message: "Ignored".to_string(),
        }));
    };

    let report = state
        .billing
        .settle_from_gateway(&payload.reference_number, outcome)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                tracing::warn!(reference = %payload.reference_number, "webhook for unknown payment");
                ApiError::NotFound("Payment not found".to_string())
            } else {
                tracing::error!(reference = %payload.reference_number, error = %e, "webhook processing failed");
                ApiError::Internal("Processing failed".to_string())
            }
        })?;

    let message = if report.already_processed() {
        "Already processed"
    } else {
        "Processed"
    };

    Ok(Json(WebhookAck {
        message: message.to_string(),
    }))
}

/// Refunds a settled payment
///
/// `POST /api/v1/payments/:id/refund`
///
/// The invoice status is re-derived from whatever remains settled.
pub async fn refund(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, ApiError> {
    if !crate::auth::has_role(&claims, crate::auth::roles::ZIFA_FINANCE) {
        return Err(ApiError::Forbidden(
            "Refunds require a finance role".to_string(),
        ));
    }

    let payment = state
        .billing
        .refund_payment(PaymentId::from_uuid(id))
        .await?;

    Ok(Json(PaymentResponse::from(&payment)))
}

/// Maps a gateway transaction status to a settlement outcome
///
/// Returns None for in-flight statuses that carry nothing to record.
fn outcome_from_status(
    status: TransactionStatus,
    transaction_id: Option<String>,
) -> Option<GatewayOutcome> {
    match status {
        TransactionStatus::Success => Some(GatewayOutcome::Success { transaction_id }),
        TransactionStatus::Failed | TransactionStatus::Cancelled => Some(GatewayOutcome::Failed),
        TransactionStatus::Pending
        | TransactionStatus::Processing
        | TransactionStatus::Other(_) => None,
    }
}
