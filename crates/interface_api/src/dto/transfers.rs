//! Transfer DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_transfer::Transfer;

#[derive(Debug, Deserialize, Validate)]
pub struct InitiateTransferRequest {
    pub player_id: Uuid,
    pub to_club_id: Uuid,
    /// local | international | loan | free
    pub transfer_type: String,
    /// Fee in major units, defaults to zero
    #[serde(default)]
    pub transfer_fee: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectTransferRequest {
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub id: Uuid,
    pub transfer_reference: String,
    pub player_id: Uuid,
    pub from_club_id: Option<Uuid>,
    pub to_club_id: Uuid,
    pub transfer_type: String,
    pub transfer_window: String,
    pub status: String,
    pub transfer_fee: Decimal,
    pub admin_fee: Decimal,
    pub currency: String,
    pub effective_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    pub certificate_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Transfer> for TransferResponse {
    fn from(transfer: &Transfer) -> Self {
        Self {
            id: *transfer.id.as_uuid(),
            transfer_reference: transfer.transfer_reference.clone(),
            player_id: *transfer.player_id.as_uuid(),
            from_club_id: transfer.from_club_id.map(|id| *id.as_uuid()),
            to_club_id: *transfer.to_club_id.as_uuid(),
            transfer_type: transfer.transfer_type.as_str().to_string(),
            transfer_window: transfer.transfer_window.clone(),
            status: transfer.status.as_str().to_string(),
            transfer_fee: transfer.transfer_fee.amount(),
            admin_fee: transfer.admin_fee.amount(),
            currency: transfer.transfer_fee.currency().code().to_string(),
            effective_date: transfer.effective_date,
            rejection_reason: transfer.rejection_reason.clone(),
            certificate_reference: transfer.certificate_reference.clone(),
            created_at: transfer.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransferApprovalResponse {
    pub message: String,
    pub status: String,
    pub certificate_reference: Option<String>,
}
