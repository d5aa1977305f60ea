//! Registration DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_registration::{Affiliation, Registration};

use crate::dto::invoices::InvoiceResponse;

#[derive(Debug, Deserialize)]
pub struct RegisterPlayerRequest {
    pub player_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateAffiliationRequest {
    pub club_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub registration_number: String,
    pub kind: String,
    pub entity_id: Uuid,
    pub season: String,
    pub status: String,
    pub invoice: InvoiceResponse,
}

impl RegistrationResponse {
    pub fn from_parts(registration: &Registration, invoice: InvoiceResponse) -> Self {
        Self {
            id: *registration.id.as_uuid(),
            registration_number: registration.registration_number.clone(),
            kind: registration.kind.as_str().to_string(),
            entity_id: registration.entity_id,
            season: registration.season.clone(),
            status: registration.status.as_str().to_string(),
            invoice,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AffiliationResponse {
    pub id: Uuid,
    pub club_id: Uuid,
    pub season: String,
    pub status: String,
    pub payment_status: String,
    pub invoice: InvoiceResponse,
}

impl AffiliationResponse {
    pub fn from_parts(affiliation: &Affiliation, invoice: InvoiceResponse) -> Self {
        Self {
            id: *affiliation.id.as_uuid(),
            club_id: *affiliation.club_id.as_uuid(),
            season: affiliation.season.clone(),
            status: affiliation.status.as_str().to_string(),
            payment_status: affiliation.payment_status.as_str().to_string(),
            invoice,
        }
    }
}
