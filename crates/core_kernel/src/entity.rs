//! Billed-entity sum type
//!
//! Invoices bill one of a closed set of records. The link is stored as
//! an `entity_kind`/`entity_id` column pair and surfaces in code as a
//! tagged union resolved with an explicit match, so an invoice can never
//! point at an unknown kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::CoreError;
use crate::identifiers::{AffiliationId, FineId, RegistrationId, TransferId};

/// The record an invoice bills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum BilledEntity {
    /// A player/club/official/referee registration fee
    Registration(RegistrationId),
    /// A club's seasonal affiliation fee
    Affiliation(AffiliationId),
    /// A transfer admin + transfer fee
    Transfer(TransferId),
    /// A disciplinary fine
    Fine(FineId),
}

impl BilledEntity {
    /// Returns the storage discriminant
    pub fn kind(&self) -> &'static str {
        match self {
            BilledEntity::Registration(_) => "registration",
            BilledEntity::Affiliation(_) => "affiliation",
            BilledEntity::Transfer(_) => "transfer",
            BilledEntity::Fine(_) => "fine",
        }
    }

    /// Returns the underlying entity UUID
    pub fn entity_uuid(&self) -> Uuid {
        match self {
            BilledEntity::Registration(id) => *id.as_uuid(),
            BilledEntity::Affiliation(id) => *id.as_uuid(),
            BilledEntity::Transfer(id) => *id.as_uuid(),
            BilledEntity::Fine(id) => *id.as_uuid(),
        }
    }

    /// Reconstructs the sum type from its storage columns
    pub fn from_columns(kind: &str, id: Uuid) -> Result<Self, CoreError> {
        match kind {
            "registration" => Ok(BilledEntity::Registration(RegistrationId::from_uuid(id))),
            "affiliation" => Ok(BilledEntity::Affiliation(AffiliationId::from_uuid(id))),
            "transfer" => Ok(BilledEntity::Transfer(TransferId::from_uuid(id))),
            "fine" => Ok(BilledEntity::Fine(FineId::from_uuid(id))),
            other => Err(CoreError::validation(format!(
                "unknown billed entity kind '{other}'"
            ))),
        }
    }
}

impl fmt::Display for BilledEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.entity_uuid())
    }
}

/// The kind of record a Registration registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrantKind {
    Player,
    Club,
    Official,
    Referee,
}

impl RegistrantKind {
    /// Returns the storage discriminant
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrantKind::Player => "player",
            RegistrantKind::Club => "club",
            RegistrantKind::Official => "official",
            RegistrantKind::Referee => "referee",
        }
    }

    /// Registration-number prefix for this kind
    pub fn reference_prefix(&self) -> &'static str {
        match self {
            RegistrantKind::Player => "PLA",
            RegistrantKind::Club => "CLU",
            RegistrantKind::Official => "OFF",
            RegistrantKind::Referee => "REF",
        }
    }

    /// Reconstructs from the storage discriminant
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "player" => Some(RegistrantKind::Player),
            "club" => Some(RegistrantKind::Club),
            "official" => Some(RegistrantKind::Official),
            "referee" => Some(RegistrantKind::Referee),
            _ => None,
        }
    }
}

impl fmt::Display for RegistrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billed_entity_round_trip() {
        let entity = BilledEntity::Transfer(TransferId::new());
        let rebuilt = BilledEntity::from_columns(entity.kind(), entity.entity_uuid()).unwrap();
        assert_eq!(entity, rebuilt);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = BilledEntity::from_columns("sponsorship", Uuid::new_v4());
        assert!(result.is_err());
    }

    #[test]
    fn test_registrant_kind_prefixes() {
        assert_eq!(RegistrantKind::Player.reference_prefix(), "PLA");
        assert_eq!(RegistrantKind::Referee.reference_prefix(), "REF");
    }
}
