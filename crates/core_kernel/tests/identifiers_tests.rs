//! Integration tests for typed identifiers

use core_kernel::{ClubId, InvoiceId, PaymentId, PlayerId, TransferId};
use uuid::Uuid;

#[test]
fn test_prefixes_are_distinct() {
    assert_eq!(PlayerId::prefix(), "PLY");
    assert_eq!(ClubId::prefix(), "CLB");
    assert_eq!(TransferId::prefix(), "TRF");
    assert_eq!(InvoiceId::prefix(), "INV");
    assert_eq!(PaymentId::prefix(), "PAY");
}

#[test]
fn test_parse_with_and_without_prefix() {
    let id = TransferId::new();
    let with_prefix: TransferId = id.to_string().parse().unwrap();
    let without_prefix: TransferId = id.as_uuid().to_string().parse().unwrap();

    assert_eq!(with_prefix, id);
    assert_eq!(without_prefix, id);
}

#[test]
fn test_v7_ids_are_time_ordered() {
    let first = PaymentId::new_v7();
    let second = PaymentId::new_v7();
    assert!(first.as_uuid() <= second.as_uuid());
}

#[test]
fn test_serde_transparent() {
    let uuid = Uuid::new_v4();
    let id = InvoiceId::from_uuid(uuid);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
