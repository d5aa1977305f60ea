//! Tests for the party domain

use chrono::NaiveDate;
use core_kernel::ClubId;
use domain_party::{Club, ClubStatus, Player, PlayerStatus};

fn player(status: PlayerStatus) -> Player {
    Player::new(
        "Marshall",
        "Munetsi",
        NaiveDate::from_ymd_opt(1996, 6, 22).unwrap(),
        "ZW",
    )
    .with_status(status)
}

#[test]
fn test_only_approved_and_free_agents_transfer() {
    let eligible = [PlayerStatus::Approved, PlayerStatus::FreeAgent];
    let ineligible = [
        PlayerStatus::Draft,
        PlayerStatus::Pending,
        PlayerStatus::UnderReview,
        PlayerStatus::Suspended,
        PlayerStatus::Retired,
    ];

    for status in eligible {
        assert!(player(status).is_eligible_for_transfer(), "{status:?}");
    }
    for status in ineligible {
        assert!(!player(status).is_eligible_for_transfer(), "{status:?}");
    }
}

#[test]
fn test_free_agent_has_no_club() {
    let free_agent = player(PlayerStatus::FreeAgent);
    assert!(free_agent.current_club_id.is_none());
    assert!(free_agent.is_eligible_for_transfer());
}

#[test]
fn test_reassignment_updates_club_and_status() {
    let mut free_agent = player(PlayerStatus::FreeAgent);
    let destination = ClubId::new();

    free_agent.reassign_club(destination);

    assert_eq!(free_agent.current_club_id, Some(destination));
    assert_eq!(free_agent.status, PlayerStatus::Approved);
}

#[test]
fn test_reassignment_keeps_approved_status() {
    let from_club = ClubId::new();
    let to_club = ClubId::new();
    let mut approved = player(PlayerStatus::Approved).with_club(from_club);

    approved.reassign_club(to_club);

    assert_eq!(approved.current_club_id, Some(to_club));
    assert_eq!(approved.status, PlayerStatus::Approved);
}

#[test]
fn test_submit_for_review_from_pending() {
    let mut pending = player(PlayerStatus::Pending);
    pending.submit_for_review().unwrap();
    assert_eq!(pending.status, PlayerStatus::UnderReview);
}

#[test]
fn test_club_status_round_trip() {
    for status in [
        ClubStatus::Pending,
        ClubStatus::Active,
        ClubStatus::Suspended,
        ClubStatus::Expelled,
    ] {
        assert_eq!(ClubStatus::parse(status.as_str()).unwrap(), status);
    }
}

#[test]
fn test_pending_club_is_not_affiliated() {
    let club = Club::new("FC Platinum", "Zvishavane");
    assert!(!club.is_affiliated(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()));
}
