//! Party Domain - Players and Clubs
//!
//! This crate models the people and organizations the federation
//! administers: players and the clubs they belong to. The interesting
//! behavior lives in the status fields, which gate registration review,
//! transfer eligibility, and affiliation renewal.

pub mod player;
pub mod club;
pub mod error;

pub use player::{Player, PlayerStatus};
pub use club::{Club, ClubStatus};
pub use error::PartyError;
