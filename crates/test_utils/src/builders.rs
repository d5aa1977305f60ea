//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the
//! rest.

use chrono::NaiveDate;
use core_kernel::{BilledEntity, ClubId, Currency, Money, TransferId, UserId};
use domain_billing::{Gateway, Invoice, InvoiceCategory, Payment};
use domain_party::{Club, ClubStatus, Player, PlayerStatus};
use domain_transfer::{
    MonthDay, Transfer, TransferType, TransferWindow, TransferWindows,
};

use crate::fixtures::{StringFixtures, TemporalFixtures};

/// Builder for test players
pub struct TestPlayerBuilder {
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    nationality: String,
    status: PlayerStatus,
    club_id: Option<ClubId>,
}

impl Default for TestPlayerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPlayerBuilder {
    /// Creates a builder for an approved player without a club
    pub fn new() -> Self {
        Self {
            first_name: "Tatenda".to_string(),
            last_name: "Moyo".to_string(),
            date_of_birth: TemporalFixtures::player_date_of_birth(),
            nationality: "ZW".to_string(),
            status: PlayerStatus::Approved,
            club_id: None,
        }
    }

    /// Sets the player's name
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Sets the status
    pub fn with_status(mut self, status: PlayerStatus) -> Self {
        self.status = status;
        self
    }

    /// Attaches a club
    pub fn with_club(mut self, club_id: ClubId) -> Self {
        self.club_id = Some(club_id);
        self
    }

    /// A free agent (no club, free_agent status)
    pub fn free_agent() -> Self {
        Self::new().with_status(PlayerStatus::FreeAgent)
    }

    /// Builds the player
    pub fn build(self) -> Player {
        let mut player = Player::new(
            self.first_name,
            self.last_name,
            self.date_of_birth,
            self.nationality,
        )
        .with_status(self.status);
        if let Some(club_id) = self.club_id {
            player = player.with_club(club_id);
        }
        player
    }
}

/// Builder for test clubs
pub struct TestClubBuilder {
    name: String,
    province: String,
    status: ClubStatus,
    affiliation_expiry: Option<NaiveDate>,
}

impl Default for TestClubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClubBuilder {
    /// Creates a builder for an active, affiliated club
    pub fn new() -> Self {
        Self {
            name: "Dynamos FC".to_string(),
            province: "Harare".to_string(),
            status: ClubStatus::Active,
            affiliation_expiry: Some(TemporalFixtures::season_end()),
        }
    }

    /// Sets the club name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the status
    pub fn with_status(mut self, status: ClubStatus) -> Self {
        self.status = status;
        self
    }

    /// A club that has not paid affiliation yet
    pub fn pending() -> Self {
        Self::new()
            .with_status(ClubStatus::Pending)
            .without_affiliation()
    }

    /// Clears the affiliation expiry
    pub fn without_affiliation(mut self) -> Self {
        self.affiliation_expiry = None;
        self
    }

    /// Builds the club
    pub fn build(self) -> Club {
        let mut club = Club::new(self.name, self.province).with_status(self.status);
        club.affiliation_expiry = self.affiliation_expiry;
        club
    }
}

/// Builder for test invoices
pub struct TestInvoiceBuilder {
    entity: BilledEntity,
    category: InvoiceCategory,
    amount: Money,
    due_date: NaiveDate,
    issued_to_club: Option<ClubId>,
    issued_to_user: Option<UserId>,
}

impl Default for TestInvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInvoiceBuilder {
    /// Creates a builder for a USD 100 transfer-fee invoice
    pub fn new() -> Self {
        Self {
            entity: BilledEntity::Transfer(TransferId::new()),
            category: InvoiceCategory::Transfer,
            amount: Money::new(rust_decimal_macros::dec!(100.00), Currency::USD),
            due_date: TemporalFixtures::january_due_date(),
            issued_to_club: None,
            issued_to_user: None,
        }
    }

    /// Sets the billed entity
    pub fn for_entity(mut self, entity: BilledEntity, category: InvoiceCategory) -> Self {
        self.entity = entity;
        self.category = category;
        self
    }

    /// Sets the amount
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Issues to a club
    pub fn issued_to_club(mut self, club_id: ClubId) -> Self {
        self.issued_to_club = Some(club_id);
        self
    }

    /// Issues to a user
    pub fn issued_to_user(mut self, user_id: UserId) -> Self {
        self.issued_to_user = Some(user_id);
        self
    }

    /// Builds the invoice
    pub fn build(self) -> Invoice {
        let mut invoice = Invoice::new(
            StringFixtures::invoice_number(),
            self.entity,
            "Test invoice",
            self.category,
            self.amount,
            self.due_date,
        );
        if let Some(club_id) = self.issued_to_club {
            invoice = invoice.issued_to_club(club_id);
        }
        if let Some(user_id) = self.issued_to_user {
            invoice = invoice.issued_to_user(user_id);
        }
        invoice
    }
}

/// Builder for test payments
pub struct TestPaymentBuilder {
    invoice: Option<Invoice>,
    amount: Option<Money>,
    gateway_reference: Option<String>,
}

impl Default for TestPaymentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPaymentBuilder {
    pub fn new() -> Self {
        Self {
            invoice: None,
            amount: None,
            gateway_reference: Some(StringFixtures::gateway_reference().to_string()),
        }
    }

    /// Pays the given invoice (amount defaults to the invoice amount)
    pub fn for_invoice(mut self, invoice: &Invoice) -> Self {
        self.invoice = Some(invoice.clone());
        self
    }

    /// Overrides the payment amount
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Leaves the payment unsubmitted (no gateway reference)
    pub fn unsubmitted(mut self) -> Self {
        self.gateway_reference = None;
        self
    }

    /// Builds the payment; `Pending` when a gateway reference is set
    pub fn build(self) -> Payment {
        let invoice = self.invoice.unwrap_or_else(|| TestInvoiceBuilder::new().build());
        let amount = self.amount.unwrap_or(invoice.amount);

        let mut payment = Payment::new(
            invoice.id,
            StringFixtures::payment_reference(),
            amount,
            Gateway::Pesepay,
        );
        if let Some(reference) = self.gateway_reference {
            payment.submitted_to_gateway(reference);
        }
        payment
    }
}

/// Drives a transfer to a given lifecycle stage for tests
pub struct TestTransferBuilder {
    player: Player,
    to_club: ClubId,
    transfer_type: TransferType,
    transfer_fee: Money,
    admin_fee: Money,
}

impl TestTransferBuilder {
    /// A local transfer of an approved player between two clubs
    pub fn local(player: Player, to_club: ClubId) -> Self {
        Self {
            player,
            to_club,
            transfer_type: TransferType::Local,
            transfer_fee: Money::zero(Currency::USD),
            admin_fee: crate::fixtures::MoneyFixtures::local_admin_fee(),
        }
    }

    /// A free transfer with no fees
    pub fn free(player: Player, to_club: ClubId) -> Self {
        Self {
            player,
            to_club,
            transfer_type: TransferType::Free,
            transfer_fee: Money::zero(Currency::USD),
            admin_fee: Money::zero(Currency::USD),
        }
    }

    /// Sets the negotiated transfer fee
    pub fn with_transfer_fee(mut self, fee: Money) -> Self {
        self.transfer_fee = fee;
        self
    }

    /// Marks the transfer international (and applies the matching fee)
    pub fn international(mut self) -> Self {
        self.transfer_type = TransferType::International;
        self.admin_fee = crate::fixtures::MoneyFixtures::international_admin_fee();
        self
    }

    /// Builds the transfer in its initial routed state
    pub fn build(self) -> Transfer {
        Transfer::initiate(
            StringFixtures::transfer_reference(),
            &self.player,
            self.to_club,
            self.transfer_type,
            self.transfer_fee,
            self.admin_fee,
            None,
            UserId::new(),
            &always_open_windows(),
        )
        .expect("test transfer should satisfy initiation preconditions")
    }
}

/// A window configuration covering the whole year, for date-independent
/// tests
pub fn always_open_windows() -> TransferWindows {
    TransferWindows::new(
        vec![TransferWindow {
            label: "always".to_string(),
            start: MonthDay { month: 1, day: 1 },
            end: MonthDay { month: 12, day: 31 },
        }],
        chrono_tz::Africa::Harare,
    )
    .expect("year-round window configuration is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_transfer::TransferStatus;

    #[test]
    fn test_player_builder_defaults() {
        let player = TestPlayerBuilder::new().build();
        assert_eq!(player.status, PlayerStatus::Approved);
        assert!(player.current_club_id.is_none());
    }

    #[test]
    fn test_free_agent_builder() {
        let player = TestPlayerBuilder::free_agent().build();
        assert!(player.is_eligible_for_transfer());
        assert!(player.current_club_id.is_none());
    }

    #[test]
    fn test_transfer_builder_routes_by_club() {
        let from_club = ClubId::new();
        let clubbed = TestPlayerBuilder::new().with_club(from_club).build();
        let transfer = TestTransferBuilder::local(clubbed, ClubId::new()).build();
        assert_eq!(transfer.status, TransferStatus::PendingFromClub);

        let free = TestPlayerBuilder::free_agent().build();
        let transfer = TestTransferBuilder::free(free, ClubId::new()).build();
        assert_eq!(transfer.status, TransferStatus::PendingPayment);
    }

    #[test]
    fn test_payment_builder_matches_invoice() {
        let invoice = TestInvoiceBuilder::new().build();
        let payment = TestPaymentBuilder::new().for_invoice(&invoice).build();

        assert_eq!(payment.invoice_id, invoice.id);
        assert_eq!(payment.amount, invoice.amount);
        assert!(payment.is_pending());
    }
}
