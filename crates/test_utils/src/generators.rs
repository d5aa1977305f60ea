//! Property-Based Test Generators
//!
//! Proptest strategies for generating random test data that maintains
//! domain invariants.

use core_kernel::{Currency, Money};
use domain_billing::GatewayOutcome;
use domain_transfer::TransferType;
use proptest::prelude::*;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::ZWL),
        Just(Currency::ZAR),
        Just(Currency::BWP),
        Just(Currency::EUR),
        Just(Currency::GBP),
    ]
}

/// Strategy for generating positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating positive USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::USD))
}

/// Strategy for generating positive Money values in any currency
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating transfer types
pub fn transfer_type_strategy() -> impl Strategy<Value = TransferType> {
    prop_oneof![
        Just(TransferType::Local),
        Just(TransferType::International),
        Just(TransferType::Loan),
        Just(TransferType::Free),
    ]
}

/// Strategy for generating gateway outcomes
pub fn gateway_outcome_strategy() -> impl Strategy<Value = GatewayOutcome> {
    prop_oneof![
        "[A-Z0-9]{8}".prop_map(|id| GatewayOutcome::Success {
            transaction_id: Some(id),
        }),
        Just(GatewayOutcome::Success {
            transaction_id: None,
        }),
        Just(GatewayOutcome::Failed),
        Just(GatewayOutcome::Pending),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_money_is_positive(money in positive_money_strategy()) {
            prop_assert!(money.is_positive());
        }

        #[test]
        fn generated_usd_money_round_trips(money in usd_money_strategy()) {
            let minor = money.to_minor();
            prop_assert_eq!(Money::from_minor(minor, Currency::USD), money);
        }
    }
}
