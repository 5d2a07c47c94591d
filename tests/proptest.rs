// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Property-based tests for the wallet engine.
//!
//! These tests verify invariants that should hold for any sequence of
//! operations, valid or not.

use points_wallet::{
    AccountId, Currency, Direction, Engine, LedgerEntry, LedgerError, Operation,
    POINTS_PER_MONEY,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a positive amount (0.0001 to 1000 with 4 decimal places).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000i64).prop_map(|units| Decimal::new(units, 4))
}

/// Amounts including zero and negatives, to exercise input validation.
fn arb_any_amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        4 => arb_amount(),
        1 => Just(Decimal::ZERO),
        1 => arb_amount().prop_map(|amount| -amount),
    ]
}

fn arb_currency() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::Points), Just(Currency::Money)]
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::PointsToMoney), Just(Direction::MoneyToPoints)]
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (arb_currency(), arb_any_amount()).prop_map(|(currency, amount)| Operation::Award {
            currency,
            amount,
            reason: "award".to_string(),
        }),
        arb_any_amount().prop_map(|points| Operation::Redeem {
            points,
            reason: "redeem".to_string(),
        }),
        arb_any_amount().prop_map(|amount| Operation::Withdraw {
            amount,
            reason: "withdraw".to_string(),
        }),
        (arb_direction(), arb_any_amount())
            .prop_map(|(direction, amount)| Operation::Convert { direction, amount }),
    ]
}

fn ledger_sum(entries: &[LedgerEntry], currency: Currency) -> Decimal {
    entries
        .iter()
        .filter(|entry| entry.currency == currency)
        .map(|entry| entry.amount)
        .sum()
}

// =============================================================================
// Engine Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Balances never go negative and always equal the ledger sums.
    #[test]
    fn balances_match_ledger_and_stay_non_negative(
        operations in prop::collection::vec(arb_operation(), 1..40),
    ) {
        let engine = Engine::new();
        let alice = AccountId::from("alice");

        for operation in operations {
            let _ = engine.process(&alice, operation);

            let balance = engine.balance(&alice);
            let ledger = engine.ledger(&alice);
            prop_assert!(balance.points >= Decimal::ZERO);
            prop_assert!(balance.money >= Decimal::ZERO);
            prop_assert_eq!(ledger_sum(&ledger, Currency::Points), balance.points);
            prop_assert_eq!(ledger_sum(&ledger, Currency::Money), balance.money);
        }
    }

    /// A rejected operation leaves balances and ledger length unchanged;
    /// an accepted one appends exactly the entries it reports.
    #[test]
    fn rejected_operations_have_no_effect(
        operations in prop::collection::vec(arb_operation(), 1..40),
    ) {
        let engine = Engine::new();
        let alice = AccountId::from("alice");
        engine.balance(&alice);

        for operation in operations {
            let before = engine.balance(&alice);
            let before_len = engine.ledger(&alice).len();

            match engine.process(&alice, operation.clone()) {
                Ok(receipt) => {
                    let expected = if matches!(operation, Operation::Convert { .. }) { 2 } else { 1 };
                    prop_assert_eq!(receipt.entries.len(), expected);
                    prop_assert_eq!(engine.ledger(&alice).len(), before_len + expected);
                    prop_assert_eq!(receipt.account, engine.balance(&alice));
                }
                Err(_) => {
                    prop_assert_eq!(engine.balance(&alice), before);
                    prop_assert_eq!(engine.ledger(&alice).len(), before_len);
                }
            }
        }
    }

    /// Non-positive amounts are always rejected as invalid input.
    #[test]
    fn non_positive_amounts_are_invalid(
        operation in arb_operation(),
    ) {
        let engine = Engine::new();
        let alice = AccountId::from("alice");
        let non_positive = operation.amount() <= Decimal::ZERO;

        let result = engine.process(&alice, operation);
        if non_positive {
            prop_assert!(matches!(result, Err(LedgerError::InvalidInput(_))));
            prop_assert_eq!(engine.account_count(), 0);
        }
    }
}

// =============================================================================
// Award Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Sum of awards equals the balance.
    #[test]
    fn awards_sum_to_balance(
        amounts in prop::collection::vec(arb_amount(), 1..20),
        currency in arb_currency(),
    ) {
        let engine = Engine::new();
        let alice = AccountId::from("alice");
        let expected: Decimal = amounts.iter().copied().sum();

        for amount in amounts {
            engine.award(&alice, currency, amount, "").unwrap();
        }

        let balance = engine.balance(&alice);
        match currency {
            Currency::Points => prop_assert_eq!(balance.points, expected),
            Currency::Money => prop_assert_eq!(balance.money, expected),
        }
    }

    /// Cannot redeem more points than held.
    #[test]
    fn cannot_over_redeem(
        award in arb_amount(),
        extra in arb_amount(),
    ) {
        let engine = Engine::new();
        let alice = AccountId::from("alice");
        engine.award(&alice, Currency::Points, award, "").unwrap();

        let result = engine.redeem(&alice, award + extra, "");
        prop_assert_eq!(result, Err(LedgerError::InsufficientPoints));
        prop_assert_eq!(engine.balance(&alice).points, award);
    }

    /// Cannot withdraw more money than held.
    #[test]
    fn cannot_overdraw(
        award in arb_amount(),
        extra in arb_amount(),
    ) {
        let engine = Engine::new();
        let alice = AccountId::from("alice");
        engine.award(&alice, Currency::Money, award, "").unwrap();

        let result = engine.withdraw(&alice, award + extra, "");
        prop_assert_eq!(result, Err(LedgerError::InsufficientFunds));
        prop_assert_eq!(engine.balance(&alice).money, award);
    }
}

// =============================================================================
// Conversion Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Points-to-money costs exactly `amount * 100` points.
    #[test]
    fn points_to_money_rate_is_exact(
        amount in arb_amount(),
        spare in arb_amount(),
    ) {
        let engine = Engine::new();
        let alice = AccountId::from("alice");
        let required = amount * POINTS_PER_MONEY;
        engine.award(&alice, Currency::Points, required + spare, "").unwrap();

        let receipt = engine.convert(&alice, Direction::PointsToMoney, amount).unwrap();
        prop_assert_eq!(receipt.account.points, spare);
        prop_assert_eq!(receipt.account.money, amount);
    }

    /// Money-to-points yields exactly `amount * 100` points.
    #[test]
    fn money_to_points_rate_is_exact(
        amount in arb_amount(),
        spare in arb_amount(),
    ) {
        let engine = Engine::new();
        let alice = AccountId::from("alice");
        engine.award(&alice, Currency::Money, amount + spare, "").unwrap();

        let receipt = engine.convert(&alice, Direction::MoneyToPoints, amount).unwrap();
        prop_assert_eq!(receipt.account.money, spare);
        prop_assert_eq!(receipt.account.points, amount * POINTS_PER_MONEY);
    }

    /// Converting there and back restores the original balances.
    #[test]
    fn round_trip_conversion_is_lossless(
        money in arb_amount(),
    ) {
        let engine = Engine::new();
        let alice = AccountId::from("alice");
        engine.award(&alice, Currency::Money, money, "").unwrap();

        engine.convert(&alice, Direction::MoneyToPoints, money).unwrap();
        let receipt = engine.convert(&alice, Direction::PointsToMoney, money).unwrap();

        prop_assert_eq!(receipt.account.money, money);
        prop_assert_eq!(receipt.account.points, Decimal::ZERO);
    }
}
