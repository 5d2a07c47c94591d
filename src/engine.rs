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

//! Wallet engine.
//!
//! The [`Engine`] is the only writer of account balances. It exposes the
//! read operations ([`balance`](Engine::balance), [`ledger`](Engine::ledger))
//! and the balance-changing ones ([`award`](Engine::award),
//! [`redeem`](Engine::redeem), [`withdraw`](Engine::withdraw),
//! [`convert`](Engine::convert)).
//!
//! # Thread Safety
//!
//! Each mutation runs entirely under the target account's lock, so two
//! operations on the same account never interleave while operations on
//! different accounts proceed in parallel.

use crate::account::{AccountSnapshot, Receipt};
use crate::base::{AccountId, EntryIdGenerator};
use crate::entry::{Currency, Direction, LedgerEntry};
use crate::store::AccountStore;
use crate::{LedgerError, Operation};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Points and money wallet engine.
///
/// # Invariants
///
/// - `points >= 0` and `money >= 0` for every account after every operation.
/// - Per currency, the sum of an account's entry amounts equals its balance.
/// - A rejected operation changes neither balances nor ledger.
#[derive(Debug, Default)]
pub struct Engine {
    accounts: AccountStore,
    entry_ids: EntryIdGenerator,
}

impl Engine {
    /// Creates an engine with no accounts.
    pub fn new() -> Self {
        Engine {
            accounts: AccountStore::new(),
            entry_ids: EntryIdGenerator::new(),
        }
    }

    /// Applies an operation to an account, creating the account if needed.
    ///
    /// | Operation | Effect |
    /// |-----------|--------|
    /// | Award | Credits points or money |
    /// | Redeem | Debits points (fails if insufficient) |
    /// | Withdraw | Debits money (fails if insufficient) |
    /// | Convert | Exchanges at 100 points per money unit, recording both legs |
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidInput`] - Empty account ID, non-positive amount or overflow.
    /// - [`LedgerError::InsufficientPoints`] - Points balance too low.
    /// - [`LedgerError::InsufficientFunds`] - Money balance too low.
    pub fn process(
        &self,
        account_id: &AccountId,
        operation: Operation,
    ) -> Result<Receipt, LedgerError> {
        if account_id.is_empty() {
            return Err(LedgerError::InvalidInput("account id is required"));
        }
        // Reject malformed requests before the account is materialized.
        operation.validate()?;

        let account = self.accounts.get_or_create(account_id);
        match account.apply(&operation, &self.entry_ids) {
            Ok(receipt) => {
                debug!(
                    account = %account_id,
                    kind = %operation.entry_type(),
                    amount = %operation.amount(),
                    points = %receipt.account.points,
                    money = %receipt.account.money,
                    "operation applied"
                );
                Ok(receipt)
            }
            Err(error) => {
                info!(
                    account = %account_id,
                    kind = %operation.entry_type(),
                    amount = %operation.amount(),
                    %error,
                    "operation rejected"
                );
                Err(error)
            }
        }
    }

    /// Credits `amount` of `currency`. Fails only on invalid input.
    pub fn award(
        &self,
        account_id: &AccountId,
        currency: Currency,
        amount: Decimal,
        reason: &str,
    ) -> Result<Receipt, LedgerError> {
        self.process(
            account_id,
            Operation::Award {
                currency,
                amount,
                reason: reason.to_string(),
            },
        )
    }

    /// Debits `points` from the points balance.
    pub fn redeem(
        &self,
        account_id: &AccountId,
        points: Decimal,
        reason: &str,
    ) -> Result<Receipt, LedgerError> {
        self.process(
            account_id,
            Operation::Redeem {
                points,
                reason: reason.to_string(),
            },
        )
    }

    /// Debits `amount` from the money balance.
    pub fn withdraw(
        &self,
        account_id: &AccountId,
        amount: Decimal,
        reason: &str,
    ) -> Result<Receipt, LedgerError> {
        self.process(
            account_id,
            Operation::Withdraw {
                amount,
                reason: reason.to_string(),
            },
        )
    }

    /// Converts between currencies. `amount` is the money side of the exchange.
    ///
    /// Callers holding an unparsed direction should go through
    /// `str::parse::<Direction>`, which reports [`LedgerError::InvalidDirection`].
    pub fn convert(
        &self,
        account_id: &AccountId,
        direction: Direction,
        amount: Decimal,
    ) -> Result<Receipt, LedgerError> {
        self.process(account_id, Operation::Convert { direction, amount })
    }

    /// Current balances, creating the account on first reference.
    ///
    /// An empty ID is never stored; it reads as zero balances.
    pub fn balance(&self, account_id: &AccountId) -> AccountSnapshot {
        if account_id.is_empty() {
            return AccountSnapshot::empty(account_id.clone());
        }
        self.accounts.get_or_create(account_id).snapshot()
    }

    /// The account's entries, newest first. Empty for unknown accounts.
    pub fn ledger(&self, account_id: &AccountId) -> Vec<LedgerEntry> {
        self.accounts
            .get(account_id)
            .map(|account| account.entries())
            .unwrap_or_default()
    }

    /// Snapshots of all known accounts, sorted by ID.
    pub fn accounts(&self) -> Vec<AccountSnapshot> {
        self.accounts.snapshots()
    }

    /// Number of accounts referenced so far.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn invalid_input_does_not_create_account() {
        let engine = Engine::new();
        let id = AccountId::from("alice");

        let result = engine.award(&id, Currency::Points, Decimal::ZERO, "");
        assert!(matches!(result, Err(LedgerError::InvalidInput(_))));
        assert_eq!(engine.account_count(), 0);
    }

    #[test]
    fn empty_account_id_is_rejected() {
        let engine = Engine::new();
        let result = engine.award(&AccountId::from(""), Currency::Money, dec!(1), "");
        assert_eq!(
            result,
            Err(LedgerError::InvalidInput("account id is required"))
        );
        assert_eq!(engine.account_count(), 0);
    }

    #[test]
    fn balance_of_empty_id_does_not_create_account() {
        let engine = Engine::new();
        let snapshot = engine.balance(&AccountId::from(""));

        assert_eq!(snapshot.points, Decimal::ZERO);
        assert_eq!(snapshot.money, Decimal::ZERO);
        assert_eq!(engine.account_count(), 0);
        assert!(engine.accounts().is_empty());
    }

    #[test]
    fn sub_precision_amount_is_rejected_without_effect() {
        let engine = Engine::new();
        let alice = AccountId::from("alice");
        engine.award(&alice, Currency::Money, dec!(1), "").unwrap();

        for _ in 0..2 {
            let result = engine.award(&alice, Currency::Money, dec!(0.00004), "");
            assert!(matches!(result, Err(LedgerError::InvalidInput(_))));
        }
        assert_eq!(engine.balance(&alice).money, dec!(1));
        assert_eq!(engine.ledger(&alice).len(), 1);
    }

    #[test]
    fn entry_ids_are_unique_across_accounts() {
        let engine = Engine::new();
        let a = engine
            .award(&AccountId::from("a"), Currency::Points, dec!(1), "")
            .unwrap();
        let b = engine
            .award(&AccountId::from("b"), Currency::Points, dec!(1), "")
            .unwrap();
        assert!(a.entries[0].id < b.entries[0].id);
    }
}
