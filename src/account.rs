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

//! Account management.
//!
//! An [`Account`] keeps its two balances and its journal behind one lock, so
//! validating, mutating and appending entries happen as a single step and a
//! reader never sees a balance without the entries that explain it.
//!
//! # Example
//!
//! ```
//! use points_wallet::{Account, AccountId};
//! use rust_decimal::Decimal;
//!
//! let account = Account::new(AccountId::from("alice"));
//! assert_eq!(account.points(), Decimal::ZERO);
//! assert_eq!(account.money(), Decimal::ZERO);
//! ```

use crate::base::{AccountId, EntryIdGenerator};
use crate::entry::{Currency, EntryType, LedgerEntry, POINTS_PER_MONEY};
use crate::{LedgerError, Operation};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};

#[derive(Debug)]
struct AccountData {
    id: AccountId,
    points: Decimal,
    money: Decimal,
    created_at: DateTime<Utc>,
    /// Entries grouped by the operation that created them, oldest first.
    journal: Vec<Vec<LedgerEntry>>,
}

impl AccountData {
    fn new(id: AccountId) -> Self {
        Self {
            id,
            points: Decimal::ZERO,
            money: Decimal::ZERO,
            created_at: Utc::now(),
            journal: Vec::new(),
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.points >= Decimal::ZERO,
            "Invariant violated: points balance went negative: {}",
            self.points
        );
        debug_assert!(
            self.money >= Decimal::ZERO,
            "Invariant violated: money balance went negative: {}",
            self.money
        );
    }

    fn balance(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Points => self.points,
            Currency::Money => self.money,
        }
    }

    fn set_balance(&mut self, currency: Currency, value: Decimal) {
        match currency {
            Currency::Points => self.points = value,
            Currency::Money => self.money = value,
        }
    }

    /// Balance after adding `amount`, without applying it.
    fn credited(&self, currency: Currency, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.balance(currency)
            .checked_add(amount)
            .ok_or(LedgerError::InvalidInput("amount out of range"))
    }

    /// Balance after removing `amount`, without applying it.
    fn debited(&self, currency: Currency, amount: Decimal) -> Result<Decimal, LedgerError> {
        let balance = self.balance(currency);
        if balance < amount {
            return Err(match currency {
                Currency::Points => LedgerError::InsufficientPoints,
                Currency::Money => LedgerError::InsufficientFunds,
            });
        }
        Ok(balance - amount)
    }

    fn entry(
        &self,
        ids: &EntryIdGenerator,
        entry_type: EntryType,
        currency: Currency,
        amount: Decimal,
        reason: &str,
    ) -> LedgerEntry {
        LedgerEntry {
            id: ids.next_id(),
            account_id: self.id.clone(),
            entry_type,
            currency,
            amount,
            reason: reason.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Validates and applies `operation`, returning the entries it produced.
    ///
    /// All fallible checks run before any field is written.
    fn apply(
        &mut self,
        operation: &Operation,
        ids: &EntryIdGenerator,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        operation.validate()?;
        let entry_type = operation.entry_type();
        let reason = operation.reason();

        let entries = match *operation {
            Operation::Award {
                currency, amount, ..
            } => {
                let balance = self.credited(currency, amount)?;
                self.set_balance(currency, balance);
                vec![self.entry(ids, entry_type, currency, amount, reason)]
            }
            Operation::Redeem { points, .. } => {
                let balance = self.debited(Currency::Points, points)?;
                self.set_balance(Currency::Points, balance);
                vec![self.entry(ids, entry_type, Currency::Points, -points, reason)]
            }
            Operation::Withdraw { amount, .. } => {
                let balance = self.debited(Currency::Money, amount)?;
                self.set_balance(Currency::Money, balance);
                vec![self.entry(ids, entry_type, Currency::Money, -amount, reason)]
            }
            Operation::Convert { direction, amount } => {
                let converted = amount
                    .checked_mul(POINTS_PER_MONEY)
                    .ok_or(LedgerError::InvalidInput("amount out of range"))?;
                // `amount` is always the money side of the exchange.
                let (debit, credit) = match direction.source() {
                    Currency::Points => (converted, amount),
                    Currency::Money => (amount, converted),
                };
                let source = self.debited(direction.source(), debit)?;
                let target = self.credited(direction.target(), credit)?;
                self.set_balance(direction.source(), source);
                self.set_balance(direction.target(), target);

                let reason = direction.to_string();
                vec![
                    self.entry(ids, entry_type, direction.source(), -debit, &reason),
                    self.entry(ids, entry_type, direction.target(), credit, &reason),
                ]
            }
        };

        self.journal.push(entries.clone());
        self.assert_invariants();
        Ok(entries)
    }

    fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id.clone(),
            points: self.points,
            money: self.money,
            created_at: self.created_at,
        }
    }
}

/// Point-in-time copy of an account's balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub points: Decimal,
    pub money: Decimal,
    pub created_at: DateTime<Utc>,
}

impl AccountSnapshot {
    /// Zero balances for an account that has not been stored.
    pub fn empty(id: AccountId) -> Self {
        Self {
            id,
            points: Decimal::ZERO,
            money: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }
}

impl Serialize for AccountSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Account", 4)?;
        state.serialize_field("id", &self.id)?;
        // Unrounded, so balances match the sum of serialized entries.
        state.serialize_field("points", &self.points)?;
        state.serialize_field("money", &self.money)?;
        state.serialize_field("createdAt", &self.created_at)?;
        state.end()
    }
}

/// Outcome of a successful balance-changing operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Receipt {
    /// Balances after the operation.
    pub account: AccountSnapshot,
    /// Entries appended by the operation, in creation order.
    pub entries: Vec<LedgerEntry>,
}

/// Wallet account.
#[derive(Debug)]
pub struct Account {
    inner: Mutex<AccountData>,
}

impl Account {
    pub fn new(id: AccountId) -> Self {
        Self {
            inner: Mutex::new(AccountData::new(id)),
        }
    }

    pub fn id(&self) -> AccountId {
        self.inner.lock().id.clone()
    }

    pub fn points(&self) -> Decimal {
        self.inner.lock().points
    }

    pub fn money(&self) -> Decimal {
        self.inner.lock().money
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.lock().created_at
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        self.inner.lock().snapshot()
    }

    /// Returns the account's entries, newest operation first.
    ///
    /// The two legs of a conversion keep their creation order.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        let data = self.inner.lock();
        data.journal.iter().rev().flatten().cloned().collect()
    }

    /// Number of entries recorded for this account.
    pub fn entry_count(&self) -> usize {
        self.inner.lock().journal.iter().map(Vec::len).sum()
    }

    /// Applies an operation under the account lock.
    ///
    /// On error nothing is written: balances and journal stay as they were.
    pub fn apply(
        &self,
        operation: &Operation,
        ids: &EntryIdGenerator,
    ) -> Result<Receipt, LedgerError> {
        let mut data = self.inner.lock();
        let entries = data.apply(operation, ids)?;
        Ok(Receipt {
            account: data.snapshot(),
            entries,
        })
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.snapshot().serialize(serializer)
    }
}
