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

//! Concurrent account store with lazy creation.
//!
//! Accounts are created on first reference with zero balances. The store
//! hands out `Arc<Account>` handles so the map shard lock is released before
//! the account's own lock is taken.

use crate::account::{Account, AccountSnapshot};
use crate::base::AccountId;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe map of account IDs to accounts.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: DashMap<AccountId, Arc<Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Returns the account for `id`, creating it with zero balances if absent.
    ///
    /// Uses the entry API, so concurrent first references agree on a single
    /// record.
    pub fn get_or_create(&self, id: &AccountId) -> Arc<Account> {
        if let Some(account) = self.accounts.get(id) {
            return Arc::clone(account.value());
        }
        let account = self
            .accounts
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Account::new(id.clone())));
        Arc::clone(account.value())
    }

    /// Returns the account for `id` without creating it.
    pub fn get(&self, id: &AccountId) -> Option<Arc<Account>> {
        self.accounts.get(id).map(|account| Arc::clone(account.value()))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Snapshots of every account, sorted by account ID.
    pub fn snapshots(&self) -> Vec<AccountSnapshot> {
        let accounts: Vec<Arc<Account>> = self
            .accounts
            .iter()
            .map(|account| Arc::clone(account.value()))
            .collect();
        let mut snapshots: Vec<_> = accounts.iter().map(|account| account.snapshot()).collect();
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }
}
