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

//! # Points Wallet
//!
//! This library tracks per-account balances in two currencies, points and
//! money, and records every balance change as an immutable ledger entry.
//!
//! ## Core Components
//!
//! - [`Engine`]: Applies award, redeem, withdraw and convert operations
//! - [`Account`]: Balances plus journal behind a single lock
//! - [`AccountStore`]: Lazily creating, concurrent account map
//! - [`LedgerEntry`]: One signed delta in one currency
//! - [`LedgerError`]: Error types for rejected operations
//!
//! ## Example
//!
//! ```
//! use points_wallet::{AccountId, Currency, Engine, EntryType};
//! use rust_decimal_macros::dec;
//!
//! let engine = Engine::new();
//! let alice = AccountId::from("alice");
//!
//! engine.award(&alice, Currency::Points, dec!(150), "bonus").unwrap();
//! let receipt = engine.redeem(&alice, dec!(100), "shop").unwrap();
//! assert_eq!(receipt.account.points, dec!(50));
//!
//! // Newest first
//! let ledger = engine.ledger(&alice);
//! assert_eq!(ledger[0].entry_type, EntryType::Redeem);
//! assert_eq!(ledger[1].entry_type, EntryType::Award);
//! ```
//!
//! ## Thread Safety
//!
//! Operations on the same account are serialized by the account lock;
//! operations on different accounts run in parallel.

pub mod account;
mod base;
mod engine;
pub mod entry;
pub mod error;
mod operation;
mod store;

pub use account::{Account, AccountSnapshot, Receipt};
pub use base::{AccountId, EntryId, EntryIdGenerator};
pub use engine::Engine;
pub use entry::{Currency, Direction, EntryType, LedgerEntry, POINTS_PER_MONEY};
pub use error::LedgerError;
pub use operation::Operation;
pub use store::AccountStore;
