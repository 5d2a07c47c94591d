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

//! Error types for wallet operations.
//!
//! Every failure is a deterministic validation outcome: the operation that
//! produced it left balances and ledger untouched.

use thiserror::Error;

/// Wallet operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Missing account, non-positive amount, unknown currency or overflow
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Redeem or points-to-money conversion would exceed the points balance
    #[error("insufficient points")]
    InsufficientPoints,

    /// Withdrawal or money-to-points conversion would exceed the money balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Conversion direction is not one of the recognized values
    #[error("invalid conversion direction")]
    InvalidDirection,
}

impl LedgerError {
    /// Stable machine-readable code for transport layers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InsufficientPoints => "INSUFFICIENT_POINTS",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::InvalidDirection => "INVALID_DIRECTION",
        }
    }
}
