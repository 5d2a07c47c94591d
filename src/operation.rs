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

//! Wallet operations.
//!
//! An [`Operation`] is the parsed, typed form of a balance-changing request.
//! Applying one to an account produces one ledger entry, or two for a
//! conversion (one per currency leg).

use crate::LedgerError;
use crate::entry::{Currency, Direction, EntryType};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Award {
        currency: Currency,
        amount: Decimal,
        reason: String,
    },
    Redeem {
        points: Decimal,
        reason: String,
    },
    Withdraw {
        amount: Decimal,
        reason: String,
    },
    Convert {
        direction: Direction,
        amount: Decimal,
    },
}

impl Operation {
    /// Most decimal places an amount may carry.
    pub const MAX_SCALE: u32 = 4;

    pub fn entry_type(&self) -> EntryType {
        match self {
            Self::Award { .. } => EntryType::Award,
            Self::Redeem { .. } => EntryType::Redeem,
            Self::Withdraw { .. } => EntryType::Withdraw,
            Self::Convert { .. } => EntryType::Convert,
        }
    }

    /// The primary numeric argument of the operation.
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Award { amount, .. } => *amount,
            Self::Redeem { points, .. } => *points,
            Self::Withdraw { amount, .. } => *amount,
            Self::Convert { amount, .. } => *amount,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Award { reason, .. } => reason,
            Self::Redeem { reason, .. } => reason,
            Self::Withdraw { reason, .. } => reason,
            Self::Convert { .. } => "",
        }
    }

    /// Checks the argument shape shared by every operation.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidInput`] if the amount is zero or negative,
    /// or has more than [`MAX_SCALE`](Self::MAX_SCALE) decimal places.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let amount = self.amount();
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidInput("amount must be positive"));
        }
        // Trailing zeros do not count: 1.50000 is 1.5.
        if amount.normalize().scale() > Self::MAX_SCALE {
            return Err(LedgerError::InvalidInput(
                "amount has more than 4 decimal places",
            ));
        }
        Ok(())
    }
}
