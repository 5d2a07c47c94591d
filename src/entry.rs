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

//! Ledger entries and the enums that classify them.
//!
//! An entry records exactly one signed currency delta on one account. Entries
//! are created by the [`Engine`](crate::Engine) and never mutated afterwards.

use crate::LedgerError;
use crate::base::{AccountId, EntryId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed exchange rate: points per one unit of money.
pub const POINTS_PER_MONEY: Decimal = Decimal::ONE_HUNDRED;

/// The two balances an account holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    Points,
    Money,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Points => f.write_str("POINTS"),
            Self::Money => f.write_str("MONEY"),
        }
    }
}

impl FromStr for Currency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("points") {
            Ok(Self::Points)
        } else if s.eq_ignore_ascii_case("money") {
            Ok(Self::Money)
        } else {
            Err(LedgerError::InvalidInput("unknown currency"))
        }
    }
}

/// Kind of operation that produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Award,
    Redeem,
    Withdraw,
    Convert,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Award => "AWARD",
            Self::Redeem => "REDEEM",
            Self::Withdraw => "WITHDRAW",
            Self::Convert => "CONVERT",
        };
        f.write_str(name)
    }
}

/// Conversion direction.
///
/// `amount` is always denominated in money: for [`PointsToMoney`] it is the
/// money to receive, for [`MoneyToPoints`] the money to give up.
///
/// [`PointsToMoney`]: Direction::PointsToMoney
/// [`MoneyToPoints`]: Direction::MoneyToPoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    PointsToMoney,
    MoneyToPoints,
}

impl Direction {
    /// Currency debited by the conversion.
    pub fn source(&self) -> Currency {
        match self {
            Self::PointsToMoney => Currency::Points,
            Self::MoneyToPoints => Currency::Money,
        }
    }

    /// Currency credited by the conversion.
    pub fn target(&self) -> Currency {
        match self {
            Self::PointsToMoney => Currency::Money,
            Self::MoneyToPoints => Currency::Points,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointsToMoney => f.write_str("POINTS_TO_MONEY"),
            Self::MoneyToPoints => f.write_str("MONEY_TO_POINTS"),
        }
    }
}

impl FromStr for Direction {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("points_to_money") {
            Ok(Self::PointsToMoney)
        } else if s.eq_ignore_ascii_case("money_to_points") {
            Ok(Self::MoneyToPoints)
        } else {
            Err(LedgerError::InvalidDirection)
        }
    }
}

/// Immutable record of a single balance change.
///
/// `amount` is signed: positive for credits, negative for debits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: EntryId,
    pub account_id: AccountId,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub currency: Currency,
    pub amount: Decimal,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
