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

use anyhow::Context;
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use points_wallet::{AccountId, Currency, Direction, Engine, LedgerError, Operation};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Points Wallet - Replay wallet operation CSV files
///
/// Reads award, redeem, withdraw and convert operations from a CSV file and
/// writes the resulting balances (or ledgers) to stdout.
#[derive(Parser, Debug)]
#[command(name = "points-wallet")]
#[command(about = "A points and money wallet that replays operation CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with operations
    ///
    /// Expected format: op,account,unit,amount,reason
    /// Example: cargo run -- operations.csv > balances.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Write every account's ledger instead of the balances
    #[arg(long)]
    ledger: bool,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{e:#}");
        process::exit(1);
    }
}

/// Logs go to stderr so stdout stays a clean CSV. Filter via `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("opening '{}'", args.input.display()))?;

    let engine = process_operations(BufReader::new(file)).context("processing operations")?;

    let stdout = std::io::stdout();
    if args.ledger {
        write_ledger(&engine, stdout.lock()).context("writing ledger")?;
    } else {
        write_accounts(&engine, stdout.lock()).context("writing balances")?;
    }
    Ok(())
}

/// Raw CSV record matching the input format.
///
/// Fields: `op, account, unit, amount, reason`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    account: String,
    #[serde(default)]
    unit: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
    #[serde(default)]
    reason: Option<String>,
}

impl CsvRecord {
    /// Converts the record into an account ID and a typed operation.
    ///
    /// `unit` is the currency for awards and the direction for conversions.
    fn into_operation(self) -> Result<(AccountId, Operation), LedgerError> {
        let amount = self
            .amount
            .ok_or(LedgerError::InvalidInput("missing amount"))?;
        let unit = self.unit.unwrap_or_default();
        let reason = self.reason.unwrap_or_default();

        let operation = match self.op.to_lowercase().as_str() {
            "award" => Operation::Award {
                currency: unit.parse::<Currency>()?,
                amount,
                reason,
            },
            "redeem" => Operation::Redeem {
                points: amount,
                reason,
            },
            "withdraw" => Operation::Withdraw { amount, reason },
            "convert" => Operation::Convert {
                direction: unit.parse::<Direction>()?,
                amount,
            },
            _ => return Err(LedgerError::InvalidInput("unknown operation")),
        };

        Ok((AccountId::from(self.account), operation))
    }
}

/// Replays operations from a CSV reader.
///
/// Rows are streamed, so input size is not bounded by memory. Malformed rows
/// and rejected operations are logged and skipped.
///
/// # CSV Format
///
/// ```csv
/// op,account,unit,amount,reason
/// award,alice,points,150,bonus
/// redeem,alice,,100,shop
/// convert,alice,money_to_points,2,
/// ```
///
/// # Errors
///
/// Returns a CSV error only if the reader itself fails.
pub fn process_operations<R: Read>(reader: R) -> Result<Engine, csv::Error> {
    let engine = Engine::new();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for (line, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(line = line + 2, error = %e, "skipping malformed row");
                continue;
            }
        };

        let (account_id, operation) = match record.into_operation() {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(line = line + 2, error = %e, "skipping invalid operation");
                continue;
            }
        };

        // Rejections are logged by the engine.
        let _ = engine.process(&account_id, operation);
    }

    Ok(engine)
}

/// Writes account balances as CSV, sorted by account ID.
///
/// Columns: `id, points, money, createdAt`
pub fn write_accounts<W: Write>(engine: &Engine, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for snapshot in engine.accounts() {
        wtr.serialize(&snapshot)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes every account's ledger as CSV.
///
/// Accounts are sorted by ID; each account's entries are newest first.
/// Columns: `id, accountId, type, currency, amount, reason, createdAt`
pub fn write_ledger<W: Write>(engine: &Engine, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for snapshot in engine.accounts() {
        for entry in engine.ledger(&snapshot.id) {
            wtr.serialize(&entry)?;
        }
    }
    wtr.flush()?;
    Ok(())
}
