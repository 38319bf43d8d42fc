//! Reads a ledger CSV export into `Transaction` values.
//!
//! The export has no header row that can be trusted, so columns are found by fixed position. Only
//! rows whose date column looks like `M/D/YYYY` become transactions; everything else (report
//! titles, blank lines, column headings, summary lines) is skipped.
//!
//! Exports are not always UTF-8. Records are read as bytes and decoded lossily, so bytes that are
//! not UTF-8 become U+FFFD and only a dated row that cannot be parsed fails the run.

use crate::error::{Error, ErrorType, IntoResult, Res};
use crate::model::{Transaction, OTHER_SUBCATEGORY};
use crate::Result;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ByteRecord, StringRecord};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{error, info, trace};

const COL_LABEL: usize = 0;
const COL_DATE: usize = 3;
const COL_PAYEE: usize = 5;
const COL_CATEGORY: usize = 6;
const COL_AMOUNT: usize = 9;
const COL_ACCOUNT: usize = 10;
const COL_NOTES: usize = 11;

const TRANSFER: &str = "Transfer:";

/// Summary lines written by the exporting tool. Totals are recomputed rather than trusted.
const SUMMARY_LABELS: [&str; 3] = ["Total Inflows:", "Total Outflows:", "Net Total:"];

/// What to do with one CSV row.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum RowOutcome {
    /// The row is a transaction.
    Keep(Transaction),
    /// The row is a transfer between the organization's own accounts.
    Transfer,
    /// The row is one of the exporter's own total lines.
    Summary,
    /// The row has no date in the date column.
    Skip,
}

/// Reads every transaction from the CSV file at `path`, in file order.
///
/// # Errors
/// - `ErrorType::Ingestion` if the file cannot be opened or read.
/// - `ErrorType::Ingestion`, with the 0-based row index, if a dated row cannot be parsed.
pub(crate) fn read_ledger(path: &Path) -> Result<Vec<Transaction>> {
    info!("Parsing ledger CSV {}", path.display());
    let file = std::fs::File::open(path)
        .with_context(|| format!("Unable to open ledger file {}", path.display()))
        .pub_result(ErrorType::Ingestion)?;
    read_rows(file)
}

/// Reads every transaction from CSV `data`.
pub(crate) fn read_rows(data: impl Read) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut transactions = Vec::new();
    for (row_ix, result) in rdr.byte_records().enumerate() {
        let outcome = result
            .context("Unable to read CSV record")
            .map(decode)
            .and_then(|record| {
                parse_row(&record).with_context(|| match record.position() {
                    Some(pos) => format!("Unable to parse the transaction on line {}", pos.line()),
                    None => "Unable to parse the transaction".to_string(),
                })
            })
            .map_err(|e| {
                error!("Error while processing row {row_ix}");
                Error::new(ErrorType::Ingestion, e).at_row(row_ix)
            })?;

        match outcome {
            RowOutcome::Keep(transaction) => transactions.push(transaction.at_row(row_ix)),
            other => trace!("Skipping row {row_ix}: {other:?}"),
        }
    }
    Ok(transactions)
}

/// Decodes a record as UTF-8, replacing invalid sequences, and keeps its position in the file.
fn decode(record: ByteRecord) -> StringRecord {
    let position = record.position().cloned();
    let mut decoded = StringRecord::from_byte_record_lossy(record);
    decoded.set_position(position);
    decoded
}

/// Decides what a single CSV row is. The checks run in order and the first match wins.
pub(crate) fn parse_row(record: &StringRecord) -> Res<RowOutcome> {
    if record
        .get(COL_CATEGORY)
        .is_some_and(|category| category.contains(TRANSFER))
    {
        return Ok(RowOutcome::Transfer);
    }

    let label = record.get(COL_LABEL).unwrap_or_default();
    if SUMMARY_LABELS.iter().any(|summary| label.contains(summary)) {
        return Ok(RowOutcome::Summary);
    }

    match record.get(COL_DATE) {
        Some(date) if is_date(date) => Ok(RowOutcome::Keep(parse_transaction(record)?)),
        _ => Ok(RowOutcome::Skip),
    }
}

/// Returns true if `s` has the shape of a `M/D/YYYY` date: 8 to 10 characters, three
/// `/`-separated parts, one or two characters for month and day, and four for the year.
///
/// The parts are not checked for being numeric.
pub fn is_date(s: &str) -> bool {
    let len = s.chars().count();
    if !(8..=10).contains(&len) {
        return false;
    }

    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 3 {
        return false;
    }

    let short = |part: &str| (1..=2).contains(&part.chars().count());
    short(parts[0]) && short(parts[1]) && parts[2].chars().count() == 4
}

/// Parses a `month/day/year` date.
pub(crate) fn parse_date(s: &str) -> Res<NaiveDate> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 3 {
        bail!("Expected a month/day/year date, got '{s}'");
    }
    let month: u32 = parts[0]
        .parse()
        .with_context(|| format!("Invalid month in date '{s}'"))?;
    let day: u32 = parts[1]
        .parse()
        .with_context(|| format!("Invalid day in date '{s}'"))?;
    let year: i32 = parts[2]
        .parse()
        .with_context(|| format!("Invalid year in date '{s}'"))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("The date '{s}' does not exist"))
}

/// Splits `Category:Subcategory` on the first colon. Without a colon, or with nothing after
/// it, the subcategory is `"Other"`.
pub(crate) fn split_category(s: &str) -> (&str, &str) {
    match s.split_once(':') {
        Some((category, subcategory)) if !subcategory.is_empty() => (category, subcategory),
        Some((category, _)) => (category, OTHER_SUBCATEGORY),
        None => (s, OTHER_SUBCATEGORY),
    }
}

fn parse_transaction(record: &StringRecord) -> Res<Transaction> {
    let date = parse_date(field(record, COL_DATE, "date")?.trim())?;
    let payee = field(record, COL_PAYEE, "payee")?.trim();
    let (category, subcategory) = split_category(field(record, COL_CATEGORY, "category")?);
    let raw_amount = field(record, COL_AMOUNT, "amount")?;
    let amount = Decimal::from_str(raw_amount)
        .with_context(|| format!("Invalid amount '{raw_amount}'"))?;
    let account = field(record, COL_ACCOUNT, "account")?;
    let notes = field(record, COL_NOTES, "notes")?.trim();

    Ok(Transaction::new(
        date,
        payee,
        category,
        subcategory,
        amount,
        account,
        notes,
    ))
}

fn field<'a>(record: &'a StringRecord, ix: usize, name: &str) -> Res<&'a str> {
    record
        .get(ix)
        .with_context(|| format!("The row has no {name} column (index {ix})"))
}
