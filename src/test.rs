//! Shared test utilities for creating ledger files.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::generate::Request;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A ledger CSV file and an artifact directory inside a temporary directory.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestLedger {
    _temp_dir: TempDir,
    csv: PathBuf,
    artifact_dir: PathBuf,
}

impl TestLedger {
    /// Writes `rows` as a CSV file. Rows may have any number of fields.
    pub fn new(rows: &[Vec<&str>]) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let csv = temp_dir.path().join("ledger.csv");
        let artifact_dir = temp_dir.path().join("artifacts");
        std::fs::create_dir(&artifact_dir).unwrap();

        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&csv)
            .unwrap();
        for row in rows {
            wtr.write_record(row).unwrap();
        }
        wtr.flush().unwrap();

        Self {
            _temp_dir: temp_dir,
            csv,
            artifact_dir,
        }
    }

    /// A transaction row in the export's column layout.
    pub fn row<'a>(
        date: &'a str,
        payee: &'a str,
        category: &'a str,
        amount: &'a str,
    ) -> Vec<&'a str> {
        vec!["", "", "", date, "", payee, category, "", "", amount, "Checking", ""]
    }

    /// A request for this ledger that writes its artifact into `artifact_dir()`.
    pub fn request(&self, starting_balance: Decimal, ending_balance: Decimal) -> Request {
        Request::new(&self.csv, starting_balance, ending_balance)
            .with_artifact_dir(&self.artifact_dir)
    }

    pub fn csv(&self) -> &Path {
        &self.csv
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    /// The files currently in `artifact_dir()`.
    pub fn artifacts(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.artifact_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }
}
