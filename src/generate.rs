//! Runs the whole pipeline: read the ledger, classify, total, render and write the artifact.

use crate::error::{ErrorType, IntoResult, Res};
use crate::report::Report;
use crate::{ingest, Result};
use anyhow::Context;
use rust_decimal::Decimal;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

const ARTIFACT_PREFIX: &str = "temp-treasurer-report";
const ARTIFACT_SUFFIX: &str = ".md";

/// The inputs for one report generation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Request {
    input: PathBuf,
    starting_balance: Decimal,
    ending_balance: Decimal,
    submitted_line: Option<String>,
    artifact_dir: PathBuf,
}

impl Request {
    /// A request with no signature line that writes its artifact to the system temp directory.
    pub fn new(
        input: impl Into<PathBuf>,
        starting_balance: Decimal,
        ending_balance: Decimal,
    ) -> Self {
        Self {
            input: input.into(),
            starting_balance,
            ending_balance,
            submitted_line: None,
            artifact_dir: std::env::temp_dir(),
        }
    }

    pub fn with_submitted_line(mut self, submitted_line: Option<impl Into<String>>) -> Self {
        self.submitted_line = submitted_line.map(Into::into);
        self
    }

    pub fn with_artifact_dir(mut self, artifact_dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = artifact_dir.into();
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn starting_balance(&self) -> Decimal {
        self.starting_balance
    }

    pub fn ending_balance(&self) -> Decimal {
        self.ending_balance
    }

    pub fn submitted_line(&self) -> Option<&str> {
        self.submitted_line.as_deref()
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }
}

/// Reads, classifies and totals the ledger named by `request` without writing anything.
///
/// # Errors
/// - `ErrorType::Ingestion` if the ledger cannot be read, a dated row cannot be parsed, or a total
///   overflows.
pub fn summarize(request: &Request) -> Result<Report> {
    let transactions = ingest::read_ledger(request.input())?;
    debug!("Read {} transactions", transactions.len());
    Report::new(
        transactions,
        request.starting_balance(),
        request.ending_balance(),
        request.submitted_line().map(str::to_string),
    )
}

/// Produces the report for `request` and returns the path of the newly written Markdown file.
///
/// The caller owns the returned file and is responsible for removing it.
///
/// # Errors
/// - `ErrorType::Ingestion` if the ledger cannot be read or a dated row cannot be parsed.
/// - `ErrorType::Render` if the report cannot be composed or written.
///
/// No file is left behind when an error is returned.
pub fn generate(request: &Request) -> Result<PathBuf> {
    let report = summarize(request)?;
    info!("Writing report for {}", report.period());
    let text = report.render()?;
    let path = write_artifact(request.artifact_dir(), &text).pub_result(ErrorType::Render)?;
    info!("Wrote report to {}", path.display());
    Ok(path)
}

fn write_artifact(dir: &Path, text: &str) -> Res<PathBuf> {
    let mut file = artifact_builder()
        .tempfile_in(dir)
        .with_context(|| format!("Unable to create a report file in {}", dir.display()))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("Unable to write to {}", file.path().display()))?;
    file.flush()
        .with_context(|| format!("Unable to write to {}", file.path().display()))?;
    keep(file)
}

#[cfg(unix)]
fn artifact_builder() -> tempfile::Builder<'static, 'static> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;
    let mut builder = tempfile::Builder::new();
    builder
        .prefix(ARTIFACT_PREFIX)
        .suffix(ARTIFACT_SUFFIX)
        .permissions(Permissions::from_mode(0o600));
    builder
}

#[cfg(not(unix))]
fn artifact_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(ARTIFACT_PREFIX).suffix(ARTIFACT_SUFFIX);
    builder
}

fn keep(file: NamedTempFile) -> Res<PathBuf> {
    file.into_temp_path()
        .keep()
        .context("Unable to keep the report file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestLedger;
    use rust_decimal_macros::dec;

    #[test]
    fn test_generate_writes_artifact() {
        let ledger = TestLedger::new(&[
            vec!["Transactions - March 2024"],
            vec!["", "", "", "Date", "", "Payee", "Category", "", "", "Amount"],
            TestLedger::row("3/15/2024", "W1AW", "Dues:Annual", "125.00"),
        ]);
        let request = ledger.request(dec!(100), dec!(225));
        let path = generate(&request).unwrap();

        assert!(path.starts_with(ledger.artifact_dir()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(ARTIFACT_PREFIX));
        assert!(name.ends_with(ARTIFACT_SUFFIX));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Treasurer's Report for March 2024"));
    }

    #[cfg(unix)]
    #[test]
    fn test_artifact_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let ledger = TestLedger::new(&[TestLedger::row("1/1/2024", "A", "Dues", "1")]);
        let path = generate(&ledger.request(dec!(0), dec!(1))).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_generate_twice_gives_distinct_artifacts() {
        let ledger = TestLedger::new(&[TestLedger::row("1/1/2024", "A", "Dues", "1")]);
        let request = ledger.request(dec!(0), dec!(1));
        let first = generate(&request).unwrap();
        let second = generate(&request).unwrap();
        assert_ne!(first, second);
        assert_eq!(
            std::fs::read_to_string(first).unwrap(),
            std::fs::read_to_string(second).unwrap()
        );
    }

    #[test]
    fn test_generate_bad_amount_leaves_nothing_behind() {
        let ledger = TestLedger::new(&[
            TestLedger::row("3/1/2024", "A", "Dues", "10.00"),
            TestLedger::row("3/2/2024", "B", "Dues", "ten"),
        ]);
        let e = generate(&ledger.request(dec!(0), dec!(10))).unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Ingestion);
        assert_eq!(e.row(), Some(1));
        assert_eq!(ledger.artifacts().len(), 0);
    }

    #[test]
    fn test_generate_overflowing_total_leaves_nothing_behind() {
        let ledger = TestLedger::new(&[
            vec!["Transactions - March 2024"],
            TestLedger::row("3/1/2024", "A", "Dues", "79228162514264337593543950335"),
            TestLedger::row("3/2/2024", "B", "Dues", "1"),
        ]);
        let e = generate(&ledger.request(dec!(0), dec!(0))).unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Ingestion);
        assert_eq!(e.row(), Some(2));
        assert!(e.to_string().contains("category 'Dues' overflowed"));
        assert!(ledger.artifacts().is_empty());
    }

    #[test]
    fn test_generate_missing_artifact_dir_is_render_error() {
        let ledger = TestLedger::new(&[TestLedger::row("3/1/2024", "A", "Dues", "10.00")]);
        let request = ledger
            .request(dec!(0), dec!(10))
            .with_artifact_dir(ledger.artifact_dir().join("missing"));
        let e = generate(&request).unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Render);
    }

    #[test]
    fn test_summarize_excludes_transfers() {
        let ledger = TestLedger::new(&[
            TestLedger::row("5/1/2024", "Club", "Dues:Annual", "40.00"),
            TestLedger::row("5/2/2024", "Bank", "Transfer:Savings", "-500.00"),
            TestLedger::row("5/3/2024", "Bank", "Transfer:Checking", "500.00"),
            TestLedger::row("5/9/2024", "Utility Co", "Utilities", "-20.00"),
        ]);
        let report = summarize(&ledger.request(dec!(0), dec!(20))).unwrap();
        assert_eq!(report.totals().inflows(), dec!(40.00));
        assert_eq!(report.totals().outflows(), dec!(-20.00));
        assert_eq!(report.totals().net(), dec!(20.00));
        assert!(report.ledger().credits().get("Transfer").is_none());
        assert!(report.ledger().debits().get("Transfer").is_none());
        let utilities = report.ledger().debits().get("Utilities").unwrap();
        assert_eq!(utilities.subcategory("Other").unwrap().total(), dec!(-20.00));
    }

    #[test]
    fn test_summarize_carries_submitted_line() {
        let ledger = TestLedger::new(&[]);
        let request = ledger
            .request(dec!(0), dec!(0))
            .with_submitted_line(Some("Submitted by the Treasurer"));
        let report = summarize(&request).unwrap();
        assert_eq!(report.submitted_line(), Some("Submitted by the Treasurer"));
        assert!(report
            .render()
            .unwrap()
            .contains("<p><i>Submitted by the Treasurer</i></p>"));
    }
}
