//! These structs provide the CLI interface for the treasurer-report CLI.

use crate::config::{default_config_path, CONFIG_FILE};
use crate::model::Amount;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// treasurer-report: Turns a month of ledger transactions into a treasurer's report.
///
/// Export the month's transactions from your finance software as a CSV file, look up the
/// account's starting and ending balance for the month, and run `treasurer-report generate`.
/// Income and expenses are grouped by category and subcategory, transfers between your own
/// accounts are left out, and the result is written as a Markdown document.
///
/// An optional signature line for the bottom of the report can be set in ~/.treasurer-report:
///
///     submitted_line=Respectfully submitted by Pat Doe, Treasurer
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the report for a ledger export and print where it was written.
    ///
    /// Without --output the report is left in a temporary file whose path is printed. With
    /// --output the report is moved to that path.
    Generate(GenerateArgs),
    /// Print the report period and totals for a ledger export without writing a report.
    Summary(LedgerArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The configuration file. Defaults to ~/.treasurer-report
    #[arg(long, env = "TREASURER_REPORT_CONFIG", default_value_t = default_config())]
    config: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> &DisplayPath {
        &self.config
    }
}

/// The ledger export and the balances that bracket it.
#[derive(Debug, Parser, Clone)]
pub struct LedgerArgs {
    /// The CSV file exported from your finance software.
    #[arg(long)]
    input: PathBuf,

    /// The account balance at the start of the period, e.g. 1234.56 or $1,234.56
    #[arg(long, allow_hyphen_values = true)]
    starting_balance: Amount,

    /// The account balance at the end of the period, e.g. 1234.56 or $1,234.56
    #[arg(long, allow_hyphen_values = true)]
    ending_balance: Amount,
}

impl LedgerArgs {
    pub fn new(
        input: impl Into<PathBuf>,
        starting_balance: Amount,
        ending_balance: Amount,
    ) -> Self {
        Self {
            input: input.into(),
            starting_balance,
            ending_balance,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn starting_balance(&self) -> Amount {
        self.starting_balance
    }

    pub fn ending_balance(&self) -> Amount {
        self.ending_balance
    }
}

/// (Not shown): Args for the `treasurer-report generate` command.
#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    ledger: LedgerArgs,

    /// Where to put the finished report. If omitted, the report stays in a temporary file.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn new(ledger: LedgerArgs, output: Option<PathBuf>) -> Self {
        Self { ledger, output }
    }

    pub fn ledger(&self) -> &LedgerArgs {
        &self.ledger
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

fn default_config() -> DisplayPath {
    DisplayPath(match default_config_path() {
        Some(path) => path,
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --config or TREASURER_REPORT_CONFIG. Without it, reports will \
                not include a signature line.",
            );
            PathBuf::from(CONFIG_FILE)
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
