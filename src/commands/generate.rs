use crate::args::GenerateArgs;
use crate::commands::Out;
use crate::document::{DocumentRenderer, MarkdownDocument};
use crate::generate::Request;
use crate::{Config, Result};
use std::path::PathBuf;

/// Generates the report for the ledger in `args` and, when `--output` was given, hands it to the
/// Markdown document renderer.
///
/// # Arguments
/// - `config` - Supplies the optional signature line.
/// - `args` - The ledger file, the balances and the optional destination.
///
/// # Returns
/// An `Out` whose structure is the path of the finished report.
///
/// # Errors
/// - Returns an ingestion error if the ledger cannot be read or parsed.
/// - Returns a render error if the report cannot be written or moved to its destination.
pub fn generate(config: &Config, args: &GenerateArgs) -> Result<Out<PathBuf>> {
    let ledger = args.ledger();
    let request = Request::new(
        ledger.input(),
        ledger.starting_balance().value(),
        ledger.ending_balance().value(),
    )
    .with_submitted_line(config.submitted_line());

    let artifact = crate::generate(&request)?;
    let path = match args.output() {
        Some(output) => MarkdownDocument::new(output).convert(&artifact)?,
        None => artifact,
    };
    Ok(Out::new(
        format!("Report written to {}", path.display()),
        path,
    ))
}
