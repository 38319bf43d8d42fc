use crate::args::LedgerArgs;
use crate::commands::Out;
use crate::generate::{summarize, Request};
use crate::report::Report;
use crate::{Config, Result};

/// Reads, classifies and totals the ledger in `args` without writing a report.
///
/// The message names the period and the three totals. The structure holds the complete report
/// state: every category, subcategory and transaction.
pub fn summary(config: &Config, args: &LedgerArgs) -> Result<Out<Report>> {
    let request = Request::new(
        args.input(),
        args.starting_balance().value(),
        args.ending_balance().value(),
    )
    .with_submitted_line(config.submitted_line());

    let report = summarize(&request)?;
    let totals = report.totals();
    let message = format!(
        "{}: income {}, expenses {}, net change {}",
        report.period(),
        totals.inflows(),
        totals.outflows(),
        totals.net()
    );
    Ok(Out::new(message, report))
}
