//! Turns a ledger CSV export into a treasurer's report.
//!
//! The pipeline reads dated rows from the export ([`Request`] names the file and the period's
//! balances), files each transaction under an income or expense category tree, totals the trees
//! and renders the result as Markdown. [`generate`] writes the rendered report to a new temporary
//! file and returns its path; [`summarize`] stops before rendering.

pub mod args;
mod classify;
pub mod commands;
mod config;
mod document;
mod error;
mod generate;
mod ingest;
pub mod model;
mod report;
mod totals;
mod utils;

#[cfg(test)]
mod test;

pub use classify::{Flow, Ledger};
pub use config::{default_config_path, Config};
pub use document::{DocumentRenderer, MarkdownDocument};
pub use error::{Error, ErrorType, Result};
pub use generate::{generate, summarize, Request};
pub use ingest::is_date;
pub use report::{Report, ReportPeriod};
pub use totals::Totals;
