//! Error types for the report pipeline.
//!
//! Internally, functions return `Res<T>` (an `anyhow::Result`) and add context as they go. At the
//! public boundary these are converted into `Error`, which records the stage that failed so that
//! callers can tell an ingestion failure from a rendering failure.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

pub(crate) type Res<T> = anyhow::Result<T>;

pub type Result<T> = std::result::Result<T, Error>;

/// The pipeline stage that produced an `Error`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The source file could not be read, or a dated row could not be parsed.
    Ingestion,
    /// The report text could not be composed or written.
    Render,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// A failed report generation. No report artifact exists when one of these is returned.
pub struct Error {
    error_type: ErrorType,
    row: Option<usize>,
    source: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, source: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            row: None,
            source: source.into(),
        }
    }

    /// Attaches the 0-based index of the CSV row that was being processed.
    pub(crate) fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// The 0-based index of the offending row, for ingestion failures tied to a row.
    pub fn row(&self) -> Option<usize> {
        self.row
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("error_type", &self.error_type)
            .field("row", &self.row)
            .field("source", &self.source)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.row {
            Some(row) => write!(f, "{} error at row {row}: {:#}", self.error_type, self.source),
            None => write!(f, "{} error: {:#}", self.error_type, self.source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

/// Converts an internal `Res<T>` into the public `Result<T>`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Res<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
