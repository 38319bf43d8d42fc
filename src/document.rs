//! Hand-off of a finished report to whatever turns it into a distributable document.

use crate::error::{ErrorType, IntoResult, Res};
use crate::utils;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Converts the Markdown report at `report` into a document and returns the document's path.
///
/// Implementations take ownership of the intermediate report file and must remove it once they
/// are done with it.
pub trait DocumentRenderer {
    fn convert(&self, report: &Path) -> Result<PathBuf>;
}

/// Publishes the report as a Markdown file at a chosen destination.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MarkdownDocument {
    destination: PathBuf,
}

impl MarkdownDocument {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    fn publish(&self, report: &Path) -> Res<PathBuf> {
        utils::copy(report, &self.destination)?;
        utils::remove(report)?;
        debug!("Removed intermediate report {}", report.display());
        Ok(self.destination.clone())
    }
}

impl DocumentRenderer for MarkdownDocument {
    fn convert(&self, report: &Path) -> Result<PathBuf> {
        self.publish(report).pub_result(ErrorType::Render)
    }
}
