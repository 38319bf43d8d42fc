//! Sorts transactions into income and expense category trees.

use crate::error::{Error, ErrorType};
use crate::model::{Categories, Transaction};
use crate::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Which side of the ledger a transaction lands on.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// Zero or positive amounts.
    Credit,
    /// Negative amounts.
    Debit,
}

serde_plain::derive_display_from_serialize!(Flow);
serde_plain::derive_fromstr_from_deserialize!(Flow);

impl Flow {
    pub fn of(amount: Decimal) -> Self {
        if amount < Decimal::ZERO {
            Flow::Debit
        } else {
            Flow::Credit
        }
    }
}

/// The classified transactions: one category tree for income, one for expenses.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Ledger {
    credits: Categories,
    debits: Categories,
}

impl Ledger {
    /// Files every transaction into exactly one of the two trees, in the order given.
    ///
    /// # Errors
    /// - `ErrorType::Ingestion`, with the transaction's row index, if a running total overflows.
    pub fn classify(transactions: impl IntoIterator<Item = Transaction>) -> Result<Self> {
        info!("Categorizing transactions");
        let mut ledger = Ledger::default();
        for transaction in transactions {
            let flow = Flow::of(transaction.amount());
            let row = transaction.row();
            debug!(
                "{flow}: {} {}:{} {}",
                transaction.date(),
                transaction.category(),
                transaction.subcategory(),
                transaction.amount()
            );
            let tree = match flow {
                Flow::Credit => &mut ledger.credits,
                Flow::Debit => &mut ledger.debits,
            };
            tree.add(transaction).map_err(|e| {
                error!("Unable to add the {flow} from row {row:?}");
                let e = Error::new(ErrorType::Ingestion, e);
                match row {
                    Some(row) => e.at_row(row),
                    None => e,
                }
            })?;
        }
        Ok(ledger)
    }

    /// Income categories.
    pub fn credits(&self) -> &Categories {
        &self.credits
    }

    /// Expense categories.
    pub fn debits(&self) -> &Categories {
        &self.debits
    }
}
