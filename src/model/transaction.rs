use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// The subcategory assigned when the category text has nothing after a colon.
pub const OTHER_SUBCATEGORY: &str = "Other";

/// A single ledger entry read from one dated CSV row.
///
/// Transactions are never modified once created. The sign of `amount` is significant: zero and
/// positive amounts are income, negative amounts are expenses.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    date: NaiveDate,
    payee: String,
    category: String,
    subcategory: String,
    amount: Decimal,
    account: String,
    notes: String,
    /// The 0-based index of the CSV record this transaction was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    row: Option<usize>,
}

impl Transaction {
    /// Creates a transaction. An empty `subcategory` is filed as `"Other"`.
    pub fn new(
        date: NaiveDate,
        payee: impl Into<String>,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        amount: Decimal,
        account: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        let subcategory = subcategory.into();
        Self {
            date,
            payee: payee.into(),
            category: category.into(),
            subcategory: if subcategory.is_empty() {
                OTHER_SUBCATEGORY.to_string()
            } else {
                subcategory
            },
            amount,
            account: account.into(),
            notes: notes.into(),
            row: None,
        }
    }

    pub(crate) fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn payee(&self) -> &str {
        &self.payee
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }
}
