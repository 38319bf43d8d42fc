//! The report state for one generation and its rendering to Markdown text.
//!
//! The rendered document has a fixed layout:
//! - a title naming the report period
//! - a narrative paragraph with the starting and ending balances and the net change
//! - a cash flow table
//! - an income by category table
//! - an expenses by category table
//! - an optional signature line

use crate::classify::Ledger;
use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{Amount, Categories, Transaction};
use crate::totals::Totals;
use crate::Result;
use anyhow::Context;
use chrono::{Datelike, Month};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter, Write};

/// The month a report covers, taken from the first transaction in the ledger.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ReportPeriod {
    Month { month: Month, year: i32 },
    /// The ledger had no transactions.
    Empty,
    /// The month could not be determined from the first transaction.
    ///
    /// `from_first` does not produce this today since a `NaiveDate` month is always 1 to 12. It
    /// keeps the `????` label available for period sources that can fail.
    Unknown,
}

impl ReportPeriod {
    /// Uses the first transaction in ledger order, which need not be the earliest by date.
    pub fn from_first(transaction: Option<&Transaction>) -> Self {
        let Some(transaction) = transaction else {
            return ReportPeriod::Empty;
        };
        let date = transaction.date();
        match u8::try_from(date.month()).map(Month::try_from) {
            Ok(Ok(month)) => ReportPeriod::Month {
                month,
                year: date.year(),
            },
            _ => ReportPeriod::Unknown,
        }
    }
}

impl Display for ReportPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ReportPeriod::Month { month, year } => write!(f, "{} {year}", month.name()),
            ReportPeriod::Empty => f.write_str("???"),
            ReportPeriod::Unknown => f.write_str("????"),
        }
    }
}

impl Serialize for ReportPeriod {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Everything needed to render one report. Built fresh for every generation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Report {
    period: ReportPeriod,
    starting_balance: Decimal,
    ending_balance: Decimal,
    ledger: Ledger,
    totals: Totals,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted_line: Option<String>,
}

impl Report {
    /// Classifies `transactions` and computes the totals.
    ///
    /// # Errors
    /// - `ErrorType::Ingestion` if a category total or one of the report totals overflows.
    pub fn new(
        transactions: Vec<Transaction>,
        starting_balance: Decimal,
        ending_balance: Decimal,
        submitted_line: Option<String>,
    ) -> Result<Self> {
        let period = ReportPeriod::from_first(transactions.first());
        let ledger = Ledger::classify(transactions)?;
        let totals = Totals::new(&ledger).pub_result(ErrorType::Ingestion)?;
        Ok(Self {
            period,
            starting_balance,
            ending_balance,
            ledger,
            totals,
            submitted_line,
        })
    }

    pub fn period(&self) -> ReportPeriod {
        self.period
    }

    pub fn starting_balance(&self) -> Decimal {
        self.starting_balance
    }

    pub fn ending_balance(&self) -> Decimal {
        self.ending_balance
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn submitted_line(&self) -> Option<&str> {
        self.submitted_line.as_deref()
    }

    /// Renders the report as Markdown text.
    ///
    /// Balances in the narrative and cash flow table are shown as currency. Totals in the tables
    /// are shown as the exact decimal value.
    pub fn render(&self) -> Result<String> {
        compose(self)
            .context("Unable to compose the report")
            .pub_result(ErrorType::Render)
    }
}

fn compose(report: &Report) -> Res<String> {
    let mut buf = String::new();
    write_summary(&mut buf, report)?;
    let totals = report.totals();
    write_income(&mut buf, report.ledger().credits(), totals.inflows())?;
    buf.push_str("\n\n<p></p>\n\n");
    write_expenses(&mut buf, report.ledger().debits(), totals.outflows())?;
    buf.push_str("\n\n<p></p>\n\n");
    if let Some(line) = report.submitted_line() {
        write!(buf, "\n\n<p><i>{line}</i></p>\n\n")?;
    }
    Ok(buf)
}

fn write_summary(buf: &mut String, report: &Report) -> fmt::Result {
    let period = report.period();
    let start = Amount::new(report.starting_balance());
    let end = Amount::new(report.ending_balance());
    let totals = report.totals();
    let direction = if totals.net() >= Decimal::ZERO {
        "increase"
    } else {
        "decrease"
    };
    let change = Amount::new(totals.net().abs());

    writeln!(buf, "# Treasurer's Report for {period}")?;
    writeln!(buf)?;
    writeln!(buf, "<p>The beginning balance for {period} was {start}")?;
    writeln!(buf)?;
    writeln!(buf)?;
    writeln!(
        buf,
        "The ending balance for {period} was {end}, a net {direction} of {change}</p>"
    )?;
    writeln!(buf)?;
    writeln!(buf, "<p><br/></p>")?;
    writeln!(buf)?;
    writeln!(buf, "| **Cash Flow for {period}** | |")?;
    writeln!(buf, "| :--- | ---: |")?;
    writeln!(buf, "| Starting Balance | {start} |")?;
    writeln!(buf, "| Ending Balance | {end} |")?;
    writeln!(buf, "| <br/> | <br/> |")?;
    writeln!(buf, "| Total Income | {} |", totals.inflows())?;
    writeln!(buf, "| Total Expenses | {} |", totals.outflows())?;
    writeln!(buf, "| <br/> | <br/> |")?;
    writeln!(buf, "| Net Change | {} |", totals.net())?;
    write!(buf, "\n\n<p></p>\n\n")
}

fn write_table_header(buf: &mut String, title: &str) -> fmt::Result {
    write!(buf, "<br/><br/>**{title}**\n\n")?;
    writeln!(
        buf,
        "| **Category** | **Subcategory** | **Amount** | **Category Total** |"
    )?;
    writeln!(buf, "| :--- | :--- | ---: | ---: |")
}

fn write_category_rows(buf: &mut String, categories: &Categories, spacer: &str) -> fmt::Result {
    for category in categories.iter() {
        writeln!(buf, "| {} |  |  | {} |", category.name(), category.total())?;
        for subcategory in category.subcategories() {
            writeln!(
                buf,
                "|  | {} | {} |  |",
                subcategory.name(),
                subcategory.total()
            )?;
        }
        buf.push_str(spacer);
    }
    Ok(())
}

fn write_income(buf: &mut String, credits: &Categories, total: Decimal) -> fmt::Result {
    write_table_header(buf, "Income By Category")?;
    write_category_rows(buf, credits, "")?;
    writeln!(buf, "|||||")?;
    writeln!(buf, "| **TOTAL** ||| **{total}** |")
}

fn write_expenses(buf: &mut String, debits: &Categories, total: Decimal) -> fmt::Result {
    write_table_header(buf, "Expenses By Category")?;
    write_category_rows(buf, debits, "|||||\n|||||\n")?;
    writeln!(buf, "|||||")?;
    writeln!(buf, "|||||")?;
    writeln!(buf, "| **TOTAL** ||| **{total}** |")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn t(date: (i32, u32, u32), category: &str, sub: &str, amount: Decimal) -> Transaction {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        Transaction::new(date, "payee", category, sub, amount, "Checking", "")
    }

    #[test]
    fn test_period_uses_first_transaction() {
        let transactions = vec![
            t((2024, 3, 15), "Dues", "Annual", dec!(125.00)),
            t((2024, 1, 2), "Dues", "Annual", dec!(10)),
        ];
        let period = ReportPeriod::from_first(transactions.first());
        assert_eq!(period.to_string(), "March 2024");
    }

    #[test]
    fn test_period_empty() {
        assert_eq!(ReportPeriod::from_first(None).to_string(), "???");
        assert_eq!(ReportPeriod::Unknown.to_string(), "????");
    }

    #[test]
    fn test_render_single_transaction() {
        let report = Report::new(
            vec![t((2024, 3, 15), "Dues", "Annual", dec!(125.00))],
            dec!(1000),
            dec!(1125),
            None,
        )
        .unwrap();
        let text = report.render().unwrap();
        assert!(text.starts_with("# Treasurer's Report for March 2024\n"));
        assert!(text.contains("<p>The beginning balance for March 2024 was $1,000.00\n"));
        assert!(text.contains(
            "The ending balance for March 2024 was $1,125.00, a net increase of $125.00</p>"
        ));
        assert!(text.contains("| **Cash Flow for March 2024** | |\n"));
        assert!(text.contains("| Starting Balance | $1,000.00 |\n"));
        assert!(text.contains("| Total Income | 125.00 |\n"));
        assert!(text.contains("| Total Expenses | 0 |\n"));
        assert!(text.contains("| Net Change | 125.00 |\n"));
        assert!(text.contains("| Dues |  |  | 125.00 |\n|  | Annual | 125.00 |  |\n"));
        assert!(text.contains("| **TOTAL** ||| **125.00** |\n"));
        assert!(!text.contains("<i>"));
    }

    #[test]
    fn test_render_decrease_uses_absolute_value() {
        let report = Report::new(
            vec![t((2024, 7, 4), "Field Day", "Food", dec!(-1234.5))],
            dec!(2000),
            dec!(765.50),
            None,
        )
        .unwrap();
        let text = report.render().unwrap();
        assert!(text.contains("a net decrease of $1,234.50</p>"));
        assert!(text.contains("| Net Change | -1234.5 |\n"));
    }

    #[test]
    fn test_render_section_order() {
        let report = Report::new(
            vec![
                t((2024, 4, 1), "Utilities", "", dec!(-60.25)),
                t((2024, 4, 2), "Dues", "Annual", dec!(50)),
                t((2024, 4, 3), "Insurance", "Liability", dec!(-400)),
            ],
            dec!(0),
            dec!(0),
            Some("Respectfully Submitted by Pat Doe".to_string()),
        )
        .unwrap();
        let text = report.render().unwrap();
        let cash_flow = text.find("**Cash Flow for April 2024**").unwrap();
        let income = text.find("**Income By Category**").unwrap();
        let expenses = text.find("**Expenses By Category**").unwrap();
        let insurance = text.find("| Insurance |").unwrap();
        let utilities = text.find("| Utilities |").unwrap();
        let signature = text
            .find("<p><i>Respectfully Submitted by Pat Doe</i></p>")
            .unwrap();
        assert!(cash_flow < income);
        assert!(income < expenses);
        assert!(expenses < insurance);
        assert!(insurance < utilities);
        assert!(utilities < signature);
        assert!(text.contains("|  | Other | -60.25 |  |\n|||||\n|||||\n"));
        assert!(text.contains("| **TOTAL** ||| **-460.25** |\n"));
    }

    #[test]
    fn test_render_empty() {
        let report = Report::new(Vec::new(), dec!(10), dec!(10), None).unwrap();
        let text = report.render().unwrap();
        assert!(text.starts_with("# Treasurer's Report for ???\n"));
        assert!(text.contains("a net increase of $0.00</p>"));
        assert!(text.contains("| Total Income | 0 |\n"));
        assert!(text.contains("| Net Change | 0 |\n"));
        assert_eq!(text.matches("| **TOTAL** ||| **0** |").count(), 2);
    }

    #[test]
    fn test_serialize_summary() {
        let report = Report::new(
            vec![t((2024, 3, 15), "Dues", "Annual", dec!(125.00))],
            dec!(1),
            dec!(2),
            None,
        )
        .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["period"], "March 2024");
        assert_eq!(json["totals"]["inflows"], "125.00");
        assert!(json.get("submitted_line").is_none());
        let dues = &json["ledger"]["credits"]["Dues"];
        assert_eq!(dues["subcategories"]["Annual"]["total"], "125.00");
    }

    #[test]
    fn test_render_large_balances_exactly() {
        let report = Report::new(
            Vec::new(),
            dec!(12345678901234567.89),
            dec!(12345678901234567.89),
            None,
        )
        .unwrap();
        let text = report.render().unwrap();
        assert!(text.contains("| Starting Balance | $12,345,678,901,234,567.89 |\n"));
    }

    #[test]
    fn test_new_overflow_is_ingestion_error() {
        let e = Report::new(
            vec![
                t((2024, 3, 1), "Dues", "Annual", Decimal::MAX),
                t((2024, 3, 2), "Raffle", "Tickets", dec!(1)),
            ],
            dec!(0),
            dec!(0),
            None,
        )
        .unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Ingestion);
        assert_eq!(e.row(), None);
    }
}
