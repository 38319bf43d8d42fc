//! Amount type for handling monetary values with optional dollar signs.
//!
//! Ledger amounts stay as exact `Decimal` values all the way through classification and totals.
//! `Amount` exists for the edges: reading balances typed by a person (which may carry a dollar
//! sign and commas) and presenting values as currency in the report narrative.

use rust_decimal::{Decimal, RoundingStrategy};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents how dollar amounts were (or should be) formatted.
///
/// # Examples
///  - `AmountFormat{ dollar: true, commas: true }` -> `-$60,000.00`
///  - `AmountFormat{ dollar: false, commas: false }` -> `-60000.00`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountFormat {
    /// Whether a dollar sign is present in the formatting.
    dollar: bool,
    /// Whether commas are present as thousands separators in the formatting.
    commas: bool,
}

/// US currency formatting: a dollar sign, commas and two fractional digits, e.g. `-$60,000.00`.
const CURRENCY: AmountFormat = AmountFormat {
    dollar: true,
    commas: true,
};

/// Represents a dollar amount.
///
/// When displayed in currency format the value is rounded half-to-even to cents and every digit is
/// taken from the exact decimal. The underlying `Decimal` is never rounded.
///
/// # Examples
///
/// Currency display:
/// ```
/// # use treasurer_report::model::Amount;
/// # use rust_decimal::Decimal;
/// # use std::str::FromStr;
/// let amount = Amount::new(Decimal::from_str("-1234.5").unwrap());
/// assert_eq!(amount.to_string(), "-$1,234.50");
/// ```
///
/// Parsing a balance typed by a person:
/// ```
/// # use treasurer_report::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("$5,000.25").unwrap();
/// let b = Amount::from_str("5000.25").unwrap();
/// assert_eq!(a.value(), b.value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    /// The parsed numerical value.
    value: Decimal,
    /// The way the numerical value was parsed from, or should be written to, a `String`.
    format: AmountFormat,
}

impl Amount {
    /// Creates a new Amount that displays as currency.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            format: CURRENCY,
        }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value().is_sign_negative() && !self.value().is_zero()
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut dollar_sign = false;
        let trimmed = s.trim();

        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            // Negative number: could be "-$50.00" or "-50.00"
            if let Some(after_dollar) = after_minus.strip_prefix('$') {
                dollar_sign = true;
                format!("-{after_dollar}")
            } else {
                trimmed.to_string()
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            dollar_sign = true;
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        let without_commas = without_dollar.replace(',', "");
        let commas = without_commas.len() < without_dollar.len();

        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount {
            value,
            format: AmountFormat {
                dollar: dollar_sign,
                commas,
            },
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let dol = if self.format.dollar { "$" } else { "" };
        let num = self.value().abs();

        if self.format.commas {
            let cents = num.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
            let whole = cents.trunc().normalize().mantissa();
            let fraction = (cents.fract() * Decimal::ONE_HUNDRED)
                .trunc()
                .normalize()
                .mantissa();
            write!(f, "{sign}{dol}{}.{fraction:02}", group_thousands(whole))
        } else {
            write!(f, "{sign}{dol}{num}")
        }
    }
}

/// Writes a non-negative integer with a comma between each group of three digits.
fn group_thousands(whole: i128) -> String {
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (ix, c) in digits.chars().enumerate() {
        if ix > 0 && (digits.len() - ix) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
