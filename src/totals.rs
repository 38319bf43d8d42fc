use crate::classify::Ledger;
use crate::error::Res;
use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;

/// Inflow, outflow and net totals for a classified ledger.
///
/// `outflows` is zero or negative and `net` is always exactly `inflows + outflows`.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Totals {
    inflows: Decimal,
    outflows: Decimal,
    net: Decimal,
}

impl Totals {
    pub(crate) fn new(ledger: &Ledger) -> Res<Self> {
        let inflows = ledger.credits().total().context("Unable to total income")?;
        let outflows = ledger.debits().total().context("Unable to total expenses")?;
        let net = inflows
            .checked_add(outflows)
            .context("The net change overflowed")?;
        Ok(Self {
            inflows,
            outflows,
            net,
        })
    }

    pub fn inflows(&self) -> Decimal {
        self.inflows
    }

    pub fn outflows(&self) -> Decimal {
        self.outflows
    }

    pub fn net(&self) -> Decimal {
        self.net
    }
}
