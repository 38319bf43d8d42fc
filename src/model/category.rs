use crate::error::Res;
use crate::model::Transaction;
use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// A tree of categories, each holding subcategories, each holding transactions.
///
/// Categories and subcategories are created the first time a transaction names them and iterate
/// in alphabetical order so that a report is reproducible from the same ledger.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Categories(BTreeMap<String, Category>);

impl Categories {
    /// Files `transaction` under its category and subcategory, creating either as needed, and
    /// adds its amount to both running totals.
    ///
    /// Fails if either running total would leave the range of `Decimal`.
    pub(crate) fn add(&mut self, transaction: Transaction) -> Res<()> {
        let category = self
            .0
            .entry(transaction.category().to_string())
            .or_insert_with(|| Category::new(transaction.category()));
        category.add(transaction)
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sum of all category totals, zero when there are no categories.
    pub(crate) fn total(&self) -> Res<Decimal> {
        self.iter().try_fold(Decimal::ZERO, |sum, category| {
            sum.checked_add(category.total()).with_context(|| {
                format!("The total overflowed when adding category '{}'", category.name())
            })
        })
    }
}

/// A top-level category such as `Dues` in `Dues:Annual`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Category {
    name: String,
    total: Decimal,
    subcategories: BTreeMap<String, Subcategory>,
}

impl Category {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            total: Decimal::ZERO,
            subcategories: BTreeMap::new(),
        }
    }

    fn add(&mut self, transaction: Transaction) -> Res<()> {
        let total = self
            .total
            .checked_add(transaction.amount())
            .with_context(|| format!("The total for category '{}' overflowed", self.name))?;
        let subcategory = self
            .subcategories
            .entry(transaction.subcategory().to_string())
            .or_insert_with(|| Subcategory::new(transaction.subcategory()));
        subcategory.add(transaction)?;
        self.total = total;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn subcategory(&self, name: &str) -> Option<&Subcategory> {
        self.subcategories.get(name)
    }

    pub fn subcategories(&self) -> impl Iterator<Item = &Subcategory> {
        self.subcategories.values()
    }
}

/// The second level of classification such as `Annual` in `Dues:Annual`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Subcategory {
    name: String,
    total: Decimal,
    /// In the order they were read from the ledger.
    transactions: Vec<Transaction>,
}

impl Subcategory {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            total: Decimal::ZERO,
            transactions: Vec::new(),
        }
    }

    fn add(&mut self, transaction: Transaction) -> Res<()> {
        self.total = self.total.checked_add(transaction.amount()).with_context(|| {
            format!("The total for subcategory '{}' overflowed", self.name)
        })?;
        self.transactions.push(transaction);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}
