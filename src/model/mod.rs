//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod category;
mod transaction;

pub use amount::{Amount, AmountError, AmountFormat};
pub use category::{Categories, Category, Subcategory};
pub use transaction::{Transaction, OTHER_SUBCATEGORY};
