mod budget;
mod category;
mod month;
mod transaction;

pub use budget::Budget;
pub use category::{CategoryKey, UNCATEGORIZED};
pub use month::YearMonth;
pub use transaction::{RawAmount, RawTransaction, TransactionRecord};

#[cfg(test)]
mod tests;
