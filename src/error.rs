//! Error types for cashlens

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A raw row could not be turned into a transaction record.
    /// `row` is the zero-based position in the input batch.
    #[error("Malformed record at row {}: {reason}", row + 1)]
    MalformedRecord { row: usize, reason: String },

    #[error("Invalid budget for {category}: {amount} is negative")]
    InvalidBudget { category: String, amount: Decimal },

    #[error("Config error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
