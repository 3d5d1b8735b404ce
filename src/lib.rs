//! Spending analytics over bank statement transactions.
//!
//! The pipeline is a chain of pure functions:
//! [`normalize`] → [`aggregate`] → [`trends`] / [`recurring`] → [`budget`] → [`insights`].
//! [`report::analyze`] runs all of them and returns one [`report::AnalysisReport`].

pub mod aggregate;
pub mod budget;
pub mod config;
pub mod error;
pub mod format;
pub mod insights;
pub mod models;
pub mod normalize;
pub mod query;
pub mod recurring;
pub mod report;
pub mod trends;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use models::{Budget, CategoryKey, RawAmount, RawTransaction, TransactionRecord, YearMonth};
pub use report::{analyze, analyze_rows, AnalysisReport};
