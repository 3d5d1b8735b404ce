use anyhow::{Context, Result};
use cashlens::RawTransaction;
use serde::Deserialize;
use std::io::Read;

/// What the statement parser sends back: a success payload, an error
/// payload, or just the rows.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    Success { transactions: Vec<RawTransaction> },
    Failure { error: String },
    Rows(Vec<RawTransaction>),
}

pub(crate) fn read_json<R: Read>(reader: R) -> Result<Vec<RawTransaction>> {
    let payload: Payload = serde_json::from_reader(reader)
        .context("Expected {\"transactions\": [...]}, {\"error\": \"...\"} or a list of rows")?;
    match payload {
        Payload::Success { transactions } | Payload::Rows(transactions) => Ok(transactions),
        Payload::Failure { error } => anyhow::bail!("Statement parser reported an error: {error}"),
    }
}
