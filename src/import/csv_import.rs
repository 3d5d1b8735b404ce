use anyhow::{Context, Result};
use cashlens::{RawAmount, RawTransaction};
use std::io::Read;

/// Column positions resolved from a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    pub(crate) date: usize,
    pub(crate) amount: usize,
    pub(crate) description: usize,
    pub(crate) category: Option<usize>,
    pub(crate) account: Option<usize>,
}

const DATE_HEADERS: &[&str] = &["date", "transaction date", "posted date", "posting date"];
const AMOUNT_HEADERS: &[&str] = &["amount", "transaction amount"];
const DESCRIPTION_HEADERS: &[&str] = &["description", "merchant", "payee", "memo"];
const CATEGORY_HEADERS: &[&str] = &["category"];
const ACCOUNT_HEADERS: &[&str] = &["account", "account name"];

impl ColumnMap {
    pub(crate) fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };
        let required = |names: &[&str]| {
            find(names).ok_or_else(|| {
                anyhow::anyhow!(
                    "CSV header has no '{}' column (found: {})",
                    names[0],
                    headers.join(", ")
                )
            })
        };
        Ok(Self {
            date: required(DATE_HEADERS)?,
            amount: required(AMOUNT_HEADERS)?,
            description: required(DESCRIPTION_HEADERS)?,
            category: find(CATEGORY_HEADERS),
            account: find(ACCOUNT_HEADERS),
        })
    }
}

/// Read CSV with a header row into raw rows. Cells are passed through as
/// text; normalization decides what is valid. Without an account column
/// every row is filed under `default_account`.
pub(crate) fn read_csv<R: Read>(reader: R, default_account: &str) -> Result<Vec<RawTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut records = rdr.records();
    let headers: Vec<String> = match records.next() {
        Some(first) => first
            .context("Failed to read CSV header")?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => anyhow::bail!("CSV file is empty"),
    };
    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for result in records {
        let record = result.context("Failed to read CSV record")?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let cell = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        rows.push(RawTransaction {
            date: cell(columns.date),
            amount: cell(columns.amount).map(RawAmount::Text),
            description: cell(columns.description),
            category: columns.category.and_then(cell),
            account: match columns.account {
                Some(idx) => cell(idx),
                None => Some(default_account.to_string()),
            },
        });
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
