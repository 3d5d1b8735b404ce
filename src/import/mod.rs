mod csv_import;
mod json_import;

use anyhow::{Context, Result};
use cashlens::RawTransaction;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Load statement rows from `.json` (parser payload) or anything else as CSV.
pub(crate) fn load_file(path: &Path) -> Result<Vec<RawTransaction>> {
    let file = File::open(path).with_context(|| format!("File not found: {}", path.display()))?;
    let reader = BufReader::new(file);

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let rows = if is_json {
        json_import::read_json(reader)
    } else {
        let account = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Default");
        csv_import::read_csv(reader, account)
    }
    .with_context(|| format!("Failed to load {}", path.display()))?;

    debug!(path = %path.display(), rows = rows.len(), "loaded statement file");
    Ok(rows)
}

/// Concatenate the rows of every file, in argument order.
pub(crate) fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RawTransaction>> {
    let mut all = Vec::new();
    for path in paths {
        all.extend(load_file(path.as_ref())?);
    }
    Ok(all)
}
