//! Output formatting and persistence helpers.
//!
//! Supports JSON rendering for query results and CSV append for readings.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

/// Renders a value as compact JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Writes a value as JSON to stdout, pretty-printed when `pretty` is set.
pub fn print_json(value: &impl Serialize, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        to_json(value)?
    };
    println!("{rendered}");
    Ok(())
}

/// Appends a record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, record: &impl Serialize) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
