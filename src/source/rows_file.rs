use std::path::Path;

use anyhow::{Context, Result};

use super::Row;

/// Read rows from a JSON file holding an array of string arrays, e.g.
/// `[["풍랑", "주의보", "보령시", "10:00", "12:00", ""]]`.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let rows: Vec<Row> = serde_json::from_str(&content)
        .with_context(|| format!("parsing rows from {}", path.display()))?;
    Ok(rows)
}
