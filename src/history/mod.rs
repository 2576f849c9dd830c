//! OCR History
//!
//! Successful responses are appended to a JSON file keyed by timestamp.
//! Best-effort: the caller logs and moves on if a write fails. The file
//! is cleared when the monthly usage counter rolls over.

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Append one entry keyed by the current local time
pub fn append<T: Serialize>(path: &Path, entry: &T) -> Result<()> {
    let key = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    append_with_key(path, &key, entry)
}

fn append_with_key<T: Serialize>(path: &Path, key: &str, entry: &T) -> Result<()> {
    let mut entries: Map<String, Value> = if path.is_file() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read history file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed history file {}", path.display()))?
    } else {
        Map::new()
    };

    entries.insert(key.to_string(), serde_json::to_value(entry)?);

    let content = serde_json::to_string_pretty(&Value::Object(entries))?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write history file {}", path.display()))?;

    debug!("History entry recorded under {}", key);
    Ok(())
}

/// Remove the history file if present
pub fn clear(path: &Path) -> Result<()> {
    if path.is_file() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove history file {}", path.display()))?;
        debug!("History cleared");
    }
    Ok(())
}
