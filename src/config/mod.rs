//! Credentials & Usage Tracking
//!
//! The credentials file is a JSON object with `app_id` and `app_key`.
//! The same file carries a rough monthly usage counter so heavy API
//! months are visible without any extra state.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Days since the last recorded call after which the counter resets
const ROLLOVER_DAYS: i64 = 32;

/// Provider-issued credential pair, sent as request headers
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_key: String,
}

/// On-disk credentials file
///
/// All fields are optional so a file holding only the usage counter
/// (credentials coming from the environment) still parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,
    /// Date the usage counter was last reset or started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
    /// API calls recorded since `last_date`
    #[serde(default)]
    pub month_usage: u32,
}

/// Outcome of recording one API call
#[derive(Debug, Clone, Copy)]
pub struct UsageUpdate {
    /// Calls recorded this month, including this one
    pub count: u32,
    /// True when a new month started and the counter was reset
    pub rolled_over: bool,
}

/// Load the credentials file
pub fn load_api_file(path: &Path) -> Result<ApiFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials file {}", path.display()))?;
    let file: ApiFile = serde_json::from_str(&content)
        .with_context(|| format!("Malformed credentials file {}", path.display()))?;
    Ok(file)
}

/// Save the credentials file
pub fn save_api_file(file: &ApiFile, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write credentials file {}", path.display()))?;
    Ok(())
}

/// Resolve the credential pair: CLI overrides, then the `app_id` /
/// `app_key` environment variables, then the credentials file.
///
/// Fatal if no source supplies both values; no request can be
/// authenticated without them.
pub fn resolve_credentials(
    cli_id: Option<&str>,
    cli_key: Option<&str>,
    path: &Path,
) -> Result<Credentials> {
    let mut app_id = cli_id
        .map(str::to_string)
        .or_else(|| std::env::var("app_id").ok());
    let mut app_key = cli_key
        .map(str::to_string)
        .or_else(|| std::env::var("app_key").ok());

    if (app_id.is_none() || app_key.is_none()) && path.is_file() {
        let file = load_api_file(path)?;
        app_id = app_id.or(file.app_id);
        app_key = app_key.or(file.app_key);
        debug!("Loaded credentials from {}", path.display());
    }

    match (app_id, app_key) {
        (Some(app_id), Some(app_key)) => Ok(Credentials { app_id, app_key }),
        _ => bail!(
            "API credentials are not set; pass --app-id/--app-key, set the \
             app_id/app_key environment variables, or create {}",
            path.display()
        ),
    }
}

/// Record one API call in the monthly usage counter.
///
/// The counter stops incrementing once it reaches `threshold`; the
/// returned count still reflects the month's total so the caller can
/// warn about it.
pub fn record_usage(path: &Path, threshold: u32) -> Result<UsageUpdate> {
    record_usage_at(path, threshold, Local::now().date_naive())
}

fn record_usage_at(path: &Path, threshold: u32, today: NaiveDate) -> Result<UsageUpdate> {
    let mut file = if path.is_file() {
        load_api_file(path)?
    } else {
        ApiFile::default()
    };

    let last_date = file.last_date.unwrap_or(today);
    let rolled_over = (today - last_date).num_days() > ROLLOVER_DAYS;
    if rolled_over {
        debug!("New month: resetting usage counter");
        file.month_usage = 0;
        file.last_date = Some(today);
    } else if file.last_date.is_none() {
        file.last_date = Some(today);
    }

    let mut count = file.month_usage;
    if count < threshold {
        count += 1;
        file.month_usage = count;
        save_api_file(&file, path)?;
    } else if rolled_over {
        save_api_file(&file, path)?;
    }

    Ok(UsageUpdate { count, rolled_over })
}
