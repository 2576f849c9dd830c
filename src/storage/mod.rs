//! File Locations
//!
//! Resolves the per-user config and data directories and the fixed
//! file names eqsnap keeps in them.

use anyhow::Result;
use std::path::PathBuf;

/// Credentials (and usage counter) file name
pub const CREDENTIALS_FILE: &str = "credentials.json";
/// OCR history file name
pub const HISTORY_FILE: &str = "history.json";
/// Fixed-name temp file for clipboard captures
pub const CLIPBOARD_IMAGE_FILE: &str = "clipboard.png";

/// Get the application data directory
pub fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "eqsnap", "eqsnap")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

    let data_dir = proj_dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "eqsnap", "eqsnap")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Default path of the credentials file
pub fn credentials_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CREDENTIALS_FILE))
}

/// Path of the OCR history file
pub fn history_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(HISTORY_FILE))
}

/// Path the clipboard image is dumped to before upload
pub fn clipboard_image_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(CLIPBOARD_IMAGE_FILE))
}
