use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "policy-keeper";

/// Per-user cache directory for the application (`<cache_dir>/policy-keeper`)
pub fn app_cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine the user cache directory")?;
    Ok(base.join(APP_DIR))
}

/// Default location of the interactive-mode log file
pub fn default_log_file() -> Result<PathBuf> {
    Ok(app_cache_dir()?.join("policy-keeper.log"))
}
