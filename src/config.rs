//! Configuration for arbolib paths.
//!
//! Database location (highest priority first):
//! 1. `--db` flag on the command line
//! 2. `ARBOLIB_HOME` environment variable (directory)
//! 3. Default (`~/.arbolib/library.db`)

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Name of the database file inside the arbolib home directory
const DB_FILE: &str = "library.db";

/// Resolve the database path from the environment and defaults
pub fn database_path() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("ARBOLIB_HOME") {
        return Ok(PathBuf::from(home).join(DB_FILE));
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".arbolib").join(DB_FILE))
}
