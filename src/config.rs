//! Runtime configuration.
//!
//! Optional defaults come from the process environment, which a `.env` file
//! may populate before the command line is parsed. Credentials are never
//! read from here.

use crate::prisma_api::types::TimeRange;
use crate::usage::GroupFilter;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Points at an env file to load instead of searching for `.env`.
pub const ENV_FILE_VAR: &str = "BILLING_AG_ENV_FILE";

/// Loads `$BILLING_AG_ENV_FILE` if set (it must exist), otherwise `.env`
/// from the working directory or one of its parents, if any.
/// Variables already set in the environment win. Runs before logging is
/// set up, so the caller reports the returned path.
pub fn load_env_file() -> Result<Option<PathBuf>> {
    if let Some(path) = std::env::var_os(ENV_FILE_VAR).map(PathBuf::from) {
        if !load_env_file_from(&path)? {
            bail!("{} points at {}, which does not exist", ENV_FILE_VAR, path.display());
        }
        return Ok(Some(path));
    }

    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e).context("Failed to load .env file"),
    }
}

/// Loads one env file. Returns whether the file existed.
pub fn load_env_file_from(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", path.display())),
    }
}

/// What to query and which account groups to report on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportOptions {
    pub time_range: TimeRange,
    pub filter: GroupFilter,
}
