use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-inventory";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "library.db";
/// Log file written next to the database.
const LOG_FILE_NAME: &str = "library-inventory.log";
/// Development override pointing at an alternative database file.
pub const DB_PATH_ENV: &str = "LIBRARY_INVENTORY_DB";

/// Where the application keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl AppPaths {
    /// Resolve paths from the environment override or the home directory.
    pub fn resolve() -> Result<Self> {
        if let Some(db_path) = env::var_os(DB_PATH_ENV).filter(|value| !value.is_empty()) {
            return Ok(Self::for_database(PathBuf::from(db_path)));
        }

        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::in_dir(&base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            db_path: dir.join(DB_FILE_NAME),
            log_path: dir.join(LOG_FILE_NAME),
        }
    }

    /// Use an explicit database file; the log sits beside it.
    pub fn for_database(db_path: PathBuf) -> Self {
        let log_path = db_path.with_file_name(LOG_FILE_NAME);
        Self { db_path, log_path }
    }
}
