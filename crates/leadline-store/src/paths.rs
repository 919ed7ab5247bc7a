//! Where the lead database lives when `--db-path` is not given.

use crate::error::{Result, StoreError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "leadline";
const DB_FILENAME: &str = "leadline.sqlite3";

/// `$XDG_DATA_HOME/leadline`, else `~/.local/share/leadline`.
pub fn data_dir() -> Result<PathBuf> {
    match env::var_os("XDG_DATA_HOME") {
        Some(dir) if dir.is_empty() => Err(StoreError::InvalidDbPath(PathBuf::from(dir))),
        Some(dir) => Ok(PathBuf::from(dir).join(APP_DIR)),
        None => dirs::home_dir()
            .map(|home| home.join(".local/share").join(APP_DIR))
            .ok_or(StoreError::MissingHomeDir),
    }
}

/// Picks the database file and makes sure its directory exists.
pub fn resolve_db_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) if path.as_os_str().is_empty() || path.is_dir() => {
            Err(StoreError::InvalidDbPath(path))
        }
        Some(path) => {
            if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Ok(path)
        }
        None => {
            let dir = data_dir()?;
            fs::create_dir_all(&dir)?;
            private_dir(&dir)?;
            Ok(dir.join(DB_FILENAME))
        }
    }
}

#[cfg(unix)]
fn private_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(not(unix))]
fn private_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
