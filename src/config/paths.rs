//! Path management for the envelope ledger
//!
//! ## Path Resolution Order
//!
//! 1. `ENVELOPE_LEDGER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/envelope-ledger` or `~/.config/envelope-ledger`
//! 3. Windows: `%APPDATA%\envelope-ledger`

use std::path::{Path, PathBuf};

use crate::error::EnvelopeError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "ENVELOPE_LEDGER_DATA_DIR";

const APP_DIR: &str = "envelope-ledger";

/// Every path the ledger reads or writes
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application-data directory can be
    /// determined.
    pub fn new() -> Result<Self, EnvelopeError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, embedding)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `<base>/data/`
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// `<base>/data/users/`, one ledger file per user
    pub fn users_dir(&self) -> PathBuf {
        self.data_dir().join("users")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Create the base, data and users directories
    pub fn ensure_directories(&self) -> Result<(), EnvelopeError> {
        std::fs::create_dir_all(self.users_dir())
            .map_err(|e| EnvelopeError::Io(format!("Failed to create data directory: {}", e)))
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, EnvelopeError> {
    let config_base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var_os("HOME").ok_or_else(|| {
                EnvelopeError::Config("Could not determine home directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, EnvelopeError> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| EnvelopeError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}
