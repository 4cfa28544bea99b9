//! Persisted ledger settings
//!
//! Stored as `config.json` in the base directory. Every field has a default,
//! so older or hand-trimmed files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::EnvelopeError;
use crate::ledger::MonthOrdering;
use crate::models::EnvelopeCatalog;

/// Ledger settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency shown after amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Order months are folded in
    #[serde(default)]
    pub month_ordering: MonthOrdering,

    /// Memoize computed snapshots between calls
    ///
    /// The cache lives in a [`LedgerContext`](crate::services::LedgerContext)
    /// and only serves later queries on that context. Each `envledger`
    /// invocation opens a fresh one, so the binary never hits it.
    #[serde(default)]
    pub cache_snapshots: bool,

    /// Record mutations in the audit log
    #[serde(default = "default_true")]
    pub audit_enabled: bool,

    /// Envelope classes and the savings class
    #[serde(default)]
    pub catalog: EnvelopeCatalog,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "DH".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            month_ordering: MonthOrdering::default(),
            cache_snapshots: false,
            audit_enabled: true,
            catalog: EnvelopeCatalog::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// Defaults are not written; call `save` to persist them.
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, EnvelopeError> {
        let settings_path = paths.settings_file();
        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| EnvelopeError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| EnvelopeError::Config(format!("Failed to parse settings file: {}", e)))
    }

    pub fn save(&self, paths: &LedgerPaths) -> Result<(), EnvelopeError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| EnvelopeError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| EnvelopeError::Io(format!("Failed to write settings file: {}", e)))
    }

    /// Set one setting from its textual key and value
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), EnvelopeError> {
        match key {
            "currency_symbol" => self.currency_symbol = value.trim().to_string(),
            "month_ordering" => self.month_ordering = value.parse()?,
            "cache_snapshots" => self.cache_snapshots = parse_bool(key, value)?,
            "audit_enabled" => self.audit_enabled = parse_bool(key, value)?,
            other => {
                return Err(EnvelopeError::Config(format!("Unknown setting '{}'", other)));
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, EnvelopeError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(EnvelopeError::Config(format!(
            "Setting '{}' expects true or false, got '{}'",
            key, value
        ))),
    }
}
