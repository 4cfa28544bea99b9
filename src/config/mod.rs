//! Configuration for the envelope ledger
//!
//! - XDG-compliant path resolution
//! - Persisted settings (catalog, month ordering, currency)

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
