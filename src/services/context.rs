//! Shared state behind the services
//!
//! `LedgerContext` owns the store, the catalog and the optional snapshot
//! cache and audit log. Services borrow it, the same way every service
//! works over one coordinator.

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::{LedgerPaths, Settings};
use crate::error::EnvelopeResult;
use crate::ledger::{MonthOrdering, SnapshotCache};
use crate::models::EnvelopeCatalog;
use crate::storage::{JsonStore, LedgerStore, MemoryStore};

use super::{ExpenseService, LedgerService, MonthService, ProjectService};

/// Store, catalog and policies shared by the services
pub struct LedgerContext {
    store: Box<dyn LedgerStore>,
    catalog: EnvelopeCatalog,
    ordering: MonthOrdering,
    cache: Option<SnapshotCache>,
    audit: Option<AuditLogger>,
}

impl LedgerContext {
    pub fn new(store: impl LedgerStore + 'static, catalog: EnvelopeCatalog) -> Self {
        Self {
            store: Box::new(store),
            catalog,
            ordering: MonthOrdering::default(),
            cache: None,
            audit: None,
        }
    }

    /// Context over a fresh in-memory store
    pub fn in_memory(catalog: EnvelopeCatalog) -> Self {
        Self::new(MemoryStore::new(), catalog)
    }

    /// Context over the JSON store under `paths`, configured from `settings`
    pub fn open(paths: &LedgerPaths, settings: &Settings) -> EnvelopeResult<Self> {
        paths.ensure_directories()?;

        let mut context = Self::new(JsonStore::new(paths.users_dir()), settings.catalog.clone())
            .with_ordering(settings.month_ordering);
        if settings.cache_snapshots {
            context = context.with_snapshot_cache();
        }
        if settings.audit_enabled {
            context = context.with_audit(AuditLogger::new(paths.audit_log()));
        }
        Ok(context)
    }

    pub fn with_ordering(mut self, ordering: MonthOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_snapshot_cache(mut self) -> Self {
        self.cache = Some(SnapshotCache::new());
        self
    }

    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    pub fn catalog(&self) -> &EnvelopeCatalog {
        &self.catalog
    }

    pub fn ordering(&self) -> MonthOrdering {
        self.ordering
    }

    pub fn cache(&self) -> Option<&SnapshotCache> {
        self.cache.as_ref()
    }

    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Write entries to the audit log, if one is configured
    pub(crate) fn record(&self, entries: &[AuditEntry]) -> EnvelopeResult<()> {
        match &self.audit {
            Some(logger) => logger.log_batch(entries),
            None => Ok(()),
        }
    }

    pub fn ledger(&self) -> LedgerService<'_> {
        LedgerService::new(self)
    }

    pub fn months(&self) -> MonthService<'_> {
        MonthService::new(self)
    }

    pub fn expenses(&self) -> ExpenseService<'_> {
        ExpenseService::new(self)
    }

    pub fn projects(&self) -> ProjectService<'_> {
        ProjectService::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_follows_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            month_ordering: MonthOrdering::CreationOrder,
            cache_snapshots: true,
            audit_enabled: false,
            ..Settings::default()
        };

        let context = LedgerContext::open(&paths, &settings).unwrap();

        assert!(paths.users_dir().is_dir());
        assert_eq!(context.ordering(), MonthOrdering::CreationOrder);
        assert!(context.cache().is_some());
        assert!(context.audit().is_none());
        assert_eq!(context.catalog(), &settings.catalog);
    }

    #[test]
    fn test_in_memory_defaults() {
        let context = LedgerContext::in_memory(EnvelopeCatalog::default());
        assert_eq!(context.ordering(), MonthOrdering::Chronological);
        assert!(context.cache().is_none());
        assert!(context.audit().is_none());
    }
}
