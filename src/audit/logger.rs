//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::UserId;

use super::entry::{AuditEntry, EntityType};

/// Writes and reads the audit log file
///
/// One JSON object per line, oldest first.
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open_for_append(&self) -> EnvelopeResult<File> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EnvelopeError::Io(format!("Failed to create audit log directory: {}", e)))?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| EnvelopeError::Io(format!("Failed to open audit log: {}", e)))
    }

    /// Append one entry and flush
    pub fn log(&self, entry: &AuditEntry) -> EnvelopeResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> EnvelopeResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = self.open_for_append()?;
        for entry in entries {
            let json = serde_json::to_string(entry)
                .map_err(|e| EnvelopeError::Json(format!("Failed to serialize audit entry: {}", e)))?;
            writeln!(file, "{}", json)
                .map_err(|e| EnvelopeError::Io(format!("Failed to write audit entry: {}", e)))?;
        }

        file.flush()
            .map_err(|e| EnvelopeError::Io(format!("Failed to flush audit log: {}", e)))
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> EnvelopeResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| EnvelopeError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                EnvelopeError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                EnvelopeError::Json(format!("Failed to parse audit entry at line {}: {}", index + 1, e))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The last `count` entries, optionally only those of one user
    pub fn read_recent(&self, count: usize, user: Option<&UserId>) -> EnvelopeResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        if let Some(user) = user {
            entries.retain(|e| &e.user == user);
        }
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// History of one record, oldest first
    pub fn read_for_entity(
        &self,
        user: &UserId,
        entity_type: EntityType,
        entity_id: &str,
    ) -> EnvelopeResult<Vec<AuditEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| &e.user == user && e.entity_type == entity_type && e.entity_id == entity_id)
            .collect())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use crate::models::MonthId;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn user(name: &str) -> UserId {
        UserId::parse(name).unwrap()
    }

    fn expense_entry(owner: &str, id: &str) -> AuditEntry {
        AuditEntry::create(
            &user(owner),
            MonthId::parse("2024-01").unwrap(),
            EntityType::Expense,
            id,
            &json!({"amount": 1000}),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&expense_entry("alice", "e1")).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_id, "e1");
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        assert!(logger.read_recent(5, None).unwrap().is_empty());
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_read_recent_per_user() {
        let (logger, _temp) = create_test_logger();
        let batch: Vec<AuditEntry> = (0..6)
            .map(|i| expense_entry(if i % 2 == 0 { "alice" } else { "bob" }, &format!("e{}", i)))
            .collect();
        logger.log_batch(&batch).unwrap();

        let recent = logger.read_recent(2, None).unwrap();
        let ids: Vec<_> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["e4", "e5"]);

        let alice = logger.read_recent(2, Some(&user("alice"))).unwrap();
        let ids: Vec<_> = alice.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["e2", "e4"]);
    }

    #[test]
    fn test_read_for_entity() {
        let (logger, _temp) = create_test_logger();
        logger.log(&expense_entry("alice", "e1")).unwrap();
        logger.log(&expense_entry("alice", "e2")).unwrap();
        logger.log(&expense_entry("bob", "e1")).unwrap();

        let history = logger
            .read_for_entity(&user("alice"), EntityType::Expense, "e1")
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_reopen_reads_existing_entries() {
        let (logger, temp) = create_test_logger();
        logger.log(&expense_entry("alice", "e1")).unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }
}
