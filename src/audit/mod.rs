//! Audit log for ledger mutations
//!
//! Every month creation, budget upsert and expense change is recorded in an
//! append-only JSONL file with the owning user, the month, and before/after
//! values.
//!
//! ```rust,ignore
//! use envelope_ledger::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(&user, month, EntityType::Expense, expense.id.to_string(), &expense))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
