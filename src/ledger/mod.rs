//! Cumulative envelope ledger
//!
//! The pure carry-forward fold, the month ordering it walks, and a
//! revision-tagged snapshot cache.

pub mod cache;
pub mod fold;
pub mod ordering;

pub use cache::SnapshotCache;
pub use fold::{cumulative_snapshot, total_savings, CarryFold, ClassClose, MonthClose};
pub use ordering::MonthOrdering;
