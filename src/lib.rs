//! envelope-ledger - cumulative monthly envelope budgeting
//!
//! Each month a user splits their budget across a fixed catalog of
//! envelopes and records expenses against them. Unspent money carries into
//! the next month; an envelope that overspends is reset to zero and the
//! overspend is taken out of the savings envelope instead.
//!
//! # Architecture
//!
//! - `models`: money, months, the envelope catalog, budgets, expenses, the
//!   derived envelope state and savings projects
//! - `storage`: the `LedgerStore` trait with in-memory and JSON-file stores
//! - `ledger`: the carry-forward fold, month ordering and snapshot cache
//! - `services`: the operations consumers call
//! - `audit`: append-only log of every mutation
//! - `config`: path resolution and settings
//! - `display`, `cli`: the `envledger` command-line front end
//!
//! # Example
//!
//! ```rust
//! use envelope_ledger::models::{BudgetPlan, EnvelopeCatalog, Money, MonthId, UserId};
//! use envelope_ledger::services::LedgerContext;
//!
//! let context = LedgerContext::in_memory(EnvelopeCatalog::default());
//! let user = UserId::parse("alice").unwrap();
//! let month = MonthId::parse("2024-01").unwrap();
//!
//! let plan = BudgetPlan::new().with_amount("savings", Money::from_units(200));
//! context.months().initialize_month(&user, month, &plan).unwrap();
//!
//! let snapshot = context.ledger().compute_cumulative_envelopes(&user, month).unwrap();
//! assert_eq!(snapshot.savings().unwrap().state.remaining, Money::from_units(200));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{EnvelopeError, EnvelopeResult};
