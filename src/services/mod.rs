//! Service layer for the envelope ledger
//!
//! The operations consumers call: computed balances (`LedgerService`),
//! month initialization (`MonthService`), expense management
//! (`ExpenseService`) and savings projects (`ProjectService`). All of them
//! work over a shared `LedgerContext`.

pub mod context;
pub mod expense;
pub mod ledger;
pub mod month;
pub mod project;

pub use context::LedgerContext;
pub use expense::ExpenseService;
pub use ledger::LedgerService;
pub use month::MonthService;
pub use project::ProjectService;
