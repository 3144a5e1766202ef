//! Route modules for the API server
//!
//! - accounts: chart of accounts, onboarding
//! - transactions: posting and reversal
//! - payables: open payables and receivables
//! - reports: financial statements
//! - settings: configuration display and category suggestions
//!
//! Each module keeps its handlers in api.rs and re-exports them from mod.rs.

pub mod accounts;
pub mod payables;
pub mod reports;
pub mod settings;
pub mod transactions;
