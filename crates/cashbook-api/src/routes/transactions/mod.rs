//! Transaction routes - posting and reversal

pub mod api;

pub use api::{api_reverse, api_transaction_post};
