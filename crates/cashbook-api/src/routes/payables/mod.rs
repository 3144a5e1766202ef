//! Payable and receivable routes

pub mod api;

pub use api::{api_payable_create, api_payable_paid, api_payables};
