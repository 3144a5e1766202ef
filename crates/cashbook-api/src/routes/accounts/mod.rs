//! Account routes - chart of accounts per company

pub mod api;

pub use api::{api_account_create, api_account_deactivate, api_accounts, api_onboard, NewAccountBody, OnboardResponse};
