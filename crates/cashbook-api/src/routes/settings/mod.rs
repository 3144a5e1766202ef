//! Settings routes - configuration display and category suggestions

pub mod api;

pub use api::{api_categorize, api_settings, CategorizeQuery};
