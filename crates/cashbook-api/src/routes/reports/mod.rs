//! Report routes - every statement behind one endpoint

pub mod api;

pub use api::{api_report, ReportQuery};
