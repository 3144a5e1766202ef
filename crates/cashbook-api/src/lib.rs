//! HTTP API server for cashbook
//!
//! Routes are organized into modules:
//! - routes::accounts: chart of accounts and onboarding
//! - routes::transactions: posting and reversal
//! - routes::payables: payables and receivables
//! - routes::reports: financial statements
//! - routes::settings: configuration display, category suggestions

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use cashbook_config::Config;
use cashbook_core::Books;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub books: Arc<Books>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::{api_account_create, api_account_deactivate, api_accounts, api_onboard};
    use routes::payables::{api_payable_create, api_payable_paid, api_payables};
    use routes::reports::api_report;
    use routes::settings::{api_categorize, api_settings};
    use routes::transactions::{api_reverse, api_transaction_post};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/settings", get(api_settings))
        .route("/api/categorize", get(api_categorize))
        .route("/api/companies/:company_id/onboard", post(api_onboard))
        .route(
            "/api/companies/:company_id/accounts",
            get(api_accounts).post(api_account_create),
        )
        .route(
            "/api/companies/:company_id/accounts/:name/deactivate",
            post(api_account_deactivate),
        )
        .route("/api/companies/:company_id/transactions", post(api_transaction_post))
        .route(
            "/api/companies/:company_id/journal-entries/:id/reverse",
            post(api_reverse),
        )
        .route(
            "/api/companies/:company_id/payables",
            get(api_payables).post(api_payable_create),
        )
        .route("/api/companies/:company_id/payables/:id/paid", post(api_payable_paid))
        .route("/api/companies/:company_id/reports/:report_type", get(api_report))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Start the HTTP server
///
/// Binds `server.host:server.port` and serves until the process is stopped.
pub async fn start_server(config: Config, books: Arc<Books>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { books, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting cashbook server on http://{}", addr);
    log::info!("Reports: /api/companies/:company_id/reports/:report_type");

    axum::serve(listener, router).await?;
    log::info!("Server stopped");
    Ok(())
}
