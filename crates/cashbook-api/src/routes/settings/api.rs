//! Settings API endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use cashbook_config::Config;
use cashbook_core::{auto_categorize, TransactionType};
use serde::Deserialize;

use crate::AppState;

pub async fn api_settings(State(state): State<AppState>) -> Json<Config> {
    Json(state.config.clone())
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorizeQuery {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// Suggested account name for a description
pub async fn api_categorize(Query(query): Query<CategorizeQuery>) -> Json<serde_json::Value> {
    let category = auto_categorize(&query.description, query.transaction_type);
    Json(serde_json::json!({
        "description": query.description,
        "type": query.transaction_type,
        "category": category,
    }))
}
