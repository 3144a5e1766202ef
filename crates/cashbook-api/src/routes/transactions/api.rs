//! Transactions API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cashbook_core::{JournalEntry, PostRequest};
use cashbook_store::{CompanyId, JournalEntryId};

use crate::{ApiError, AppState};

/// Post a simplified transaction; answers with the balanced journal entry
pub async fn api_transaction_post(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Json(request): Json<PostRequest>,
) -> Result<(StatusCode, Json<JournalEntry>), ApiError> {
    let entry = state.books.post(company_id, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn api_reverse(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(CompanyId, JournalEntryId)>,
) -> Result<Json<JournalEntry>, ApiError> {
    Ok(Json(state.books.reverse(company_id, id).await?))
}
