//! Payables API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cashbook_core::{PayableReceivable, PayableRequest};
use cashbook_store::{CompanyId, PayableId};

use crate::{ApiError, AppState};

pub async fn api_payables(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
) -> Result<Json<Vec<PayableReceivable>>, ApiError> {
    Ok(Json(state.books.list_payables(company_id).await?))
}

pub async fn api_payable_create(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Json(request): Json<PayableRequest>,
) -> Result<(StatusCode, Json<PayableReceivable>), ApiError> {
    let item = state.books.add_payable(company_id, request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn api_payable_paid(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(CompanyId, PayableId)>,
) -> Result<Json<PayableReceivable>, ApiError> {
    Ok(Json(state.books.mark_paid(company_id, id).await?))
}
