//! Accounts API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cashbook_core::{Account, AccountType};
use cashbook_store::CompanyId;
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState};

/// Body of `POST /api/companies/:company_id/accounts`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccountBody {
    pub account_number: String,
    pub account_name: String,
    pub account_type: AccountType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardResponse {
    pub created: usize,
    pub accounts: Vec<Account>,
}

pub async fn api_accounts(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.books.accounts(company_id).await?))
}

pub async fn api_account_create(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Json(body): Json<NewAccountBody>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let account = state.books
        .add_account(company_id, &body.account_number, &body.account_name, body.account_type)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn api_account_deactivate(
    State(state): State<AppState>,
    Path((company_id, account_name)): Path<(CompanyId, String)>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.books.deactivate_account(company_id, &account_name).await?))
}

/// Seed the default chart; calling it again creates nothing
pub async fn api_onboard(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
) -> Result<Json<OnboardResponse>, ApiError> {
    let created = state.books.onboard_company(company_id).await?;
    Ok(Json(OnboardResponse {
        created: created.len(),
        accounts: state.books.accounts(company_id).await?,
    }))
}
