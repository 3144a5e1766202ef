//! Reports API endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use cashbook_core::{ReportDto, ReportParams, ReportType};
use cashbook_store::CompanyId;
use serde::Deserialize;

use crate::{ApiError, AppState};

/// Flags read alongside [`ReportParams`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    /// Answer 409 instead of a report that does not balance
    #[serde(default)]
    pub strict: bool,
}

/// `GET /api/companies/:company_id/reports/:report_type?from=&to=&year=&mode=`
pub async fn api_report(
    State(state): State<AppState>,
    Path((company_id, report_type)): Path<(CompanyId, String)>,
    Query(params): Query<ReportParams>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportDto>, ApiError> {
    let report_type: ReportType = report_type.parse().map_err(ApiError::bad_request)?;
    let report = state.books.get_report(company_id, report_type, &params).await?;
    if query.strict {
        state.books.require_balanced(company_id, &report)?;
    }
    Ok(Json(report))
}
