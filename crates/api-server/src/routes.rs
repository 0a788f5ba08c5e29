//! Dashboard API routes: browse persisted scorecard results.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use result_store::{DetailRow, ResultRow, SummaryCounts};
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/scorecards", get(list_scorecards))
        .route("/api/scorecards/:stock_code", get(scorecard_detail))
        .route("/api/investable", get(list_investable))
        .route("/api/summary", get(summary))
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub investable_only: Option<bool>,
}

#[derive(Serialize)]
pub struct ScorecardDetail {
    pub result: ResultRow,
    pub details: Vec<DetailRow>,
}

async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

async fn list_scorecards(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ResultRow>>>, AppError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let mut rows = state.store.latest_results(limit).await?;

    if let Some(grade) = &query.grade {
        rows.retain(|r| &r.grade == grade);
    }
    if let Some(tier) = &query.tier {
        rows.retain(|r| &r.tier == tier);
    }
    if query.investable_only.unwrap_or(false) {
        rows.retain(|r| r.is_investable);
    }

    Ok(Json(ApiResponse::success(rows)))
}

async fn scorecard_detail(
    State(state): State<AppState>,
    Path(stock_code): Path<String>,
) -> Result<Json<ApiResponse<ScorecardDetail>>, AppError> {
    let found = state.store.result_detail(&stock_code).await?;
    let (result, details) = found
        .ok_or_else(|| AppError::not_found(format!("no scorecard for {}", stock_code)))?;
    Ok(Json(ApiResponse::success(ScorecardDetail { result, details })))
}

async fn list_investable(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ResultRow>>>, AppError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let rows = state.store.investable_results(limit).await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SummaryCounts>>, AppError> {
    Ok(Json(ApiResponse::success(state.store.summary().await?)))
}
