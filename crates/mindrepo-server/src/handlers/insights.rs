//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{AppError, AppState, MAX_PAGE_LIMIT};
use mindrepo_core::{insights, models::Insight};

/// Query parameters for insight history
#[derive(Debug, Deserialize)]
pub struct InsightHistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

/// GET /api/insights - Latest insight, generating one if none exists yet
///
/// Responds 422 when there are no commits to analyze.
pub async fn get_current_insight(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Insight>, AppError> {
    let insight = insights::current_insight(&state.db, Utc::now())?;
    Ok(Json(insight))
}

/// POST /api/insights/refresh - Force a new insight from current history
pub async fn refresh_insight(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Insight>, AppError> {
    let insight = insights::refresh_insight(&state.db, Utc::now())?;
    Ok(Json(insight))
}

/// GET /api/insights/history - Previously generated insights, newest first
pub async fn list_insight_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightHistoryQuery>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let history = state.db.list_insights(params.limit.min(MAX_PAGE_LIMIT))?;
    Ok(Json(history))
}
