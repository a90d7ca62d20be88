//! Commit handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::{json_body, AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use mindrepo_core::models::{parse_timestamp, Commit, CommitFilter, CommitUpdate, NewCommit};

/// Query parameters for listing commits
#[derive(Debug, Deserialize)]
pub struct CommitQuery {
    /// Exact category match
    pub category: Option<String>,
    /// Substring match against title or description
    pub search: Option<String>,
    /// Inclusive lower bound (RFC 3339)
    pub from: Option<String>,
    /// Inclusive upper bound (RFC 3339)
    pub to: Option<String>,
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<Option<DateTime<FixedOffset>>, AppError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| AppError::bad_request(&format!("Invalid '{}' date: {}", name, raw))),
    }
}

/// GET /api/commits - List commits, newest first
pub async fn list_commits(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CommitQuery>,
) -> Result<Json<Vec<Commit>>, AppError> {
    let filter = CommitFilter {
        category: params.category.filter(|s| !s.trim().is_empty()),
        search: params.search.filter(|s| !s.trim().is_empty()),
        from: parse_bound("from", params.from.as_deref())?,
        to: parse_bound("to", params.to.as_deref())?,
        skip: params.skip,
        limit: params.limit.min(MAX_PAGE_LIMIT),
    };

    let commits = state.db.list_commits(&filter)?;
    Ok(Json(commits))
}

/// POST /api/commits - Log a new commit
pub async fn create_commit(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewCommit>, JsonRejection>,
) -> Result<(StatusCode, Json<Commit>), AppError> {
    let body = json_body(payload)?;
    let commit = state.db.create_commit(&body)?;
    Ok((StatusCode::CREATED, Json(commit)))
}

/// GET /api/commits/:id - Get a single commit
pub async fn get_commit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Commit>, AppError> {
    let commit = state
        .db
        .get_commit(id)?
        .ok_or_else(|| AppError::not_found("Commit not found"))?;

    Ok(Json(commit))
}

/// PUT /api/commits/:id - Partially update a commit
pub async fn update_commit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<CommitUpdate>, JsonRejection>,
) -> Result<Json<Commit>, AppError> {
    let body = json_body(payload)?;
    let commit = state
        .db
        .update_commit(id, &body)?
        .ok_or_else(|| AppError::not_found("Commit not found"))?;

    Ok(Json(commit))
}

/// DELETE /api/commits/:id - Delete a commit
pub async fn delete_commit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_commit(id)? {
        return Err(AppError::not_found("Commit not found"));
    }

    Ok(Json(SuccessResponse { success: true }))
}
