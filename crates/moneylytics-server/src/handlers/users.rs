//! User profile and ledger handlers
//!
//! Store reads are synchronous, so they run on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use moneylytics_core::models::{Expense, User};

#[derive(Debug, Deserialize)]
pub struct ExpensesQuery {
    pub limit: Option<i64>,
}

/// GET /api/users/:id - Get a user profile
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let user = tokio::task::spawn_blocking(move || state.assistant.db().get_user(id))
        .await?
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found(&format!("User {} not found", id)))?;

    Ok(Json(user))
}

/// GET /api/users/:id/expenses - Most recent expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<ExpensesQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);

    let expenses = tokio::task::spawn_blocking(move || {
        let db = state.assistant.db();
        if db.get_user(id).map_err(AppError::from_core)?.is_none() {
            return Err(AppError::not_found(&format!("User {} not found", id)));
        }
        db.recent_expenses(id, limit).map_err(AppError::from_core)
    })
    .await??;

    Ok(Json(expenses))
}
