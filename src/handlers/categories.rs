//! Category read handlers.

use crate::error::AppError;
use crate::model;
use crate::response::success_many;
use crate::service::CrudService;
use crate::state::AppState;
use axum::extract::{Query, State};
use std::collections::HashMap;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = params.get("limit").and_then(|v| v.parse().ok());
    let offset = params.get("offset").and_then(|v| v.parse().ok());
    let rows = CrudService::list(&state.pool, &model::CATEGORIES, limit, offset).await?;
    Ok(success_many(rows))
}
