//! Product read handlers and stock reports.

use super::parse_id;
use crate::error::{AppError, ConfigError};
use crate::mapper::PathMapper;
use crate::model;
use crate::response::{success_many, success_one};
use crate::service::CrudService;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use serde_json::Value;
use std::collections::HashMap;

/// Spec for nesting the joined category columns under "category".
pub fn category_mapper() -> Result<PathMapper, ConfigError> {
    PathMapper::new(&[
        ("category_id", "category.category_id"),
        ("category_name", "category.category_name"),
        ("category_description", "category.category_description"),
    ])
}

fn paging(params: &HashMap<String, String>) -> (Option<u32>, Option<u32>) {
    let limit = params.get("limit").and_then(|v| v.parse().ok());
    let offset = params.get("offset").and_then(|v| v.parse().ok());
    (limit, offset)
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let (limit, offset) = paging(&params);
    let rows = CrudService::list(&state.pool, &model::PRODUCTS, limit, offset).await?;
    Ok(success_many(rows))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = CrudService::read_product_with_category(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product cannot be found.".into()))?;
    let data = match row {
        Value::Object(map) => Value::Object(state.category_mapper.transform(&map)?),
        other => other,
    };
    Ok(success_one(data))
}

pub async fn out_of_stock(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows = CrudService::out_of_stock_count(&state.pool).await?;
    Ok(success_many(rows))
}

pub async fn price_summary(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows = CrudService::price_summary(&state.pool).await?;
    Ok(success_many(rows))
}

pub async fn total_weight(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows = CrudService::total_weight_by_product(&state.pool).await?;
    Ok(success_many(rows))
}
