//! Supplier write handlers: create, update, delete.

use super::{body_data, parse_id};
use crate::error::AppError;
use crate::model;
use crate::response::{created, success_one};
use crate::service::{CrudService, RequestValidator};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{Map, Value};

fn validate(body: &Map<String, Value>) -> Result<(), AppError> {
    RequestValidator::only_valid_fields(body, &model::SUPPLIERS)?;
    RequestValidator::required_fields(body, &model::SUPPLIERS)?;
    RequestValidator::email_format(body)
}

async fn supplier_exists(state: &AppState, id: i64) -> Result<(), AppError> {
    CrudService::read(&state.pool, &model::SUPPLIERS, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Supplier cannot be found.".into()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let data = body_data(body)?;
    validate(&data)?;
    let row = CrudService::create(&state.pool, &model::SUPPLIERS, &data).await?;
    Ok(created(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    supplier_exists(&state, id).await?;
    let data = body_data(body)?;
    validate(&data)?;
    let row = CrudService::update(&state.pool, &model::SUPPLIERS, id, &data)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier cannot be found.".into()))?;
    Ok(success_one(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    supplier_exists(&state, id).await?;
    CrudService::delete(&state.pool, &model::SUPPLIERS, id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
