//! Shared application state for all routes.

use crate::mapper::PathMapper;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Built once at startup; nests joined category columns under "category".
    pub category_mapper: Arc<PathMapper>,
}
