pub mod categories;
pub mod products;
pub mod suppliers;

use crate::error::AppError;
use serde_json::{Map, Value};

/// Parse a path id. Non-numeric ids are a 400.
pub(crate) fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}

/// Write payloads arrive under a top-level "data" key. A missing "data" is
/// treated as an empty object so required-field errors name the columns.
pub(crate) fn body_data(body: Value) -> Result<Map<String, Value>, AppError> {
    let Value::Object(mut envelope) = body else {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    };
    match envelope.remove("data") {
        None => Ok(Map::new()),
        Some(Value::Object(m)) => Ok(m),
        Some(_) => Err(AppError::BadRequest("data must be a JSON object".into())),
    }
}
