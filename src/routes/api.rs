//! Resource routes. Report paths are static segments, so they take
//! precedence over the `:productId` capture.

use crate::handlers::{categories, products, suppliers};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/out-of-stock", get(products::out_of_stock))
        .route("/products/price-summary", get(products::price_summary))
        .route("/products/total-weight", get(products::total_weight))
        .route("/products/:productId", get(products::read))
        .route("/categories", get(categories::list))
        .route("/suppliers", post(suppliers::create))
        .route(
            "/suppliers/:supplierId",
            put(suppliers::update).delete(suppliers::delete),
        )
        .with_state(state)
}
