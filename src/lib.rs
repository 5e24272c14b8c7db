//! Stockroom: inventory REST backend over PostgreSQL.
//!
//! Products, suppliers, and categories with a path-mapping layer that nests
//! joined rows before they go out as `{ "data": ... }`.

pub mod error;
pub mod handlers;
pub mod mapper;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError};
pub use mapper::{PathMapper, Segment};
pub use response::{created, success_many, success_one};
pub use routes::{api_routes, common_routes_with_ready};
pub use service::{CrudService, RequestValidator};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};
