//! CRUD and report execution against PostgreSQL.

use crate::error::AppError;
use crate::model::Table;
use crate::sql::{
    delete_by_id, insert, out_of_stock_count, price_summary, select_by_id, select_list,
    select_product_with_category, total_weight_by_product, update, PgBindValue, QueryBuf,
};
use serde_json::{Map, Value};
use sqlx::PgPool;

pub struct CrudService;

impl CrudService {
    /// List rows ordered by pk, with optional limit (max 1000) and offset.
    pub async fn list(
        pool: &PgPool,
        table: &Table,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Value>, AppError> {
        let q = select_list(table, limit, offset);
        Self::query_many(pool, &q).await
    }

    /// Fetch one row by primary key. Returns JSON object or None.
    pub async fn read(pool: &PgPool, table: &Table, id: i64) -> Result<Option<Value>, AppError> {
        let mut q = select_by_id(table);
        q.params.push(Value::Number(id.into()));
        Self::query_one(pool, &q).await
    }

    /// One product with its category's columns flat alongside (LEFT JOIN
    /// through the junction). The caller nests them with the mapper.
    pub async fn read_product_with_category(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let mut q = select_product_with_category();
        q.params.push(Value::Number(id.into()));
        Self::query_one(pool, &q).await
    }

    /// Rows `{ out_of_stock, count }` over products with zero stock.
    pub async fn out_of_stock_count(pool: &PgPool) -> Result<Vec<Value>, AppError> {
        Self::query_many(pool, &out_of_stock_count()).await
    }

    /// Rows `{ supplier_id, min, max, avg }` of product price per supplier.
    pub async fn price_summary(pool: &PgPool) -> Result<Vec<Value>, AppError> {
        Self::query_many(pool, &price_summary()).await
    }

    /// Rows `{ product_sku, product_title, total_weight_in_lbs }`.
    pub async fn total_weight_by_product(pool: &PgPool) -> Result<Vec<Value>, AppError> {
        Self::query_many(pool, &total_weight_by_product()).await
    }

    /// Insert one row from a validated body. Returns the created row.
    pub async fn create(
        pool: &PgPool,
        table: &Table,
        body: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        let q = insert(table, body);
        Self::query_one(pool, &q)
            .await?
            .ok_or_else(|| AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Update one row by id. Returns the updated row or None.
    pub async fn update(
        pool: &PgPool,
        table: &Table,
        id: i64,
        body: &Map<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let q = update(table, id, body);
        Self::query_one(pool, &q).await
    }

    /// Delete one row by id. Returns true when a row was deleted.
    pub async fn delete(pool: &PgPool, table: &Table, id: i64) -> Result<bool, AppError> {
        let mut q = delete_by_id(table);
        q.params.push(Value::Number(id.into()));
        Ok(Self::query_one(pool, &q).await?.is_some())
    }

    async fn query_one(pool: &PgPool, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let row = query.fetch_optional(pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn query_many(pool: &PgPool, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        let v = cell_to_value(row, name);
        map.insert(name.to_string(), v);
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}
