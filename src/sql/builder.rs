//! Builds parameterized SELECT, INSERT, UPDATE, DELETE plus the report
//! queries from the static table model.

use crate::model::{Table, CATEGORIES, PRODUCTS, PRODUCTS_CATEGORIES};
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from the static model).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// SELECT list: each column as-is, except numeric as col::text so sqlx
/// returns String and no precision is lost.
fn select_column_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .map(|c| {
            let q = quoted(c.name);
            if c.pg_type == "numeric" {
                format!("{}::text AS {}", q, q)
            } else {
                q
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT all rows, ORDER BY pk, optional LIMIT/OFFSET.
pub fn select_list(table: &Table, limit: Option<u32>, offset: Option<u32>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols = select_column_list(table);
    let limit_clause = limit.map(|n| format!(" LIMIT {}", n.min(1000))).unwrap_or_default();
    let offset_clause = offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}{}{}",
        cols,
        quoted(table.name),
        quoted(table.pk),
        limit_clause,
        offset_clause
    );
    q
}

/// SELECT by primary key. Caller adds the id as sole param.
pub fn select_by_id(table: &Table) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_column_list(table),
        quoted(table.name),
        quoted(table.pk)
    );
    q
}

/// One product joined through the junction to its category. The category
/// columns come back flat next to the product columns; the mapper nests
/// them afterwards. Caller adds the product id as sole param.
pub fn select_product_with_category() -> QueryBuf {
    let mut q = QueryBuf::new();
    let product_cols: Vec<String> = PRODUCTS
        .columns
        .iter()
        .map(|c| {
            let qn = quoted(c.name);
            if c.pg_type == "numeric" {
                format!("p.{}::text AS {}", qn, qn)
            } else {
                format!("p.{}", qn)
            }
        })
        .collect();
    let category_cols: Vec<String> = CATEGORIES
        .columns
        .iter()
        .filter(|c| c.name != "created_at" && c.name != "updated_at")
        .map(|c| format!("c.{}", quoted(c.name)))
        .collect();
    q.sql = format!(
        "SELECT {}, {} FROM {} p \
         LEFT JOIN {} pc ON pc.{} = p.{} \
         LEFT JOIN {} c ON c.{} = pc.{} \
         WHERE p.{} = $1",
        product_cols.join(", "),
        category_cols.join(", "),
        quoted(PRODUCTS.name),
        quoted(PRODUCTS_CATEGORIES.name),
        quoted("product_id"),
        quoted("product_id"),
        quoted(CATEGORIES.name),
        quoted("category_id"),
        quoted("category_id"),
        quoted(PRODUCTS.pk)
    );
    q
}

/// Count of products per out-of-stock quantity bucket (only the zero bucket
/// can exist given the WHERE clause).
pub fn out_of_stock_count() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} AS {}, COUNT({}) AS {} FROM {} WHERE {} = 0 GROUP BY {}",
        quoted("product_quantity_in_stock"),
        quoted("out_of_stock"),
        quoted("product_id"),
        quoted("count"),
        quoted(PRODUCTS.name),
        quoted("product_quantity_in_stock"),
        quoted("out_of_stock")
    );
    q
}

/// Min, max, and average product price per supplier.
pub fn price_summary() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {}, MIN({})::text AS {}, MAX({})::text AS {}, AVG({})::text AS {} \
         FROM {} GROUP BY {} ORDER BY {}",
        quoted("supplier_id"),
        quoted("product_price"),
        quoted("min"),
        quoted("product_price"),
        quoted("max"),
        quoted("product_price"),
        quoted("avg"),
        quoted(PRODUCTS.name),
        quoted("supplier_id"),
        quoted("supplier_id")
    );
    q
}

/// Total stocked weight per product: sum of unit weight times quantity,
/// grouped by title and sku.
pub fn total_weight_by_product() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {}, {}, SUM({} * {})::text AS {} FROM {} GROUP BY {}, {}",
        quoted("product_sku"),
        quoted("product_title"),
        quoted("product_weight_in_lbs"),
        quoted("product_quantity_in_stock"),
        quoted("total_weight_in_lbs"),
        quoted(PRODUCTS.name),
        quoted("product_title"),
        quoted("product_sku")
    );
    q
}

/// INSERT: writable columns present in body, in model order; RETURNING the row.
pub fn insert(table: &Table, body: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in table.columns {
        if !table.is_writable(c.name) {
            continue;
        }
        let Some(val) = body.get(c.name) else { continue };
        let param_num = q.push_param(val.clone());
        cols.push(quoted(c.name));
        placeholders.push(format!("${}::{}", param_num, c.pg_type));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(table)
    );
    q
}

/// UPDATE by id: SET only writable columns present in body, plus updated_at.
/// The id binds after the SET params.
pub fn update(table: &Table, id: i64, body: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in table.columns {
        if !table.is_writable(c.name) {
            continue;
        }
        let Some(val) = body.get(c.name) else { continue };
        let param_num = q.push_param(val.clone());
        sets.push(format!("{} = ${}::{}", quoted(c.name), param_num, c.pg_type));
    }
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    let id_param = q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(table.name),
        sets.join(", "),
        quoted(table.pk),
        id_param,
        select_column_list(table)
    );
    q
}

/// DELETE by id. Caller adds the id as sole param.
pub fn delete_by_id(table: &Table) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "DELETE FROM {} WHERE {} = $1 RETURNING {}",
        quoted(table.name),
        quoted(table.pk),
        quoted(table.pk)
    );
    q
}
