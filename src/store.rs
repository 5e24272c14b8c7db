//! Database bootstrap: create the database and the inventory tables if
//! they do not exist.

use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// DDL applied in dependency order (suppliers before products, products and
/// categories before the junction).
const TABLE_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS suppliers (
        supplier_id SERIAL PRIMARY KEY,
        supplier_name VARCHAR(255) NOT NULL,
        supplier_address_line_1 VARCHAR(255),
        supplier_address_line_2 VARCHAR(255),
        supplier_city VARCHAR(100),
        supplier_state VARCHAR(50),
        supplier_zip VARCHAR(20),
        supplier_phone VARCHAR(30),
        supplier_email VARCHAR(255) NOT NULL,
        supplier_notes TEXT,
        supplier_type_of_goods VARCHAR(100),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        category_id SERIAL PRIMARY KEY,
        category_name VARCHAR(255) NOT NULL,
        category_description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        product_id SERIAL PRIMARY KEY,
        product_sku VARCHAR(100) NOT NULL,
        product_title VARCHAR(255) NOT NULL,
        product_description TEXT,
        product_price NUMERIC(10, 2),
        product_cost NUMERIC(10, 2),
        product_weight_in_lbs NUMERIC(8, 2),
        product_quantity_in_stock INTEGER NOT NULL DEFAULT 0,
        supplier_id INTEGER REFERENCES suppliers (supplier_id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products_categories (
        product_id INTEGER NOT NULL REFERENCES products (product_id) ON DELETE CASCADE,
        category_id INTEGER NOT NULL REFERENCES categories (category_id) ON DELETE CASCADE,
        PRIMARY KEY (product_id, category_id)
    )
    "#,
];

/// Create the inventory tables if missing. Idempotent.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for ddl in TABLE_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Create the database named in the URL when it does not exist yet, by
/// connecting to the admin `postgres` database on the same server.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await
            .map_err(AppError::Db)?;
    if !exists.0 {
        let quoted = format!("\"{}\"", db_name.replace('"', "\"\""));
        sqlx::query(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_name_parses_from_url() {
        let (admin, name) =
            parse_db_name_from_url("postgres://user:pw@localhost:5432/stockroom").unwrap();
        assert_eq!(admin, "postgres://user:pw@localhost:5432/postgres");
        assert_eq!(name, "stockroom");
    }

    #[test]
    fn db_name_ignores_query_string() {
        let (_, name) =
            parse_db_name_from_url("postgres://localhost/stockroom?sslmode=disable").unwrap();
        assert_eq!(name, "stockroom");
    }
}
