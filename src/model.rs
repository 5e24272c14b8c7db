//! Static table model. The schema is fixed (three public tables plus one
//! junction), so the resolved form the SQL layer needs is declared directly
//! as consts instead of being loaded from config.

/// One column: name plus the PostgreSQL type used for SELECT casts
/// (numeric columns are read back as text so decoding stays exact).
#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub name: &'static str,
    pub pg_type: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct Table {
    pub name: &'static str,
    pub pk: &'static str,
    /// All columns returned by reads, pk and timestamps included.
    pub columns: &'static [Column],
    /// Columns a request body may set. Excludes pk and timestamps.
    pub writable: &'static [&'static str],
    /// Writable columns a create/update body must carry.
    pub required: &'static [&'static str],
}

const fn col(name: &'static str, pg_type: &'static str) -> Column {
    Column { name, pg_type }
}

pub const SUPPLIERS: Table = Table {
    name: "suppliers",
    pk: "supplier_id",
    columns: &[
        col("supplier_id", "integer"),
        col("supplier_name", "varchar"),
        col("supplier_address_line_1", "varchar"),
        col("supplier_address_line_2", "varchar"),
        col("supplier_city", "varchar"),
        col("supplier_state", "varchar"),
        col("supplier_zip", "varchar"),
        col("supplier_phone", "varchar"),
        col("supplier_email", "varchar"),
        col("supplier_notes", "text"),
        col("supplier_type_of_goods", "varchar"),
        col("created_at", "timestamptz"),
        col("updated_at", "timestamptz"),
    ],
    writable: &[
        "supplier_name",
        "supplier_address_line_1",
        "supplier_address_line_2",
        "supplier_city",
        "supplier_state",
        "supplier_zip",
        "supplier_phone",
        "supplier_email",
        "supplier_notes",
        "supplier_type_of_goods",
    ],
    required: &["supplier_name", "supplier_email"],
};

pub const CATEGORIES: Table = Table {
    name: "categories",
    pk: "category_id",
    columns: &[
        col("category_id", "integer"),
        col("category_name", "varchar"),
        col("category_description", "text"),
        col("created_at", "timestamptz"),
        col("updated_at", "timestamptz"),
    ],
    writable: &["category_name", "category_description"],
    required: &["category_name"],
};

pub const PRODUCTS: Table = Table {
    name: "products",
    pk: "product_id",
    columns: &[
        col("product_id", "integer"),
        col("product_sku", "varchar"),
        col("product_title", "varchar"),
        col("product_description", "text"),
        col("product_price", "numeric"),
        col("product_cost", "numeric"),
        col("product_weight_in_lbs", "numeric"),
        col("product_quantity_in_stock", "integer"),
        col("supplier_id", "integer"),
        col("created_at", "timestamptz"),
        col("updated_at", "timestamptz"),
    ],
    writable: &[
        "product_sku",
        "product_title",
        "product_description",
        "product_price",
        "product_cost",
        "product_weight_in_lbs",
        "product_quantity_in_stock",
        "supplier_id",
    ],
    required: &["product_sku", "product_title"],
};

/// Junction between products and categories. Not exposed over HTTP.
pub const PRODUCTS_CATEGORIES: Table = Table {
    name: "products_categories",
    pk: "product_id",
    columns: &[col("product_id", "integer"), col("category_id", "integer")],
    writable: &["product_id", "category_id"],
    required: &["product_id", "category_id"],
};

impl Table {
    pub fn is_writable(&self, name: &str) -> bool {
        self.writable.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_columns_are_writable() {
        for table in [&SUPPLIERS, &CATEGORIES, &PRODUCTS] {
            for req in table.required {
                assert!(table.is_writable(req), "{} not writable on {}", req, table.name);
            }
        }
    }

    #[test]
    fn writable_columns_exist_and_exclude_pk() {
        for table in [&SUPPLIERS, &CATEGORIES, &PRODUCTS, &PRODUCTS_CATEGORIES] {
            for w in table.writable {
                assert!(table.columns.iter().any(|c| c.name == *w));
            }
        }
        assert!(!SUPPLIERS.is_writable(SUPPLIERS.pk));
        assert!(!PRODUCTS.is_writable(PRODUCTS.pk));
    }
}
