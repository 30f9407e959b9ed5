//! # Repository Module
//!
//! Database repository implementations for the catalog.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.variants().delete(id)                                      │
//! │       ▼                                                                 │
//! │  VariantRepository                                                     │
//! │  ├── create(&self, product_id, name, created_by)                       │
//! │  ├── find(&self, filter)                                               │
//! │  ├── update_name(&self, id, name)                                      │
//! │  └── delete(&self, id)   ← delete + reindex in one transaction         │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD + reindex on delete
//! - [`VariantRepository`](variant::VariantRepository) - Variant CRUD, search + reindex on delete
//! - [`UserRepository`](user::UserRepository) - Login accounts

pub mod product;
pub mod user;
pub mod variant;

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use catalog_core::derive_sku;

/// Rewrites the SKU code of every variant of `product_id` from the product's
/// new index. Runs on the caller's transaction.
pub(crate) async fn regenerate_skus(
    conn: &mut SqliteConnection,
    product_id: &str,
    product_index: i64,
) -> DbResult<u64> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as(r#"SELECT id, "index" FROM variants WHERE product_id = ?1"#)
            .bind(product_id)
            .fetch_all(&mut *conn)
            .await?;

    let mut rewritten = 0;
    for (variant_id, variant_index) in rows {
        let sku = derive_sku(product_index, variant_index);
        rewritten +=
            sqlx::query("UPDATE variants SET sku_code = ?2 WHERE id = ?1 AND sku_code <> ?2")
                .bind(&variant_id)
                .bind(&sku)
                .execute(&mut *conn)
                .await?
                .rows_affected();
    }

    debug!(product_id = %product_id, product_index, rewritten, "Regenerated SKU codes");
    Ok(rewritten)
}
