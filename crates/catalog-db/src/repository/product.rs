//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Create at the end of the list (`index = count + 1`)
//! - List in index order
//! - Rename
//! - Delete, then close the gap in one transaction
//!
//! ## Delete + Reindex
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 DELETE /products/{B}                                    │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    DELETE FROM products WHERE id = B RETURNING "index"   ← write lock   │
//! │       │  (variants of B go with it: ON DELETE CASCADE)                  │
//! │       ▼                                                                 │
//! │    SELECT id, "index" FROM products ORDER BY "index"                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    reindex::plan()  →  C 3→2, D 4→3                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    UPDATE products SET "index" = 2 WHERE id = C                        │
//! │    UPDATE variants SET sku_code = '2_<v>' WHERE product_id = C         │
//! │    ... same for D                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    ensure_dense()                                                       │
//! │  COMMIT   (any error before this point rolls everything back)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::regenerate_skus;
use crate::error::{DbError, DbResult};
use catalog_core::reindex::{self, Slot};
use catalog_core::{DeleteConfirmation, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let shoes = repo.create("Classic Shoes").await?;
/// let all = repo.list().await?;
/// repo.delete(&shoes.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product at the end of the list.
    ///
    /// The index is computed inside the INSERT itself, so the count and the
    /// write happen under the same lock.
    ///
    /// ## Arguments
    /// * `name` - Already validated display name
    pub async fn create(&self, name: &str) -> DbResult<Product> {
        let id = Uuid::new_v4().to_string();

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, "index")
            SELECT ?1, ?2, COUNT(*) + 1 FROM products
            RETURNING id, name, "index"
            "#,
        )
        .bind(&id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        info!(product_id = %product.id, index = product.index, "Product created");
        Ok(product)
    }

    /// Lists every product ordered by index.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"SELECT id, name, "index" FROM products ORDER BY "index" ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"SELECT id, name, "index" FROM products WHERE id = ?1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Renames a product. `None` leaves the name as it is.
    ///
    /// The index never changes here; returns `Ok(None)` if the product is gone.
    pub async fn update_name(&self, id: &str, name: Option<&str>) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET name = COALESCE(?2, name)
            WHERE id = ?1
            RETURNING id, name, "index"
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(p) = &product {
            debug!(product_id = %p.id, "Product updated");
        }
        Ok(product)
    }

    /// Number of products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Deletes a product (its variants cascade) and renumbers the remaining
    /// products to `1..N-1`, rewriting the SKU codes of every product whose
    /// index moved.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no product with this id; nothing changes
    /// * Any failure before COMMIT rolls back the delete too
    pub async fn delete(&self, id: &str) -> DbResult<DeleteConfirmation> {
        let mut tx = self.pool.begin().await?;

        let removed: Option<i64> =
            sqlx::query_scalar(r#"DELETE FROM products WHERE id = ?1 RETURNING "index""#)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(removed_index) = removed else {
            return Err(DbError::not_found("Product", id));
        };

        let slots: Vec<Slot> = sqlx::query_as::<_, (String, i64)>(
            r#"SELECT id, "index" FROM products ORDER BY "index""#,
        )
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|(id, index)| Slot::new(id, index))
        .collect();

        let moves = reindex::plan(&slots);
        for mv in &moves {
            sqlx::query(r#"UPDATE products SET "index" = ?2 WHERE id = ?1"#)
                .bind(&mv.id)
                .bind(mv.to)
                .execute(&mut *tx)
                .await?;

            regenerate_skus(&mut *tx, &mv.id, mv.to).await?;
        }

        let indices: Vec<i64> = sqlx::query_scalar(r#"SELECT "index" FROM products"#)
            .fetch_all(&mut *tx)
            .await?;
        if let Err(e) = reindex::ensure_dense("products", indices) {
            warn!(product_id = %id, error = %e, "Product reindex left a gap, rolling back");
            return Err(e.into());
        }

        tx.commit().await?;

        info!(
            product_id = %id,
            removed_index,
            renumbered = moves.len(),
            "Product deleted"
        );
        Ok(DeleteConfirmation::product(id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed(db: &Database, names: &[&str]) -> Vec<Product> {
        let mut out = Vec::new();
        for name in names {
            out.push(db.products().create(name).await.unwrap());
        }
        out
    }

    fn indices(products: &[Product]) -> Vec<(String, i64)> {
        products.iter().map(|p| (p.name.clone(), p.index)).collect()
    }

    #[tokio::test]
    async fn test_create_appends() {
        let db = db().await;
        let created = seed(&db, &["A", "B", "C"]).await;
        assert_eq!(
            created.iter().map(|p| p.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(db.products().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_middle_closes_gap() {
        let db = db().await;
        let p = seed(&db, &["A", "B", "C", "D"]).await;

        let confirmation = db.products().delete(&p[1].id).await.unwrap();
        assert!(confirmation.deleted);
        assert_eq!(confirmation.id, p[1].id);

        let after = db.products().list().await.unwrap();
        assert_eq!(
            indices(&after),
            vec![("A".into(), 1), ("C".into(), 2), ("D".into(), 3)]
        );
    }

    #[tokio::test]
    async fn test_delete_first_and_last() {
        let db = db().await;
        let p = seed(&db, &["A", "B", "C"]).await;

        db.products().delete(&p[2].id).await.unwrap();
        assert_eq!(
            indices(&db.products().list().await.unwrap()),
            vec![("A".into(), 1), ("B".into(), 2)]
        );

        db.products().delete(&p[0].id).await.unwrap();
        assert_eq!(
            indices(&db.products().list().await.unwrap()),
            vec![("B".into(), 1)]
        );

        // Creating after deletes continues from the dense tail
        let e = db.products().create("E").await.unwrap();
        assert_eq!(e.index, 2);
    }

    #[tokio::test]
    async fn test_delete_missing_changes_nothing() {
        let db = db().await;
        seed(&db, &["A", "B"]).await;

        let err = db.products().delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.products().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_cascades_variants_and_rewrites_skus() {
        let db = db().await;
        let p = seed(&db, &["A", "B", "C"]).await;
        db.variants().create(&p[1].id, "b1", "test").await.unwrap();
        let c1 = db.variants().create(&p[2].id, "c1", "test").await.unwrap();
        let c2 = db.variants().create(&p[2].id, "c2", "test").await.unwrap();
        assert_eq!(c2.sku_code, "3_2");

        db.products().delete(&p[1].id).await.unwrap();

        let remaining = db.variants().find(&Default::default()).await.unwrap();
        assert_eq!(remaining.len(), 2);
        let c1 = db.variants().get_by_id(&c1.id).await.unwrap().unwrap();
        let c2 = db.variants().get_by_id(&c2.id).await.unwrap().unwrap();
        assert_eq!(c1.sku_code, "2_1");
        assert_eq!(c2.sku_code, "2_2");
    }

    #[tokio::test]
    async fn test_failed_renumber_rolls_back_delete() {
        let db = db().await;
        let p = seed(&db, &["A", "B"]).await;
        let b1 = db.variants().create(&p[1].id, "b1", "test").await.unwrap();

        sqlx::query(
            r#"
            CREATE TRIGGER block_product_renumber
            BEFORE UPDATE OF "index" ON products
            BEGIN SELECT RAISE(ABORT, 'renumber blocked'); END
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.products().delete(&p[0].id).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)), "{err:?}");

        assert_eq!(
            indices(&db.products().list().await.unwrap()),
            vec![("A".into(), 1), ("B".into(), 2)]
        );
        let b1 = db.variants().get_by_id(&b1.id).await.unwrap().unwrap();
        assert_eq!(b1.sku_code, "2_1");
    }

    #[tokio::test]
    async fn test_update_name_keeps_index() {
        let db = db().await;
        let p = seed(&db, &["A", "B"]).await;

        let renamed = db
            .products()
            .update_name(&p[1].id, Some("Bee"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Bee");
        assert_eq!(renamed.index, 2);

        let untouched = db
            .products()
            .update_name(&p[0].id, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.name, "A");

        assert!(db.products().update_name("missing", Some("x")).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deletes_stay_dense() {
        let path = std::env::temp_dir().join(format!("catalog-test-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(4))
            .await
            .unwrap();

        let p = seed(&db, &["A", "B", "C", "D", "E", "F"]).await;
        for product in &p {
            db.variants().create(&product.id, "v", "test").await.unwrap();
        }

        let repo = db.products();
        let (r1, r2, r3) = tokio::join!(
            repo.delete(&p[0].id),
            repo.delete(&p[2].id),
            repo.delete(&p[4].id),
        );
        r1.unwrap();
        r2.unwrap();
        r3.unwrap();

        let after = db.products().list().await.unwrap();
        assert_eq!(
            indices(&after),
            vec![("B".into(), 1), ("D".into(), 2), ("F".into(), 3)]
        );
        for product in &after {
            let variants = db
                .variants()
                .find(&catalog_core::VariantFilter::for_product(&product.id))
                .await
                .unwrap();
            assert_eq!(variants[0].variant.sku_code, format!("{}_1", product.index));
            assert_eq!(&variants[0].product, product);
        }

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = db().await;
        let p = seed(&db, &["A"]).await;
        assert_eq!(
            db.products().get_by_id(&p[0].id).await.unwrap(),
            Some(p[0].clone())
        );
        assert_eq!(db.products().get_by_id("missing").await.unwrap(), None);
    }
}
