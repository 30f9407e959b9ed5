//! # Variant Repository
//!
//! Database operations for product variants.
//!
//! Variant indices are dense per product, and every variant's SKU code is
//! `"<productIndex>_<variantIndex>"`. Both are maintained here: at insert
//! time and inside the delete transaction.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::regenerate_skus;
use crate::error::{DbError, DbResult};
use catalog_core::reindex::{self, Slot};
use catalog_core::validation::search_key;
use catalog_core::{
    derive_sku, DeleteConfirmation, Product, Variant, VariantFilter, VariantListing,
};

const VARIANT_COLUMNS: &str = r#"id, name, "index", sku_code, created_by, product_id"#;

/// One row of the variant listing: the variant joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: String,
    name: String,
    index: i64,
    sku_code: String,
    created_by: String,
    product_id: String,
    product_name: String,
    product_index: i64,
}

impl From<ListingRow> for VariantListing {
    fn from(row: ListingRow) -> Self {
        VariantListing {
            product: Product {
                id: row.product_id.clone(),
                name: row.product_name,
                index: row.product_index,
            },
            variant: Variant {
                id: row.id,
                name: row.name,
                index: row.index,
                sku_code: row.sku_code,
                created_by: row.created_by,
                product_id: row.product_id,
            },
        }
    }
}

/// Repository for variant database operations.
#[derive(Debug, Clone)]
pub struct VariantRepository {
    pool: SqlitePool,
}

impl VariantRepository {
    /// Creates a new VariantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VariantRepository { pool }
    }

    /// Appends a variant to a product.
    ///
    /// The INSERT reads the owning product and the sibling count in the same
    /// statement, so a missing product simply inserts nothing.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - the product does not exist
    pub async fn create(
        &self,
        product_id: &str,
        name: &str,
        created_by: &str,
    ) -> DbResult<Variant> {
        let id = Uuid::new_v4().to_string();
        let mut tx = self.pool.begin().await?;

        let inserted: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO variants
                (id, name, search_name, "index", sku_code, created_by, product_id)
            SELECT ?1, ?2, ?3,
                   (SELECT COUNT(*) FROM variants WHERE product_id = p.id) + 1,
                   '', ?4, p.id
            FROM products p
            WHERE p.id = ?5
            RETURNING "index"
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(search_key(name))
        .bind(created_by)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(variant_index) = inserted else {
            return Err(DbError::not_found("Product", product_id));
        };

        let product_index: i64 = sqlx::query_scalar(r#"SELECT "index" FROM products WHERE id = ?1"#)
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await?;

        let variant = sqlx::query_as::<_, Variant>(&format!(
            "UPDATE variants SET sku_code = ?2 WHERE id = ?1 RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(&id)
        .bind(derive_sku(product_index, variant_index))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            variant_id = %variant.id,
            product_id = %product_id,
            sku = %variant.sku_code,
            "Variant created"
        );
        Ok(variant)
    }

    /// Gets a variant by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Variant>> {
        let variant = sqlx::query_as::<_, Variant>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM variants WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(variant)
    }

    /// Lists variants matching `filter` together with their products,
    /// ordered by index.
    ///
    /// ## Filters (all optional, combined with AND)
    /// - `product_id` - exact
    /// - `created_by` - exact
    /// - `search` - case-insensitive substring of name OR SKU code
    ///
    /// Names are matched through the `search_name` column, which holds the
    /// Unicode-lowercased name. SKU codes are ASCII, so `lower()` is enough
    /// for them.
    ///
    /// Variants of different products share index values, so the product's
    /// own index breaks ties to keep the order stable.
    pub async fn find(&self, filter: &VariantFilter) -> DbResult<Vec<VariantListing>> {
        let pattern = filter.search.as_deref().map(like_pattern);
        let order = filter.sort.as_sql();

        let sql = format!(
            r#"
            SELECT v.id, v.name, v."index", v.sku_code, v.created_by, v.product_id,
                   p.name AS product_name, p."index" AS product_index
            FROM variants v
            JOIN products p ON p.id = v.product_id
            WHERE (?1 IS NULL OR v.product_id = ?1)
              AND (?2 IS NULL OR v.created_by = ?2)
              AND (?3 IS NULL
                   OR v.search_name LIKE ?3 ESCAPE '\'
                   OR lower(v.sku_code) LIKE ?3 ESCAPE '\')
            ORDER BY v."index" {order}, p."index" {order}
            "#
        );

        let variants: Vec<VariantListing> = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(filter.product_id.as_deref())
            .bind(filter.created_by.as_deref())
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(VariantListing::from)
            .collect();

        debug!(count = variants.len(), ?filter, "Listed variants");
        Ok(variants)
    }

    /// Renames a variant. Index, SKU code, creator and product never change here.
    pub async fn update_name(&self, id: &str, name: Option<&str>) -> DbResult<Option<Variant>> {
        let variant = sqlx::query_as::<_, Variant>(&format!(
            r#"
            UPDATE variants
            SET name = COALESCE(?2, name), search_name = COALESCE(?3, search_name)
            WHERE id = ?1
            RETURNING {VARIANT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(name.map(search_key))
        .fetch_optional(&self.pool)
        .await?;

        if let Some(v) = &variant {
            debug!(variant_id = %v.id, "Variant updated");
        }
        Ok(variant)
    }

    /// Deletes a variant and renumbers its siblings to `1..M-1`, rewriting
    /// their SKU codes. Variants of other products are not touched.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no variant with this id; nothing changes
    pub async fn delete(&self, id: &str) -> DbResult<DeleteConfirmation> {
        let mut tx = self.pool.begin().await?;

        let removed: Option<String> =
            sqlx::query_scalar("DELETE FROM variants WHERE id = ?1 RETURNING product_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(product_id) = removed else {
            return Err(DbError::not_found("Variant", id));
        };

        let slots: Vec<Slot> = sqlx::query_as::<_, (String, i64)>(
            r#"SELECT id, "index" FROM variants WHERE product_id = ?1 ORDER BY "index""#,
        )
        .bind(&product_id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|(id, index)| Slot::new(id, index))
        .collect();

        let moves = reindex::plan(&slots);
        for mv in &moves {
            sqlx::query(r#"UPDATE variants SET "index" = ?2 WHERE id = ?1"#)
                .bind(&mv.id)
                .bind(mv.to)
                .execute(&mut *tx)
                .await?;
        }

        if !moves.is_empty() {
            let product_index: i64 =
                sqlx::query_scalar(r#"SELECT "index" FROM products WHERE id = ?1"#)
                    .bind(&product_id)
                    .fetch_one(&mut *tx)
                    .await?;
            regenerate_skus(&mut *tx, &product_id, product_index).await?;
        }

        let indices: Vec<i64> =
            sqlx::query_scalar(r#"SELECT "index" FROM variants WHERE product_id = ?1"#)
                .bind(&product_id)
                .fetch_all(&mut *tx)
                .await?;
        let scope = format!("variants of product {product_id}");
        if let Err(e) = reindex::ensure_dense(&scope, indices) {
            warn!(variant_id = %id, error = %e, "Variant reindex left a gap, rolling back");
            return Err(e.into());
        }

        tx.commit().await?;

        info!(
            variant_id = %id,
            product_id = %product_id,
            renumbered = moves.len(),
            "Variant deleted"
        );
        Ok(DeleteConfirmation::variant(id))
    }
}

/// Case-folded `%term%` LIKE pattern with `%`, `_` and `\` escaped.
fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in search_key(term).chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use catalog_core::SortOrder;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn product_with_variants(
        db: &Database,
        name: &str,
        variants: &[&str],
    ) -> (Product, Vec<Variant>) {
        let product = db.products().create(name).await.unwrap();
        let mut out = Vec::new();
        for v in variants {
            out.push(db.variants().create(&product.id, v, "test").await.unwrap());
        }
        (product, out)
    }

    async fn listed(db: &Database, filter: &VariantFilter) -> Vec<Variant> {
        db.variants()
            .find(filter)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.variant)
            .collect()
    }

    fn search(term: &str) -> VariantFilter {
        VariantFilter {
            search: Some(term.to_string()),
            ..Default::default()
        }
    }

    fn skus(variants: &[Variant]) -> Vec<(String, i64, String)> {
        variants
            .iter()
            .map(|v| (v.name.clone(), v.index, v.sku_code.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_create_assigns_index_and_sku() {
        let db = db().await;
        let (p, v) = product_with_variants(&db, "Shoes", &["Red", "Blue"]).await;

        assert_eq!(p.index, 1);
        assert_eq!(v[0].index, 1);
        assert_eq!(v[0].sku_code, "1_1");
        assert_eq!(v[1].index, 2);
        assert_eq!(v[1].sku_code, "1_2");
        assert_eq!(v[1].created_by, "test");
        assert_eq!(v[1].product_id, p.id);
    }

    #[tokio::test]
    async fn test_create_under_fifth_product() {
        let db = db().await;
        for name in ["A", "B", "C", "D"] {
            db.products().create(name).await.unwrap();
        }
        let (p, v) = product_with_variants(&db, "E", &["x", "y"]).await;

        assert_eq!(p.index, 5);
        assert_eq!(v[0].sku_code, "5_1");
        assert_eq!(v[1].sku_code, "5_2");
    }

    #[tokio::test]
    async fn test_create_for_missing_product() {
        let db = db().await;
        let err = db.variants().create("missing", "x", "test").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Product"));
        assert!(listed(&db, &VariantFilter::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_first_variant_renumbers_siblings() {
        let db = db().await;
        for name in ["A", "B"] {
            db.products().create(name).await.unwrap();
        }
        let (p, v) = product_with_variants(&db, "C", &["v1", "v2", "v3"]).await;

        db.variants().delete(&v[0].id).await.unwrap();

        let left = listed(&db, &VariantFilter::for_product(&p.id)).await;
        assert_eq!(
            skus(&left),
            vec![
                ("v2".to_string(), 1, "3_1".to_string()),
                ("v3".to_string(), 2, "3_2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_leaves_other_products_alone() {
        let db = db().await;
        let (p1, v1) = product_with_variants(&db, "A", &["a1", "a2"]).await;
        let (p2, _) = product_with_variants(&db, "B", &["b1", "b2"]).await;

        db.variants().delete(&v1[0].id).await.unwrap();

        let other = listed(&db, &VariantFilter::for_product(&p2.id)).await;
        assert_eq!(
            skus(&other),
            vec![
                ("b1".to_string(), 1, "2_1".to_string()),
                ("b2".to_string(), 2, "2_2".to_string()),
            ]
        );
        assert_eq!(listed(&db, &VariantFilter::for_product(&p1.id)).await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_variant() {
        let db = db().await;
        let err = db.variants().delete("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Variant"));
    }

    #[tokio::test]
    async fn test_find_filters_and_sort() {
        let db = db().await;
        let (p1, _) = product_with_variants(&db, "Shoes", &["Red 42", "Blue 43"]).await;
        let (_, _) = product_with_variants(&db, "Hats", &["Red cap"]).await;
        db.variants().create(&p1.id, "Green 44", "alice").await.unwrap();

        assert_eq!(listed(&db, &search("RED")).await.len(), 2);

        let found = listed(&db, &search("1_2")).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Blue 43");

        let by_creator = VariantFilter {
            created_by: Some("alice".to_string()),
            ..Default::default()
        };
        let found = listed(&db, &by_creator).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sku_code, "1_3");

        let desc = VariantFilter {
            product_id: Some(p1.id.clone()),
            sort: SortOrder::Desc,
            ..Default::default()
        };
        let order: Vec<i64> = listed(&db, &desc).await.iter().map(|v| v.index).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_find_includes_owning_product() {
        let db = db().await;
        db.products().create("Hats").await.unwrap();
        let (shoes, _) = product_with_variants(&db, "Shoes", &["Red 42"]).await;

        let found = db.variants().find(&VariantFilter::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].product, shoes);
        assert_eq!(found[0].variant.product_id, shoes.id);
        assert_eq!(found[0].variant.sku_code, "2_1");
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let db = db().await;
        let (_, v) = product_with_variants(&db, "Summer", &["ÉTÉ Édition", "Winter"]).await;

        for term in ["été", "ÉTÉ", "édition", "Été éd"] {
            let found = listed(&db, &search(term)).await;
            assert_eq!(found.len(), 1, "search {term:?}");
            assert_eq!(found[0].id, v[0].id);
        }

        db.variants()
            .update_name(&v[1].id, Some("ÄRMEL Über"))
            .await
            .unwrap();
        assert_eq!(listed(&db, &search("ärmel über")).await.len(), 1);
        assert!(listed(&db, &search("winter")).await.is_empty());
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = db().await;
        product_with_variants(&db, "Shoes", &["Red 42"]).await;

        assert!(listed(&db, &search("%")).await.is_empty());

        // '_' must not act as a single-character wildcard
        assert_eq!(listed(&db, &search("1_1")).await.len(), 1);
        assert!(listed(&db, &search("1_x")).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_name_keeps_sku() {
        let db = db().await;
        let (_, v) = product_with_variants(&db, "Shoes", &["Red"]).await;

        let renamed = db
            .variants()
            .update_name(&v[0].id, Some("Crimson"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Crimson");
        assert_eq!(renamed.sku_code, "1_1");
        assert_eq!(renamed.created_by, "test");
    }

    #[tokio::test]
    async fn test_failed_renumber_rolls_back_delete() {
        let db = db().await;
        let (p, v) = product_with_variants(&db, "Shoes", &["v1", "v2", "v3"]).await;

        sqlx::query(
            r#"
            CREATE TRIGGER block_variant_renumber
            BEFORE UPDATE OF "index" ON variants
            BEGIN SELECT RAISE(ABORT, 'renumber blocked'); END
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.variants().delete(&v[0].id).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)), "{err:?}");

        let left = listed(&db, &VariantFilter::for_product(&p.id)).await;
        assert_eq!(
            skus(&left),
            vec![
                ("v1".to_string(), 1, "1_1".to_string()),
                ("v2".to_string(), 2, "1_2".to_string()),
                ("v3".to_string(), 3, "1_3".to_string()),
            ]
        );
    }

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("Red"), "%red%");
        assert_eq!(like_pattern("5_2"), "%5\\_2%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("ÉTÉ"), "%été%");
    }
}
