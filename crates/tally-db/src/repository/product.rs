//! # Product Repository
//!
//! Catalog persistence. The in-memory [`Catalog`] is the working shape;
//! this repository loads and stores its flat product rows.
//!
//! ## Seeding
//! ```text
//! First run           products table empty
//!      │                     │
//!      ▼                     ▼
//! load_catalog() ──► falls back to Catalog::defaults()
//!      │
//!      ▼
//! First user edit persists the full catalog, defaults included
//! ```

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::{Catalog, Product};

/// A `products` table row.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price_cents: i64,
    category: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price_cents: row.price_cents,
            category: row.category,
        }
    }
}

/// Repository for product catalog persistence.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Loads the stored catalog.
    ///
    /// An empty products table yields the seeded defaults; stored rows are
    /// reconciled against the current default prices on every load, and the
    /// corrected catalog is persisted when anything changed, so subsequent
    /// loads see the fixed prices.
    pub async fn load_catalog(&self) -> DbResult<Catalog> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, price_cents, category FROM products ORDER BY category, rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            debug!("Products table empty, using seeded defaults");
            return Ok(Catalog::defaults());
        }

        let mut catalog = Catalog::from_products(rows.into_iter().map(Product::from));
        let corrected = catalog.reconcile_defaults();
        if corrected > 0 {
            debug!(corrected, "Reconciled stored prices against defaults");
            self.replace_all(&catalog).await?;
        }
        Ok(catalog)
    }

    /// Inserts one product.
    ///
    /// ## Errors
    /// [`DbError::UniqueViolation`] when the (category, name) pair exists.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(name = %product.name, category = %product.category, "Inserting product");

        sqlx::query(
            "INSERT INTO products (id, name, price_cents, category) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(&product.category)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a product by id.
    pub async fn delete(&self, product_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id));
        }
        Ok(())
    }

    /// Replaces the stored catalog wholesale.
    ///
    /// Used after in-memory catalog edits and by overwrite-import.
    pub async fn replace_all(&self, catalog: &Catalog) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
        for product in catalog.all() {
            sqlx::query(
                "INSERT INTO products (id, name, price_cents, category) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&product.id)
            .bind(&product.name)
            .bind(product.price_cents)
            .bind(&product.category)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(count = catalog.len(), "Replaced product catalog");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_table_yields_defaults() {
        let db = test_db().await;
        let catalog = db.products().load_catalog().await.unwrap();

        assert!(!catalog.is_empty());
        assert!(catalog.in_category("beer").iter().any(|p| p.name == "Corona"));
    }

    #[tokio::test]
    async fn test_store_and_reload() {
        let db = test_db().await;
        let repo = db.products();

        let mut catalog = Catalog::defaults();
        catalog
            .add_product(Product::new("House Special", 1250, "snacks"))
            .unwrap();
        repo.replace_all(&catalog).await.unwrap();

        let loaded = repo.load_catalog().await.unwrap();
        assert_eq!(loaded.len(), catalog.len());
        assert!(loaded
            .in_category("snacks")
            .iter()
            .any(|p| p.name == "House Special"));
    }

    #[tokio::test]
    async fn test_load_reconciles_stale_default_prices() {
        let db = test_db().await;
        let repo = db.products();

        repo.replace_all(&Catalog::defaults()).await.unwrap();

        // Simulate a stale stored price for a default product
        sqlx::query("UPDATE products SET price_cents = 1 WHERE name = 'Chips'")
            .execute(db.pool())
            .await
            .unwrap();

        let loaded = repo.load_catalog().await.unwrap();
        let chips = loaded
            .in_category("snacks")
            .iter()
            .find(|p| p.name == "Chips")
            .unwrap();
        assert_eq!(chips.price_cents, 325);

        // The correction was persisted
        let stored: i64 =
            sqlx::query_scalar("SELECT price_cents FROM products WHERE name = 'Chips'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(stored, 325);
    }

    #[tokio::test]
    async fn test_duplicate_name_in_category_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&Product::new("Pretzels", 275, "snacks"))
            .await
            .unwrap();
        let err = repo
            .insert(&Product::new("Pretzels", 300, "snacks"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.products();

        let product = Product::new("Pretzels", 275, "snacks");
        repo.insert(&product).await.unwrap();
        repo.delete(&product.id).await.unwrap();
        assert!(matches!(
            repo.delete(&product.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
