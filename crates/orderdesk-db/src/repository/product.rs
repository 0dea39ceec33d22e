//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Register a product (validated, SKU unique)
//! - Lookup by SKU (pool or open transaction)
//! - Catalog listing
//!
//! ## Catalog Snapshot
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Pricing Reads the Catalog                        │
//! │                                                                         │
//! │  Order lines: [A x2, B x1, A x3]                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  distinct SKUs {A, B} ──► fetch_by_sku on the transaction connection   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HashMap<sku, Product>  ← implements orderdesk_core::Catalog           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderPricer (pure) prices every line against the snapshot             │
//! │                                                                         │
//! │  Missing SKUs are simply absent from the map; the pricer reports them. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use orderdesk_core::validation::{validate_price_cents, validate_product_name, validate_sku};
use orderdesk_core::{CoreError, Product};

/// Fetches one product by SKU on any executor (pool or transaction).
pub(crate) async fn fetch_by_sku<'e, E>(executor: E, sku: &str) -> DbResult<Option<Product>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, sku, name, full_price_cents, discounted_price_cents, created_at
        FROM products
        WHERE sku = ?1
        "#,
    )
    .bind(sku)
    .fetch_optional(executor)
    .await?;

    Ok(product)
}

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let widget = repo.register("WIDGET-1", "Widget", 5000, 4000).await?;
/// let found = repo.get_by_sku("WIDGET-1").await?;
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

    /// Validates and registers a new product, generating its id.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored product
    /// * `Err(RegisterError::Invalid)` - Field validation failed
    /// * `Err(RegisterError::Db(DbError::UniqueViolation))` - SKU already exists
    pub async fn register(
        &self,
        sku: &str,
        name: &str,
        full_price_cents: i64,
        discounted_price_cents: i64,
    ) -> Result<Product, RegisterError> {
        let sku = sku.trim();
        let name = name.trim();

        validate_sku(sku).map_err(CoreError::from)?;
        validate_product_name(name).map_err(CoreError::from)?;
        validate_price_cents("full_price_cents", full_price_cents).map_err(CoreError::from)?;
        validate_price_cents("discounted_price_cents", discounted_price_cents)
            .map_err(CoreError::from)?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            sku: sku.to_string(),
            name: name.to_string(),
            full_price_cents,
            discounted_price_cents,
            created_at: Utc::now(),
        };

        self.insert(&product).await?;
        Ok(product)
    }

    /// Inserts a product as-is.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - SKU (or id) already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, full_price_cents, discounted_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.full_price_cents)
        .bind(product.discounted_price_cents)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.ends_with("sku") => {
                DbError::duplicate("sku", &product.sku)
            }
            other => other,
        })?;

        Ok(())
    }

    /// Gets a product by its SKU.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        fetch_by_sku(&self.pool, sku).await
    }

    /// Lists the whole catalog ordered by SKU.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, full_price_cents, discounted_price_cents, created_at
            FROM products
            ORDER BY sku
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Counts catalog products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Failure modes of [`ProductRepository::register`].
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_register_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.register(" A ", "Widget", 5000, 4000).await.unwrap();
        assert_eq!(product.sku, "A");

        let found = repo.get_by_sku("A").await.unwrap().unwrap();
        assert_eq!(found, product);
        assert!(repo.get_by_sku("B").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.register("A", "Widget", 5000, 4000).await.unwrap();
        let err = repo.register("A", "Other", 100, 100).await.unwrap_err();

        match err {
            RegisterError::Db(DbError::UniqueViolation { field, value }) => {
                assert_eq!(field, "sku");
                assert_eq!(value, "A");
            }
            other => panic!("expected duplicate sku, got {other:?}"),
        }
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_product_not_stored() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        assert!(matches!(
            repo.register("A", "Widget", -1, 0).await,
            Err(RegisterError::Invalid(_))
        ));
        assert!(matches!(
            repo.register("bad sku", "Widget", 1, 1).await,
            Err(RegisterError::Invalid(_))
        ));
        assert!(matches!(
            repo.register("A", "   ", 1, 1).await,
            Err(RegisterError::Invalid(_))
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_ordered_by_sku() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.register("C", "Gamma", 300, 300).await.unwrap();
        repo.register("A", "Alpha", 100, 100).await.unwrap();
        repo.register("B", "Beta", 200, 200).await.unwrap();

        let skus: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.sku).collect();
        assert_eq!(skus, vec!["A", "B", "C"]);
    }
}
