//! # Transaction Scope
//!
//! One connection, one unit of work.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    DbTransaction Lifecycle                              │
//! │                                                                         │
//! │  db.begin() ──► BEGIN                                                   │
//! │       │                                                                 │
//! │       ├── reads  (catalog snapshot, approval request)                  │
//! │       ├── writes (sale + lines, approval request, status claim)        │
//! │       │                                                                 │
//! │       ├── commit()   ──► COMMIT    all writes visible together         │
//! │       ├── rollback() ──► ROLLBACK  nothing visible                     │
//! │       └── drop       ──► ROLLBACK  (error paths that return early)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every read inside a workflow goes through the transaction, never the
//! pool: the pool may have no spare connection while this one is held.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{approval, product, sale};
use orderdesk_core::{ApprovalRequest, ApprovalStatus, Product, Sale, SaleLine};

/// An open database transaction.
#[derive(Debug)]
pub struct DbTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl DbTransaction {
    pub(crate) async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool.begin().await.map_err(|e| match e {
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            other => DbError::TransactionFailed(other.to_string()),
        })?;

        debug!("Transaction started");
        Ok(DbTransaction { tx })
    }

    /// Looks up one product by SKU.
    pub async fn product_by_sku(&mut self, sku: &str) -> DbResult<Option<Product>> {
        product::fetch_by_sku(&mut *self.tx, sku).await
    }

    /// Loads the products for a set of SKUs into a map keyed by SKU.
    ///
    /// Duplicate SKUs are fetched once. Unknown SKUs are left out.
    pub async fn load_catalog<'s, I>(&mut self, skus: I) -> DbResult<HashMap<String, Product>>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let distinct: BTreeSet<&str> = skus.into_iter().collect();
        let mut catalog = HashMap::with_capacity(distinct.len());

        for sku in distinct {
            if let Some(product) = self.product_by_sku(sku).await? {
                catalog.insert(product.sku.clone(), product);
            }
        }

        debug!(products = catalog.len(), "Catalog snapshot loaded");
        Ok(catalog)
    }

    /// Writes a sale and its lines.
    pub async fn insert_sale(&mut self, sale: &Sale, lines: &[SaleLine]) -> DbResult<()> {
        sale::insert_with_lines(&mut self.tx, sale, lines).await
    }

    /// Writes a new approval request.
    pub async fn insert_approval_request(&mut self, request: &ApprovalRequest) -> DbResult<()> {
        approval::insert(&mut self.tx, request).await
    }

    /// Reads an approval request.
    pub async fn approval_request(&mut self, id: &str) -> DbResult<Option<ApprovalRequest>> {
        approval::fetch_by_id(&mut *self.tx, id).await
    }

    /// Moves a pending approval request to a final status.
    ///
    /// ## Returns
    /// * `Ok(ApprovalRequest)` - The request as updated
    /// * `Err(DbError::NotFound)` - No request with this id
    /// * `Err(DbError::InvalidState)` - The request was already resolved
    pub async fn claim_approval(
        &mut self,
        id: &str,
        status: ApprovalStatus,
        resolved_at: DateTime<Utc>,
    ) -> DbResult<ApprovalRequest> {
        approval::claim(&mut self.tx, id, status, resolved_at).await
    }

    /// Commits every write made in this scope.
    pub async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Transaction committed");
        Ok(())
    }

    /// Discards every write made in this scope.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Transaction rolled back");
        Ok(())
    }
}
