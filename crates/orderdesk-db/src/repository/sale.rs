//! # Sale Repository
//!
//! Database operations for sales and their line snapshots.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Write (inside a transaction)                    │
//! │                                                                         │
//! │  1. INSERT sales (id, customer, total_cents, created_at)               │
//! │     └── total is final: priced before the row exists                   │
//! │                                                                         │
//! │  2. INSERT sale_lines × N (sku, quantity, unit price, line total)      │
//! │     └── snapshots, not references: later catalog edits don't move them │
//! │                                                                         │
//! │  Sales are never updated after insert.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes only happen through [`crate::DbTransaction`]; this repository is
//! the read side.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use orderdesk_core::{Sale, SaleLine};

/// Inserts a sale header and its lines on one connection.
pub(crate) async fn insert_with_lines(
    conn: &mut SqliteConnection,
    sale: &Sale,
    lines: &[SaleLine],
) -> DbResult<()> {
    debug!(id = %sale.id, lines = lines.len(), total = sale.total_cents, "Inserting sale");

    sqlx::query(
        r#"
        INSERT INTO sales (id, customer, total_cents, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.customer)
    .bind(sale.total_cents)
    .bind(sale.created_at)
    .execute(&mut *conn)
    .await?;

    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO sale_lines (
                id, sale_id, position, sku, quantity, unit_price_cents, line_total_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&line.id)
        .bind(&line.sale_id)
        .bind(line.position)
        .bind(&line.sku)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.line_total_cents)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Repository for reading committed sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer, total_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets the lines of a sale in submission order.
    ///
    /// Sales promoted from an approval request have no lines.
    pub async fn get_lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, position, sku, quantity, unit_price_cents, line_total_cents
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists sales, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer, total_cents, created_at
            FROM sales
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Counts committed sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::{Database, DbConfig};

    fn sale(id: &str, minutes_ago: i64) -> Sale {
        Sale {
            id: id.to_string(),
            customer: "Maria".to_string(),
            total_cents: 10500,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    fn line(sale_id: &str, position: i64, sku: &str) -> SaleLine {
        SaleLine {
            id: format!("{sale_id}-{position}"),
            sale_id: sale_id.to_string(),
            position,
            sku: sku.to_string(),
            quantity: 2,
            unit_price_cents: 5000,
            line_total_cents: 10000,
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let header = sale("s-1", 0);
        let lines = vec![line("s-1", 1, "B"), line("s-1", 0, "A")];

        let mut tx = db.begin().await.unwrap();
        tx.insert_sale(&header, &lines).await.unwrap();
        tx.commit().await.unwrap();

        let repo = db.sales();
        assert_eq!(repo.get_by_id("s-1").await.unwrap(), Some(header));

        let stored = repo.get_lines("s-1").await.unwrap();
        let skus: Vec<&str> = stored.iter().map(|l| l.sku.as_str()).collect();
        assert_eq!(skus, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        tx.insert_sale(&sale("old", 30), &[]).await.unwrap();
        tx.insert_sale(&sale("new", 1), &[]).await.unwrap();
        tx.commit().await.unwrap();

        let ids: Vec<String> = db.sales().list().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(db.sales().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.sales().get_by_id("nope").await.unwrap().is_none());
        assert!(db.sales().get_lines("nope").await.unwrap().is_empty());
    }
}
