//! # Approval Request Repository
//!
//! Persistence for sales held back because their discount exceeded the
//! ceiling.
//!
//! ## Resolution Is a Compare-and-Swap
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Claiming a Pending Request                           │
//! │                                                                         │
//! │  UPDATE approval_requests                                              │
//! │     SET status = 'accepted' | 'denied', resolved_at = now              │
//! │   WHERE id = ? AND status = 'pending'                                  │
//! │                                                                         │
//! │  rows_affected = 1  ──► this caller owns the transition               │
//! │  rows_affected = 0  ──► re-read the row:                               │
//! │                          missing        → DbError::NotFound            │
//! │                          not pending    → DbError::InvalidState        │
//! │                                                                         │
//! │  Two resolvers racing on the same id: SQLite serializes the writes,    │
//! │  the second UPDATE matches no row and fails with InvalidState.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use orderdesk_core::{ApprovalRequest, ApprovalStatus};

const ENTITY: &str = "ApprovalRequest";

/// Fetches one approval request by id on any executor.
pub(crate) async fn fetch_by_id<'e, E>(executor: E, id: &str) -> DbResult<Option<ApprovalRequest>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let request = sqlx::query_as::<_, ApprovalRequest>(
        r#"
        SELECT id, customer, total_cents, requested_discount_cents,
               discount_ceiling_cents, status, created_at, resolved_at
        FROM approval_requests
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(request)
}

/// Inserts a new approval request.
pub(crate) async fn insert(conn: &mut SqliteConnection, request: &ApprovalRequest) -> DbResult<()> {
    debug!(id = %request.id, total = request.total_cents, "Inserting approval request");

    sqlx::query(
        r#"
        INSERT INTO approval_requests (
            id, customer, total_cents, requested_discount_cents,
            discount_ceiling_cents, status, created_at, resolved_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&request.id)
    .bind(&request.customer)
    .bind(request.total_cents)
    .bind(request.requested_discount_cents)
    .bind(request.discount_ceiling_cents)
    .bind(request.status)
    .bind(request.created_at)
    .bind(request.resolved_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Moves a pending request to `status`, failing if it is missing or already
/// resolved. Returns the updated row.
pub(crate) async fn claim(
    conn: &mut SqliteConnection,
    id: &str,
    status: ApprovalStatus,
    resolved_at: DateTime<Utc>,
) -> DbResult<ApprovalRequest> {
    if status == ApprovalStatus::Pending {
        return Err(DbError::Internal(
            "cannot claim an approval request back to pending".to_string(),
        ));
    }

    let result = sqlx::query(
        r#"
        UPDATE approval_requests
        SET status = ?2, resolved_at = ?3
        WHERE id = ?1 AND status = 'pending'
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(resolved_at)
    .execute(&mut *conn)
    .await?;

    let current = fetch_by_id(&mut *conn, id).await?;

    match current {
        None => Err(DbError::not_found(ENTITY, id)),
        Some(request) if result.rows_affected() == 0 => Err(DbError::InvalidState {
            entity: ENTITY.to_string(),
            id: id.to_string(),
            current: request.status.as_str().to_string(),
            expected: ApprovalStatus::Pending.as_str().to_string(),
        }),
        Some(request) => {
            debug!(id = %id, status = status.as_str(), "Approval request claimed");
            Ok(request)
        }
    }
}

/// Repository for reading approval requests.
#[derive(Debug, Clone)]
pub struct ApprovalRepository {
    pool: SqlitePool,
}

impl ApprovalRepository {
    /// Creates a new ApprovalRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ApprovalRepository { pool }
    }

    /// Gets an approval request by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ApprovalRequest>> {
        fetch_by_id(&self.pool, id).await
    }

    /// Lists every approval request (pending and resolved), oldest first.
    pub async fn list(&self) -> DbResult<Vec<ApprovalRequest>> {
        let requests = sqlx::query_as::<_, ApprovalRequest>(
            r#"
            SELECT id, customer, total_cents, requested_discount_cents,
                   discount_ceiling_cents, status, created_at, resolved_at
            FROM approval_requests
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = requests.len(), "Listed approval requests");
        Ok(requests)
    }

    /// Lists requests in one status, oldest first.
    pub async fn list_by_status(&self, status: ApprovalStatus) -> DbResult<Vec<ApprovalRequest>> {
        let requests = sqlx::query_as::<_, ApprovalRequest>(
            r#"
            SELECT id, customer, total_cents, requested_discount_cents,
                   discount_ceiling_cents, status, created_at, resolved_at
            FROM approval_requests
            WHERE status = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Counts approval requests.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM approval_requests")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
