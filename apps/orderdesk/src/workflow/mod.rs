//! # Workflows
//!
//! The two multi-step operations of OrderDesk. Each runs inside exactly one
//! [`orderdesk_db::DbTransaction`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Lifecycle                                      │
//! │                                                                         │
//! │  SubmitOrder                                                           │
//! │     │ validate (no I/O)                                                │
//! │     │ BEGIN                                                            │
//! │     │ catalog snapshot ──► OrderPricer                                 │
//! │     │                                                                   │
//! │     ├── discount ≤ ceiling ──► INSERT sale + lines ──► COMMIT          │
//! │     └── discount > ceiling ──► INSERT approval (pending) ──► COMMIT    │
//! │                                        │                                │
//! │  ResolveApproval                       ▼                                │
//! │     │ BEGIN                                                            │
//! │     │ claim pending ──► accepted ──► INSERT sale ──► COMMIT            │
//! │     │               └─► denied ─────────────────────► COMMIT           │
//! │     └ any failure ──► ROLLBACK, error returned                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod approval;
mod sale;

pub use approval::{ApprovalResolver, ResolveOutcome};
pub use sale::{SaleWorkflow, SubmitOutcome};

use std::future::Future;

use orderdesk_db::{Database, DbTransaction};
use tracing::warn;

use crate::error::ApiResult;

/// Runs `work` inside a fresh transaction: commit on `Ok`, rollback on `Err`.
///
/// The original error is returned even if the rollback itself fails.
pub(crate) async fn in_transaction<T, F, Fut>(db: &Database, work: F) -> ApiResult<T>
where
    F: FnOnce(DbTransaction) -> Fut,
    Fut: Future<Output = (DbTransaction, ApiResult<T>)>,
{
    let tx = db.begin().await?;
    let (tx, result) = work(tx).await;

    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
