//! # Approval Resolver
//!
//! Moves a pending approval request to accepted (creating its sale) or
//! denied. A request resolves exactly once; every later attempt is a
//! conflict, including two resolvers racing on the same id.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use orderdesk_core::validation::validate_record_id;
use orderdesk_core::{ApprovalRequest, Decision, Sale};
use orderdesk_db::{Database, DbTransaction};

use super::in_transaction;
use crate::error::ApiResult;

/// What a resolution produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    /// Accepted: the request and the sale created from it.
    SaleCreated { request: ApprovalRequest, sale: Sale },

    /// Denied: no sale exists for this request.
    Denied(ApprovalRequest),
}

#[derive(Debug, Clone)]
pub struct ApprovalResolver {
    db: Database,
}

impl ApprovalResolver {
    pub fn new(db: Database) -> Self {
        ApprovalResolver { db }
    }

    /// Resolves a pending request.
    ///
    /// ## Errors
    /// - `INVALID_INPUT` for a blank id
    /// - `NOT_FOUND` if no request has this id
    /// - `CONFLICT` if the request is no longer pending
    pub async fn resolve(&self, request_id: &str, decision: Decision) -> ApiResult<ResolveOutcome> {
        let request_id = validate_record_id(request_id)?;

        let id = request_id.as_str();
        let outcome = in_transaction(&self.db, |mut tx| async move {
            let result = apply(&mut tx, id, decision).await;
            (tx, result)
        })
        .await?;

        match &outcome {
            ResolveOutcome::SaleCreated { request, sale } => info!(
                request_id = %request.id,
                sale_id = %sale.id,
                total = sale.total_cents,
                "Approval accepted, sale committed"
            ),
            ResolveOutcome::Denied(request) => {
                info!(request_id = %request.id, "Approval denied")
            }
        }

        Ok(outcome)
    }
}

async fn apply(tx: &mut DbTransaction, id: &str, decision: Decision) -> ApiResult<ResolveOutcome> {
    let now = Utc::now();
    let request = tx.claim_approval(id, decision.status(), now).await?;

    match decision {
        Decision::Denied => Ok(ResolveOutcome::Denied(request)),
        Decision::Accepted => {
            // Promoted sales carry the stored total only, no line rows.
            let sale = Sale {
                id: Uuid::new_v4().to_string(),
                customer: request.customer.clone(),
                total_cents: request.total_cents,
                created_at: now,
            };
            tx.insert_sale(&sale, &[]).await?;
            Ok(ResolveOutcome::SaleCreated { request, sale })
        }
    }
}
