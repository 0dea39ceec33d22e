//! # Sale Workflow
//!
//! Validates an order, prices it against the catalog, and records either a
//! committed sale or a pending approval request.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use orderdesk_core::validation::validate_order;
use orderdesk_core::{
    ApprovalRequest, ApprovalStatus, OrderPricer, OrderRequest, PricedOrder, Sale, SaleLine,
    SelectorPolicy,
};
use orderdesk_db::{Database, DbTransaction};

use super::in_transaction;
use crate::error::ApiResult;

/// What a submission produced. Exactly one of the two is ever written.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Discount within the ceiling: the sale and its lines are committed.
    SaleCreated { sale: Sale, lines: Vec<SaleLine> },

    /// Discount above the ceiling: a pending request is committed, no sale.
    ApprovalPending(ApprovalRequest),
}

/// Orchestrates order submission.
#[derive(Debug, Clone)]
pub struct SaleWorkflow {
    db: Database,
    policy: SelectorPolicy,
}

impl SaleWorkflow {
    pub fn new(db: Database, policy: SelectorPolicy) -> Self {
        SaleWorkflow { db, policy }
    }

    /// Submits an order.
    ///
    /// ## Errors
    /// - `INVALID_INPUT` for any malformed field (nothing is read or written)
    /// - `NOT_FOUND` if a SKU is not in the catalog (nothing is written)
    /// - `STORAGE_FAILURE` if the transaction fails (everything rolled back)
    pub async fn submit(&self, order: OrderRequest) -> ApiResult<SubmitOutcome> {
        validate_order(&order, self.policy)?;

        if !order.region.is_listed() {
            warn!(region = order.region.code(), "Unlisted region, freight is zero");
        }
        if !order.deadline.is_listed() {
            warn!(
                deadline = order.deadline.code(),
                "Unlisted deadline, no surcharge and ceiling falls back to freight"
            );
        }

        debug!(
            customer = %order.customer,
            lines = order.lines.len(),
            "Submitting order"
        );

        let order = &order;
        let outcome = in_transaction(&self.db, |mut tx| async move {
            let result = price_and_record(&mut tx, order).await;
            (tx, result)
        })
        .await?;

        match &outcome {
            SubmitOutcome::SaleCreated { sale, lines } => info!(
                sale_id = %sale.id,
                total = sale.total_cents,
                lines = lines.len(),
                "Sale committed"
            ),
            SubmitOutcome::ApprovalPending(request) => info!(
                request_id = %request.id,
                total = request.total_cents,
                discount = request.requested_discount_cents,
                ceiling = request.discount_ceiling_cents,
                "Discount above ceiling, approval request created"
            ),
        }

        Ok(outcome)
    }
}

async fn price_and_record(tx: &mut DbTransaction, order: &OrderRequest) -> ApiResult<SubmitOutcome> {
    let catalog = tx
        .load_catalog(order.lines.iter().map(|line| line.sku.as_str()))
        .await?;

    let priced = OrderPricer::new(&catalog).price(order)?;

    debug!(
        subtotal = priced.subtotal().cents(),
        freight = priced.freight().cents(),
        surcharge = priced.surcharge().cents(),
        ceiling = priced.discount_ceiling().cents(),
        total = priced.total().cents(),
        "Order priced"
    );

    if priced.requires_approval() {
        let request = approval_request(&order.customer, &priced);
        tx.insert_approval_request(&request).await?;
        return Ok(SubmitOutcome::ApprovalPending(request));
    }

    let (sale, lines) = sale_with_lines(&order.customer, &priced);
    tx.insert_sale(&sale, &lines).await?;
    Ok(SubmitOutcome::SaleCreated { sale, lines })
}

fn approval_request(customer: &str, priced: &PricedOrder) -> ApprovalRequest {
    ApprovalRequest {
        id: Uuid::new_v4().to_string(),
        customer: customer.to_string(),
        total_cents: priced.total().cents(),
        requested_discount_cents: priced.requested_discount().cents(),
        discount_ceiling_cents: priced.discount_ceiling().cents(),
        status: ApprovalStatus::Pending,
        created_at: Utc::now(),
        resolved_at: None,
    }
}

fn sale_with_lines(customer: &str, priced: &PricedOrder) -> (Sale, Vec<SaleLine>) {
    let sale = Sale {
        id: Uuid::new_v4().to_string(),
        customer: customer.to_string(),
        total_cents: priced.total().cents(),
        created_at: Utc::now(),
    };

    let lines = priced
        .lines()
        .iter()
        .enumerate()
        .map(|(position, line)| SaleLine {
            id: Uuid::new_v4().to_string(),
            sale_id: sale.id.clone(),
            position: position as i64,
            sku: line.sku.clone(),
            quantity: line.quantity,
            unit_price_cents: line.unit_price.cents(),
            line_total_cents: line.line_total.cents(),
        })
        .collect();

    (sale, lines)
}
