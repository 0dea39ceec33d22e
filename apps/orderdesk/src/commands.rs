//! # Operations
//!
//! Every externally visible operation, taking and returning wire types.
//!
//! | Operation              | Input                      | Output                     |
//! |------------------------|----------------------------|----------------------------|
//! | `submit_order`         | `SubmitOrderRequest`       | `SubmitOrderResponse`      |
//! | `resolve_approval`     | id, `ResolveApprovalRequest` | `ResolveApprovalResponse` |
//! | `list_approval_requests` | optional status filter   | `Vec<ApprovalRequest>`     |
//! | `list_sales`           |                            | `Vec<Sale>` newest first   |
//! | `sale_detail`          | sale id                    | `SaleDetail`               |
//! | `register_product`     | `RegisterProductRequest`   | `Product`                  |
//! | `list_products`        |                            | `Vec<Product>` by SKU      |
//! | `status`               |                            | `StatusReport`             |

use serde::Serialize;
use tracing::{debug, info};

use orderdesk_core::validation::validate_record_id;
use orderdesk_core::{ApprovalRequest, ApprovalStatus, Decision, Product, Sale, ValidationError};
use orderdesk_db::migrations::migration_status;
use orderdesk_db::Database;

use crate::config::AppConfig;
use crate::dto::{
    Acknowledged, ApprovalPending, RegisterProductRequest, ResolveApprovalRequest,
    ResolveApprovalResponse, SaleCreated, SaleDetail, SubmitOrderRequest, SubmitOrderResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::workflow::{ApprovalResolver, ResolveOutcome, SaleWorkflow, SubmitOutcome};

/// Handle holding the database and the workflows built on it.
#[derive(Debug, Clone)]
pub struct OrderDesk {
    db: Database,
    config: AppConfig,
    sales: SaleWorkflow,
    approvals: ApprovalResolver,
}

/// Health and size summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub healthy: bool,
    pub config: AppConfig,
    pub migrations_total: usize,
    pub migrations_applied: usize,
    pub products: i64,
    pub sales: i64,
    pub pending_approvals: usize,
}

impl OrderDesk {
    pub fn new(db: Database, config: AppConfig) -> Self {
        OrderDesk {
            sales: SaleWorkflow::new(db.clone(), config.selector_policy),
            approvals: ApprovalResolver::new(db.clone()),
            db,
            config,
        }
    }

    /// Connects with the given configuration and applies migrations.
    pub async fn open(config: AppConfig) -> ApiResult<Self> {
        let db = Database::new(config.db_config()).await?;
        Ok(OrderDesk::new(db, config))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// SubmitOrder: sale or approval request.
    pub async fn submit_order(&self, request: SubmitOrderRequest) -> ApiResult<SubmitOrderResponse> {
        let order = request.into_order(self.config.selector_policy)?;

        let response = match self.sales.submit(order).await? {
            SubmitOutcome::SaleCreated { sale, .. } => {
                SubmitOrderResponse::SaleCreated(SaleCreated::from(&sale))
            }
            SubmitOutcome::ApprovalPending(request) => {
                SubmitOrderResponse::ApprovalPending(ApprovalPending::from(&request))
            }
        };

        Ok(response)
    }

    /// ResolveApproval: accept (creating a sale) or deny.
    pub async fn resolve_approval(
        &self,
        request_id: &str,
        request: ResolveApprovalRequest,
    ) -> ApiResult<ResolveApprovalResponse> {
        let decision = request
            .decision
            .ok_or_else(|| ValidationError::required("decision"))?;
        let decision = Decision::parse(&decision)?;

        let response = match self.approvals.resolve(request_id, decision).await? {
            ResolveOutcome::SaleCreated { sale, .. } => {
                ResolveApprovalResponse::SaleCreated(SaleCreated::from(&sale))
            }
            ResolveOutcome::Denied(request) => ResolveApprovalResponse::Acknowledged(Acknowledged {
                status: request.status,
            }),
        };

        Ok(response)
    }

    /// ListApprovalRequests: every request, or those in one status.
    pub async fn list_approval_requests(
        &self,
        status: Option<ApprovalStatus>,
    ) -> ApiResult<Vec<ApprovalRequest>> {
        let requests = match status {
            Some(status) => self.db.approvals().list_by_status(status).await?,
            None => self.db.approvals().list().await?,
        };
        Ok(requests)
    }

    /// ListSales: newest first.
    pub async fn list_sales(&self) -> ApiResult<Vec<Sale>> {
        Ok(self.db.sales().list().await?)
    }

    /// One sale with its lines.
    pub async fn sale_detail(&self, sale_id: &str) -> ApiResult<SaleDetail> {
        let sale_id = validate_record_id(sale_id)?;
        let sales = self.db.sales();

        let sale = sales
            .get_by_id(&sale_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Sale", &sale_id))?;
        let lines = sales.get_lines(&sale_id).await?;

        Ok(SaleDetail { sale, lines })
    }

    /// RegisterProduct.
    pub async fn register_product(&self, request: RegisterProductRequest) -> ApiResult<Product> {
        let sku = request.sku.ok_or_else(|| ValidationError::required("sku"))?;
        let name = request.name.ok_or_else(|| ValidationError::required("name"))?;
        let full = request
            .full_price_cents
            .ok_or_else(|| ValidationError::required("fullPriceCents"))?;
        let discounted = request
            .discounted_price_cents
            .ok_or_else(|| ValidationError::required("discountedPriceCents"))?;

        let product = self.db.products().register(&sku, &name, full, discounted).await?;
        info!(sku = %product.sku, "Product registered");
        Ok(product)
    }

    /// ListProducts: ordered by SKU.
    pub async fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.db.products().list().await?)
    }

    pub async fn status(&self) -> ApiResult<StatusReport> {
        let healthy = self.db.health_check().await;
        let (migrations_total, migrations_applied) = migration_status(self.db.pool()).await?;

        let report = StatusReport {
            healthy,
            config: self.config.clone(),
            migrations_total,
            migrations_applied,
            products: self.db.products().count().await?,
            sales: self.db.sales().count().await?,
            pending_approvals: self
                .db
                .approvals()
                .list_by_status(ApprovalStatus::Pending)
                .await?
                .len(),
        };

        debug!(healthy, "Status collected");
        Ok(report)
    }
}
