//! End-to-end order flow against an in-memory database, driven through the
//! same JSON request shapes the CLI accepts.

use orderdesk::dto::{
    RegisterProductRequest, ResolveApprovalRequest, ResolveApprovalResponse, SubmitOrderRequest,
    SubmitOrderResponse,
};
use orderdesk::{AppConfig, ErrorCode, OrderDesk};
use orderdesk_core::ApprovalStatus;
use orderdesk_db::{Database, DbConfig};
use serde_json::json;

/// Catalog: A (full 50.00, discounted 40.00).
async fn desk() -> OrderDesk {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let desk = OrderDesk::new(db, AppConfig::default());

    desk.register_product(RegisterProductRequest {
        sku: Some("A".to_string()),
        name: Some("Widget".to_string()),
        full_price_cents: Some(5000),
        discounted_price_cents: Some(4000),
    })
    .await
    .unwrap();

    desk
}

fn submit_body(deadline: &str, discount_cents: i64) -> SubmitOrderRequest {
    serde_json::from_value(json!({
        "customer": "Maria",
        "paymentType": "0",
        "lines": [{ "sku": "A", "quantity": 2 }],
        "region": "0",
        "deadline": deadline,
        "discountCents": discount_cents,
    }))
    .unwrap()
}

fn resolve_body(decision: &str) -> ResolveApprovalRequest {
    ResolveApprovalRequest {
        decision: Some(decision.to_string()),
    }
}

async fn pending_request_id(desk: &OrderDesk) -> String {
    match desk.submit_order(submit_body("0", 2000)).await.unwrap() {
        SubmitOrderResponse::ApprovalPending(pending) => pending.id,
        other => panic!("expected approval pending, got {other:?}"),
    }
}

#[tokio::test]
async fn discount_within_ceiling_commits_sale_with_lines() {
    let desk = desk().await;

    // subtotal 100 + freight 10 - discount 5, ceiling max(5, 10) = 10
    let response = desk.submit_order(submit_body("0", 500)).await.unwrap();
    let SubmitOrderResponse::SaleCreated(created) = response else {
        panic!("expected a sale, got {response:?}");
    };
    assert_eq!(created.total_cents, 10500);

    let detail = desk.sale_detail(&created.id).await.unwrap();
    assert_eq!(detail.sale.total_cents, 10500);
    assert_eq!(detail.lines.len(), 1);
    assert_eq!(detail.lines[0].sku, "A");
    assert_eq!(detail.lines[0].quantity, 2);
    assert_eq!(detail.lines[0].unit_price_cents, 5000);

    assert!(desk.list_approval_requests(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn discount_above_ceiling_creates_pending_request_and_no_sale() {
    let desk = desk().await;

    let response = desk.submit_order(submit_body("0", 2000)).await.unwrap();
    let SubmitOrderResponse::ApprovalPending(pending) = response else {
        panic!("expected approval pending, got {response:?}");
    };
    assert_eq!(pending.total_cents, 9000);
    assert!(!pending.notice.is_empty());

    let requests = desk.list_approval_requests(None).await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].status, ApprovalStatus::Pending);
    assert_eq!(requests[0].total_cents, 9000);

    assert!(desk.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn priority_surcharge_raises_ceiling() {
    let desk = desk().await;

    // surcharge 20, ceiling max(20, 10) = 20, total 100 + 10 + 20 - 20
    let response = desk.submit_order(submit_body("2", 2000)).await.unwrap();
    let SubmitOrderResponse::SaleCreated(created) = response else {
        panic!("expected a sale, got {response:?}");
    };
    assert_eq!(created.total_cents, 11000);
}

#[tokio::test]
async fn discount_a_fraction_over_the_ceiling_escalates() {
    let desk = desk().await;
    desk.register_product(RegisterProductRequest {
        sku: Some("C".to_string()),
        name: Some("Gadget".to_string()),
        full_price_cents: Some(10005),
        discounted_price_cents: Some(9000),
    })
    .await
    .unwrap();

    // subtotal 200.10, ceiling max(10.005, 10.00): 10.00 is fine, 10.01 is not
    let body = |discount: i64| -> SubmitOrderRequest {
        serde_json::from_value(json!({
            "customer": "Maria",
            "paymentType": "0",
            "lines": [{ "sku": "C", "quantity": 2 }],
            "region": "0",
            "deadline": "0",
            "discountCents": discount,
        }))
        .unwrap()
    };

    let response = desk.submit_order(body(1000)).await.unwrap();
    assert!(matches!(response, SubmitOrderResponse::SaleCreated(_)));

    let response = desk.submit_order(body(1001)).await.unwrap();
    let SubmitOrderResponse::ApprovalPending(pending) = response else {
        panic!("expected approval pending, got {response:?}");
    };
    assert_eq!(pending.total_cents, 20010 + 1000 - 1001);

    let requests = desk.list_approval_requests(None).await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].discount_ceiling_cents, 1000);
    assert_eq!(desk.list_sales().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_sku_fails_without_writes() {
    let desk = desk().await;

    let body: SubmitOrderRequest = serde_json::from_value(json!({
        "customer": "Maria",
        "paymentType": "0",
        "lines": [{ "sku": "A", "quantity": 1 }, { "sku": "NOPE", "quantity": 1 }],
        "region": "0",
        "deadline": "0",
        "discountCents": 0,
    }))
    .unwrap();

    let err = desk.submit_order(body).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    assert!(desk.list_sales().await.unwrap().is_empty());
    assert!(desk.list_approval_requests(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn accept_promotes_to_exactly_one_sale() {
    let desk = desk().await;
    let id = pending_request_id(&desk).await;

    let response = desk.resolve_approval(&id, resolve_body("accepted")).await.unwrap();
    let ResolveApprovalResponse::SaleCreated(created) = response else {
        panic!("expected a sale, got {response:?}");
    };
    assert_eq!(created.total_cents, 9000);

    let sales = desk.list_sales().await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].id, created.id);

    let accepted = desk
        .list_approval_requests(Some(ApprovalStatus::Accepted))
        .await
        .unwrap();
    assert_eq!(accepted.len(), 1);
    assert!(accepted[0].resolved_at.is_some());
}

#[tokio::test]
async fn deny_acknowledges_without_sale() {
    let desk = desk().await;
    let id = pending_request_id(&desk).await;

    let response = desk.resolve_approval(&id, resolve_body("denied")).await.unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["outcome"], "acknowledged");
    assert_eq!(json["status"], "denied");

    assert!(desk.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn resolving_twice_is_a_conflict() {
    let desk = desk().await;
    let id = pending_request_id(&desk).await;

    desk.resolve_approval(&id, resolve_body("accepted")).await.unwrap();

    let err = desk
        .resolve_approval(&id, resolve_body("accepted"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    let err = desk
        .resolve_approval(&id, resolve_body("denied"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    assert_eq!(desk.list_sales().await.unwrap().len(), 1);
}

#[tokio::test]
async fn resolve_rejects_bad_input_and_unknown_ids() {
    let desk = desk().await;
    let id = pending_request_id(&desk).await;

    let err = desk
        .resolve_approval(&id, resolve_body("approved"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = desk
        .resolve_approval("9b2f6c4e-0000-4000-8000-000000000000", resolve_body("denied"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    // the bad decision left the request untouched
    let pending = desk
        .list_approval_requests(Some(ApprovalStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn malformed_requests_change_nothing() {
    let desk = desk().await;

    let unknown_field = serde_json::from_value::<SubmitOrderRequest>(json!({
        "customer": "Maria",
        "coupon": "FREE",
    }));
    assert!(unknown_field.is_err());

    let zero_quantity: SubmitOrderRequest = serde_json::from_value(json!({
        "customer": "Maria",
        "paymentType": "1",
        "lines": [{ "sku": "A", "quantity": 0 }],
        "region": "0",
        "deadline": "0",
        "discountCents": 0,
    }))
    .unwrap();
    let err = desk.submit_order(zero_quantity).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    assert!(desk.list_sales().await.unwrap().is_empty());
}
