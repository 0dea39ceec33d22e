//! # Request and Response Schema
//!
//! Wire shapes for every operation. Requests reject unknown fields; every
//! field is optional at the wire level so that a missing one produces a
//! descriptive `INVALID_INPUT` instead of a generic parse failure.
//!
//! ## Submit Order
//! ```json
//! {
//!   "customer": "Maria",
//!   "paymentType": "0",
//!   "lines": [{ "sku": "A", "quantity": 2 }],
//!   "region": "0",
//!   "deadline": "0",
//!   "discountCents": 500
//! }
//! ```
//! Selector codes may be sent as strings or integers (`"0"` or `0`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::validation::{validate_customer, validate_order};
use orderdesk_core::{
    ApprovalRequest, ApprovalStatus, Deadline, Money, OrderLine, OrderRequest, PaymentType,
    Region, Sale, SaleLine, SelectorPolicy, ValidationError,
};

// =============================================================================
// Requests
// =============================================================================

/// A selector code as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SelectorCode {
    Text(String),
    Number(i64),
}

impl SelectorCode {
    fn into_code(self) -> String {
        match self {
            SelectorCode::Text(s) => s.trim().to_string(),
            SelectorCode::Number(n) => n.to_string(),
        }
    }
}

/// One line of a submitted order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderLineRequest {
    pub sku: Option<String>,
    pub quantity: Option<i64>,
}

/// Body of a SubmitOrder call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitOrderRequest {
    pub customer: Option<String>,
    pub payment_type: Option<SelectorCode>,
    pub lines: Option<Vec<OrderLineRequest>>,
    pub region: Option<SelectorCode>,
    pub deadline: Option<SelectorCode>,
    pub discount_cents: Option<i64>,
}

impl SubmitOrderRequest {
    /// Checks presence of every field and converts to a validated order.
    pub fn into_order(self, policy: SelectorPolicy) -> Result<OrderRequest, ValidationError> {
        let customer = self.customer.ok_or_else(|| ValidationError::required("customer"))?;
        let payment = required_code(self.payment_type, "paymentType")?;
        let region = required_code(self.region, "region")?;
        let deadline = required_code(self.deadline, "deadline")?;
        let lines = self.lines.ok_or_else(|| ValidationError::required("lines"))?;
        let discount = self
            .discount_cents
            .ok_or_else(|| ValidationError::required("discountCents"))?;

        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                let sku = line
                    .sku
                    .ok_or_else(|| ValidationError::required("sku").at_line(index))?;
                let quantity = line
                    .quantity
                    .ok_or_else(|| ValidationError::required("quantity").at_line(index))?;
                Ok(OrderLine {
                    sku: sku.trim().to_string(),
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let order = OrderRequest {
            customer: validate_customer(&customer)?,
            payment_type: PaymentType::from_code(&payment),
            lines,
            region: Region::from_code(&region),
            deadline: Deadline::from_code(&deadline),
            requested_discount: Money::from_cents(discount),
        };

        validate_order(&order, policy)?;
        Ok(order)
    }
}

fn required_code(code: Option<SelectorCode>, field: &str) -> Result<String, ValidationError> {
    let code = code
        .map(SelectorCode::into_code)
        .ok_or_else(|| ValidationError::required(field))?;

    if code.is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(code)
}

/// Body of a ResolveApproval call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolveApprovalRequest {
    pub decision: Option<String>,
}

/// Body of a RegisterProduct call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterProductRequest {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub full_price_cents: Option<i64>,
    pub discounted_price_cents: Option<i64>,
}

// =============================================================================
// Responses
// =============================================================================

/// A sale was committed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleCreated {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
}

impl From<&Sale> for SaleCreated {
    fn from(sale: &Sale) -> Self {
        SaleCreated {
            id: sale.id.clone(),
            created_at: sale.created_at,
            total_cents: sale.total_cents,
        }
    }
}

/// The order was held for approval.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalPending {
    pub id: String,
    pub total_cents: i64,
    pub notice: String,
}

impl From<&ApprovalRequest> for ApprovalPending {
    fn from(request: &ApprovalRequest) -> Self {
        ApprovalPending {
            id: request.id.clone(),
            total_cents: request.total_cents,
            notice: format!(
                "Requested discount of {} exceeds the allowed {}; the order is waiting for approval",
                Money::from_cents(request.requested_discount_cents),
                Money::from_cents(request.discount_ceiling_cents),
            ),
        }
    }
}

/// A request was resolved without creating a sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledged {
    pub status: ApprovalStatus,
}

/// A sale together with its line snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub lines: Vec<SaleLine>,
}

/// Result of SubmitOrder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOrderResponse {
    SaleCreated(SaleCreated),
    ApprovalPending(ApprovalPending),
}

/// Result of ResolveApproval.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolveApprovalResponse {
    SaleCreated(SaleCreated),
    Acknowledged(Acknowledged),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<SubmitOrderRequest, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_full_request_converts() {
        let req = parse(
            r#"{"customer":" Maria ","paymentType":0,"lines":[{"sku":"A","quantity":2}],
                "region":"4","deadline":"2","discountCents":500}"#,
        )
        .unwrap();

        let order = req.into_order(SelectorPolicy::Permissive).unwrap();
        assert_eq!(order.customer, "Maria");
        assert_eq!(order.payment_type, PaymentType::Full);
        assert_eq!(order.region, Region::Zone4);
        assert_eq!(order.deadline, Deadline::Priority);
        assert_eq!(order.requested_discount.cents(), 500);
        assert_eq!(order.lines, vec![OrderLine { sku: "A".to_string(), quantity: 2 }]);
    }

    #[test]
    fn test_numeric_codes_match_string_codes() {
        let numeric = parse(
            r#"{"customer":"M","paymentType":1,"lines":[{"sku":"A","quantity":1}],
                "region":2,"deadline":0,"discountCents":0}"#,
        )
        .unwrap()
        .into_order(SelectorPolicy::Strict)
        .unwrap();
        let text = parse(
            r#"{"customer":"M","paymentType":"1","lines":[{"sku":"A","quantity":1}],
                "region":"2","deadline":"0","discountCents":0}"#,
        )
        .unwrap()
        .into_order(SelectorPolicy::Strict)
        .unwrap();

        assert_eq!(numeric.payment_type, PaymentType::Discounted);
        assert_eq!(numeric.region, Region::Zone2);
        assert_eq!(numeric.deadline, Deadline::Standard);
        assert_eq!(numeric, text);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(parse(r#"{"customer":"Maria","coupon":"FREE"}"#).is_err());
        assert!(parse(r#"{"lines":[{"sku":"A","quantity":1,"price":1}]}"#).is_err());
    }

    #[test]
    fn test_missing_fields_named() {
        let cases = [
            (r#"{"paymentType":"0","lines":[],"region":"0","deadline":"0","discountCents":0}"#, "customer"),
            (r#"{"customer":"M","lines":[],"region":"0","deadline":"0","discountCents":0}"#, "paymentType"),
            (r#"{"customer":"M","paymentType":"0","region":"0","deadline":"0","discountCents":0}"#, "lines"),
            (r#"{"customer":"M","paymentType":"0","lines":[],"deadline":"0","discountCents":0}"#, "region"),
            (r#"{"customer":"M","paymentType":"0","lines":[],"region":"0","discountCents":0}"#, "deadline"),
            (r#"{"customer":"M","paymentType":"0","lines":[],"region":"0","deadline":"0"}"#, "discountCents"),
        ];

        for (json, field) in cases {
            let err = parse(json).unwrap().into_order(SelectorPolicy::Permissive).unwrap_err();
            assert!(err.to_string().contains(field), "{field}: {err}");
        }
    }

    #[test]
    fn test_line_without_quantity_reports_index() {
        let req = parse(
            r#"{"customer":"M","paymentType":"0","lines":[{"sku":"A","quantity":1},{"sku":"B"}],
                "region":"0","deadline":"0","discountCents":0}"#,
        )
        .unwrap();

        let err = req.into_order(SelectorPolicy::Permissive).unwrap_err();
        assert_eq!(err.to_string(), "line 1: quantity is required");
    }

    #[test]
    fn test_empty_and_negative_rejected() {
        let empty = parse(
            r#"{"customer":"M","paymentType":"0","lines":[],"region":"0","deadline":"0","discountCents":0}"#,
        )
        .unwrap();
        assert!(matches!(
            empty.into_order(SelectorPolicy::Permissive),
            Err(ValidationError::EmptyOrder)
        ));

        let negative = parse(
            r#"{"customer":"M","paymentType":"0","lines":[{"sku":"A","quantity":1}],
                "region":"0","deadline":"0","discountCents":-1}"#,
        )
        .unwrap();
        assert!(negative.into_order(SelectorPolicy::Permissive).is_err());
    }

    #[test]
    fn test_strict_policy_rejects_unlisted_region() {
        let json = r#"{"customer":"M","paymentType":"1","lines":[{"sku":"A","quantity":1}],
                       "region":"9","deadline":"0","discountCents":0}"#;

        assert!(parse(json).unwrap().into_order(SelectorPolicy::Permissive).is_ok());
        assert!(parse(json).unwrap().into_order(SelectorPolicy::Strict).is_err());
    }

    #[test]
    fn test_responses_are_tagged() {
        let pending = SubmitOrderResponse::ApprovalPending(ApprovalPending {
            id: "r-1".to_string(),
            total_cents: 9000,
            notice: "held".to_string(),
        });
        let json = serde_json::to_value(&pending).unwrap();
        assert_eq!(json["outcome"], "approval_pending");
        assert_eq!(json["totalCents"], 9000);

        let ack = ResolveApprovalResponse::Acknowledged(Acknowledged {
            status: ApprovalStatus::Denied,
        });
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["outcome"], "acknowledged");
        assert_eq!(json["status"], "denied");
    }
}
