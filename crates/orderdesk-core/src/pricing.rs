//! # Pricing Module
//!
//! Turns an order request into a fully priced order and its discount ceiling.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         OrderPricer::price                              │
//! │                                                                         │
//! │  OrderRequest                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate every line ──── any bad line? ──► ValidationError (nothing   │
//! │       │                                     priced)                     │
//! │       ▼                                                                 │
//! │  PriceCalculator (per line, submission order)                          │
//! │   unit = Full ? full_price : discounted_price                          │
//! │   line = unit × quantity ──── unknown SKU? ──► ProductNotFound         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SurchargeSchedule                                                     │
//! │   freight   = table[region]                                            │
//! │   surcharge = subtotal × tier rate                                     │
//! │   ceiling   = max(floor(subtotal × ceiling rate), freight)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricedOrder (total = subtotal + freight + surcharge − discount)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tier Table
//! | Deadline  | Surcharge | Ceiling rate |
//! |-----------|-----------|--------------|
//! | Standard  | 0%        | 5%           |
//! | Expedited | 10%       | 10%          |
//! | Priority  | 20%       | 20%          |
//! | Unlisted  | 0%        | 0%           |

use std::cmp::max;
use std::collections::HashMap;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Deadline, OrderLine, OrderRequest, PaymentType, Product, Rate, Region};
use crate::validation::{validate_discount_cents, validate_order_lines};

// =============================================================================
// Catalog
// =============================================================================

/// Read access to product reference data, keyed by SKU.
///
/// The sale workflow loads the products an order mentions inside its
/// transaction and hands the snapshot to the pricer through this trait.
pub trait Catalog {
    fn product_by_sku(&self, sku: &str) -> Option<&Product>;
}

impl Catalog for HashMap<String, Product> {
    fn product_by_sku(&self, sku: &str) -> Option<&Product> {
        self.get(sku)
    }
}

impl Catalog for [Product] {
    fn product_by_sku(&self, sku: &str) -> Option<&Product> {
        self.iter().find(|p| p.sku == sku)
    }
}

// =============================================================================
// Price Calculator
// =============================================================================

/// One priced line of an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedLine {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Resolves unit prices for one payment type.
pub struct PriceCalculator<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    payment: PaymentType,
}

impl<'a, C: Catalog + ?Sized> PriceCalculator<'a, C> {
    pub fn new(catalog: &'a C, payment: PaymentType) -> Self {
        PriceCalculator { catalog, payment }
    }

    /// Returns the applicable unit price for a SKU.
    pub fn unit_price(&self, sku: &str) -> CoreResult<Money> {
        self.product(sku).map(|p| p.price_for(self.payment))
    }

    /// Prices a single line: unit price × quantity.
    pub fn price_line(&self, line: &OrderLine) -> CoreResult<PricedLine> {
        let product = self.product(&line.sku)?;
        let unit_price = product.price_for(self.payment);
        let line_total = unit_price
            .checked_mul_quantity(line.quantity)
            .ok_or(CoreError::AmountOverflow("line total"))?;

        Ok(PricedLine {
            sku: product.sku.clone(),
            name: product.name.clone(),
            quantity: line.quantity,
            unit_price,
            line_total,
        })
    }

    /// Prices all lines in submission order and sums them.
    ///
    /// Stops at the first unresolved SKU; nothing partial is returned.
    pub fn subtotal(&self, lines: &[OrderLine]) -> CoreResult<(Vec<PricedLine>, Money)> {
        let mut priced = Vec::with_capacity(lines.len());
        let mut subtotal = Money::zero();

        for line in lines {
            let priced_line = self.price_line(line)?;
            subtotal = subtotal
                .checked_add(priced_line.line_total)
                .ok_or(CoreError::AmountOverflow("subtotal"))?;
            priced.push(priced_line);
        }

        Ok((priced, subtotal))
    }

    fn product(&self, sku: &str) -> CoreResult<&'a Product> {
        self.catalog
            .product_by_sku(sku)
            .ok_or_else(|| CoreError::ProductNotFound(sku.to_string()))
    }
}

// =============================================================================
// Surcharge Schedule
// =============================================================================

/// Freight, surcharge and discount-ceiling lookups. Pure functions only.
pub struct SurchargeSchedule;

impl SurchargeSchedule {
    pub const FREIGHT_ZONE0: Money = Money::from_cents(1000);
    pub const FREIGHT_ZONE1_TO_3: Money = Money::from_cents(1500);
    pub const FREIGHT_ZONE4: Money = Money::from_cents(2000);

    /// Freight charge for a region. Unlisted regions ship for free.
    pub fn freight(region: &Region) -> Money {
        match region {
            Region::Zone0 => Self::FREIGHT_ZONE0,
            Region::Zone1 | Region::Zone2 | Region::Zone3 => Self::FREIGHT_ZONE1_TO_3,
            Region::Zone4 => Self::FREIGHT_ZONE4,
            Region::Unlisted(_) => Money::zero(),
        }
    }

    /// Surcharge rate for a deadline tier.
    pub fn surcharge_rate(deadline: &Deadline) -> Rate {
        match deadline {
            Deadline::Standard => Rate::zero(),
            Deadline::Expedited => Rate::from_bps(1000),
            Deadline::Priority => Rate::from_bps(2000),
            Deadline::Unlisted(_) => Rate::zero(),
        }
    }

    /// Rate used for the percentage part of the discount ceiling.
    pub fn ceiling_rate(deadline: &Deadline) -> Rate {
        match deadline {
            Deadline::Standard => Rate::from_bps(500),
            Deadline::Expedited => Rate::from_bps(1000),
            Deadline::Priority => Rate::from_bps(2000),
            Deadline::Unlisted(_) => Rate::zero(),
        }
    }

    /// Surcharge amount for a subtotal.
    pub fn surcharge(deadline: &Deadline, subtotal: Money) -> Money {
        subtotal.percent_of(Self::surcharge_rate(deadline))
    }

    /// Largest whole-cent discount allowed without approval.
    ///
    /// The percentage part is floored, so a discount above the exact
    /// `subtotal × rate` (even by a fraction of a cent) exceeds it. Never
    /// below the freight.
    pub fn discount_ceiling(deadline: &Deadline, subtotal: Money, freight: Money) -> Money {
        max(subtotal.percent_of_floor(Self::ceiling_rate(deadline)), freight)
    }
}

// =============================================================================
// Order Pricer
// =============================================================================

/// The priced result of one order request.
///
/// Fields are read-only: the total is computed once in [`OrderPricer::price`]
/// and cannot be recomputed from partial state afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedOrder {
    lines: Vec<PricedLine>,
    subtotal: Money,
    freight: Money,
    surcharge: Money,
    discount_ceiling: Money,
    requested_discount: Money,
    total: Money,
}

impl PricedOrder {
    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn freight(&self) -> Money {
        self.freight
    }

    pub fn surcharge(&self) -> Money {
        self.surcharge
    }

    pub fn discount_ceiling(&self) -> Money {
        self.discount_ceiling
    }

    pub fn requested_discount(&self) -> Money {
        self.requested_discount
    }

    /// subtotal + freight + surcharge − requested discount.
    pub fn total(&self) -> Money {
        self.total
    }

    /// True when the requested discount exceeds the ceiling.
    ///
    /// A discount equal to the ceiling is still within policy.
    pub fn requires_approval(&self) -> bool {
        self.requested_discount > self.discount_ceiling
    }
}

/// Composes [`PriceCalculator`] and [`SurchargeSchedule`] into a full quote.
pub struct OrderPricer<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
}

impl<'a, C: Catalog + ?Sized> OrderPricer<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        OrderPricer { catalog }
    }

    /// Prices an order.
    ///
    /// ## Errors
    /// - `Validation` if any line is malformed (checked before any pricing)
    /// - `ProductNotFound` if any SKU is missing from the catalog
    /// - `AmountOverflow` if a sum leaves the i64 cent range
    pub fn price(&self, order: &OrderRequest) -> CoreResult<PricedOrder> {
        validate_order_lines(&order.lines)?;
        validate_discount_cents(order.requested_discount.cents())?;

        let calculator = PriceCalculator::new(self.catalog, order.payment_type);
        let (lines, subtotal) = calculator.subtotal(&order.lines)?;

        let freight = SurchargeSchedule::freight(&order.region);
        let surcharge = SurchargeSchedule::surcharge(&order.deadline, subtotal);
        let discount_ceiling =
            SurchargeSchedule::discount_ceiling(&order.deadline, subtotal, freight);

        let total = subtotal
            .checked_add(freight)
            .and_then(|m| m.checked_add(surcharge))
            .and_then(|m| m.checked_sub(order.requested_discount))
            .ok_or(CoreError::AmountOverflow("order total"))?;

        Ok(PricedOrder {
            lines,
            subtotal,
            freight,
            surcharge,
            discount_ceiling,
            requested_discount: order.requested_discount,
            total,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use chrono::Utc;

    fn product(sku: &str, full: i64, discounted: i64) -> Product {
        Product {
            id: format!("id-{sku}"),
            sku: sku.to_string(),
            name: format!("Product {sku}"),
            full_price_cents: full,
            discounted_price_cents: discounted,
            created_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![product("A", 5000, 4000), product("B", 1250, 1000)]
    }

    fn order(lines: &[(&str, i64)], region: &str, deadline: &str, discount: i64) -> OrderRequest {
        OrderRequest {
            customer: "Maria".to_string(),
            payment_type: PaymentType::Full,
            lines: lines
                .iter()
                .map(|(sku, quantity)| OrderLine {
                    sku: sku.to_string(),
                    quantity: *quantity,
                })
                .collect(),
            region: Region::from_code(region),
            deadline: Deadline::from_code(deadline),
            requested_discount: Money::from_cents(discount),
        }
    }

    #[test]
    fn test_unit_price_follows_payment_type() {
        let products = catalog();
        let full = PriceCalculator::new(products.as_slice(), PaymentType::Full);
        let discounted = PriceCalculator::new(products.as_slice(), PaymentType::Discounted);

        assert_eq!(full.unit_price("A").unwrap().cents(), 5000);
        assert_eq!(discounted.unit_price("A").unwrap().cents(), 4000);
        assert!(matches!(
            full.unit_price("ZZZ"),
            Err(CoreError::ProductNotFound(sku)) if sku == "ZZZ"
        ));
    }

    #[test]
    fn test_subtotal_keeps_submission_order() {
        let products = catalog();
        let calc = PriceCalculator::new(products.as_slice(), PaymentType::Discounted);
        let lines = order(&[("B", 3), ("A", 1)], "0", "0", 0).lines;

        let (priced, subtotal) = calc.subtotal(&lines).unwrap();
        assert_eq!(priced[0].sku, "B");
        assert_eq!(priced[0].line_total.cents(), 3000);
        assert_eq!(priced[1].sku, "A");
        assert_eq!(subtotal.cents(), 7000);
    }

    #[test]
    fn test_freight_table() {
        assert_eq!(SurchargeSchedule::freight(&Region::Zone0).cents(), 1000);
        assert_eq!(SurchargeSchedule::freight(&Region::Zone1).cents(), 1500);
        assert_eq!(SurchargeSchedule::freight(&Region::Zone2).cents(), 1500);
        assert_eq!(SurchargeSchedule::freight(&Region::Zone3).cents(), 1500);
        assert_eq!(SurchargeSchedule::freight(&Region::Zone4).cents(), 2000);
        assert!(SurchargeSchedule::freight(&Region::from_code("x")).is_zero());
    }

    #[test]
    fn test_ceiling_never_below_freight() {
        let subtotal = Money::from_cents(10000);
        let freight = Money::from_cents(1000);

        // 5% of 100.00 = 5.00 < freight 10.00
        assert_eq!(
            SurchargeSchedule::discount_ceiling(&Deadline::Standard, subtotal, freight).cents(),
            1000
        );
        // 20% of 100.00 = 20.00 > freight
        assert_eq!(
            SurchargeSchedule::discount_ceiling(&Deadline::Priority, subtotal, freight).cents(),
            2000
        );
        // unlisted tier: ceiling is the freight alone
        assert_eq!(
            SurchargeSchedule::discount_ceiling(&Deadline::from_code("9"), subtotal, freight)
                .cents(),
            1000
        );
    }

    #[test]
    fn test_standard_order_within_ceiling() {
        // A ×2 at full price, region 0, standard deadline, discount 5.00
        let products = catalog();
        let priced = OrderPricer::new(products.as_slice())
            .price(&order(&[("A", 2)], "0", "0", 500))
            .unwrap();

        assert_eq!(priced.subtotal().cents(), 10000);
        assert_eq!(priced.freight().cents(), 1000);
        assert!(priced.surcharge().is_zero());
        assert_eq!(priced.discount_ceiling().cents(), 1000);
        assert_eq!(priced.total().cents(), 10500);
        assert!(!priced.requires_approval());
    }

    #[test]
    fn test_discount_over_ceiling_requires_approval() {
        let products = catalog();
        let priced = OrderPricer::new(products.as_slice())
            .price(&order(&[("A", 2)], "0", "0", 2000))
            .unwrap();

        assert_eq!(priced.total().cents(), 9000);
        assert!(priced.requires_approval());
    }

    #[test]
    fn test_discount_equal_to_ceiling_is_within_policy() {
        let products = catalog();
        let priced = OrderPricer::new(products.as_slice())
            .price(&order(&[("A", 2)], "0", "0", 1000))
            .unwrap();

        assert!(!priced.requires_approval());
    }

    #[test]
    fn test_fractional_ceiling_is_floored_at_every_tier() {
        // A at 100.05: x2 = 200.10, x1 = 100.05
        let products = vec![product("A", 10005, 9000)];
        let pricer = OrderPricer::new(products.as_slice());

        // (quantity, deadline, region, largest discount still within policy)
        let cases = [
            (2, "0", "9", 1000), // 5% of 200.10 = 10.005
            (1, "1", "9", 1000), // 10% of 100.05 = 10.005
            (1, "2", "9", 2001), // 20% of 100.05 = 20.01 (exact)
            (2, "2", "9", 4002), // 20% of 200.10 = 40.02 (exact)
            (1, "0", "9", 500),  // 5% of 100.05 = 5.0025
        ];

        for (quantity, deadline, region, limit) in cases {
            let within = pricer
                .price(&order(&[("A", quantity)], region, deadline, limit))
                .unwrap();
            assert_eq!(within.discount_ceiling().cents(), limit, "deadline {deadline}");
            assert!(!within.requires_approval(), "deadline {deadline}");

            let above = pricer
                .price(&order(&[("A", quantity)], region, deadline, limit + 1))
                .unwrap();
            assert!(above.requires_approval(), "deadline {deadline}");
        }
    }

    #[test]
    fn test_half_cent_over_ceiling_escalates() {
        // subtotal 200.10, freight 10.00, exact ceiling max(10.005, 10.00)
        let products = vec![product("A", 10005, 9000)];
        let priced = OrderPricer::new(products.as_slice())
            .price(&order(&[("A", 2)], "0", "0", 1001))
            .unwrap();

        assert_eq!(priced.subtotal().cents(), 20010);
        assert_eq!(priced.discount_ceiling().cents(), 1000);
        assert!(priced.requires_approval());
    }

    #[test]
    fn test_priority_order() {
        // subtotal 100.00, region 4 (freight 20.00), priority: surcharge 20.00
        let products = catalog();
        let priced = OrderPricer::new(products.as_slice())
            .price(&order(&[("A", 2)], "4", "2", 2000))
            .unwrap();

        assert_eq!(priced.surcharge().cents(), 2000);
        assert_eq!(priced.discount_ceiling().cents(), 2000);
        assert_eq!(priced.total().cents(), 10000 + 2000);
        assert!(!priced.requires_approval());
    }

    #[test]
    fn test_expedited_order() {
        let products = catalog();
        let priced = OrderPricer::new(products.as_slice())
            .price(&order(&[("A", 2)], "1", "1", 0))
            .unwrap();

        assert_eq!(priced.freight().cents(), 1500);
        assert_eq!(priced.surcharge().cents(), 1000);
        assert_eq!(priced.discount_ceiling().cents(), 1500);
        assert_eq!(priced.total().cents(), 12500);
    }

    #[test]
    fn test_unlisted_selectors_are_zero_cost() {
        let products = catalog();
        let priced = OrderPricer::new(products.as_slice())
            .price(&order(&[("A", 2)], "9", "7", 0))
            .unwrap();

        assert!(priced.freight().is_zero());
        assert!(priced.surcharge().is_zero());
        assert!(priced.discount_ceiling().is_zero());
        assert_eq!(priced.total().cents(), 10000);
    }

    #[test]
    fn test_unknown_sku_aborts_whole_order() {
        let products = catalog();
        let err = OrderPricer::new(products.as_slice())
            .price(&order(&[("A", 1), ("NOPE", 1)], "0", "0", 0))
            .unwrap_err();

        assert!(matches!(err, CoreError::ProductNotFound(sku) if sku == "NOPE"));
    }

    #[test]
    fn test_malformed_line_rejected_before_lookup() {
        // Line 0 has an unknown SKU, line 1 a zero quantity:
        // validation wins because it runs before any pricing.
        let products = catalog();
        let err = OrderPricer::new(products.as_slice())
            .price(&order(&[("NOPE", 1), ("A", 0)], "0", "0", 0))
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Line { index: 1, .. })
        ));
    }

    #[test]
    fn test_hashmap_catalog() {
        let map: HashMap<String, Product> = catalog()
            .into_iter()
            .map(|p| (p.sku.clone(), p))
            .collect();
        let priced = OrderPricer::new(&map)
            .price(&order(&[("B", 4)], "2", "0", 0))
            .unwrap();

        assert_eq!(priced.subtotal().cents(), 5000);
        assert_eq!(priced.lines().len(), 1);
    }
}
