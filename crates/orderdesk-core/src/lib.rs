//! # orderdesk-core: Pure Pricing and Policy Logic
//!
//! This crate holds every pricing rule of OrderDesk as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderDesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            orderdesk (workflow, config, CLI)                    │   │
//! │  │    submit order ──► price ──► sale | approval request           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ orderdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │ selectors │  │   Money   │  │ Calculator│  │   rules   │  │   │
//! │  │   │  records  │  │   Rate    │  │ Schedule  │  │  policy   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                orderdesk-db (Database Layer)                    │   │
//! │  │          SQLite queries, migrations, transactions               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Selectors, products, sales, approval requests
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Catalog, PriceCalculator, SurchargeSchedule, OrderPricer
//! - [`validation`] - Input and policy validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use orderdesk_core::pricing::OrderPricer;
//! use orderdesk_core::{Deadline, Money, OrderLine, OrderRequest, PaymentType, Product, Region};
//!
//! let catalog = vec![Product {
//!     id: "p-1".into(),
//!     sku: "A".into(),
//!     name: "Widget".into(),
//!     full_price_cents: 5000,
//!     discounted_price_cents: 4000,
//!     created_at: Utc::now(),
//! }];
//!
//! let order = OrderRequest {
//!     customer: "Maria".into(),
//!     payment_type: PaymentType::Full,
//!     lines: vec![OrderLine { sku: "A".into(), quantity: 2 }],
//!     region: Region::Zone0,
//!     deadline: Deadline::Standard,
//!     requested_discount: Money::from_cents(500),
//! };
//!
//! let priced = OrderPricer::new(catalog.as_slice()).price(&order).unwrap();
//! assert_eq!(priced.total().cents(), 10500); // 100 + 10 freight − 5
//! assert!(!priced.requires_approval());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{Catalog, OrderPricer, PricedOrder};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single order line.
///
/// Keeps `unit price × quantity` far inside the i64 cent range.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;
