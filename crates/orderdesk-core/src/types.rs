//! # Domain Types
//!
//! Core domain types used throughout OrderDesk.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Reference data        Request (transient)       Records (persisted)   │
//! │  ─────────────         ───────────────────       ───────────────────   │
//! │  Product               OrderRequest              Sale                  │
//! │   sku (unique)          customer                  SaleLine (snapshot)  │
//! │   full price            PaymentType               ApprovalRequest      │
//! │   discounted price      Vec<OrderLine>             status: Pending →   │
//! │                         Region / Deadline            Accepted | Denied │
//! │                         requested discount                              │
//! │                                                                         │
//! │  Selectors arrive as short codes ("0", "1", ...) and are parsed into   │
//! │  closed enums here. Unrecognized region/deadline codes become an       │
//! │  explicit `Unlisted` variant instead of silently falling through.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 500 bps = 5% with no float involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Selectors
// =============================================================================

/// Which of the two catalog prices an order pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Code `"0"`: the product's full price.
    Full,
    /// Any other code: the product's discounted price.
    Discounted,
}

impl PaymentType {
    /// Parses a payment code. Only `"0"` selects the full price.
    pub fn from_code(code: &str) -> Self {
        if code.trim() == "0" {
            PaymentType::Full
        } else {
            PaymentType::Discounted
        }
    }
}

/// Delivery region, which decides the freight charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Zone0,
    Zone1,
    Zone2,
    Zone3,
    Zone4,
    /// A code outside the freight table, kept verbatim.
    Unlisted(String),
}

impl Region {
    /// Parses a region code (`"0"` through `"4"`).
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "0" => Region::Zone0,
            "1" => Region::Zone1,
            "2" => Region::Zone2,
            "3" => Region::Zone3,
            "4" => Region::Zone4,
            other => Region::Unlisted(other.to_string()),
        }
    }

    /// Returns the wire code for this region.
    pub fn code(&self) -> &str {
        match self {
            Region::Zone0 => "0",
            Region::Zone1 => "1",
            Region::Zone2 => "2",
            Region::Zone3 => "3",
            Region::Zone4 => "4",
            Region::Unlisted(code) => code,
        }
    }

    /// Whether this region appears in the freight table.
    pub fn is_listed(&self) -> bool {
        !matches!(self, Region::Unlisted(_))
    }

    /// Codes with a defined freight charge.
    pub const LISTED_CODES: [&'static str; 5] = ["0", "1", "2", "3", "4"];
}

/// Delivery deadline tier, which decides surcharge and discount ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deadline {
    /// Code `"0"`.
    Standard,
    /// Code `"1"`.
    Expedited,
    /// Code `"2"`.
    Priority,
    /// A code outside the tier table, kept verbatim.
    Unlisted(String),
}

impl Deadline {
    /// Parses a deadline code (`"0"`, `"1"` or `"2"`).
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "0" => Deadline::Standard,
            "1" => Deadline::Expedited,
            "2" => Deadline::Priority,
            other => Deadline::Unlisted(other.to_string()),
        }
    }

    /// Returns the wire code for this tier.
    pub fn code(&self) -> &str {
        match self {
            Deadline::Standard => "0",
            Deadline::Expedited => "1",
            Deadline::Priority => "2",
            Deadline::Unlisted(code) => code,
        }
    }

    /// Whether this tier appears in the surcharge table.
    pub fn is_listed(&self) -> bool {
        !matches!(self, Deadline::Unlisted(_))
    }

    /// Codes with a defined surcharge tier.
    pub const LISTED_CODES: [&'static str; 3] = ["0", "1", "2"];
}

/// How unlisted region and deadline codes are treated.
///
/// ```text
/// Permissive (default) │ unlisted region → freight 0
///                      │ unlisted deadline → surcharge 0, ceiling = freight
/// Strict               │ unlisted codes rejected as invalid input
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorPolicy {
    #[default]
    Permissive,
    Strict,
}

impl SelectorPolicy {
    /// Parses a policy name (`permissive` or `strict`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "permissive" => Some(SelectorPolicy::Permissive),
            "strict" => Some(SelectorPolicy::Strict),
            _ => None,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog. Read-only to the pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Price in cents when paying the full price.
    pub full_price_cents: i64,

    /// Price in cents for every other payment type.
    pub discounted_price_cents: i64,

    /// When the product was registered.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price that applies to the given payment type.
    #[inline]
    pub fn price_for(&self, payment: PaymentType) -> Money {
        match payment {
            PaymentType::Full => Money::from_cents(self.full_price_cents),
            PaymentType::Discounted => Money::from_cents(self.discounted_price_cents),
        }
    }
}

// =============================================================================
// Order Request
// =============================================================================

/// One requested line of an order. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub sku: String,
    pub quantity: i64,
}

/// A fully parsed order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer: String,
    pub payment_type: PaymentType,
    /// Lines in submission order.
    pub lines: Vec<OrderLine>,
    pub region: Region,
    pub deadline: Deadline,
    pub requested_discount: Money,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed, final order record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub customer: String,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the final total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A persisted line of a sale.
/// Uses the snapshot pattern: the unit price is frozen at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    /// Zero-based position in the submitted order.
    pub position: i64,
    pub sku: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

// =============================================================================
// Approval Request
// =============================================================================

/// Lifecycle of an approval request.
///
/// ```text
///            ┌──► Accepted  (a Sale is created)
/// Pending ───┤
///            └──► Denied
/// ```
/// Exactly one transition is allowed; resolved requests are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Accepted,
    Denied,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Accepted => "accepted",
            ApprovalStatus::Denied => "denied",
        }
    }
}

/// A sale held back because its discount exceeded the ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ApprovalRequest {
    pub id: String,
    pub customer: String,
    /// Total as computed at submission (discount already subtracted).
    pub total_cents: i64,
    pub requested_discount_cents: i64,
    pub discount_ceiling_cents: i64,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ApprovalRequest {
    /// Returns the stored total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}

/// An approver's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accepted,
    Denied,
}

impl Decision {
    /// Parses a decision. Only the exact strings `accepted` and `denied` qualify.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "accepted" => Ok(Decision::Accepted),
            "denied" => Ok(Decision::Denied),
            _ => Err(ValidationError::NotAllowed {
                field: "decision".to_string(),
                allowed: vec!["accepted".to_string(), "denied".to_string()],
            }),
        }
    }

    /// The status a request moves to under this decision.
    pub fn status(&self) -> ApprovalStatus {
        match self {
            Decision::Accepted => ApprovalStatus::Accepted,
            Decision::Denied => ApprovalStatus::Denied,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
