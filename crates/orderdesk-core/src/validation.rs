//! # Validation Module
//!
//! Input validation for OrderDesk.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request schema (orderdesk::dto)                              │
//! │  ├── Unknown fields rejected                                           │
//! │  └── Missing fields reported by name                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field rules (lengths, signs, formats)                             │
//! │  ├── Whole-order rules (non-empty, every line checked)                 │
//! │  └── Selector policy (strict mode rejects unlisted codes)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE (products.sku)                                             │
//! │                                                                         │
//! │  Nothing is priced or written until layers 1 and 2 pass.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{Deadline, OrderLine, OrderRequest, Region, SelectorPolicy};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_customer(customer: &str) -> ValidationResult<String> {
    let customer = customer.trim();

    if customer.is_empty() {
        return Err(ValidationError::required("customer"));
    }

    if customer.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "customer".to_string(),
            max: 200,
        });
    }

    Ok(customer.to_string())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens and underscores
///
/// ## Example
/// ```rust
/// use orderdesk_core::validation::validate_sku;
///
/// assert!(validate_sku("MUG-01").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// assert!(validate_sku(" MUG-01").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    // not trimmed: the SKU is looked up exactly as given
    if sku.trim().is_empty() {
        return Err(ValidationError::required("sku"));
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product display name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a catalog price in cents. Zero is allowed.
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a requested discount in cents. Zero is allowed.
pub fn validate_discount_cents(cents: i64) -> ValidationResult<()> {
    validate_price_cents("discount", cents)
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates every line of an order before any of them is priced.
///
/// ## Rules
/// - At least one line
/// - Each line has a valid SKU and a valid quantity
///
/// Errors carry the zero-based index of the offending line.
pub fn validate_order_lines(lines: &[OrderLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::EmptyOrder);
    }

    for (index, line) in lines.iter().enumerate() {
        validate_sku(&line.sku).map_err(|e| e.at_line(index))?;
        validate_quantity(line.quantity).map_err(|e| e.at_line(index))?;
    }

    Ok(())
}

/// Applies the selector policy to the region and deadline of an order.
///
/// Permissive mode admits everything. Strict mode rejects unlisted codes.
pub fn admit_selectors(
    policy: SelectorPolicy,
    region: &Region,
    deadline: &Deadline,
) -> ValidationResult<()> {
    if policy == SelectorPolicy::Permissive {
        return Ok(());
    }

    if !region.is_listed() {
        return Err(ValidationError::NotAllowed {
            field: "region".to_string(),
            allowed: Region::LISTED_CODES.iter().map(|c| c.to_string()).collect(),
        });
    }

    if !deadline.is_listed() {
        return Err(ValidationError::NotAllowed {
            field: "deadline".to_string(),
            allowed: Deadline::LISTED_CODES.iter().map(|c| c.to_string()).collect(),
        });
    }

    Ok(())
}

/// Validates a complete order request.
pub fn validate_order(order: &OrderRequest, policy: SelectorPolicy) -> ValidationResult<()> {
    validate_customer(&order.customer)?;
    validate_order_lines(&order.lines)?;
    validate_discount_cents(order.requested_discount.cents())?;
    admit_selectors(policy, &order.region, &order.deadline)
}

// =============================================================================
// Record Id Validators
// =============================================================================

/// Validates a record id supplied by a caller and returns it trimmed.
///
/// Only shape is checked here. An id that names no record is a lookup
/// failure, not invalid input.
///
/// ## Example
/// ```rust
/// use orderdesk_core::validation::validate_record_id;
///
/// assert_eq!(validate_record_id(" 42 ").unwrap(), "42");
/// assert!(validate_record_id("   ").is_err());
/// ```
pub fn validate_record_id(id: &str) -> ValidationResult<String> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::required("id"));
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: 64,
        });
    }

    Ok(id.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
