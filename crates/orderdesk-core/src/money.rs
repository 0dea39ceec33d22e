//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats, 10% of 0.30 is 0.030000000000000002 and a discount       │
//! │  ceiling comparison can flip on the last bit.                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Basis Points                            │
//! │    subtotal 10000 cents × 1000 bps / 10000 = 1000 cents (exact)        │
//! │    Rounding happens once, at the cent (percent_of / percent_of_floor)  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orderdesk_core::money::Money;
//! use orderdesk_core::types::Rate;
//!
//! let unit = Money::from_cents(5000);            // 50.00
//! let line = unit.checked_mul_quantity(2).unwrap(); // 100.00
//! let surcharge = line.percent_of(Rate::from_bps(1000)); // 10% = 10.00
//! assert_eq!(surcharge.cents(), 1000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: an order total may go negative when a requested
///   discount is larger than everything else; that order is escalated for
///   approval and the negative total is stored as computed
/// - **Single field tuple struct**: serializes as a bare integer
///
/// ## Where Money Flows
/// ```text
/// Product.full_price / discounted_price ──► unit price ──► line total
///                                                             │
///                         Σ line totals ──► subtotal ─────────┤
///                                                             ▼
///      freight + surcharge − requested discount ──► final total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let freight = Money::from_cents(1500); // 15.00
    /// assert_eq!(freight.cents(), 1500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units (no cents part).
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let unit = Money::from_cents(4000);
    /// assert_eq!(unit.checked_mul_quantity(3), Some(Money::from_cents(12000)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts an amount, returning `None` on overflow.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Applies a rate and rounds half away from zero at the cent.
    ///
    /// ## Implementation
    /// Integer math in i128: `(cents × bps ± 5000) / 10000`.
    /// The ±5000 moves the truncation point to the half cent.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    /// use orderdesk_core::types::Rate;
    ///
    /// // 5% of 10.10 = 0.505 → 0.51
    /// let surcharge = Money::from_cents(1010).percent_of(Rate::from_bps(500));
    /// assert_eq!(surcharge.cents(), 51);
    /// ```
    pub fn percent_of(&self, rate: Rate) -> Money {
        let product = self.0 as i128 * rate.bps() as i128;
        let rounded = if product < 0 {
            (product - 5000) / 10000
        } else {
            (product + 5000) / 10000
        };
        Money(rounded as i64)
    }

    /// Applies a basis-point rate and rounds toward negative infinity.
    ///
    /// For a limit compared against whole-cent amounts this is exact:
    /// `x > amount × rate` holds for a whole-cent `x` exactly when
    /// `x > amount.percent_of_floor(rate)`.
    ///
    /// ```rust
    /// use orderdesk_core::money::Money;
    /// use orderdesk_core::types::Rate;
    ///
    /// // 5% of 200.10 = 10.005 → 10.00
    /// let ceiling = Money::from_cents(20010).percent_of_floor(Rate::from_bps(500));
    /// assert_eq!(ceiling.cents(), 1000);
    /// ```
    pub fn percent_of_floor(&self, rate: Rate) -> Money {
        let product = self.0 as i128 * rate.bps() as i128;
        Money(product.div_euclid(10000) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering with two places, e.g. `105.00` or `-3.50`.
///
/// Currency symbols and localization belong to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
