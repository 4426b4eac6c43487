//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  A settlement engine that drifts by a cent between the client       │
//! │  preview and the server recompute looks like fraud to an auditor.   │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    Every amount is an i64 number of cents. Percentage scaling       │
//! │    rounds half-up at cent resolution, in one place, once.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aura_core::money::Money;
//!
//! let price = Money::from_cents(50_000); // 500.00
//!
//! let line_total = price * 2;                    // 1000.00
//! let discount = line_total.scale_bps(1500);     // 15% => 150.00
//! assert_eq!(discount.cents(), 15_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate results of discount math can dip
///   negative and must be detectable, not silently wrapped
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Half-up scaling**: `scale_bps` is the only place fractions of a
///   cent are resolved, so client and server cannot round differently
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use aura_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ```rust
    /// use aura_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(1000).cents(), 100_000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-currency-unit portion (truncated toward zero).
    ///
    /// Loyalty redemption is denominated in whole units, so the clamp
    /// `points <= subtotal` compares against this.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the fractional-cent portion (always 0-99).
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

    /// Scales by basis points, rounding half-up at cent resolution.
    ///
    /// This is the single rounding point of the pricing pipeline:
    /// membership discounts and tax both go through here, and nothing is
    /// rounded before it.
    ///
    /// ## Implementation
    /// Integer math in i128: `(cents * bps + 5000) / 10000`.
    /// The +5000 provides half-up rounding (5000/10000 = 0.5).
    ///
    /// ```rust
    /// use aura_core::money::Money;
    ///
    /// let taxable = Money::from_cents(160_000);     // 1600.00
    /// assert_eq!(taxable.scale_bps(1800).cents(), 28_800); // 18% => 288.00
    /// ```
    pub fn scale_bps(&self, bps: u32) -> Money {
        // i128 prevents overflow on large amounts
        let scaled = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money(scaled as i64)
    }

    /// Multiplies by a quantity with overflow detection.
    ///
    /// Overflow here means a line item beyond any representable bill, and
    /// the calculator fails fast rather than clamping.
    #[inline]
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Adds with overflow detection.
    #[inline]
    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts with overflow detection.
    #[inline]
    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as a plain decimal (e.g. `1000.00`).
///
/// Currency symbols and localization are frontend concerns.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

/// Default money is zero.
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity (panics on overflow in debug builds; the
/// pricing path uses `checked_mul_quantity` instead).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
