//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    An order priced AED 120.50 is stored as 12050                    │
//! │    Comparisons like amount_paid >= price are exact                  │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use darzi_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(12050); // AED 120.50
//!
//! // Arithmetic operations
//! let balance = price - Money::from_cents(5000); // AED 70.50
//!
//! // NEVER do this:
//! // let bad = Money::from_float(120.50); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Subtraction (balance due) never panics on underflow
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every order price and payment in the system flows through this type;
/// only the UI converts to a display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use darzi_core::money::Money;
    ///
    /// let price = Money::from_cents(12050); // Represents AED 120.50
    /// assert_eq!(price.cents(), 12050);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use darzi_core::money::Money;
    ///
    /// let price = Money::from_major_minor(120, 50); // AED 120.50
    /// assert_eq!(price.cents(), 12050);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
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
}

// =============================================================================
// Arithmetic Operators
// =============================================================================

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

// =============================================================================
// Display
// =============================================================================

/// Formats the value with two decimal places, e.g. `120.50`.
///
/// The shell prefixes the currency label ("AED 120.50") itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.major().abs(), self.minor())
        } else {
            write!(f, "{}.{:02}", self.major(), self.minor())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(12050);
        assert_eq!(m.cents(), 12050);
        assert_eq!(m.major(), 120);
        assert_eq!(m.minor(), 50);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(120, 50).cents(), 12050);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_arithmetic() {
        let price = Money::from_cents(10000);
        let paid = Money::from_cents(4000);
        assert_eq!((price - paid).cents(), 6000);
        assert_eq!((price + paid).cents(), 14000);

        let mut running = Money::zero();
        running += Money::from_cents(250);
        running -= Money::from_cents(50);
        assert_eq!(running.cents(), 200);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(12050).to_string(), "120.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_comparisons() {
        assert!(Money::from_cents(10000) > Money::from_cents(4000));
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(-1).is_negative());
    }
}
