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
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    Every price, tip, and total in the system is an i64 cent count.  │
//! │    Only display code converts to dollars.                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(275); // $2.75
//! let tip = Money::parse("1.50").unwrap();
//! assert_eq!((price + tip).cents(), 425);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::MoneyParseError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for corrections
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897); // $8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Parses a decimal dollar string into Money.
    ///
    /// Accepts the free-text amounts the checkout tip field produces:
    /// `"1.50"`, `"2"`, `".75"`, or an empty string (treated as zero, matching
    /// the checkout behavior where a blank tip means no tip).
    ///
    /// ## Errors
    /// Returns [`MoneyParseError`] for malformed input, more than two decimal
    /// places, or negative amounts.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::parse("1.50").unwrap().cents(), 150);
    /// assert_eq!(Money::parse("2").unwrap().cents(), 200);
    /// assert_eq!(Money::parse("").unwrap().cents(), 0);
    /// assert!(Money::parse("-1.00").is_err());
    /// assert!(Money::parse("1.505").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, MoneyParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Money::zero());
        }
        if input.starts_with('-') {
            return Err(MoneyParseError::Negative {
                input: input.to_string(),
            });
        }

        let (dollars_str, cents_str) = match input.split_once('.') {
            Some((d, c)) => (d, c),
            None => (input, ""),
        };

        let dollars: i64 = if dollars_str.is_empty() {
            0
        } else {
            dollars_str.parse().map_err(|_| MoneyParseError::Malformed {
                input: input.to_string(),
            })?
        };

        let cents: i64 = match cents_str.len() {
            0 => 0,
            1 | 2 => {
                let parsed: i64 =
                    cents_str.parse().map_err(|_| MoneyParseError::Malformed {
                        input: input.to_string(),
                    })?;
                // "5" means 50 cents, "05" means 5 cents
                if cents_str.len() == 1 {
                    parsed * 10
                } else {
                    parsed
                }
            }
            _ => {
                return Err(MoneyParseError::TooPrecise {
                    input: input.to_string(),
                })
            }
        };

        Ok(Money(dollars * 100 + cents))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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

/// Multiplication by integer (for quantity calculations).
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
