//! Fixed-point arithmetic type for the curve math
//!
//! Every quantity the curve engine touches (balances, rates, fees, curve
//! parameters) is an 18-decimal fixed-point number stored in a signed 256-bit
//! integer. 256 bits are needed because a numeraire balance (~1e25) times a
//! rate (1e18) times a weight (1e18) does not fit in an i128.
//!
//! ## Design Principles
//!
//! - **Truncating Division**: Every division truncates toward zero, exactly like
//!   the on-chain contract the engine mirrors. Never round to nearest.
//! - **Checked Multiplication/Division**: Overflow and division by zero surface as
//!   [`FixedPointError`] values instead of panics.
//! - **Clear Boundaries**: Conversions to `Decimal`/`f64` exist for the facade and
//!   for display only; no calculation goes through them.

use crate::common::errors::FixedPointError;
use alloy_primitives::{I256, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

const ONE_RAW: u64 = 1_000_000_000_000_000_000;

/// Signed 18-decimal fixed-point number
///
/// Scale factor: 1_000_000_000_000_000_000 (10^18)
///
/// Examples:
/// - 1.0 = FixedPoint18(1_000_000_000_000_000_000)
/// - 0.5 = FixedPoint18(500_000_000_000_000_000)
/// - -0.000001 = FixedPoint18(-1_000_000_000_000)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FixedPoint18(pub I256);

impl FixedPoint18 {
    /// Number of fractional decimal digits
    pub const DECIMALS: u8 = 18;

    /// Zero
    pub const ZERO: Self = Self(I256::ZERO);

    /// The fixed-point unit (1.0)
    pub const ONE: Self = Self(I256::from_limbs([ONE_RAW, 0, 0, 0]));

    /// One half (0.5)
    pub const HALF: Self = Self(I256::from_limbs([ONE_RAW / 2, 0, 0, 0]));

    /// Smallest representable positive step (1e-18)
    pub const EPSILON: Self = Self(I256::ONE);

    /// Create from raw scaled integer
    #[inline]
    pub const fn from_raw(raw: I256) -> Self {
        Self(raw)
    }

    /// Get the raw scaled integer value
    #[inline]
    pub const fn raw(self) -> I256 {
        self.0
    }

    /// Create from a whole number (`5` becomes `5.0`)
    pub fn from_int(value: i64) -> Self {
        Self(I256::unchecked_from(value) * Self::ONE.0)
    }

    /// Create from a decimal string with exact parsing
    ///
    /// This is the PRIMARY method for creating values from external data
    /// (pool definitions, oracle prices). Digits beyond the 18th fractional
    /// place are truncated, never rounded.
    ///
    /// # Examples
    /// ```
    /// use types::FixedPoint18;
    ///
    /// let alpha = FixedPoint18::from_decimal_str("0.8").unwrap();
    /// assert_eq!(alpha.raw().to_string(), "800000000000000000");
    /// ```
    pub fn from_decimal_str(s: &str) -> Result<Self, FixedPointError> {
        let invalid = || FixedPointError::InvalidDecimal {
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut scaled = String::with_capacity(whole.len() + Self::DECIMALS as usize);
        scaled.push_str(if whole.is_empty() { "0" } else { whole });
        let kept = &fraction[..fraction.len().min(Self::DECIMALS as usize)];
        scaled.push_str(kept);
        for _ in kept.len()..Self::DECIMALS as usize {
            scaled.push('0');
        }

        let magnitude = I256::from_dec_str(&scaled).map_err(|_| invalid())?;
        Ok(Self(if negative { -magnitude } else { magnitude }))
    }

    /// Create from a `Decimal`, truncating digits beyond 18 decimal places
    pub fn from_decimal(value: Decimal) -> Result<Self, FixedPointError> {
        let overflow = || FixedPointError::Overflow {
            operation: "decimal conversion",
        };

        let mantissa = I256::try_from(value.mantissa()).map_err(|_| overflow())?;
        let scale = value.scale() as usize;
        let decimals = Self::DECIMALS as usize;

        let raw = if scale <= decimals {
            mantissa
                .checked_mul(I256::exp10(decimals - scale))
                .ok_or_else(overflow)?
        } else {
            mantissa
                .checked_div(I256::exp10(scale - decimals))
                .ok_or(FixedPointError::DivisionByZero)?
        };

        Ok(Self(raw))
    }

    /// Convert to a `Decimal` with exact 18-decimal scale
    ///
    /// Fails with `PrecisionLoss` when the raw value exceeds the 96-bit
    /// `Decimal` mantissa.
    pub fn to_decimal(self) -> Result<Decimal, FixedPointError> {
        let loss = || FixedPointError::PrecisionLoss {
            value: self.to_string(),
        };

        let mantissa = i128::try_from(self.0).map_err(|_| loss())?;
        Decimal::try_from_i128_with_scale(mantissa, Self::DECIMALS as u32)
            .map(|d| d.normalize())
            .map_err(|_| loss())
    }

    /// Convert to f64 for display or logging
    ///
    /// # Warning
    /// Never use for calculations; precision is lost above 2^53.
    pub fn to_f64(self) -> f64 {
        self.0.to_string().parse::<f64>().unwrap_or(f64::NAN) / ONE_RAW as f64
    }

    // CHECKED ARITHMETIC - every curve-math step goes through these

    /// `self * rhs / ONE`, truncating toward zero
    pub fn checked_mul(self, rhs: Self) -> Result<Self, FixedPointError> {
        self.0
            .checked_mul(rhs.0)
            .map(|product| Self(product / Self::ONE.0))
            .ok_or(FixedPointError::Overflow { operation: "mul" })
    }

    /// `self * ONE / rhs`, truncating toward zero
    pub fn checked_div(self, rhs: Self) -> Result<Self, FixedPointError> {
        if rhs.is_zero() {
            return Err(FixedPointError::DivisionByZero);
        }
        self.0
            .checked_mul(Self::ONE.0)
            .and_then(|scaled| scaled.checked_div(rhs.0))
            .map(Self)
            .ok_or(FixedPointError::Overflow { operation: "div" })
    }

    /// `self * b * c / ONE / ONE` with a single full-width product
    ///
    /// Truncates once per division, which differs from chaining two
    /// `checked_mul` calls in the last digit.
    pub fn checked_mul3(self, b: Self, c: Self) -> Result<Self, FixedPointError> {
        self.0
            .checked_mul(b.0)
            .and_then(|ab| ab.checked_mul(c.0))
            .map(|abc| Self(abc / Self::ONE.0 / Self::ONE.0))
            .ok_or(FixedPointError::Overflow { operation: "mul3" })
    }

    /// Divide by a plain integer, truncating toward zero
    pub fn checked_div_int(self, divisor: i64) -> Result<Self, FixedPointError> {
        if divisor == 0 {
            return Err(FixedPointError::DivisionByZero);
        }
        Ok(Self(self.0 / I256::unchecked_from(divisor)))
    }

    /// Checked addition
    pub fn checked_add(self, rhs: Self) -> Result<Self, FixedPointError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(FixedPointError::Overflow { operation: "add" })
    }

    /// Checked subtraction
    pub fn checked_sub(self, rhs: Self) -> Result<Self, FixedPointError> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(FixedPointError::Overflow { operation: "sub" })
    }

    /// Raw quotient by a coarse granularity, used to compare values "up to" that granularity
    pub fn truncated_to(self, granularity: I256) -> I256 {
        self.0 / granularity
    }

    /// Absolute value
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub const fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Strictly greater than zero
    pub const fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// Magnitude as an unsigned integer
    pub fn unsigned_abs(self) -> U256 {
        self.0.unsigned_abs()
    }
}

/// Decimal rendering with all 18 fractional digits
impl fmt::Display for FixedPoint18 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let one = U256::from(ONE_RAW);
        let magnitude = self.0.unsigned_abs();
        let sign = if self.0.is_negative() { "-" } else { "" };
        write!(f, "{}{}.{:0>18}", sign, magnitude / one, (magnitude % one).to_string())
    }
}

impl FromStr for FixedPoint18 {
    type Err = FixedPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

/// Panicking arithmetic via traits - for sums of balances that are bounded far
/// below the 256-bit range
impl Add for FixedPoint18 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for FixedPoint18 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for FixedPoint18 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
