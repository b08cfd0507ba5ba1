//! Native Token Precision Handling
//!
//! Token balances and swap amounts arrive as raw integers in the token's own
//! decimal precision; the curve math runs on 18-decimal fixed point. This module
//! owns the rescaling between the two.
//!
//! ## Precision Requirements
//!
//! - **USDC/XSGD-style stablecoins**: 6 decimal places (`1 USDC = 1_000_000 units`)
//! - **18-decimal tokens**: already at fixed-point scale, rescaling is the identity
//! - **> 18 decimals**: demoted with truncating division
//!
//! ## Critical Rules
//!
//! 1. **NO FLOATING POINT**: Never use f32/f64 for amounts
//! 2. **Truncate, never round**: demotion back to native precision drops digits
//! 3. **Explicit Conversions**: promotion and demotion are the only crossing points
//!
//! ## Example Usage
//!
//! ```rust
//! use types::precision::TokenAmount;
//! use types::FixedPoint18;
//!
//! let usdc = TokenAmount::from_decimal_str("1.5", 6).unwrap();
//! assert_eq!(usdc.raw_amount.to::<u64>(), 1_500_000);
//! assert_eq!(usdc.to_fixed().unwrap(), FixedPoint18::from_decimal_str("1.5").unwrap());
//! ```

use crate::common::errors::FixedPointError;
use crate::common::fixed_point::FixedPoint18;
use alloy_primitives::{I256, U256};
use std::fmt;

pub type Result<T> = std::result::Result<T, FixedPointError>;

/// Token amount with native precision preservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenAmount {
    /// Raw amount in smallest units
    pub raw_amount: U256,
    /// Number of decimal places for this token
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(raw_amount: U256, decimals: u8) -> Self {
        Self {
            raw_amount,
            decimals,
        }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::new(U256::ZERO, decimals)
    }

    /// Parse a human-readable amount ("6101054.602054") into native units
    pub fn from_decimal_str(s: &str, decimals: u8) -> Result<Self> {
        let value = FixedPoint18::from_decimal_str(s)?;
        Self::from_fixed(value, decimals)
    }

    /// Get the decimal multiplier for this token
    pub fn decimal_multiplier(&self) -> Result<U256> {
        pow10(self.decimals)
    }

    pub fn is_zero(&self) -> bool {
        self.raw_amount.is_zero()
    }

    /// Promote to 18-decimal fixed point
    pub fn to_fixed(&self) -> Result<FixedPoint18> {
        check_decimals(self.decimals)?;
        let raw = I256::try_from(self.raw_amount).map_err(|_| FixedPointError::Overflow {
            operation: "promote",
        })?;

        let decimals = FixedPoint18::DECIMALS;
        let scaled = if self.decimals <= decimals {
            raw.checked_mul(signed_pow10(decimals - self.decimals)?)
                .ok_or(FixedPointError::Overflow {
                    operation: "promote",
                })?
        } else {
            raw / signed_pow10(self.decimals - decimals)?
        };

        Ok(FixedPoint18::from_raw(scaled))
    }

    /// Demote an 18-decimal value to native precision, truncating extra digits
    pub fn from_fixed(value: FixedPoint18, decimals: u8) -> Result<Self> {
        check_decimals(decimals)?;
        if value.is_negative() {
            return Err(FixedPointError::NegativeAmount {
                value: value.to_string(),
            });
        }

        let magnitude = value.unsigned_abs();
        let fixed_decimals = FixedPoint18::DECIMALS;
        let raw_amount = if decimals <= fixed_decimals {
            magnitude / pow10(fixed_decimals - decimals)?
        } else {
            magnitude
                .checked_mul(pow10(decimals - fixed_decimals)?)
                .ok_or(FixedPointError::Overflow { operation: "demote" })?
        };

        Ok(Self::new(raw_amount, decimals))
    }

    /// Convert to human readable string (for display only, not calculations)
    pub fn to_display_string(&self) -> String {
        let multiplier = match self.decimal_multiplier() {
            Ok(multiplier) => multiplier,
            // 10^decimals is past U256, so every raw amount is fractional
            Err(_) => {
                return format!(
                    "0.{:0>width$}",
                    self.raw_amount.to_string(),
                    width = self.decimals as usize
                )
            }
        };
        let whole = self.raw_amount / multiplier;
        let fractional = self.raw_amount % multiplier;

        if self.decimals == 0 {
            return whole.to_string();
        }
        format!(
            "{}.{:0>width$}",
            whole,
            fractional.to_string(),
            width = self.decimals as usize
        )
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

/// Largest precision whose unit `10^decimals` fits in a U256
pub const MAX_DECIMALS: u8 = 77;

fn check_decimals(decimals: u8) -> Result<()> {
    if decimals > MAX_DECIMALS {
        return Err(FixedPointError::Overflow {
            operation: "decimal scale",
        });
    }
    Ok(())
}

fn pow10(exp: u8) -> Result<U256> {
    U256::from(10u64)
        .checked_pow(U256::from(exp))
        .ok_or(FixedPointError::Overflow {
            operation: "decimal scale",
        })
}

fn signed_pow10(exp: u8) -> Result<I256> {
    I256::try_from(pow10(exp)?).map_err(|_| FixedPointError::Overflow {
        operation: "decimal scale",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote_six_decimals() {
        let amount = TokenAmount::new(U256::from(4_026_113_600_000u64), 6);
        assert_eq!(
            amount.to_fixed().unwrap(),
            FixedPoint18::from_decimal_str("4026113.6").unwrap()
        );
    }

    #[test]
    fn test_promote_is_identity_for_eighteen_decimals() {
        let raw = U256::from(123_456_789u64);
        let amount = TokenAmount::new(raw, 18);
        assert_eq!(amount.to_fixed().unwrap().unsigned_abs(), raw);
    }

    #[test]
    fn test_demote_truncates() {
        let value = FixedPoint18::from_decimal_str("1.2345679").unwrap();
        let amount = TokenAmount::from_fixed(value, 6).unwrap();
        assert_eq!(amount.raw_amount, U256::from(1_234_567u64));
        assert_eq!(amount.to_display_string(), "1.234567");
    }

    #[test]
    fn test_more_than_eighteen_decimals() {
        let amount = TokenAmount::new(U256::from(25u64), 20);
        // 25e-20 is below 1e-18 resolution after truncation: 0.25e-18 -> 0
        assert!(amount.to_fixed().unwrap().is_zero());

        let back = TokenAmount::from_fixed(FixedPoint18::ONE, 20).unwrap();
        assert_eq!(back.raw_amount, pow10(20).unwrap());
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let err = TokenAmount::from_fixed(-FixedPoint18::ONE, 6).unwrap_err();
        assert!(matches!(err, FixedPointError::NegativeAmount { .. }));
    }

    #[test]
    fn test_parse_human_amount() {
        let amount = TokenAmount::from_decimal_str("6101054.602054477099734172", 18).unwrap();
        assert_eq!(amount.to_display_string(), "6101054.602054477099734172");

        let usdc = TokenAmount::from_decimal_str("1115163.647786", 6).unwrap();
        assert_eq!(usdc.raw_amount, U256::from(1_115_163_647_786u64));
    }

    #[test]
    fn test_oversized_decimals_are_rejected() {
        for decimals in [78u8, 100, 255] {
            let amount = TokenAmount::new(U256::from(1u64), decimals);
            assert!(matches!(amount.to_fixed(), Err(FixedPointError::Overflow { .. })));
            assert!(matches!(
                TokenAmount::from_fixed(FixedPoint18::ONE, decimals),
                Err(FixedPointError::Overflow { .. })
            ));
        }

        let widest = TokenAmount::new(U256::from(1u64), MAX_DECIMALS);
        assert!(widest.to_fixed().unwrap().is_zero());
    }

    #[test]
    fn test_display_with_oversized_decimals() {
        let amount = TokenAmount::new(U256::from(5u64), 80);
        assert_eq!(amount.to_display_string(), format!("0.{}5", "0".repeat(79)));
    }
}
