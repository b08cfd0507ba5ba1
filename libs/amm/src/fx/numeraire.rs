//! Numeraire conversion
//!
//! Moves amounts between a token's native raw integer and the shared
//! fixed-point unit of account, using the token's decimals and its reference
//! rate. Every step truncates toward zero.

use super::errors::{CurveMathError, Result};
use alloy_primitives::U256;
use types::{FixedPoint18, TokenAmount};

pub struct Numeraire;

impl Numeraire {
    /// `promote(raw, decimals) * rate / ONE`
    pub fn to_numeraire(
        raw_amount: U256,
        decimals: u8,
        rate: FixedPoint18,
    ) -> Result<FixedPoint18> {
        if rate.is_zero() {
            return Err(CurveMathError::missing("reference rate"));
        }
        let promoted = TokenAmount::new(raw_amount, decimals).to_fixed()?;
        Ok(promoted.checked_mul(rate)?)
    }

    /// `amount * ONE / rate`, still at 18 decimals
    pub fn from_numeraire(amount: FixedPoint18, rate: FixedPoint18) -> Result<FixedPoint18> {
        Ok(amount.checked_div(rate)?)
    }

    /// Convert a numeraire magnitude to native units of a token
    ///
    /// The sign of `amount` is dropped: callers pass solver outputs whose sign
    /// only encodes direction.
    pub fn to_native(amount: FixedPoint18, rate: FixedPoint18, decimals: u8) -> Result<U256> {
        let token_units = Self::from_numeraire(amount.abs(), rate)?;
        Ok(TokenAmount::from_fixed(token_units, decimals)?.raw_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::FixedPointError;

    fn fp(s: &str) -> FixedPoint18 {
        FixedPoint18::from_decimal_str(s).unwrap()
    }

    #[test]
    fn test_to_numeraire_six_decimals() {
        let value = Numeraire::to_numeraire(U256::from(1_000_000u64), 6, fp("0.74310736")).unwrap();
        assert_eq!(value, fp("0.74310736"));

        let value =
            Numeraire::to_numeraire(U256::from(4_026_113_600_000u64), 6, FixedPoint18::ONE)
                .unwrap();
        assert_eq!(value, fp("4026113.6"));
    }

    #[test]
    fn test_to_numeraire_truncates() {
        // 3 units of a 18-decimal token at rate 0.5 -> 1.5e-18 -> 1e-18
        let value = Numeraire::to_numeraire(U256::from(3u64), 18, FixedPoint18::HALF).unwrap();
        assert_eq!(value, FixedPoint18::EPSILON);
    }

    #[test]
    fn test_zero_rate_fails() {
        assert!(matches!(
            Numeraire::to_numeraire(U256::from(1u64), 6, FixedPoint18::ZERO),
            Err(CurveMathError::MissingOracleOrConfigData { .. })
        ));
        assert_eq!(
            Numeraire::from_numeraire(FixedPoint18::ONE, FixedPoint18::ZERO),
            Err(CurveMathError::FixedPoint(FixedPointError::DivisionByZero))
        );
    }

    #[test]
    fn test_to_native_round_trip() {
        let rate = fp("1.0842");
        let numeraire = Numeraire::to_numeraire(U256::from(123_456_789u64), 2, rate).unwrap();
        let back = Numeraire::to_native(numeraire, rate, 2).unwrap();
        assert_eq!(back, U256::from(123_456_789u64));

        // Sign only carries direction
        let negative = Numeraire::to_native(-fp("99.95"), FixedPoint18::ONE, 6).unwrap();
        assert_eq!(negative, U256::from(99_950_000u64));
    }
}
