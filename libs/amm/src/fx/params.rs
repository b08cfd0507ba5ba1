//! Curve parameters and on-chain constants

use super::errors::{CurveMathError, Result};
use alloy_primitives::I256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::FixedPoint18;

/// Cap on the marginal imbalance fee rate (0.25)
pub const CURVEMATH_MAX: FixedPoint18 =
    FixedPoint18::from_raw(I256::from_limbs([250_000_000_000_000_000, 0, 0, 0]));

/// Most negative utility change accepted by the invariant check (-0.000001)
pub const CURVEMATH_MAX_DIFF: FixedPoint18 = FixedPoint18::from_raw(I256::from_limbs([
    1_000_000_000_000u64.wrapping_neg(),
    u64::MAX,
    u64::MAX,
    u64::MAX,
]));

/// Raw granularity at which two consecutive solver outputs count as equal
pub const CONVERGENCE_GRANULARITY: I256 = I256::from_limbs([10_000_000_000_000, 0, 0, 0]);

/// Hard cap on solver rounds
pub const MAX_SOLVER_ROUNDS: usize = 32;

/// Equal-weighted two-asset curve
pub const WEIGHTS: [FixedPoint18; 2] = [FixedPoint18::HALF, FixedPoint18::HALF];

/// Floor for a derivative that comes out exactly zero (1e-19)
pub const ALMOST_ZERO: Decimal = Decimal::from_parts(1, 0, 0, false, 19);

/// Treatment of the micro fee for a leg below `ideal * (1 - beta)`
///
/// The deployed curve computes that fee and then drops it, so only the upper
/// side of the band is ever charged. `Waived` reproduces that behavior and is
/// the default; `Charged` applies the same penalty on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LowerBandFee {
    #[default]
    Waived,
    Charged,
}

impl From<config::LowerBandFeeSetting> for LowerBandFee {
    fn from(setting: config::LowerBandFeeSetting) -> Self {
        match setting {
            config::LowerBandFeeSetting::Waived => Self::Waived,
            config::LowerBandFeeSetting::Charged => Self::Charged,
        }
    }
}

/// Shape of one curve instance, immutable for the duration of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParameters {
    /// Halt boundary half-width
    pub alpha: FixedPoint18,
    /// Fee-free band half-width
    pub beta: FixedPoint18,
    /// Fee slope beyond the band
    pub delta: FixedPoint18,
    /// Flat trading fee
    pub epsilon: FixedPoint18,
    /// Damping applied to the fee differential while solving
    pub lambda: FixedPoint18,
    pub lower_band_fee: LowerBandFee,
}

impl CurveParameters {
    pub fn new(
        alpha: FixedPoint18,
        beta: FixedPoint18,
        delta: FixedPoint18,
        epsilon: FixedPoint18,
        lambda: FixedPoint18,
    ) -> Self {
        Self {
            alpha,
            beta,
            delta,
            epsilon,
            lambda,
            lower_band_fee: LowerBandFee::default(),
        }
    }

    pub fn with_lower_band_fee(mut self, mode: LowerBandFee) -> Self {
        self.lower_band_fee = mode;
        self
    }

    /// Parse the five decimal strings a pool definition carries
    ///
    /// Range is not checked: out-of-range values only lead to halts or
    /// non-convergence later on.
    pub fn from_decimal_strs(
        alpha: Option<&str>,
        beta: Option<&str>,
        delta: Option<&str>,
        epsilon: Option<&str>,
        lambda: Option<&str>,
    ) -> Result<Self> {
        let parse = |name: &str, value: Option<&str>| -> Result<FixedPoint18> {
            let text = value.ok_or_else(|| CurveMathError::missing(name))?;
            Ok(FixedPoint18::from_decimal_str(text)?)
        };

        Ok(Self::new(
            parse("alpha", alpha)?,
            parse("beta", beta)?,
            parse("delta", delta)?,
            parse("epsilon", epsilon)?,
            parse("lambda", lambda)?,
        ))
    }
}
