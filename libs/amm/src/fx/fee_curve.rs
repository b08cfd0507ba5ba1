//! Imbalance fee curve
//!
//! A leg inside `ideal * (1 ± beta)` pays nothing. Beyond that band the
//! marginal rate grows linearly with the distance (slope `delta`) and is
//! capped at [`CURVEMATH_MAX`]; the fee is that rate times the distance.

use super::errors::Result;
use super::params::{CurveParameters, LowerBandFee, CURVEMATH_MAX, WEIGHTS};
use types::FixedPoint18;

pub struct FeeCurve;

impl FeeCurve {
    /// `global_liquidity * weight / ONE`
    pub fn ideal_share(
        global_liquidity: FixedPoint18,
        weight: FixedPoint18,
    ) -> Result<FixedPoint18> {
        Ok(global_liquidity.checked_mul(weight)?)
    }

    /// Fee charged on one leg for its distance from the ideal share
    pub fn micro_fee(
        balance: FixedPoint18,
        ideal: FixedPoint18,
        beta: FixedPoint18,
        delta: FixedPoint18,
        lower_band_fee: LowerBandFee,
    ) -> Result<FixedPoint18> {
        if balance < ideal {
            let threshold = ideal.checked_mul(FixedPoint18::ONE - beta)?;
            if balance >= threshold {
                return Ok(FixedPoint18::ZERO);
            }
            let fee = Self::margin_fee(threshold - balance, ideal, delta)?;
            return Ok(match lower_band_fee {
                LowerBandFee::Waived => FixedPoint18::ZERO,
                LowerBandFee::Charged => fee,
            });
        }

        let threshold = ideal.checked_mul(FixedPoint18::ONE + beta)?;
        if balance > threshold {
            Self::margin_fee(balance - threshold, ideal, delta)
        } else {
            Ok(FixedPoint18::ZERO)
        }
    }

    fn margin_fee(
        margin: FixedPoint18,
        ideal: FixedPoint18,
        delta: FixedPoint18,
    ) -> Result<FixedPoint18> {
        let rate = margin.checked_div(ideal)?.checked_mul(delta)?;
        Ok(rate.min(CURVEMATH_MAX).checked_mul(margin)?)
    }

    /// Total imbalance penalty of a state (psi after a trade, omega before)
    pub fn aggregate_fee(
        global_liquidity: FixedPoint18,
        balances: &[FixedPoint18; 2],
        params: &CurveParameters,
    ) -> Result<FixedPoint18> {
        let mut total = FixedPoint18::ZERO;
        for (balance, weight) in balances.iter().zip(WEIGHTS) {
            let ideal = Self::ideal_share(global_liquidity, weight)?;
            let fee =
                Self::micro_fee(*balance, ideal, params.beta, params.delta, params.lower_band_fee)?;
            total = total.checked_add(fee)?;
        }
        Ok(total)
    }
}
