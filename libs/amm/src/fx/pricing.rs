//! Spot prices and derivatives used by the router to rank pools
//!
//! Prices are expressed per unit of the base token's reference rate
//! ([`PairSnapshot::anchor_rate`]) and returned as `Decimal`. A query that fails
//! degrades to the price before the swap, and that one degrades to the
//! oracle rate itself.

use super::errors::{CurveMathError, Result};
use super::numeraire::Numeraire;
use super::params::ALMOST_ZERO;
use super::snapshot::PairSnapshot;
use super::trade_solver::{CurveState, TradeSolver};
use crate::pool_traits::SwapType;
use alloy_primitives::U256;
use rust_decimal::Decimal;
use tracing::warn;
use types::FixedPoint18;

pub struct PriceMath;

impl PriceMath {
    /// Marginal price of one numeraire unit paid into the base leg
    pub fn try_spot_price_before_swap(pair: &PairSnapshot) -> Result<Decimal> {
        let before = pair.curve_state()?;
        let unit = FixedPoint18::ONE;
        let outcome = TradeSolver::calculate_trade(&before, unit, 0, &pair.params)?;

        let price = outcome
            .output
            .abs()
            .checked_mul(FixedPoint18::ONE - pair.params.epsilon)?
            .checked_div(unit)?
            .checked_mul(pair.anchor_rate())?;
        Ok(price.to_decimal()?)
    }

    pub fn try_spot_price_after_exact_in(pair: &PairSnapshot, amount: U256) -> Result<Decimal> {
        if amount.is_zero() {
            return Self::try_spot_price_before_swap(pair);
        }

        let given = Numeraire::to_numeraire(amount, pair.token_in.decimals(), pair.token_in.rate)?;
        let before = pair.curve_state()?;
        let outcome =
            TradeSolver::calculate_trade(&before, given, pair.token_out_index(), &pair.params)?;
        let fee_factor = FixedPoint18::ONE - pair.params.epsilon;

        let price = if Self::outside_beta_band(pair, &outcome.state)? {
            outcome
                .output
                .abs()
                .checked_mul(fee_factor)?
                .checked_div(given.abs())?
                .checked_mul(pair.anchor_rate())?
        } else {
            pair.anchor_rate().checked_mul(fee_factor)?
        };
        Ok(price.to_decimal()?)
    }

    /// Input paid per unit received, at the margin of an exact-out trade
    pub fn try_spot_price_after_exact_out(pair: &PairSnapshot, amount: U256) -> Result<Decimal> {
        if amount.is_zero() {
            return Self::try_spot_price_before_swap(pair);
        }

        let given =
            Numeraire::to_numeraire(amount, pair.token_out.decimals(), pair.token_out.rate)?;
        let before = pair.curve_state()?;
        let outcome =
            TradeSolver::calculate_trade(&before, -given, pair.token_in_index(), &pair.params)?;
        let fee_factor = FixedPoint18::ONE + pair.params.epsilon;

        let price = if Self::outside_beta_band(pair, &outcome.state)? {
            outcome
                .output
                .abs()
                .checked_mul(fee_factor)?
                .checked_div(given.abs())?
                .checked_mul(pair.anchor_rate())?
        } else {
            pair.anchor_rate().checked_mul(fee_factor)?
        };
        Ok(price.to_decimal()?)
    }

    pub fn try_spot_price_after_swap(
        pair: &PairSnapshot,
        amount: U256,
        swap_type: SwapType,
    ) -> Result<Decimal> {
        match swap_type {
            SwapType::ExactIn => Self::try_spot_price_after_exact_in(pair, amount),
            SwapType::ExactOut => Self::try_spot_price_after_exact_out(pair, amount),
        }
    }

    /// `|after - before| / before`, floored at [`ALMOST_ZERO`]
    pub fn try_derivative(
        pair: &PairSnapshot,
        amount: U256,
        swap_type: SwapType,
    ) -> Result<Decimal> {
        let before = Self::try_spot_price_before_swap(pair)?;
        let after = Self::try_spot_price_after_swap(pair, amount, swap_type)?;
        Ok(Self::relative_change(before, after))
    }

    pub fn try_normalized_liquidity(pair: &PairSnapshot) -> Result<Decimal> {
        let derivative = Self::try_derivative(pair, U256::ZERO, SwapType::ExactIn)?;
        Decimal::ONE
            .checked_div(derivative)
            .ok_or(CurveMathError::FixedPoint(types::FixedPointError::Overflow {
                operation: "normalized liquidity",
            }))
    }

    pub fn spot_price_before_swap(pair: &PairSnapshot) -> Decimal {
        Self::try_spot_price_before_swap(pair).unwrap_or_else(|err| {
            warn!(pool = %pair.pool_id, error = %err, "spot price failed, using oracle rate");
            pair.anchor_rate().to_decimal().unwrap_or(Decimal::ZERO)
        })
    }

    pub fn spot_price_after_exact_in(pair: &PairSnapshot, amount: U256) -> Decimal {
        Self::try_spot_price_after_exact_in(pair, amount).unwrap_or_else(|err| {
            warn!(pool = %pair.pool_id, %amount, error = %err, "exact-in spot price failed");
            Self::spot_price_before_swap(pair)
        })
    }

    pub fn spot_price_after_exact_out(pair: &PairSnapshot, amount: U256) -> Decimal {
        Self::try_spot_price_after_exact_out(pair, amount).unwrap_or_else(|err| {
            warn!(pool = %pair.pool_id, %amount, error = %err, "exact-out spot price failed");
            Self::spot_price_before_swap(pair)
        })
    }

    pub fn spot_price_after_swap(
        pair: &PairSnapshot,
        amount: U256,
        swap_type: SwapType,
    ) -> Decimal {
        match swap_type {
            SwapType::ExactIn => Self::spot_price_after_exact_in(pair, amount),
            SwapType::ExactOut => Self::spot_price_after_exact_out(pair, amount),
        }
    }

    pub fn derivative_exact_in(pair: &PairSnapshot, amount: U256) -> Decimal {
        Self::derivative(pair, amount, SwapType::ExactIn)
    }

    pub fn derivative_exact_out(pair: &PairSnapshot, amount: U256) -> Decimal {
        Self::derivative(pair, amount, SwapType::ExactOut)
    }

    pub fn derivative(pair: &PairSnapshot, amount: U256, swap_type: SwapType) -> Decimal {
        let before = Self::spot_price_before_swap(pair);
        let after = Self::spot_price_after_swap(pair, amount, swap_type);
        Self::relative_change(before, after)
    }

    /// Inverse of the zero-amount exact-in derivative
    pub fn normalized_liquidity(pair: &PairSnapshot) -> Decimal {
        let derivative = Self::derivative_exact_in(pair, U256::ZERO);
        Decimal::ONE.checked_div(derivative).unwrap_or(Decimal::ZERO)
    }

    fn relative_change(before: Decimal, after: Decimal) -> Decimal {
        let change = (after - before)
            .checked_div(before)
            .map(|ratio| ratio.abs())
            .unwrap_or(Decimal::ZERO);
        if change.is_zero() {
            ALMOST_ZERO
        } else {
            change
        }
    }

    /// Whether a post-trade state left the fee-free band
    ///
    /// Outside means the `token_in` leg is above `(1 + beta) / 2` of global
    /// liquidity and the `token_out` leg below `(1 - beta) / 2`.
    fn outside_beta_band(pair: &PairSnapshot, after: &CurveState) -> Result<bool> {
        let beta = pair.params.beta;
        let max_beta = (FixedPoint18::ONE + beta)
            .checked_div_int(2)?
            .checked_mul(after.global_liquidity)?;
        let min_beta = (FixedPoint18::ONE - beta)
            .checked_div_int(2)?
            .checked_mul(after.global_liquidity)?;

        Ok(after.balances[pair.token_in_index()] > max_beta
            && after.balances[pair.token_out_index()] < min_beta)
    }
}
