//! Swap amounts for FX pools
//!
//! Amounts cross this boundary as raw integers in the token's native
//! decimals. The `try_*` functions surface the curve failure; the plain ones
//! log it and degrade to zero so that one halted or illiquid pool does not
//! abort a routing pass over many pools.

use super::errors::{CurveMathError, Result};
use super::numeraire::Numeraire;
use super::snapshot::PairSnapshot;
use super::trade_solver::TradeSolver;
use crate::pool_traits::SwapType;
use alloy_primitives::U256;
use tracing::{debug, warn};
use types::FixedPoint18;

pub struct SwapMath;

impl SwapMath {
    /// Amount of `token_out` received for exactly `amount` of `token_in`
    pub fn try_exact_in(pair: &PairSnapshot, amount: U256) -> Result<U256> {
        let token_in = &pair.token_in;
        let given = Numeraire::to_numeraire(amount, token_in.decimals(), token_in.rate)?;

        if pair.is_same_token() {
            return Numeraire::to_native(given, token_in.rate, token_in.decimals());
        }

        let before = pair.curve_state()?;
        let outcome =
            TradeSolver::calculate_trade(&before, given, pair.token_out_index(), &pair.params)?;
        if !given.is_zero() && !outcome.output.is_negative() {
            return Err(CurveMathError::CannotSwap);
        }

        // Pool retains epsilon
        let with_fee = outcome.output.checked_mul(FixedPoint18::ONE - pair.params.epsilon)?;
        let amount_out =
            Numeraire::to_native(with_fee, pair.token_out.rate, pair.token_out.decimals())?;

        debug!(pool = %pair.pool_id, %amount, %amount_out, rounds = outcome.rounds, "exact in");
        Ok(amount_out)
    }

    /// Amount of `token_in` required to receive exactly `amount` of `token_out`
    pub fn try_exact_out(pair: &PairSnapshot, amount: U256) -> Result<U256> {
        let token_out = &pair.token_out;
        let given = Numeraire::to_numeraire(amount, token_out.decimals(), token_out.rate)?;

        if pair.is_same_token() {
            return Numeraire::to_native(given, token_out.rate, token_out.decimals());
        }

        let before = pair.curve_state()?;
        let outcome =
            TradeSolver::calculate_trade(&before, -given, pair.token_in_index(), &pair.params)?;
        if !given.is_zero() && !outcome.output.is_positive() {
            return Err(CurveMathError::CannotSwap);
        }

        let with_fee = outcome.output.checked_mul(FixedPoint18::ONE + pair.params.epsilon)?;
        let amount_in =
            Numeraire::to_native(with_fee, pair.token_in.rate, pair.token_in.decimals())?;

        debug!(pool = %pair.pool_id, %amount, %amount_in, rounds = outcome.rounds, "exact out");
        Ok(amount_in)
    }

    /// Room left on a leg before it reaches `(1 + alpha) / 2` of global liquidity
    ///
    /// `ExactIn` measures the `token_in` leg, `ExactOut` the `token_out` leg.
    /// A leg already past that point has no room left.
    pub fn try_limit_amount(pair: &PairSnapshot, swap_type: SwapType) -> Result<U256> {
        let state = pair.curve_state()?;
        let max_leg = (FixedPoint18::ONE + pair.params.alpha)
            .checked_div_int(2)?
            .checked_mul(state.global_liquidity)?;

        let (leg, token) = match swap_type {
            SwapType::ExactIn => (state.balances[pair.token_in_index()], &pair.token_in),
            SwapType::ExactOut => (state.balances[pair.token_out_index()], &pair.token_out),
        };

        let remaining = max_leg.checked_sub(leg)?;
        if remaining.is_negative() {
            return Ok(U256::ZERO);
        }
        Numeraire::to_native(remaining, token.rate, token.decimals())
    }

    pub fn exact_in(pair: &PairSnapshot, amount: U256) -> U256 {
        Self::try_exact_in(pair, amount).unwrap_or_else(|err| {
            warn!(pool = %pair.pool_id, %amount, error = %err, "exact in failed, quoting zero");
            U256::ZERO
        })
    }

    pub fn exact_out(pair: &PairSnapshot, amount: U256) -> U256 {
        Self::try_exact_out(pair, amount).unwrap_or_else(|err| {
            warn!(pool = %pair.pool_id, %amount, error = %err, "exact out failed, quoting zero");
            U256::ZERO
        })
    }

    pub fn limit_amount(pair: &PairSnapshot, swap_type: SwapType) -> U256 {
        Self::try_limit_amount(pair, swap_type).unwrap_or_else(|err| {
            warn!(
                pool = %pair.pool_id,
                ?swap_type,
                error = %err,
                "limit amount failed, quoting zero"
            );
            U256::ZERO
        })
    }
}
