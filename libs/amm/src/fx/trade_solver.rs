//! Iterative trade solver
//!
//! Finds the output amount that balances the curve's imbalance fees before and
//! after a trade. Starting from the naive post-transfer state, each round
//! recomputes the post-trade fee `psi`, feeds the fee differential (damped by
//! `lambda` when the trade improves the curve) back into the output, and stops
//! once two consecutive outputs agree at [`CONVERGENCE_GRANULARITY`].
//!
//! A converged result is then checked against the utility invariant and the
//! per-leg halt boundaries. The loop is bounded by [`MAX_SOLVER_ROUNDS`].

use super::errors::{CurveMathError, Result};
use super::fee_curve::FeeCurve;
use super::params::{
    CurveParameters, CONVERGENCE_GRANULARITY, CURVEMATH_MAX_DIFF, MAX_SOLVER_ROUNDS, WEIGHTS,
};
use tracing::{debug, trace};
use types::FixedPoint18;

/// Numeraire balances of a pool, anchor (quote) leg first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveState {
    pub global_liquidity: FixedPoint18,
    pub balances: [FixedPoint18; 2],
}

impl CurveState {
    pub fn new(anchor: FixedPoint18, other: FixedPoint18) -> Result<Self> {
        Ok(Self {
            global_liquidity: anchor.checked_add(other)?,
            balances: [anchor, other],
        })
    }
}

/// Converged solver result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeOutcome {
    /// Signed amount added to the output leg (negative when the pool pays out)
    pub output: FixedPoint18,
    /// Post-trade state
    pub state: CurveState,
    /// Pre-trade fee
    pub omega: FixedPoint18,
    /// Post-trade fee as of the converging round
    pub psi: FixedPoint18,
    pub rounds: usize,
}

impl TradeOutcome {
    /// `(nGLiq - psi) - (oGLiq - omega)`
    pub fn utility_diff(&self, before: &CurveState) -> Result<FixedPoint18> {
        let next = self.state.global_liquidity.checked_sub(self.psi)?;
        let prev = before.global_liquidity.checked_sub(self.omega)?;
        Ok(next.checked_sub(prev)?)
    }
}

pub struct TradeSolver;

impl TradeSolver {
    /// Solve a trade of `input` numeraire against `before`
    ///
    /// `input` enters the leg that is not `output_index`; the returned output is
    /// applied to `output_index`. A negative `input` solves for the amount the
    /// other leg must receive to pay out `-input`.
    pub fn calculate_trade(
        before: &CurveState,
        input: FixedPoint18,
        output_index: usize,
        params: &CurveParameters,
    ) -> Result<TradeOutcome> {
        if output_index > 1 {
            return Err(CurveMathError::CannotSwap);
        }
        let input_index = 1 - output_index;

        let mut after = CurveState {
            global_liquidity: before.global_liquidity,
            balances: before.balances,
        };
        after.balances[input_index] = before.balances[input_index].checked_add(input)?;
        after.balances[output_index] = before.balances[output_index].checked_sub(input)?;

        let omega = FeeCurve::aggregate_fee(before.global_liquidity, &before.balances, params)?;
        let mut output = -input;

        for round in 1..=MAX_SOLVER_ROUNDS {
            let psi = FeeCurve::aggregate_fee(after.global_liquidity, &after.balances, params)?;
            let previous = output;

            let fee_diff = omega.checked_sub(psi)?;
            output = if omega < psi {
                -input.checked_add(fee_diff)?
            } else {
                -input.checked_add(params.lambda.checked_mul(fee_diff)?)?
            };

            after.global_liquidity = before
                .global_liquidity
                .checked_add(input)?
                .checked_add(output)?;
            after.balances[output_index] = before.balances[output_index].checked_add(output)?;

            trace!(round, %psi, %output, "curve solver round");

            if output.truncated_to(CONVERGENCE_GRANULARITY)
                == previous.truncated_to(CONVERGENCE_GRANULARITY)
            {
                let outcome = TradeOutcome {
                    output,
                    state: after,
                    omega,
                    psi,
                    rounds: round,
                };
                Self::enforce_swap_invariant(before, &outcome)?;
                Self::enforce_halts(before, &after, params.alpha)?;

                debug!(
                    rounds = round,
                    %output,
                    n_gliq = %after.global_liquidity,
                    "curve solver converged"
                );
                return Ok(outcome);
            }
        }

        Err(CurveMathError::SwapConvergenceFailed)
    }

    /// Reject a trade whose utility drops by more than [`CURVEMATH_MAX_DIFF`]
    pub fn enforce_swap_invariant(before: &CurveState, outcome: &TradeOutcome) -> Result<()> {
        let diff = outcome.utility_diff(before)?;
        if diff < CURVEMATH_MAX_DIFF {
            return Err(CurveMathError::SwapInvariantViolation);
        }
        Ok(())
    }

    /// Per-leg halt boundaries at `ideal * (1 ± alpha)`
    ///
    /// Past a boundary, a trade is accepted only when the leg was already past
    /// the old-state boundary and its overshoot does not grow.
    pub fn enforce_halts(
        before: &CurveState,
        after: &CurveState,
        alpha: FixedPoint18,
    ) -> Result<()> {
        for (i, weight) in WEIGHTS.into_iter().enumerate() {
            let new_balance = after.balances[i];
            let old_balance = before.balances[i];
            let new_ideal = FeeCurve::ideal_share(after.global_liquidity, weight)?;

            if new_balance > new_ideal {
                let upper = FixedPoint18::ONE + alpha;
                let new_halt = new_ideal.checked_mul(upper)?;
                if new_balance > new_halt {
                    let old_halt = before.global_liquidity.checked_mul3(weight, upper)?;
                    if old_balance < old_halt || new_balance - new_halt > old_balance - old_halt {
                        return Err(CurveMathError::UpperHalt);
                    }
                }
            } else {
                let lower = FixedPoint18::ONE - alpha;
                let new_halt = new_ideal.checked_mul(lower)?;
                if new_balance < new_halt {
                    let old_halt = before.global_liquidity.checked_mul3(weight, lower)?;
                    if old_balance > old_halt || new_halt - new_balance > old_halt - old_balance {
                        return Err(CurveMathError::LowerHalt);
                    }
                }
            }
        }
        Ok(())
    }
}
