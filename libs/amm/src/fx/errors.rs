//! Curve math failure kinds
//!
//! Display strings match the revert reasons of the on-chain curve so a failed
//! quote can be compared directly against a reverted transaction.

use alloy_primitives::Address;
use thiserror::Error;
use types::FixedPointError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurveMathError {
    /// A leg would be pushed further below its lower halt boundary
    #[error("CurveMath/lower-halt")]
    LowerHalt,

    /// A leg would be pushed further above its upper halt boundary
    #[error("CurveMath/upper-halt")]
    UpperHalt,

    /// Post-trade utility moved outside the allowed slack
    #[error("CurveMath/swap-invariant-violation")]
    SwapInvariantViolation,

    /// No stable output within the iteration cap
    #[error("CurveMath/swap-convergence-failed")]
    SwapConvergenceFailed,

    /// The solver produced an amount flowing the wrong way
    #[error("CannotSwap")]
    CannotSwap,

    /// A reference rate or curve parameter is absent or zero
    #[error("missing oracle or config data: {field}")]
    MissingOracleOrConfigData { field: String },

    #[error("token {0} is not part of the pool")]
    TokenNotInPool(Address),

    #[error(transparent)]
    FixedPoint(#[from] FixedPointError),
}

impl CurveMathError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingOracleOrConfigData {
            field: field.into(),
        }
    }

    /// Failures produced by the curve itself rather than by bad input data
    pub fn is_curve_revert(&self) -> bool {
        matches!(
            self,
            Self::LowerHalt
                | Self::UpperHalt
                | Self::SwapInvariantViolation
                | Self::SwapConvergenceFailed
                | Self::CannotSwap
        )
    }
}

pub type Result<T> = std::result::Result<T, CurveMathError>;
