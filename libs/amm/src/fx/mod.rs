//! Xave FX pool curve math
//!
//! Two-asset curve pegged by external reference rates. Mirrors the on-chain
//! CurveMath arithmetic: 18-decimal fixed point, truncating division, a
//! bounded iterative solver with invariant and halt checks.
//!
//! Control flow: [`FxPool`] builds a [`PairSnapshot`]; [`SwapMath`] and
//! [`PriceMath`] run the [`TradeSolver`], which uses [`FeeCurve`] and
//! [`Numeraire`].

pub mod errors;
pub mod fee_curve;
pub mod numeraire;
pub mod params;
pub mod pool;
pub mod pricing;
pub mod snapshot;
pub mod swap;
pub mod trade_solver;

pub use errors::CurveMathError;
pub use fee_curve::FeeCurve;
pub use numeraire::Numeraire;
pub use params::{CurveParameters, LowerBandFee};
pub use pool::{FxPool, FxPoolToken};
pub use pricing::PriceMath;
pub use snapshot::{PairSnapshot, TokenState};
pub use swap::SwapMath;
pub use trade_solver::{CurveState, TradeOutcome, TradeSolver};
