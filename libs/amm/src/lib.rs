//! # FxCurve AMM Library - FX Pool Curve Mathematics
//!
//! ## Purpose
//!
//! Pricing engine for two-asset FX pools whose tokens are pegged to each other by
//! an external reference rate. Computes exact-in/exact-out swap amounts, the
//! remaining room before a halt, spot prices and the derivatives a router uses to
//! rank pools, with arithmetic that matches the on-chain curve digit for digit.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool definitions from `fxcurve-config`, oracle rates attached to them
//! - **Output Destinations**: Route search and ranking across many pools
//! - **Precision**: 18-decimal fixed point over 256-bit integers, truncating division
//! - **Failure Policy**: Quotes degrade to zero amounts / pre-swap prices;
//!   `try_*` variants expose the cause
//!
//! ## Performance Profile
//!
//! - **Solver Bound**: At most 32 rounds per query, success or failure
//! - **State**: None between calls; every query works on its own snapshot
//! - **Concurrency**: Snapshots are plain values, safe to price from many threads
//!
//! ## Usage
//!
//! ```rust
//! use amm::fx::{CurveParameters, PairSnapshot, SwapMath, TokenState};
//! use amm::{Address, FixedPoint18, U256};
//!
//! let fp = |s: &str| FixedPoint18::from_decimal_str(s).unwrap();
//! let usdc_raw = U256::from(4_026_113_600_000u64);
//! let xsgd_raw = U256::from(6_101_054_600_000u64);
//! let usdc = TokenState::new(Address::repeat_byte(1), usdc_raw, 6, FixedPoint18::ONE);
//! let xsgd = TokenState::new(Address::repeat_byte(2), xsgd_raw, 6, FixedPoint18::ONE);
//! let params = CurveParameters::new(fp("0.8"), fp("0.48"), fp("0.273"), fp("0.0005"), fp("0.3"));
//!
//! let pair = PairSnapshot::new("xsgd-usdc", xsgd, usdc, usdc.address, params).unwrap();
//! let out = SwapMath::exact_in(&pair, U256::from(100_000_000_000u64));
//! assert_eq!(out, U256::from(99_950_000_000u64));
//! ```

pub mod fx;
pub mod pool_traits;

pub use fx::{CurveMathError, FxPool, PairSnapshot, PriceMath, SwapMath};
pub use pool_traits::{PoolType, PricingPool, SwapType};

/// Common types for curve calculations
pub use alloy_primitives::{Address, U256};
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
pub use types::FixedPoint18;
