//! # FxCurve Types Library
//!
//! Numeric types shared by the FxCurve pricing libraries.
//!
//! ## Design Philosophy
//!
//! - **No Precision Loss**: All financial values stored as scaled integers
//! - **Contract Parity**: 18-decimal fixed point over a 256-bit signed integer with
//!   truncating division, the same arithmetic the on-chain curve uses
//! - **Type Safety**: Native token amounts ([`TokenAmount`]) and fixed-point values
//!   ([`FixedPoint18`]) are distinct types with explicit conversion points
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{FixedPoint18, TokenAmount};
//!
//! let rate = FixedPoint18::from_decimal_str("0.74310736").unwrap();
//! let balance = TokenAmount::from_decimal_str("4270427.443742", 6).unwrap();
//!
//! let numeraire = balance.to_fixed().unwrap().checked_mul(rate).unwrap();
//! assert!(numeraire < balance.to_fixed().unwrap());
//! ```

pub mod common;

// Native token precision
pub mod precision;

pub use common::errors::FixedPointError;
pub use common::fixed_point::FixedPoint18;
pub use precision::TokenAmount;

/// 256-bit integer types used at the raw-amount boundary
pub use alloy_primitives::{Address, I256, U256};
