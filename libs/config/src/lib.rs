//! # FxCurve Pool Configuration
//!
//! Pool definitions for the FxCurve pricing libraries, in the shape the pools
//! subgraph publishes them.
//!
//! ## Features
//!
//! - **Subgraph Model**: camelCase keys, decimal strings for balances, rates and curve parameters
//! - **File Loading**: TOML or JSON by extension, with an optional overlay file
//! - **Environment Overrides**: `FXCURVE_`-prefixed variables for registry-wide settings
//!
//! ## Usage
//!
//! ```rust
//! use fxcurve_config::{LowerBandFeeSetting, PoolRegistry};
//!
//! let registry = PoolRegistry::from_json_str(r#"{ "pools": [] }"#).unwrap();
//! assert!(registry.get_pool("0x55bec22f8f6c69137ceaf284d9b441db1b9bfedc").is_none());
//! assert_eq!(registry.default_lower_band_fee, LowerBandFeeSetting::Waived);
//! ```

pub mod pool_config;

// Re-export commonly used types
pub use pool_config::{
    LowerBandFeeSetting, PoolConfig, PoolRegistry, PoolTokenConfig, TokenMetadata,
};
