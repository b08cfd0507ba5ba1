//! Pool trait definitions for a unified pricing interface

use alloy_primitives::{Address, U256};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pool type identifier, as tagged by the pools subgraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    Weighted,
    Stable,
    MetaStable,
    Linear,
    Fx,
}

impl PoolType {
    /// Parse the subgraph `poolType` tag (case-insensitive)
    pub fn from_subgraph_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "weighted" => Some(Self::Weighted),
            "stable" => Some(Self::Stable),
            "metastable" => Some(Self::MetaStable),
            "linear" => Some(Self::Linear),
            "fx" => Some(Self::Fx),
            _ => None,
        }
    }
}

/// Which side of the swap the caller fixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapType {
    ExactIn,
    ExactOut,
}

/// Per-pool pricing oracle used by the router
///
/// Quotes never fail: a pool that cannot serve a query reports zero amounts
/// and its pre-swap price so a routing pass over many pools keeps going.
pub trait PricingPool {
    /// Immutable per-query view of a token pair
    type PairData;

    fn pool_type(&self) -> PoolType;

    fn id(&self) -> &str;

    /// Build the pair view for one query
    fn parse_pool_pair_data(&self, token_in: Address, token_out: Address) -> Result<Self::PairData>;

    fn swap_exact_in(&self, pair: &Self::PairData, amount_in: U256) -> U256;

    fn swap_exact_out(&self, pair: &Self::PairData, amount_out: U256) -> U256;

    fn limit_amount_swap(&self, pair: &Self::PairData, swap_type: SwapType) -> U256;

    fn spot_price_before_swap(&self, pair: &Self::PairData) -> Decimal;

    fn spot_price_after_swap(
        &self,
        pair: &Self::PairData,
        amount: U256,
        swap_type: SwapType,
    ) -> Decimal;

    fn derivative_spot_price_after_swap(
        &self,
        pair: &Self::PairData,
        amount: U256,
        swap_type: SwapType,
    ) -> Decimal;

    fn normalized_liquidity(&self, pair: &Self::PairData) -> Decimal;

    /// Refresh a balance after an on-chain event
    fn update_token_balance(&mut self, token: Address, new_balance: U256) -> Result<()>;

    fn calc_tokens_out_given_exact_bpt_in(&self, bpt_amount_in: U256) -> Vec<U256>;

    fn calc_bpt_out_given_exact_tokens_in(&self, amounts_in: &[U256]) -> U256;
}
