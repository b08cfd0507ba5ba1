//! FX pool object
//!
//! Holds the latest known state of one pool (balances, oracle rates, curve
//! parameters) and hands out immutable [`PairSnapshot`]s for pricing. Data
//! problems that only matter when a pair is priced (a missing rate or curve
//! parameter) are reported by [`FxPool::build_pair_snapshot`], not at load time.

use super::errors::{CurveMathError, Result};
use super::params::{CurveParameters, LowerBandFee};
use super::pricing::PriceMath;
use super::snapshot::{PairSnapshot, TokenState};
use super::swap::SwapMath;
use crate::pool_traits::{PoolType, PricingPool, SwapType};
use alloy_primitives::{Address, I256, U256};
use anyhow::{bail, Context};
use config::{PoolConfig, PoolTokenConfig};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;
use types::{FixedPoint18, TokenAmount};

/// One pool leg as last observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FxPoolToken {
    pub address: Address,
    pub balance: TokenAmount,
    /// Oracle rate, `None` when the pool definition carried none
    pub rate: Option<FixedPoint18>,
}

#[derive(Debug, Clone)]
pub struct FxPool {
    pub id: String,
    pub address: Address,
    pub swap_fee: FixedPoint18,
    pub total_shares: FixedPoint18,
    pub tokens: Vec<FxPoolToken>,
    pub params: Option<CurveParameters>,
    pub quote_token: Option<Address>,
}

impl FxPool {
    /// Build from a subgraph-shaped pool definition
    pub fn from_config(pool: &PoolConfig) -> anyhow::Result<Self> {
        if PoolType::from_subgraph_name(&pool.pool_type) != Some(PoolType::Fx) {
            bail!("Pool {} is of type {}, not FX", pool.id, pool.pool_type);
        }

        let address = parse_address(&pool.address)
            .with_context(|| format!("Invalid address for pool {}", pool.id))?;

        let tokens = pool
            .tokens
            .iter()
            .map(FxPoolToken::from_config)
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("Invalid token in pool {}", pool.id))?;

        let params = match CurveParameters::from_decimal_strs(
            pool.alpha.as_deref(),
            pool.beta.as_deref(),
            pool.delta.as_deref(),
            pool.epsilon.as_deref(),
            pool.lambda.as_deref(),
        ) {
            Ok(params) => {
                Some(params.with_lower_band_fee(LowerBandFee::from(pool.lower_band_fee())))
            }
            Err(CurveMathError::MissingOracleOrConfigData { .. }) => None,
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Invalid curve parameters for pool {}", pool.id))
            }
        };

        let quote_token = pool
            .quote_token
            .as_deref()
            .map(parse_address)
            .transpose()
            .with_context(|| format!("Invalid quoteToken for pool {}", pool.id))?;

        Ok(Self {
            id: pool.id.clone(),
            address,
            swap_fee: parse_optional(pool.swap_fee.as_deref()).context("Invalid swapFee")?,
            total_shares: parse_optional(pool.total_shares.as_deref())
                .context("Invalid totalShares")?,
            tokens,
            params,
            quote_token,
        })
    }

    fn token(&self, address: Address) -> Result<&FxPoolToken> {
        self.tokens
            .iter()
            .find(|token| token.address == address)
            .ok_or(CurveMathError::TokenNotInPool(address))
    }

    /// Immutable view of the pair for one query
    pub fn build_pair_snapshot(
        &self,
        token_in: Address,
        token_out: Address,
    ) -> Result<PairSnapshot> {
        let leg_in = self.token(token_in)?;
        let leg_out = self.token(token_out)?;

        let params = self.params.ok_or_else(|| CurveMathError::missing("curve parameters"))?;
        let quote_token = self.quote_token.ok_or_else(|| CurveMathError::missing("quoteToken"))?;

        let snapshot = PairSnapshot::new(
            self.id.clone(),
            leg_in.state()?,
            leg_out.state()?,
            quote_token,
            params,
        )?;

        debug!(pool = %self.id, %token_in, %token_out, "built pair snapshot");
        Ok(snapshot)
    }

    /// Record a new raw balance; the pool's own address updates total shares
    pub fn update_token_balance(&mut self, token: Address, new_balance: U256) -> Result<()> {
        if token == self.address {
            let shares = I256::try_from(new_balance).map_err(|_| types::FixedPointError::Overflow {
                operation: "total shares",
            })?;
            self.total_shares = FixedPoint18::from_raw(shares);
            return Ok(());
        }

        let leg = self
            .tokens
            .iter_mut()
            .find(|leg| leg.address == token)
            .ok_or(CurveMathError::TokenNotInPool(token))?;
        leg.balance.raw_amount = new_balance;
        Ok(())
    }

    /// Liquidity provision is not priced by this pool kind
    pub fn calc_tokens_out_given_exact_bpt_in(&self, _bpt_amount_in: U256) -> Vec<U256> {
        vec![U256::ZERO; self.tokens.len()]
    }

    pub fn calc_bpt_out_given_exact_tokens_in(&self, _amounts_in: &[U256]) -> U256 {
        U256::ZERO
    }
}

impl FxPoolToken {
    fn from_config(token: &PoolTokenConfig) -> anyhow::Result<Self> {
        let address = parse_address(&token.address)?;
        let balance = TokenAmount::from_decimal_str(&token.balance, token.decimals)
            .with_context(|| format!("Invalid balance for token {}", token.address))?;

        let rate = token
            .latest_fx_price()
            .map(FixedPoint18::from_decimal_str)
            .transpose()
            .with_context(|| format!("Invalid latestFXPrice for token {}", token.address))?;
        let oracle_decimals = token.token.as_ref().and_then(|meta| meta.fx_oracle_decimals);
        let rate = match (rate, oracle_decimals) {
            (Some(rate), Some(decimals)) => Some(truncate_to_decimals(rate, decimals)),
            (rate, _) => rate,
        };

        Ok(Self {
            address,
            balance,
            rate,
        })
    }

    fn state(&self) -> Result<TokenState> {
        let rate = self
            .rate
            .ok_or_else(|| CurveMathError::missing(format!("latestFXPrice of {}", self.address)))?;
        Ok(TokenState {
            address: self.address,
            balance: self.balance,
            rate,
        })
    }
}

/// Oracle prices carry a fixed number of decimals; drop anything finer
fn truncate_to_decimals(value: FixedPoint18, decimals: u8) -> FixedPoint18 {
    if decimals >= FixedPoint18::DECIMALS {
        return value;
    }
    let step = I256::exp10(usize::from(FixedPoint18::DECIMALS - decimals));
    FixedPoint18::from_raw(value.truncated_to(step) * step)
}

fn parse_address(text: &str) -> anyhow::Result<Address> {
    Address::from_str(text.trim()).with_context(|| format!("Invalid address: {text}"))
}

fn parse_optional(text: Option<&str>) -> anyhow::Result<FixedPoint18> {
    match text {
        Some(text) => Ok(FixedPoint18::from_decimal_str(text)?),
        None => Ok(FixedPoint18::ZERO),
    }
}

impl PricingPool for FxPool {
    type PairData = PairSnapshot;

    fn pool_type(&self) -> PoolType {
        PoolType::Fx
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn parse_pool_pair_data(
        &self,
        token_in: Address,
        token_out: Address,
    ) -> anyhow::Result<PairSnapshot> {
        Ok(self.build_pair_snapshot(token_in, token_out)?)
    }

    fn swap_exact_in(&self, pair: &PairSnapshot, amount_in: U256) -> U256 {
        SwapMath::exact_in(pair, amount_in)
    }

    fn swap_exact_out(&self, pair: &PairSnapshot, amount_out: U256) -> U256 {
        SwapMath::exact_out(pair, amount_out)
    }

    fn limit_amount_swap(&self, pair: &PairSnapshot, swap_type: SwapType) -> U256 {
        SwapMath::limit_amount(pair, swap_type)
    }

    fn spot_price_before_swap(&self, pair: &PairSnapshot) -> Decimal {
        PriceMath::spot_price_before_swap(pair)
    }

    fn spot_price_after_swap(
        &self,
        pair: &PairSnapshot,
        amount: U256,
        swap_type: SwapType,
    ) -> Decimal {
        PriceMath::spot_price_after_swap(pair, amount, swap_type)
    }

    fn derivative_spot_price_after_swap(
        &self,
        pair: &PairSnapshot,
        amount: U256,
        swap_type: SwapType,
    ) -> Decimal {
        PriceMath::derivative(pair, amount, swap_type)
    }

    fn normalized_liquidity(&self, pair: &PairSnapshot) -> Decimal {
        PriceMath::normalized_liquidity(pair)
    }

    fn update_token_balance(&mut self, token: Address, new_balance: U256) -> anyhow::Result<()> {
        Ok(FxPool::update_token_balance(self, token, new_balance)?)
    }

    fn calc_tokens_out_given_exact_bpt_in(&self, bpt_amount_in: U256) -> Vec<U256> {
        FxPool::calc_tokens_out_given_exact_bpt_in(self, bpt_amount_in)
    }

    fn calc_bpt_out_given_exact_tokens_in(&self, amounts_in: &[U256]) -> U256 {
        FxPool::calc_bpt_out_given_exact_tokens_in(self, amounts_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::PoolRegistry;

    const USDC: &str = "0x2791bca1f2de4661ed88a30c99a7a9449aa84174";
    const XSGD: &str = "0xdc3326e71d45186f113a2f448984ca0e8d201995";

    fn pool_json(xsgd_price: &str) -> String {
        format!(
            r#"{{ "pools": [{{
                "id": "0x55bec22f8f6c69137ceaf284d9b441db1b9bfedc000200000000000000000416",
                "address": "0x55bec22f8f6c69137ceaf284d9b441db1b9bfedc",
                "poolType": "FX",
                "swapFee": "0",
                "totalShares": "10000000",
                "alpha": "0.8", "beta": "0.48", "lambda": "0.3",
                "delta": "0.273", "epsilon": "0.0005",
                "quoteToken": "{USDC}",
                "tokens": [
                    {{ "address": "{USDC}", "balance": "4026113.6", "decimals": 6,
                       "token": {{ "latestFXPrice": "1", "fxOracleDecimals": 8 }} }},
                    {{ "address": "{XSGD}", "balance": "6101054.6", "decimals": 6,
                       "token": {{ "latestFXPrice": "{xsgd_price}", "fxOracleDecimals": 8 }} }}
                ]
            }}] }}"#
        )
    }

    fn load(xsgd_price: &str) -> FxPool {
        let registry = PoolRegistry::from_json_str(&pool_json(xsgd_price)).unwrap();
        FxPool::from_config(&registry.pools[0]).unwrap()
    }

    fn addr(text: &str) -> Address {
        Address::from_str(text).unwrap()
    }

    #[test]
    fn test_from_config() {
        let pool = load("0.74310736");
        assert_eq!(pool.tokens.len(), 2);
        assert_eq!(pool.quote_token, Some(addr(USDC)));
        assert_eq!(pool.total_shares, FixedPoint18::from_int(10_000_000));
        assert_eq!(pool.tokens[0].balance.raw_amount, U256::from(4_026_113_600_000u64));
        assert_eq!(pool.params.unwrap().lower_band_fee, LowerBandFee::Waived);
    }

    #[test]
    fn test_oracle_rate_truncated_to_oracle_decimals() {
        let pool = load("0.743107369999");
        assert_eq!(
            pool.tokens[1].rate,
            Some(FixedPoint18::from_decimal_str("0.74310736").unwrap())
        );
    }

    #[test]
    fn test_build_pair_snapshot() {
        let pool = load("0.74310736");
        let pair = pool.build_pair_snapshot(addr(XSGD), addr(USDC)).unwrap();
        assert_eq!(pair.token_in_index(), 1);
        assert_eq!(pair.pool_id, pool.id);

        let foreign = Address::repeat_byte(0xaa);
        assert_eq!(
            pool.build_pair_snapshot(foreign, addr(USDC)).unwrap_err(),
            CurveMathError::TokenNotInPool(foreign)
        );
    }

    #[test]
    fn test_missing_rate_fails_at_snapshot() {
        let json = pool_json("0.74310736").replace(r#""latestFXPrice": "0.74310736", "#, "");
        let registry = PoolRegistry::from_json_str(&json).unwrap();
        let pool = FxPool::from_config(&registry.pools[0]).unwrap();

        let err = pool.build_pair_snapshot(addr(USDC), addr(XSGD)).unwrap_err();
        assert!(matches!(err, CurveMathError::MissingOracleOrConfigData { .. }));
    }

    #[test]
    fn test_zero_rate_fails_at_snapshot() {
        let pool = load("0");
        assert!(matches!(
            pool.build_pair_snapshot(addr(USDC), addr(XSGD)),
            Err(CurveMathError::MissingOracleOrConfigData { .. })
        ));
    }

    #[test]
    fn test_update_token_balance() {
        let mut pool = load("0.74310736");
        pool.update_token_balance(addr(XSGD), U256::from(42u64)).unwrap();
        assert_eq!(pool.tokens[1].balance.raw_amount, U256::from(42u64));

        let shares = U256::from(5u64) * U256::from(10u64).pow(U256::from(18u64));
        pool.update_token_balance(pool.address, shares).unwrap();
        assert_eq!(pool.total_shares, FixedPoint18::from_int(5));

        assert!(matches!(
            pool.update_token_balance(Address::repeat_byte(0xbb), U256::from(1u64)),
            Err(CurveMathError::TokenNotInPool(_))
        ));
    }

    #[test]
    fn test_liquidity_provision_is_empty() {
        let pool = load("0.74310736");
        assert_eq!(
            pool.calc_tokens_out_given_exact_bpt_in(U256::from(1_000u64)),
            vec![U256::ZERO, U256::ZERO]
        );
        assert_eq!(pool.calc_bpt_out_given_exact_tokens_in(&[U256::from(1u64)]), U256::ZERO);
    }

    #[test]
    fn test_rejects_other_pool_types() {
        let json = pool_json("1").replace(r#""poolType": "FX""#, r#""poolType": "Weighted""#);
        let registry = PoolRegistry::from_json_str(&json).unwrap();
        assert!(FxPool::from_config(&registry.pools[0]).is_err());
    }

    #[test]
    fn test_pricing_pool_trait() {
        let mut pool = load("1");
        let pair = pool.parse_pool_pair_data(addr(XSGD), addr(USDC)).unwrap();

        assert_eq!(pool.pool_type(), PoolType::Fx);
        assert_eq!(
            pool.swap_exact_in(&pair, U256::from(100_000_000_000u64)),
            U256::from(99_950_000_000u64)
        );
        assert_eq!(pool.spot_price_before_swap(&pair), rust_decimal_macros::dec!(0.9995));

        PricingPool::update_token_balance(&mut pool, addr(USDC), U256::ZERO).unwrap();
        assert_eq!(pool.tokens[0].balance.raw_amount, U256::ZERO);
    }
}
