//! Pool Definition Module
//!
//! Loads FX pool definitions in the shape the pools subgraph publishes them
//! (camelCase keys, decimal strings for every numeric quantity). Supports TOML
//! and JSON files, an optional overlay file, and `FXCURVE_`-prefixed
//! environment overrides for registry-wide settings.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Every pool the router knows about
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PoolRegistry {
    #[serde(default)]
    pub pools: Vec<PoolConfig>,

    /// Applied to pools that do not set `lowerBandFee` themselves
    #[serde(default)]
    pub default_lower_band_fee: LowerBandFeeSetting,
}

/// One FX pool as described by the subgraph
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PoolConfig {
    pub id: String,
    pub address: String,

    #[serde(default = "default_pool_type")]
    pub pool_type: String,

    pub swap_fee: Option<String>,
    pub total_shares: Option<String>,

    #[serde(default)]
    pub tokens_list: Vec<String>,

    // Curve parameters, decimal strings
    pub alpha: Option<String>,
    pub beta: Option<String>,
    pub lambda: Option<String>,
    pub delta: Option<String>,
    pub epsilon: Option<String>,

    /// Token whose leg anchors the numeraire (index 0)
    pub quote_token: Option<String>,

    #[serde(default)]
    pub tokens: Vec<PoolTokenConfig>,

    pub lower_band_fee: Option<LowerBandFeeSetting>,
}

/// One leg of a pool
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PoolTokenConfig {
    pub address: String,
    pub symbol: Option<String>,

    /// Human-readable balance ("4026113.6")
    pub balance: String,
    pub decimals: u8,

    pub price_rate: Option<String>,
    pub weight: Option<String>,

    /// Oracle data attached to the token
    pub token: Option<TokenMetadata>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    /// Latest oracle price against USD, human-readable
    #[serde(rename = "latestFXPrice")]
    pub latest_fx_price: Option<String>,

    pub fx_oracle_decimals: Option<u8>,
}

/// Whether the fee curve charges below the lower beta boundary
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LowerBandFeeSetting {
    #[default]
    Waived,
    Charged,
}

fn default_pool_type() -> String {
    "FX".to_string()
}

impl PoolRegistry {
    /// Load pool definitions from a file with an optional overlay file
    ///
    /// The format follows the file extension (`.toml` or `.json`). Overlay
    /// values replace base values key by key; `FXCURVE_` environment variables
    /// (e.g. `FXCURVE_DEFAULT_LOWER_BAND_FEE=charged`) are applied last.
    pub fn load(base_path: &Path, overlay: Option<&Path>) -> Result<Self> {
        info!("Loading pool definitions: {:?}", base_path);

        let mut builder = Config::builder().add_source(File::from(base_path).required(true));

        if let Some(overlay_path) = overlay {
            if overlay_path.exists() {
                info!("Loading pool overlay: {:?}", overlay_path);
                builder = builder.add_source(File::from(overlay_path));
            } else {
                warn!("Pool overlay not found: {:?}", overlay_path);
            }
        }

        builder = builder.add_source(Environment::with_prefix("FXCURVE").prefix_separator("_"));

        let config = builder
            .build()
            .context("Failed to build pool configuration")?;

        let mut registry: Self = config
            .try_deserialize()
            .context("Failed to deserialize pool configuration")?;

        registry.finalize()?;
        Ok(registry)
    }

    /// Parse a registry from an in-memory JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut registry: Self =
            serde_json::from_str(json).context("Failed to parse pool definitions")?;
        registry.finalize()?;
        Ok(registry)
    }

    /// Look a pool up by id or address (case-insensitive)
    pub fn get_pool(&self, key: &str) -> Option<&PoolConfig> {
        self.pools
            .iter()
            .find(|pool| {
                pool.id.eq_ignore_ascii_case(key) || pool.address.eq_ignore_ascii_case(key)
            })
    }

    /// Pools tagged as FX pools
    pub fn fx_pools(&self) -> impl Iterator<Item = &PoolConfig> {
        self.pools.iter().filter(|pool| pool.is_fx())
    }

    fn finalize(&mut self) -> Result<()> {
        let mut seen = HashSet::new();
        for pool in &mut self.pools {
            if !seen.insert(pool.id.to_ascii_lowercase()) {
                bail!("Duplicate pool id in definitions: {}", pool.id);
            }
            if pool.lower_band_fee.is_none() {
                pool.lower_band_fee = Some(self.default_lower_band_fee);
            }
            if pool.is_fx() && pool.tokens.len() != 2 {
                bail!(
                    "FX pool {} must have exactly two tokens, found {}",
                    pool.id,
                    pool.tokens.len()
                );
            }
            if pool.quote_token.is_none() {
                warn!("Pool {} has no quoteToken; it cannot be priced", pool.id);
            }
        }

        debug!("Loaded {} pool definitions", self.pools.len());
        Ok(())
    }
}

impl PoolConfig {
    pub fn is_fx(&self) -> bool {
        self.pool_type.eq_ignore_ascii_case("FX")
    }

    /// Find a leg by token address (case-insensitive)
    pub fn token(&self, address: &str) -> Option<&PoolTokenConfig> {
        self.tokens
            .iter()
            .find(|token| token.address.eq_ignore_ascii_case(address))
    }

    /// Resolved lower-band fee mode
    pub fn lower_band_fee(&self) -> LowerBandFeeSetting {
        self.lower_band_fee.unwrap_or_default()
    }
}

impl PoolTokenConfig {
    /// Latest oracle price, if the subgraph attached one
    pub fn latest_fx_price(&self) -> Option<&str> {
        self.token
            .as_ref()
            .and_then(|meta| meta.latest_fx_price.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const XSGD_USDC_JSON: &str = r#"{
        "pools": [{
            "id": "0x55bec22f8f6c69137ceaf284d9b441db1b9bfedc000200000000000000000416",
            "address": "0x55bec22f8f6c69137ceaf284d9b441db1b9bfedc",
            "poolType": "FX",
            "swapFee": "0",
            "totalShares": "10000000",
            "tokensList": [
                "0x2791bca1f2de4661ed88a30c99a7a9449aa84174",
                "0xdc3326e71d45186f113a2f448984ca0e8d201995"
            ],
            "alpha": "0.8",
            "beta": "0.48",
            "lambda": "0.3",
            "delta": "0.2734375",
            "epsilon": "0.0005",
            "quoteToken": "0x2791bca1f2de4661ed88a30c99a7a9449aa84174",
            "tokens": [
                {
                    "address": "0x2791bca1f2de4661ed88a30c99a7a9449aa84174",
                    "symbol": "USDC",
                    "balance": "4026113.6",
                    "decimals": 6,
                    "priceRate": "1",
                    "token": { "latestFXPrice": "1", "fxOracleDecimals": 8 }
                },
                {
                    "address": "0xdc3326e71d45186f113a2f448984ca0e8d201995",
                    "symbol": "XSGD",
                    "balance": "6101054.6",
                    "decimals": 6,
                    "priceRate": "1",
                    "token": { "latestFXPrice": "0.74310736", "fxOracleDecimals": 8 }
                }
            ]
        }]
    }"#;

    #[test]
    fn test_parse_subgraph_json() {
        let registry = PoolRegistry::from_json_str(XSGD_USDC_JSON).unwrap();
        assert_eq!(registry.pools.len(), 1);

        let pool = registry
            .get_pool("0x55BEC22F8F6C69137CEAF284D9B441DB1B9BFEDC")
            .unwrap();
        assert!(pool.is_fx());
        assert_eq!(pool.alpha.as_deref(), Some("0.8"));
        assert_eq!(pool.lower_band_fee(), LowerBandFeeSetting::Waived);

        let xsgd = pool.token("0xDC3326E71D45186F113A2F448984CA0E8D201995").unwrap();
        assert_eq!(xsgd.decimals, 6);
        assert_eq!(xsgd.latest_fx_price(), Some("0.74310736"));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pools.json");
        fs::write(&path, XSGD_USDC_JSON).unwrap();

        let registry = PoolRegistry::load(&path, None).unwrap();
        let pool = &registry.pools[0];
        assert_eq!(pool.quote_token.as_deref(), Some("0x2791bca1f2de4661ed88a30c99a7a9449aa84174"));
        assert_eq!(pool.tokens[1].symbol.as_deref(), Some("XSGD"));
        assert_eq!(
            pool.tokens[0].token.as_ref().unwrap().fx_oracle_decimals,
            Some(8)
        );
    }

    #[test]
    fn test_load_toml_with_overlay() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("pools.toml");
        let overlay = dir.path().join("overlay.toml");

        let base_content = r#"
[[pools]]
id = "eurs-usdc"
address = "0x0000000000000000000000000000000000000e05"
alpha = "0.8"
beta = "0.48"
lambda = "0.3"
delta = "0.273"
epsilon = "0.0005"
quoteToken = "0x0000000000000000000000000000000000000001"
lowerBandFee = "charged"

[[pools.tokens]]
address = "0x0000000000000000000000000000000000000001"
balance = "1000000"
decimals = 6

[pools.tokens.token]
latestFXPrice = "1"

[[pools.tokens]]
address = "0x0000000000000000000000000000000000000002"
balance = "900000"
decimals = 2

[pools.tokens.token]
latestFXPrice = "1.08"
"#;
        let overlay_content = r#"
default_lower_band_fee = "waived"
"#;
        fs::write(&base, base_content).unwrap();
        fs::write(&overlay, overlay_content).unwrap();

        let registry = PoolRegistry::load(&base, Some(&overlay)).unwrap();
        let pool = registry.get_pool("eurs-usdc").unwrap();
        assert_eq!(pool.pool_type, "FX");
        assert_eq!(pool.lower_band_fee(), LowerBandFeeSetting::Charged);
        assert_eq!(pool.tokens[1].decimals, 2);
        assert_eq!(pool.tokens[1].latest_fx_price(), Some("1.08"));
        assert_eq!(registry.fx_pools().count(), 1);
    }

    #[test]
    fn test_missing_overlay_is_not_fatal() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("pools.json");
        fs::write(&base, r#"{ "pools": [] }"#).unwrap();

        let registry = PoolRegistry::load(&base, Some(&dir.path().join("absent.json"))).unwrap();
        assert!(registry.pools.is_empty());
    }

    #[test]
    fn test_registry_default_applies_to_pools() {
        let json = XSGD_USDC_JSON.replacen(
            "\"pools\": [",
            "\"default_lower_band_fee\": \"charged\", \"pools\": [",
            1,
        );
        let registry = PoolRegistry::from_json_str(&json).unwrap();
        assert_eq!(registry.pools[0].lower_band_fee(), LowerBandFeeSetting::Charged);
    }

    #[test]
    fn test_rejects_bad_definitions() {
        let three_tokens = r#"{ "pools": [{
            "id": "p", "address": "0x01",
            "tokens": [
                { "address": "0x1", "balance": "1", "decimals": 6 },
                { "address": "0x2", "balance": "1", "decimals": 6 },
                { "address": "0x3", "balance": "1", "decimals": 6 }
            ]
        }]}"#;
        assert!(PoolRegistry::from_json_str(three_tokens).is_err());

        let duplicate = r#"{ "pools": [
            { "id": "p", "address": "0x01", "poolType": "Weighted" },
            { "id": "P", "address": "0x02", "poolType": "Weighted" }
        ]}"#;
        assert!(PoolRegistry::from_json_str(duplicate).is_err());

        assert!(PoolRegistry::load(Path::new("/nonexistent/pools.toml"), None).is_err());
    }
}
