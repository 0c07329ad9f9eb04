//! Simulation configuration
//!
//! Every amount is a decimal in whole units. The harness converts to base
//! units when it seeds the chain.

use contracts::config::{ExchangeConfig, TokenConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::ChainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for every randomized scenario
    pub seed: u64,
    /// Number of funded trading accounts
    pub trader_count: u64,
    /// Native coin given to each trader
    pub trader_ether: Decimal,
    /// Origin tokens given to each trader
    pub trader_tokens: Decimal,
    /// Tokens the deployer pulls into the vault at exchange deployment.
    /// The vault is pre-funded with the same amount.
    pub seed_tokens: Decimal,
    /// Native coin attached to the exchange deployment
    pub seed_ether: Decimal,
    /// Largest single swap, in tokens
    pub max_trade_tokens: u64,
    /// Swaps per swap-sequence run
    pub swap_steps: usize,
    /// Stake/burn rounds per bridge round-trip run
    pub bridge_rounds: usize,
    /// Seconds between blocks
    pub block_time_secs: i64,
    pub origin_token: TokenConfig,
    pub wrapped_token: TokenConfig,
    pub exchange: ExchangeConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            trader_count: 4,
            trader_ether: Decimal::from(1_000),
            trader_tokens: Decimal::from(10_000),
            seed_tokens: Decimal::from(50),
            seed_ether: Decimal::from(5),
            max_trade_tokens: 20,
            swap_steps: 200,
            bridge_rounds: 25,
            block_time_secs: 12,
            origin_token: TokenConfig::origin(),
            wrapped_token: TokenConfig::wrapped(),
            exchange: ExchangeConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ChainError> {
        Ok(serde_json::from_str(json)?)
    }
}
