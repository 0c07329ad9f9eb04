//! Deployment configuration
//!
//! Human-facing amounts are decimals in whole units and are converted to
//! 18-decimal base units when a contract is deployed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::errors::NumericError;
use types::fee::FeeRate;
use types::numeric::{to_base_units, U256};

use crate::errors::ExchangeError;

/// Exchange engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Initial fee in percent (0.3 = 0.3%)
    pub fee_percentage: Decimal,
    /// Fees must exceed this many native units before they can be withdrawn
    pub fee_withdrawal_threshold: Decimal,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            fee_percentage: Decimal::new(3, 1),
            fee_withdrawal_threshold: Decimal::new(5, 1),
        }
    }
}

impl ExchangeConfig {
    /// Initial fee rate, validated like an owner-supplied percentage.
    pub fn fee_rate(&self) -> Result<FeeRate, ExchangeError> {
        let scaled = to_base_units(self.fee_percentage)?;
        Ok(FeeRate::from_percentage(scaled)?)
    }

    pub fn withdrawal_threshold(&self) -> Result<U256, NumericError> {
        to_base_units(self.fee_withdrawal_threshold)
    }
}

/// Token metadata and supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    /// Whole units. Ignored by the wrapped token, which starts empty.
    #[serde(default)]
    pub max_supply: Decimal,
}

impl TokenConfig {
    pub fn origin() -> Self {
        Self {
            name: "ERC20_Ethereum".to_string(),
            symbol: "TETH".to_string(),
            max_supply: Decimal::from(1_000_000),
        }
    }

    pub fn wrapped() -> Self {
        Self {
            name: "ERC20_Polygon".to_string(),
            symbol: "TPOL".to_string(),
            max_supply: Decimal::ZERO,
        }
    }

    pub fn max_supply_units(&self) -> Result<U256, NumericError> {
        to_base_units(self.max_supply)
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::origin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::numeric::whole_units;

    #[test]
    fn test_default_exchange_config() {
        let config = ExchangeConfig::default();
        assert_eq!(
            config.fee_rate().unwrap().raw(),
            U256::from(3_000_000_000_000_000u64)
        );
        assert_eq!(
            config.withdrawal_threshold().unwrap(),
            U256::from(500_000_000_000_000_000u64)
        );
    }

    #[test]
    fn test_exchange_config_from_json() {
        let config: ExchangeConfig = serde_json::from_str(r#"{"fee_percentage":"10"}"#).unwrap();
        assert_eq!(config.fee_percentage, Decimal::from(10));
        assert_eq!(config.fee_withdrawal_threshold, Decimal::new(5, 1));
        assert_eq!(
            config.fee_rate().unwrap().raw(),
            U256::from(100_000_000_000_000_000u64)
        );
    }

    #[test]
    fn test_exchange_config_rejects_zero_fee() {
        let config = ExchangeConfig {
            fee_percentage: Decimal::ZERO,
            ..Default::default()
        };
        assert!(matches!(config.fee_rate(), Err(ExchangeError::Fee(_))));
    }

    #[test]
    fn test_token_config_supply() {
        let config = TokenConfig::origin();
        assert_eq!(config.max_supply_units().unwrap(), whole_units(1_000_000));
        assert_eq!(TokenConfig::wrapped().max_supply_units().unwrap(), U256::zero());
    }
}
