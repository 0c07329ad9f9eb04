//! Fee rate type for the exchange
//!
//! A `FeeRate` is an 18-decimal fraction: `3 * 10^15` is 0.3%, `10^18` is
//! 100%. Owners configure it by passing a percentage that is itself
//! 18-decimal scaled (`10 * 10^18` for 10%); the stored rate is that
//! percentage divided by 100.

use serde::{Deserialize, Serialize};

use crate::errors::{FeeError, NumericError};
use crate::numeric::{mul_div, scale, U256};

/// Default fee: 0.3%.
const DEFAULT_FEE_RATE: u64 = 3_000_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(U256);

impl FeeRate {
    pub fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Validate a scaled percentage and rescale it to a fraction.
    ///
    /// `percentage` must be non-zero and at most `100 * 10^18`.
    pub fn from_percentage(percentage: U256) -> Result<Self, FeeError> {
        if percentage.is_zero() {
            return Err(FeeError::ZeroPercentage);
        }
        if percentage > U256::from(100) * scale() {
            return Err(FeeError::OutOfRange);
        }
        Ok(Self(percentage / U256::from(100)))
    }

    /// Stored 18-decimal fraction.
    pub fn raw(&self) -> U256 {
        self.0
    }

    /// Fee charged on `amount`: `amount * rate / 10^18`.
    pub fn fee_on(&self, amount: U256) -> Result<U256, NumericError> {
        mul_div(amount, self.0, scale())
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self(U256::from(DEFAULT_FEE_RATE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::whole_units;

    #[test]
    fn test_default_rate_is_point_three_percent() {
        let rate = FeeRate::default();
        assert_eq!(rate.raw(), U256::from(3_000_000_000_000_000u64));
        assert_eq!(rate.fee_on(whole_units(1000)).unwrap(), whole_units(3));
    }

    #[test]
    fn test_percentage_is_stored_divided_by_hundred() {
        let rate = FeeRate::from_percentage(whole_units(10)).unwrap();
        assert_eq!(rate.raw(), U256::from(100_000_000_000_000_000u64));
        assert_eq!(rate.fee_on(whole_units(7)).unwrap(), U256::from(700_000_000_000_000_000u64));
    }

    #[test]
    fn test_full_percentage_is_accepted() {
        let rate = FeeRate::from_percentage(whole_units(100)).unwrap();
        assert_eq!(rate.raw(), scale());
        assert_eq!(rate.fee_on(whole_units(2)).unwrap(), whole_units(2));
    }

    #[test]
    fn test_zero_percentage_rejected() {
        assert_eq!(FeeRate::from_percentage(U256::zero()), Err(FeeError::ZeroPercentage));
    }

    #[test]
    fn test_percentage_above_hundred_rejected() {
        // 100.001%
        let p = U256::from(100_001_000_000_000_000_000u128);
        assert_eq!(FeeRate::from_percentage(p), Err(FeeError::OutOfRange));
    }

    #[test]
    fn test_fee_rate_serialization() {
        let rate = FeeRate::default();
        let json = serde_json::to_string(&rate).unwrap();
        let back: FeeRate = serde_json::from_str(&json).unwrap();
        assert_eq!(rate, back);
    }
}
