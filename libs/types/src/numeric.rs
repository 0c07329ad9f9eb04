//! 256-bit amounts and 18-decimal fixed-point arithmetic
//!
//! Every balance, reserve and fee is a `U256` in base units (10^-18 of a
//! whole unit). Products are always computed multiply-before-divide with
//! checked multiplication, and divisors are checked before dividing.

use rust_decimal::Decimal;

use crate::errors::NumericError;

pub use ethers_core::types::U256;

/// Number of decimals used by every ledger and by the fixed-point scale.
pub const DECIMALS: u32 = 18;

/// `10^18`, the fixed-point scale.
pub fn scale() -> U256 {
    U256::exp10(DECIMALS as usize)
}

/// `n` whole units expressed in base units.
pub fn whole_units(n: u64) -> U256 {
    U256::from(n) * scale()
}

pub fn checked_add(a: U256, b: U256) -> Result<U256, NumericError> {
    a.checked_add(b).ok_or(NumericError::Overflow)
}

pub fn checked_sub(a: U256, b: U256) -> Result<U256, NumericError> {
    a.checked_sub(b).ok_or(NumericError::Underflow)
}

/// `a * b / denominator`, rounded down.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, NumericError> {
    if denominator.is_zero() {
        return Err(NumericError::DivisionByZero);
    }
    let product = a.checked_mul(b).ok_or(NumericError::Overflow)?;
    Ok(product / denominator)
}

/// `a * b / denominator`, rounded up.
pub fn mul_div_ceil(a: U256, b: U256, denominator: U256) -> Result<U256, NumericError> {
    if denominator.is_zero() {
        return Err(NumericError::DivisionByZero);
    }
    let product = a.checked_mul(b).ok_or(NumericError::Overflow)?;
    let quotient = product / denominator;
    if (product % denominator).is_zero() {
        Ok(quotient)
    } else {
        checked_add(quotient, U256::one())
    }
}

/// Convert a human-unit decimal (e.g. `"100.001"`) to base units.
///
/// Rejects negative values and values with more than 18 decimals.
pub fn to_base_units(amount: Decimal) -> Result<U256, NumericError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(NumericError::NegativeAmount(amount.to_string()));
    }
    let normalized = amount.normalize();
    let decimals = normalized.scale();
    if decimals > DECIMALS {
        return Err(NumericError::PrecisionLoss {
            value: amount.to_string(),
            max_decimals: DECIMALS,
        });
    }
    let mantissa = U256::from(normalized.mantissa().unsigned_abs());
    mantissa
        .checked_mul(U256::exp10((DECIMALS - decimals) as usize))
        .ok_or(NumericError::Overflow)
}

/// Convert base units back to a human-unit decimal, for reporting.
pub fn from_base_units(amount: U256) -> Result<Decimal, NumericError> {
    if amount > U256::from(i128::MAX as u128) {
        return Err(NumericError::OutOfRange(amount.to_string()));
    }
    let raw = amount.as_u128() as i128;
    Decimal::try_from_i128_with_scale(raw, DECIMALS)
        .map(|d| d.normalize())
        .map_err(|_| NumericError::OutOfRange(amount.to_string()))
}
