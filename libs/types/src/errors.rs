//! Error types shared by every contract
//!
//! Arithmetic and fee-configuration failures. Contract crates wrap these
//! with `#[from]` in their own taxonomies.

use thiserror::Error;

/// Fixed-point and integer arithmetic errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Arithmetic underflow")]
    Underflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(String),

    #[error("Amount has more than {max_decimals} decimals: {value}")]
    PrecisionLoss { value: String, max_decimals: u32 },

    #[error("Amount out of representable range: {0}")]
    OutOfRange(String),
}

/// Fee percentage validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeeError {
    #[error("Invalid _percentage value")]
    ZeroPercentage,

    #[error("Invalid _percentage value. Must be value between 0% - 100%")]
    OutOfRange,
}
