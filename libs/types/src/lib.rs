//! Types library for the token bridge and exchange contracts
//!
//! This library provides the primitive types shared by the contract layer and
//! the simulation harness, so that every component agrees on amount width,
//! address format and fixed-point scaling.
//!
//! # Modules
//! - `ids`: Account addresses and transaction identifiers
//! - `numeric`: 256-bit amounts, 18-decimal fixed-point helpers, unit conversion
//! - `fee`: Fee rate type and percentage rescaling
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod fee;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::fee::*;
    pub use crate::errors::*;
}
