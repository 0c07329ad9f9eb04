//! Contract Logic for the Token Bridge & Exchange
//!
//! This crate implements the on-chain contract layer: two fungible ledgers
//! (a capped origin token and a mintable wrapped token), a constant-product
//! exchange between native coin and the origin token, and the two sides of
//! the token bridge.
//!
//! # Modules
//! - `context`: Caller context and native-coin environment
//! - `events`: Contract events (audit log consumed by relayers)
//! - `errors`: Contract-specific error types
//! - `security`: Immutable ownership and blacklist
//! - `config`: Deployment configuration
//! - `ledger`: Fungible ledgers and the traits other contracts hold them by
//! - `exchange`: Constant-product pricing, fees, deposits, vault changes
//! - `bridge`: Origin staking and destination mint/burn
//!
//! # Version
//! v0.1.0

pub mod bridge;
pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod exchange;
pub mod ledger;
pub mod security;

/// Contract ABI version, frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
