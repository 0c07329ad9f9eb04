//! Identifier types for accounts and transactions
//!
//! Accounts (externally owned wallets and contracts alike) are 20-byte
//! addresses. Transactions executed by the harness get a UUID v7 so receipts
//! sort chronologically.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use ethers_core::types::Address;

/// The zero address. Never holds a balance and is rejected as a recipient.
pub fn zero_address() -> Address {
    Address::zero()
}

/// Deterministic address derived from a small integer.
///
/// Used for contract address allocation and for test wallets.
pub fn address_from_index(index: u64) -> Address {
    Address::from_low_u64_be(index)
}

/// Unique identifier for an executed transaction
///
/// Uses UUID v7 for time-based sorting of receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(Uuid);

impl TxId {
    /// Create a new TxId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
