//! Execution context and native-coin environment
//!
//! Contracts never read an ambient "message sender". Each state-changing
//! operation receives a [`CallContext`] carrying the caller and the native
//! value attached to the call, plus an [`Environment`] handle for native-coin
//! balances and code lookups.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use types::ids::Address;
use types::numeric::{checked_add, checked_sub, U256};

use crate::errors::EnvError;

/// Identity of the signer and value attached to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
    pub value: U256,
}

impl CallContext {
    /// A call without attached value.
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: U256::zero(),
        }
    }

    /// A payable call.
    pub fn with_value(caller: Address, value: U256) -> Self {
        Self { caller, value }
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_zero()
    }
}

/// Chain-level facilities a contract depends on.
pub trait Environment {
    /// Whether code is deployed at `address`.
    fn is_contract(&self, address: &Address) -> bool;

    /// Mark `address` as holding code. Called by contract constructors.
    fn register_contract(&mut self, address: Address);

    fn native_balance(&self, address: &Address) -> U256;

    /// Move native coin. Fails without side effects if `from` is short.
    fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), EnvError>;
}

/// In-memory native-coin ledger and code registry.
#[derive(Debug, Clone, Default)]
pub struct Bank {
    balances: HashMap<Address, U256>,
    contracts: HashSet<Address>,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit genesis funds to an account.
    pub fn fund(&mut self, address: Address, amount: U256) -> Result<(), EnvError> {
        let current = self.native_balance(&address);
        self.balances.insert(address, checked_add(current, amount)?);
        Ok(())
    }

    /// Sum of all native balances.
    pub fn total_supply(&self) -> U256 {
        self.balances
            .values()
            .fold(U256::zero(), |acc, b| acc.saturating_add(*b))
    }
}

impl Environment for Bank {
    fn is_contract(&self, address: &Address) -> bool {
        self.contracts.contains(address)
    }

    fn register_contract(&mut self, address: Address) {
        self.contracts.insert(address);
    }

    fn native_balance(&self, address: &Address) -> U256 {
        self.balances.get(address).copied().unwrap_or_default()
    }

    fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), EnvError> {
        let available = self.native_balance(&from);
        if available < amount {
            return Err(EnvError::InsufficientNativeBalance {
                required: amount,
                available,
            });
        }
        if from == to || amount.is_zero() {
            return Ok(());
        }
        let debited = checked_sub(available, amount)?;
        let credited = checked_add(self.native_balance(&to), amount)?;
        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        debug!(?from, ?to, %amount, "Native transfer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::address_from_index;

    #[test]
    fn test_call_context_value() {
        let caller = address_from_index(1);
        assert!(!CallContext::new(caller).has_value());
        assert!(CallContext::with_value(caller, U256::one()).has_value());
    }

    #[test]
    fn test_bank_fund_and_transfer() {
        let mut bank = Bank::new();
        let a = address_from_index(1);
        let b = address_from_index(2);
        bank.fund(a, U256::from(100)).unwrap();
        bank.transfer_native(a, b, U256::from(40)).unwrap();
        assert_eq!(bank.native_balance(&a), U256::from(60));
        assert_eq!(bank.native_balance(&b), U256::from(40));
        assert_eq!(bank.total_supply(), U256::from(100));
    }

    #[test]
    fn test_bank_transfer_insufficient() {
        let mut bank = Bank::new();
        let a = address_from_index(1);
        let b = address_from_index(2);
        bank.fund(a, U256::from(10)).unwrap();
        let result = bank.transfer_native(a, b, U256::from(11));
        assert!(matches!(result, Err(EnvError::InsufficientNativeBalance { .. })));
        assert_eq!(bank.native_balance(&a), U256::from(10));
        assert_eq!(bank.native_balance(&b), U256::zero());
    }

    #[test]
    fn test_bank_contract_registry() {
        let mut bank = Bank::new();
        let c = address_from_index(100);
        assert!(!bank.is_contract(&c));
        bank.register_contract(c);
        assert!(bank.is_contract(&c));
    }

    #[test]
    fn test_bank_fund_overflow() {
        let mut bank = Bank::new();
        let a = address_from_index(1);
        bank.fund(a, U256::MAX).unwrap();
        assert!(bank.fund(a, U256::one()).is_err());
        assert_eq!(bank.native_balance(&a), U256::MAX);
    }
}
