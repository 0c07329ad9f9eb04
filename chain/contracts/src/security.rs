//! Shared security primitives for contract modules
//!
//! Provides the immutable ownership gate and the per-contract blacklist used
//! by the exchange and both bridge sides.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use types::ids::Address;

use crate::errors::BlacklistError;

/// Privileged owner, fixed at construction. There is no transfer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    /// Reject `caller` with `err` unless it is the owner.
    pub fn ensure_owner<E>(&self, caller: &Address, err: E) -> Result<(), E> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            warn!(?caller, owner = ?self.owner, "Rejected privileged call");
            Err(err)
        }
    }
}

/// Deny-list of addresses barred from staking, minting or unstaking.
///
/// Duplicate adds and removals of unknown entries are rejected rather than
/// treated as no-ops. The owner can never be listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blacklist {
    entries: HashSet<Address>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.entries.contains(address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, owner: &Address, address: Address) -> Result<(), BlacklistError> {
        if address.is_zero() {
            return Err(BlacklistError::ZeroAddress);
        }
        if address == *owner {
            return Err(BlacklistError::OwnerAddress);
        }
        if !self.entries.insert(address) {
            return Err(BlacklistError::AlreadyListed);
        }
        Ok(())
    }

    pub fn remove(&mut self, owner: &Address, address: &Address) -> Result<(), BlacklistError> {
        if address.is_zero() {
            return Err(BlacklistError::ZeroAddress);
        }
        if address == owner {
            return Err(BlacklistError::OwnerAddress);
        }
        if !self.entries.remove(address) {
            return Err(BlacklistError::NotListed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::address_from_index;

    #[test]
    fn test_ownable_gate() {
        let owner = address_from_index(1);
        let other = address_from_index(2);
        let gate = Ownable::new(owner);
        assert!(gate.ensure_owner(&owner, "denied").is_ok());
        assert_eq!(gate.ensure_owner(&other, "denied"), Err("denied"));
        assert_eq!(gate.owner(), owner);
    }

    #[test]
    fn test_blacklist_add_remove() {
        let owner = address_from_index(1);
        let target = address_from_index(2);
        let mut list = Blacklist::new();
        list.add(&owner, target).unwrap();
        assert!(list.contains(&target));
        assert_eq!(list.len(), 1);
        list.remove(&owner, &target).unwrap();
        assert!(!list.contains(&target));
        assert!(list.is_empty());
    }

    #[test]
    fn test_blacklist_rejects_duplicates() {
        let owner = address_from_index(1);
        let target = address_from_index(2);
        let mut list = Blacklist::new();
        list.add(&owner, target).unwrap();
        assert_eq!(list.add(&owner, target), Err(BlacklistError::AlreadyListed));
        list.remove(&owner, &target).unwrap();
        assert_eq!(list.remove(&owner, &target), Err(BlacklistError::NotListed));
    }

    #[test]
    fn test_blacklist_rejects_zero_and_owner() {
        let owner = address_from_index(1);
        let mut list = Blacklist::new();
        assert_eq!(list.add(&owner, Address::zero()), Err(BlacklistError::ZeroAddress));
        assert_eq!(list.add(&owner, owner), Err(BlacklistError::OwnerAddress));
        assert_eq!(
            list.remove(&owner, &Address::zero()),
            Err(BlacklistError::ZeroAddress)
        );
        assert!(list.is_empty());
    }
}
