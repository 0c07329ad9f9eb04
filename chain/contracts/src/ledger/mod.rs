//! Fungible ledgers
//!
//! Balance and allowance bookkeeping shared by the origin token (capped,
//! fully minted to the deployer) and the destination wrapped token (minted
//! and burned on demand). The exchange and the bridges hold these ledgers
//! through the traits below and only ever mutate them through the same
//! checked entry points any wallet would use.

pub use origin::OriginToken;
pub use wrapped::WrappedToken;

use std::collections::HashMap;

use tracing::debug;
use types::ids::Address;
use types::numeric::{checked_add, checked_sub, U256};

use crate::context::CallContext;
use crate::errors::LedgerError;
use crate::events::{Approval, Burn, ContractEvent, Transfer};

/// Token decimals for every ledger in the system.
pub const TOKEN_DECIMALS: u8 = 18;

/// Account balances and allowances with the standard transfer rules.
pub trait FungibleLedger {
    /// Address the ledger is deployed at.
    fn address(&self) -> Address;

    fn name(&self) -> &str;

    fn symbol(&self) -> &str;

    fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    fn total_supply(&self) -> U256;

    fn balance_of(&self, owner: &Address) -> U256;

    fn allowance(&self, owner: &Address, spender: &Address) -> U256;

    fn transfer(&mut self, ctx: &CallContext, to: Address, amount: U256)
        -> Result<(), LedgerError>;

    fn approve(
        &mut self,
        ctx: &CallContext,
        spender: Address,
        amount: U256,
    ) -> Result<(), LedgerError>;

    fn transfer_from(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError>;

    /// Emitted events, oldest first.
    fn events(&self) -> &[ContractEvent];

    /// Take ownership of the emitted events, leaving the log empty.
    fn drain_events(&mut self) -> Vec<ContractEvent>;
}

/// A ledger whose supply is fixed at deployment.
pub trait CappedSupply: FungibleLedger {
    fn max_supply(&self) -> U256;
}

/// A ledger with open mint and caller-side burn.
pub trait Mintable: FungibleLedger {
    fn mint(&mut self, ctx: &CallContext, to: Address, amount: U256) -> Result<(), LedgerError>;

    fn burn(&mut self, ctx: &CallContext, amount: U256) -> Result<(), LedgerError>;
}

/// Balance and allowance tables plus the event log.
///
/// Every mutating method validates fully before touching state, so a
/// rejected call leaves the book unchanged.
#[derive(Debug, Clone, Default)]
pub struct LedgerBook {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    total_supply: U256,
    events: Vec<ContractEvent>,
}

impl LedgerBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn balance_of(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Transfers ─────────────────────────

    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroRecipient);
        }
        if to == caller {
            return Err(LedgerError::SelfTransfer);
        }
        self.move_balance(caller, to, amount)
    }

    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        if spender.is_zero() {
            return Err(LedgerError::ZeroSpender);
        }
        let available = self.balance_of(&caller);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        if !amount.is_zero() && !self.allowance(&caller, &spender).is_zero() {
            return Err(LedgerError::AllowanceNotReset);
        }

        self.allowances.insert((caller, spender), amount);
        self.events.push(ContractEvent::Approval(Approval {
            owner: caller,
            spender,
            value: amount,
        }));
        Ok(())
    }

    /// Move `amount` from `from` to `to` on behalf of `caller`.
    ///
    /// The allowance is neither checked nor consumed when `caller == from`.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        if from.is_zero() {
            return Err(LedgerError::ZeroSender);
        }
        if to.is_zero() {
            return Err(LedgerError::ZeroRecipient);
        }
        if to == from {
            return Err(LedgerError::SelfTransfer);
        }
        let available = self.balance_of(&from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        let remaining_allowance = if caller == from {
            None
        } else {
            let allowed = self.allowance(&from, &caller);
            if allowed < amount {
                return Err(LedgerError::InsufficientAllowance {
                    required: amount,
                    available: allowed,
                });
            }
            Some(checked_sub(allowed, amount)?)
        };

        self.move_balance(from, to, amount)?;
        if let Some(remaining) = remaining_allowance {
            self.allowances.insert((from, caller), remaining);
        }
        Ok(())
    }

    // ───────────────────────── Supply ─────────────────────────

    pub fn mint(&mut self, to: Address, amount: U256) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroMintRecipient);
        }
        if amount.is_zero() {
            return Err(LedgerError::ZeroMint);
        }
        self.credit_new_supply(to, amount)
    }

    /// Create supply without the non-zero amount rule. Used by constructors.
    pub(crate) fn credit_new_supply(&mut self, to: Address, amount: U256) -> Result<(), LedgerError> {
        let supply = checked_add(self.total_supply, amount)?;
        let balance = checked_add(self.balance_of(&to), amount)?;
        self.total_supply = supply;
        self.balances.insert(to, balance);
        self.events.push(ContractEvent::Transfer(Transfer {
            from: Address::zero(),
            to,
            value: amount,
        }));
        Ok(())
    }

    pub fn burn(&mut self, caller: Address, amount: U256) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroBurn);
        }
        let available = self.balance_of(&caller);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        let supply = checked_sub(self.total_supply, amount)?;
        self.balances.insert(caller, available - amount);
        self.total_supply = supply;
        self.events.push(ContractEvent::Burn(Burn {
            from: caller,
            to: caller,
            value: amount,
        }));
        Ok(())
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        let available = self.balance_of(&from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        let debited = checked_sub(available, amount)?;
        let credited = checked_add(self.balance_of(&to), amount)?;
        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        self.events.push(ContractEvent::Transfer(Transfer {
            from,
            to,
            value: amount,
        }));
        debug!(?from, ?to, %amount, "Token transfer");
        Ok(())
    }
}

/// Implements [`FungibleLedger`] for a token struct with `address`, `name`,
/// `symbol` and `book: LedgerBook` fields.
macro_rules! impl_fungible_ledger {
    ($token:ty) => {
        impl $crate::ledger::FungibleLedger for $token {
            fn address(&self) -> ::types::ids::Address {
                self.address
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn symbol(&self) -> &str {
                &self.symbol
            }

            fn total_supply(&self) -> ::types::numeric::U256 {
                self.book.total_supply()
            }

            fn balance_of(&self, owner: &::types::ids::Address) -> ::types::numeric::U256 {
                self.book.balance_of(owner)
            }

            fn allowance(
                &self,
                owner: &::types::ids::Address,
                spender: &::types::ids::Address,
            ) -> ::types::numeric::U256 {
                self.book.allowance(owner, spender)
            }

            fn transfer(
                &mut self,
                ctx: &$crate::context::CallContext,
                to: ::types::ids::Address,
                amount: ::types::numeric::U256,
            ) -> Result<(), $crate::errors::LedgerError> {
                self.book.transfer(ctx.caller, to, amount)
            }

            fn approve(
                &mut self,
                ctx: &$crate::context::CallContext,
                spender: ::types::ids::Address,
                amount: ::types::numeric::U256,
            ) -> Result<(), $crate::errors::LedgerError> {
                self.book.approve(ctx.caller, spender, amount)
            }

            fn transfer_from(
                &mut self,
                ctx: &$crate::context::CallContext,
                from: ::types::ids::Address,
                to: ::types::ids::Address,
                amount: ::types::numeric::U256,
            ) -> Result<(), $crate::errors::LedgerError> {
                self.book.transfer_from(ctx.caller, from, to, amount)
            }

            fn events(&self) -> &[$crate::events::ContractEvent] {
                self.book.events()
            }

            fn drain_events(&mut self) -> Vec<$crate::events::ContractEvent> {
                self.book.drain_events()
            }
        }
    };
}

mod origin;
mod wrapped;

/// Validate token metadata shared by both token constructors.
pub(crate) fn validate_metadata(name: &str, symbol: &str) -> Result<(), LedgerError> {
    if name.is_empty() {
        return Err(LedgerError::EmptyName);
    }
    if symbol.is_empty() {
        return Err(LedgerError::EmptySymbol);
    }
    Ok(())
}
