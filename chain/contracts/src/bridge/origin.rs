//! Origin-side bridge: escrows tokens and tracks per-account stake.

use std::collections::HashMap;

use tracing::{debug, info};
use types::ids::Address;
use types::numeric::{checked_add, checked_sub, U256};

use super::{ensure_ledger, ensure_no_value, update_blacklist};
use crate::context::{CallContext, Environment};
use crate::errors::BridgeError;
use crate::events::{ContractEvent, TransferToPolygon, UnStake};
use crate::ledger::CappedSupply;
use crate::security::{Blacklist, Ownable};

#[derive(Debug, Clone)]
pub struct OriginBridge {
    address: Address,
    ownable: Ownable,
    token: Address,
    blacklist: Blacklist,
    stakes: HashMap<Address, U256>,
    total_staked: U256,
    events: Vec<ContractEvent>,
}

impl OriginBridge {
    pub fn deploy(
        env: &mut impl Environment,
        ctx: &CallContext,
        address: Address,
        token: Address,
    ) -> Result<Self, BridgeError> {
        ensure_no_value(ctx)?;
        if token.is_zero() {
            return Err(BridgeError::ZeroTokenAddress);
        }
        if !env.is_contract(&token) {
            return Err(BridgeError::TokenNotContract);
        }
        env.register_contract(address);
        info!(?address, ?token, owner = ?ctx.caller, "Origin bridge deployed");

        Ok(Self {
            address,
            ownable: Ownable::new(ctx.caller),
            token,
            blacklist: Blacklist::new(),
            stakes: HashMap::new(),
            total_staked: U256::zero(),
            events: Vec::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.ownable.owner()
    }

    pub fn token(&self) -> Address {
        self.token
    }

    pub fn is_blacklisted(&self, address: &Address) -> bool {
        self.blacklist.contains(address)
    }

    pub fn stake_of(&self, owner: &Address) -> U256 {
        self.stakes.get(owner).copied().unwrap_or_default()
    }

    /// Sum of all outstanding stakes.
    pub fn total_staked(&self) -> U256 {
        self.total_staked
    }

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    /// Escrow `amount` of the caller's tokens and record the stake.
    ///
    /// The caller must have approved the bridge for `amount`.
    pub fn transfer_to_polygon(
        &mut self,
        ledger: &mut impl CappedSupply,
        ctx: &CallContext,
        amount: U256,
    ) -> Result<(), BridgeError> {
        ensure_no_value(ctx)?;
        ensure_ledger(&self.token, ledger)?;
        if amount.is_zero() {
            return Err(BridgeError::ZeroTokenAmount);
        }
        let max_supply = ledger.max_supply();
        if max_supply.is_zero() {
            return Err(BridgeError::ZeroMaxSupply);
        }
        if amount > max_supply {
            return Err(BridgeError::ExceedsMaxSupply);
        }
        if self.blacklist.contains(&ctx.caller) {
            return Err(BridgeError::SenderBlacklisted);
        }
        let available = ledger.balance_of(&ctx.caller);
        if available < amount {
            return Err(BridgeError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        let stake_after = checked_add(self.stake_of(&ctx.caller), amount)?;
        let total_after = checked_add(self.total_staked, amount)?;

        ledger.transfer_from(&CallContext::new(self.address), ctx.caller, self.address, amount)?;
        self.stakes.insert(ctx.caller, stake_after);
        self.total_staked = total_after;

        debug!(from = ?ctx.caller, %amount, stake = %stake_after, "Tokens staked");
        self.events
            .push(ContractEvent::TransferToPolygon(TransferToPolygon {
                from: ctx.caller,
                amount,
            }));
        Ok(())
    }

    /// Release `amount` of `owner`'s stake after a confirmed destination burn.
    ///
    /// Escrowed tokens stay with the bridge; only the stake record changes.
    pub fn un_stake(
        &mut self,
        ctx: &CallContext,
        owner: Address,
        amount: U256,
    ) -> Result<(), BridgeError> {
        self.ownable
            .ensure_owner(&ctx.caller, BridgeError::Unauthorized)?;
        ensure_no_value(ctx)?;
        if owner.is_zero() {
            return Err(BridgeError::ZeroOwner);
        }
        if self.blacklist.contains(&owner) {
            return Err(BridgeError::OwnerBlacklisted);
        }
        let staked = self.stake_of(&owner);
        if staked.is_zero() {
            return Err(BridgeError::NoStake);
        }
        if amount.is_zero() {
            return Err(BridgeError::ZeroTokenAmount);
        }
        if amount > staked {
            return Err(BridgeError::ExceedsStake {
                requested: amount,
                staked,
            });
        }
        let stake_after = staked - amount;
        let total_after = checked_sub(self.total_staked, amount)?;

        self.stakes.insert(owner, stake_after);
        self.total_staked = total_after;

        info!(?owner, %amount, remaining = %stake_after, "Stake released");
        self.events
            .push(ContractEvent::UnStake(UnStake { owner, amount }));
        Ok(())
    }

    pub fn add_address_to_black_list(
        &mut self,
        ctx: &CallContext,
        address: Address,
    ) -> Result<(), BridgeError> {
        update_blacklist(
            &self.ownable,
            &mut self.blacklist,
            &mut self.events,
            ctx,
            address,
            true,
        )
    }

    pub fn remove_address_from_black_list(
        &mut self,
        ctx: &CallContext,
        address: Address,
    ) -> Result<(), BridgeError> {
        update_blacklist(
            &self.ownable,
            &mut self.blacklist,
            &mut self.events,
            ctx,
            address,
            false,
        )
    }
}
