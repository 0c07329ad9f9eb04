//! Destination-side bridge: mints wrapped tokens on relayer order and burns
//! them when holders send value back to the origin chain.

use tracing::{debug, info};
use types::ids::Address;
use types::numeric::U256;

use super::{ensure_ledger, ensure_no_value, update_blacklist};
use crate::context::{CallContext, Environment};
use crate::errors::BridgeError;
use crate::events::{ContractEvent, MintOrder, TransferToEthereum};
use crate::ledger::Mintable;
use crate::security::{Blacklist, Ownable};

#[derive(Debug, Clone)]
pub struct DestinationBridge {
    address: Address,
    ownable: Ownable,
    token: Address,
    blacklist: Blacklist,
    events: Vec<ContractEvent>,
}

impl DestinationBridge {
    /// The token may not be the zero address or the deployer itself.
    pub fn deploy(
        env: &mut impl Environment,
        ctx: &CallContext,
        address: Address,
        token: Address,
    ) -> Result<Self, BridgeError> {
        ensure_no_value(ctx)?;
        if token.is_zero() || token == ctx.caller {
            return Err(BridgeError::InvalidTokenAddress);
        }
        if !env.is_contract(&token) {
            return Err(BridgeError::TokenNotContract);
        }
        env.register_contract(address);
        info!(?address, ?token, owner = ?ctx.caller, "Destination bridge deployed");

        Ok(Self {
            address,
            ownable: Ownable::new(ctx.caller),
            token,
            blacklist: Blacklist::new(),
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

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    /// Mint `amount` wrapped tokens to `to`. Owner only.
    pub fn mint_to(
        &mut self,
        ledger: &mut impl Mintable,
        ctx: &CallContext,
        to: Address,
        amount: U256,
    ) -> Result<(), BridgeError> {
        self.ownable
            .ensure_owner(&ctx.caller, BridgeError::Unauthorized)?;
        ensure_no_value(ctx)?;
        ensure_ledger(&self.token, ledger)?;
        if to.is_zero() {
            return Err(BridgeError::ZeroRecipient);
        }
        if self.blacklist.contains(&to) {
            return Err(BridgeError::RecipientBlacklisted);
        }
        if amount.is_zero() {
            return Err(BridgeError::ZeroTokenAmount);
        }

        ledger.mint(&CallContext::new(self.address), to, amount)?;

        info!(?to, %amount, "Mint order fulfilled");
        self.events
            .push(ContractEvent::MintOrder(MintOrder { to, amount }));
        Ok(())
    }

    /// Pull `amount` from the caller and burn it, signalling an origin unstake.
    ///
    /// The caller must have approved the bridge for `amount`.
    pub fn transfer_to_ethereum(
        &mut self,
        ledger: &mut impl Mintable,
        ctx: &CallContext,
        amount: U256,
    ) -> Result<(), BridgeError> {
        ensure_no_value(ctx)?;
        ensure_ledger(&self.token, ledger)?;
        if amount.is_zero() {
            return Err(BridgeError::ZeroTokenAmount);
        }
        if self.blacklist.contains(&ctx.caller) {
            return Err(BridgeError::SenderBlacklisted);
        }
        let available = ledger.balance_of(&ctx.caller);
        if available < amount {
            return Err(BridgeError::ExceedsBalance {
                required: amount,
                available,
            });
        }

        let bridge = CallContext::new(self.address);
        ledger.transfer_from(&bridge, ctx.caller, self.address, amount)?;
        ledger.burn(&bridge, amount)?;

        debug!(from = ?ctx.caller, %amount, "Wrapped tokens burned for return");
        self.events
            .push(ContractEvent::TransferToEthereum(TransferToEthereum {
                from: ctx.caller,
                amount,
            }));
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
