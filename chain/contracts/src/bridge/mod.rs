//! Token bridge
//!
//! The two sides are never connected directly. An off-chain relayer watches
//! `TransferToPolygon` records on the origin side and answers with
//! `mint_to` on the destination side, and watches `TransferToEthereum`
//! records on the destination side and answers with `un_stake` on the origin
//! side. Replayed relayer calls are rejected by the ordinary preconditions
//! (remaining stake, balances), there is no separate idempotency key.

mod destination;
mod origin;

pub use destination::DestinationBridge;
pub use origin::OriginBridge;

use tracing::info;
use types::ids::Address;

use crate::context::CallContext;
use crate::errors::BridgeError;
use crate::events::{BlacklistUpdated, ContractEvent};
use crate::ledger::FungibleLedger;
use crate::security::{Blacklist, Ownable};

/// Owner-gated blacklist change shared by both bridge sides.
fn update_blacklist(
    ownable: &Ownable,
    blacklist: &mut Blacklist,
    events: &mut Vec<ContractEvent>,
    ctx: &CallContext,
    address: Address,
    listed: bool,
) -> Result<(), BridgeError> {
    ownable.ensure_owner(&ctx.caller, BridgeError::Unauthorized)?;
    ensure_no_value(ctx)?;
    let owner = ownable.owner();
    if listed {
        blacklist.add(&owner, address)?;
    } else {
        blacklist.remove(&owner, &address)?;
    }
    info!(?address, listed, "Blacklist updated");
    events.push(ContractEvent::BlacklistUpdated(BlacklistUpdated { address, listed }));
    Ok(())
}

fn ensure_no_value(ctx: &CallContext) -> Result<(), BridgeError> {
    if ctx.has_value() {
        return Err(BridgeError::NonPayable);
    }
    Ok(())
}

fn ensure_ledger(token: &Address, ledger: &impl FungibleLedger) -> Result<(), BridgeError> {
    if ledger.address() != *token {
        return Err(BridgeError::LedgerMismatch);
    }
    Ok(())
}
