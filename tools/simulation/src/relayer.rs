//! Bridge relayer
//!
//! Mirrors bridge records from one side onto the other. Escrow records on the
//! origin side become `mint_to` calls on the destination side; burn records
//! on the destination side become `un_stake` calls on the origin side.

use contracts::context::CallContext;
use contracts::events::ContractEvent;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use types::ids::Address;
use types::numeric::U256;

use crate::chain::{Chain, ChainError};

/// Outcome of one relay pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayReport {
    pub minted: u64,
    pub released: u64,
    pub rejected: Vec<String>,
}

/// Follows the chain's event log from a cursor.
#[derive(Debug, Clone, Default)]
pub struct Relayer {
    cursor: usize,
}

impl Relayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next unprocessed log entry.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Process every log entry committed since the last pass.
    ///
    /// Rejected relay calls are reported, not retried.
    pub fn relay(&mut self, chain: &mut Chain) -> RelayReport {
        let pending: Vec<ContractEvent> = chain.event_log()[self.cursor..]
            .iter()
            .map(|logged| logged.event.clone())
            .collect();
        self.cursor += pending.len();

        let mut report = RelayReport::default();
        for event in pending {
            match event {
                ContractEvent::TransferToPolygon(order) => {
                    match mint(chain, order.from, order.amount) {
                        Ok(()) => report.minted += 1,
                        Err(err) => reject(&mut report, "mintTo", err),
                    }
                }
                ContractEvent::TransferToEthereum(burn) => {
                    match release(chain, burn.from, burn.amount) {
                        Ok(()) => report.released += 1,
                        Err(err) => reject(&mut report, "unStake", err),
                    }
                }
                _ => {}
            }
        }

        if report.minted + report.released > 0 {
            info!(
                minted = report.minted,
                released = report.released,
                rejected = report.rejected.len(),
                "Relay pass complete"
            );
        }
        report
    }
}

/// Mint wrapped tokens for an origin escrow.
pub fn mint(chain: &mut Chain, to: Address, amount: U256) -> Result<(), ChainError> {
    chain.transact("mintTo", |s, accounts| {
        Ok(s.destination_bridge.mint_to(
            &mut s.wrapped_token,
            &CallContext::new(accounts.owner),
            to,
            amount,
        )?)
    })?;
    Ok(())
}

/// Release origin stake for a destination burn.
pub fn release(chain: &mut Chain, owner: Address, amount: U256) -> Result<(), ChainError> {
    chain.transact("unStake", |s, accounts| {
        Ok(s.origin_bridge
            .un_stake(&CallContext::new(accounts.owner), owner, amount)?)
    })?;
    Ok(())
}

fn reject(report: &mut RelayReport, call: &str, err: ChainError) {
    warn!(call, reason = %err, "Relay call rejected");
    report.rejected.push(err.reason());
}
