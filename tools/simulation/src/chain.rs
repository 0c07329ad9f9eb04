//! In-memory chain for simulation
//!
//! Owns both sides of the bridge and the exchange. Every call runs inside
//! `transact`, which snapshots the whole state first and restores it if the
//! call fails, so a rejected transaction never leaves partial effects.

use chrono::{DateTime, Duration, TimeZone, Utc};
use contracts::bridge::{DestinationBridge, OriginBridge};
use contracts::context::{Bank, CallContext, Environment};
use contracts::errors::{BridgeError, EnvError, ExchangeError, LedgerError};
use contracts::events::ContractEvent;
use contracts::exchange::{Exchange, ExchangeParams};
use contracts::ledger::{FungibleLedger, OriginToken, WrappedToken};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use types::errors::NumericError;
use types::ids::{address_from_index, Address, TxId};
use types::numeric::{checked_add, mul_div, scale, to_base_units, U256};

use crate::config::SimulationConfig;

/// Unix time of block zero.
const GENESIS_SECS: i64 = 1_700_000_000;

/// Contract addresses are allocated from here upwards.
const FIRST_CONTRACT_INDEX: u64 = 1_000;

/// Trader addresses are allocated from here upwards.
const FIRST_TRADER_INDEX: u64 = 10;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Numeric(#[from] NumericError),

    #[error("invalid simulation config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("timestamp out of range: {0}")]
    Clock(i64),

    #[error("unknown trader #{0}")]
    UnknownTrader(usize),
}

impl ChainError {
    /// Reason string surfaced by the rejecting contract.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Externally owned accounts the harness signs for.
#[derive(Debug, Clone)]
pub struct Accounts {
    pub owner: Address,
    pub vault: Address,
    pub traders: Vec<Address>,
}

impl Accounts {
    pub fn trader(&self, index: usize) -> Result<Address, ChainError> {
        self.traders
            .get(index)
            .copied()
            .ok_or(ChainError::UnknownTrader(index))
    }
}

/// Deployed contracts and the native-coin ledgers of both chains.
#[derive(Debug, Clone)]
pub struct ChainState {
    pub origin_bank: Bank,
    pub origin_token: OriginToken,
    pub exchange: Exchange,
    pub origin_bridge: OriginBridge,
    pub destination_bank: Bank,
    pub wrapped_token: WrappedToken,
    pub destination_bridge: DestinationBridge,
}

impl ChainState {
    fn drain_events(&mut self) -> Vec<ContractEvent> {
        let mut events = self.origin_token.drain_events();
        events.extend(self.exchange.drain_events());
        events.extend(self.origin_bridge.drain_events());
        events.extend(self.wrapped_token.drain_events());
        events.extend(self.destination_bridge.drain_events());
        events
    }

    /// Zero then reset `holder`'s allowance for `spender` on the origin token.
    pub fn reapprove_origin(
        &mut self,
        holder: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let ctx = CallContext::new(holder);
        self.origin_token.approve(&ctx, spender, U256::zero())?;
        self.origin_token.approve(&ctx, spender, amount)
    }

    pub fn reapprove_wrapped(
        &mut self,
        holder: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let ctx = CallContext::new(holder);
        self.wrapped_token.approve(&ctx, spender, U256::zero())?;
        self.wrapped_token.approve(&ctx, spender, amount)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Receipt<T> {
    pub tx_id: TxId,
    pub label: String,
    pub block: u64,
    pub timestamp: DateTime<Utc>,
    pub output: T,
    pub events: Vec<ContractEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggedEvent {
    pub block: u64,
    pub tx_id: TxId,
    pub event: ContractEvent,
}

/// Live reserve product against the cached invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantCheck {
    pub invariant: U256,
    pub product: U256,
    /// Flooring the reserve loses at most one base unit per whole vault token.
    pub tolerance: U256,
}

impl InvariantCheck {
    pub fn drift(&self) -> U256 {
        self.invariant.saturating_sub(self.product)
    }

    pub fn holds(&self) -> bool {
        self.product <= self.invariant && self.drift() <= self.tolerance
    }
}

struct AddressAllocator(u64);

impl AddressAllocator {
    fn next(&mut self) -> Address {
        let address = address_from_index(self.0);
        self.0 += 1;
        address
    }
}

pub struct Chain {
    state: ChainState,
    accounts: Accounts,
    block: u64,
    genesis: DateTime<Utc>,
    block_time: Duration,
    event_log: Vec<LoggedEvent>,
}

impl Chain {
    /// Deploy every contract and fund the accounts described by `config`.
    ///
    /// The vault ends with twice `seed_tokens` and keeps the exchange
    /// approved for its whole balance.
    pub fn bootstrap(config: &SimulationConfig) -> Result<Self, ChainError> {
        let owner = address_from_index(1);
        let vault = address_from_index(2);
        let traders: Vec<Address> = (0..config.trader_count)
            .map(|i| address_from_index(FIRST_TRADER_INDEX + i))
            .collect();
        let mut alloc = AddressAllocator(FIRST_CONTRACT_INDEX);

        let seed_tokens = to_base_units(config.seed_tokens)?;
        let seed_ether = to_base_units(config.seed_ether)?;
        let trader_ether = to_base_units(config.trader_ether)?;
        let trader_tokens = to_base_units(config.trader_tokens)?;
        let owner_ctx = CallContext::new(owner);

        let mut origin_bank = Bank::new();
        origin_bank.fund(owner, checked_add(seed_ether, trader_ether)?)?;
        let mut origin_token = OriginToken::deploy(
            &mut origin_bank,
            &owner_ctx,
            alloc.next(),
            config.origin_token.name.clone(),
            config.origin_token.symbol.clone(),
            config.origin_token.max_supply_units()?,
        )?;
        origin_token.transfer(&owner_ctx, vault, seed_tokens)?;

        let token_address = origin_token.address();
        let exchange_address = alloc.next();
        origin_token.approve(&owner_ctx, exchange_address, seed_tokens)?;
        let exchange = Exchange::deploy(
            &mut origin_bank,
            &mut origin_token,
            &CallContext::with_value(owner, seed_ether),
            exchange_address,
            ExchangeParams {
                token_vault: vault,
                reserve_token: token_address,
                token_amount: seed_tokens,
            },
            &config.exchange,
        )?;

        for trader in &traders {
            origin_bank.fund(*trader, trader_ether)?;
            origin_token.transfer(&owner_ctx, *trader, trader_tokens)?;
        }
        let origin_bridge =
            OriginBridge::deploy(&mut origin_bank, &owner_ctx, alloc.next(), token_address)?;

        let mut destination_bank = Bank::new();
        let wrapped_token = WrappedToken::deploy(
            &mut destination_bank,
            &owner_ctx,
            alloc.next(),
            config.wrapped_token.name.clone(),
            config.wrapped_token.symbol.clone(),
        )?;
        let destination_bridge = DestinationBridge::deploy(
            &mut destination_bank,
            &owner_ctx,
            alloc.next(),
            wrapped_token.address(),
        )?;

        let genesis = Utc
            .timestamp_opt(GENESIS_SECS, 0)
            .single()
            .ok_or(ChainError::Clock(GENESIS_SECS))?;

        let mut state = ChainState {
            origin_bank,
            origin_token,
            exchange,
            origin_bridge,
            destination_bank,
            wrapped_token,
            destination_bridge,
        };
        let vault_balance = state.origin_token.balance_of(&vault);
        state.reapprove_origin(vault, exchange_address, vault_balance)?;
        let deploy_events = state.drain_events();

        info!(
            traders = traders.len(),
            invariant = %state.exchange.invariant(),
            deploy_events = deploy_events.len(),
            "Simulation chain bootstrapped"
        );

        Ok(Self {
            state,
            accounts: Accounts {
                owner,
                vault,
                traders,
            },
            block: 0,
            genesis,
            block_time: Duration::seconds(config.block_time_secs),
            event_log: Vec::new(),
        })
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn block(&self) -> u64 {
        self.block
    }

    /// Every event committed so far, in order.
    pub fn event_log(&self) -> &[LoggedEvent] {
        &self.event_log
    }

    /// Run `call` as one atomic transaction.
    ///
    /// On success the block advances and the emitted events are logged and
    /// returned in the receipt. On failure all state is restored.
    pub fn transact<T, F>(&mut self, label: &str, call: F) -> Result<Receipt<T>, ChainError>
    where
        F: FnOnce(&mut ChainState, &Accounts) -> Result<T, ChainError>,
    {
        let snapshot = self.state.clone();
        match call(&mut self.state, &self.accounts) {
            Ok(output) => {
                self.block += 1;
                let tx_id = TxId::new();
                let events = self.state.drain_events();
                let timestamp = self.genesis + self.block_time * self.block as i32;
                self.event_log
                    .extend(events.iter().cloned().map(|event| LoggedEvent {
                        block: self.block,
                        tx_id,
                        event,
                    }));
                debug!(label, block = self.block, events = events.len(), "Transaction committed");
                Ok(Receipt {
                    tx_id,
                    label: label.to_string(),
                    block: self.block,
                    timestamp,
                    output,
                    events,
                })
            }
            Err(err) => {
                self.state = snapshot;
                debug!(label, reason = %err, "Transaction reverted");
                Err(err)
            }
        }
    }

    // ───────────────────────── Trader calls ─────────────────────────

    /// Approve the exchange and sell `amount` tokens for native coin.
    pub fn sell_tokens(&mut self, trader: usize, amount: U256) -> Result<Receipt<U256>, ChainError> {
        let trader = self.accounts.trader(trader)?;
        self.transact("buyEther", |s, _| {
            let exchange = s.exchange.address();
            s.reapprove_origin(trader, exchange, amount)?;
            Ok(s.exchange.buy_ether(
                &mut s.origin_bank,
                &mut s.origin_token,
                &CallContext::new(trader),
                amount,
            )?)
        })
    }

    /// Buy `amount` tokens, attaching `value` native coin.
    pub fn buy_tokens(
        &mut self,
        trader: usize,
        amount: U256,
        value: U256,
    ) -> Result<Receipt<U256>, ChainError> {
        let trader = self.accounts.trader(trader)?;
        self.transact("buyToken", |s, accounts| {
            let exchange = s.exchange.address();
            let vault_balance = s.origin_token.balance_of(&accounts.vault);
            s.reapprove_origin(accounts.vault, exchange, vault_balance)?;
            Ok(s.exchange.buy_token(
                &mut s.origin_bank,
                &mut s.origin_token,
                &CallContext::with_value(trader, value),
                amount,
            )?)
        })
    }

    /// Approve the origin bridge and escrow `amount` tokens.
    pub fn bridge_out(&mut self, trader: usize, amount: U256) -> Result<Receipt<()>, ChainError> {
        let trader = self.accounts.trader(trader)?;
        self.transact("transferToPolygon", |s, _| {
            let bridge = s.origin_bridge.address();
            s.reapprove_origin(trader, bridge, amount)?;
            Ok(s.origin_bridge
                .transfer_to_polygon(&mut s.origin_token, &CallContext::new(trader), amount)?)
        })
    }

    /// Approve the destination bridge and burn `amount` wrapped tokens.
    pub fn bridge_back(&mut self, trader: usize, amount: U256) -> Result<Receipt<()>, ChainError> {
        let trader = self.accounts.trader(trader)?;
        self.transact("transferToEthereum", |s, _| {
            let bridge = s.destination_bridge.address();
            s.reapprove_wrapped(trader, bridge, amount)?;
            Ok(s.destination_bridge.transfer_to_ethereum(
                &mut s.wrapped_token,
                &CallContext::new(trader),
                amount,
            )?)
        })
    }

    // ───────────────────────── Owner calls ─────────────────────────

    pub fn set_fee_percentage(&mut self, percentage: U256) -> Result<Receipt<()>, ChainError> {
        self.transact("setFeePercentage", |s, accounts| {
            Ok(s.exchange
                .set_fee_percentage(&CallContext::new(accounts.owner), percentage)?)
        })
    }

    /// Add `value` native liquidity; the owner approves its whole token
    /// balance so the proportional pull always fits.
    pub fn deposit(&mut self, value: U256) -> Result<Receipt<U256>, ChainError> {
        self.transact("deposit", |s, accounts| {
            let exchange = s.exchange.address();
            let balance = s.origin_token.balance_of(&accounts.owner);
            s.reapprove_origin(accounts.owner, exchange, balance)?;
            Ok(s.exchange.deposit(
                &mut s.origin_bank,
                &mut s.origin_token,
                &CallContext::with_value(accounts.owner, value),
            )?)
        })
    }

    pub fn withdraw_fees(&mut self) -> Result<Receipt<U256>, ChainError> {
        self.transact("withdrawFeesAmount", |s, accounts| {
            Ok(s.exchange
                .withdraw_fees_amount(&mut s.origin_bank, &CallContext::new(accounts.owner))?)
        })
    }

    // ───────────────────────── Checks ─────────────────────────

    pub fn invariant_check(&self) -> Result<InvariantCheck, ChainError> {
        let s = &self.state;
        let product = s.exchange.reserve_product(&s.origin_bank, &s.origin_token)?;
        let vault = s.origin_token.balance_of(&s.exchange.token_vault());
        let tolerance = checked_add(mul_div(vault, U256::one(), scale())?, U256::from(2))?;
        Ok(InvariantCheck {
            invariant: s.exchange.invariant(),
            product,
            tolerance,
        })
    }

    /// Wrapped supply must equal outstanding origin stake once the relayer
    /// has caught up.
    pub fn bridge_balanced(&self) -> bool {
        self.state.wrapped_token.total_supply() == self.state.origin_bridge.total_staked()
    }

    pub fn native_balance(&self, address: &Address) -> U256 {
        self.state.origin_bank.native_balance(address)
    }

    /// Exchange's native reserve excluding collected fees.
    pub fn ether_reserve(&self) -> U256 {
        self.state.exchange.ether_reserve(&self.state.origin_bank)
    }
}
