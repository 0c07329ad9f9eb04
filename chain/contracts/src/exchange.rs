//! Constant-product market maker between the native coin and a token
//!
//! The native-coin reserve is the contract's own balance minus collected
//! fees; the token reserve lives in an externally owned vault account that
//! has approved the exchange as a spender. Swaps move along the curve
//! `vault × reserve / 10^18 = invariant`:
//! - `buy_ether`: caller sells tokens into the vault for native coin, less fee
//! - `buy_token`: caller buys tokens out of the vault for native coin, plus fee
//! - `deposit` and `set_token_vault` are the only operations that rewrite the
//!   invariant
//!
//! Every operation computes its full outcome before the first mutation, so
//! a rejected call leaves balances, reserves and fees untouched.

use tracing::{debug, info};
use types::fee::FeeRate;
use types::ids::Address;
use types::numeric::{checked_add, checked_sub, mul_div, mul_div_ceil, scale, DECIMALS, U256};

use crate::config::ExchangeConfig;
use crate::context::{CallContext, Environment};
use crate::errors::{EnvError, ExchangeError};
use crate::events::{
    ContractEvent, EtherPurchased, FeePercentageChanged, FeesWithdrawn, LiquidityDeposited,
    TokenPurchased, TokenVaultChanged,
};
use crate::ledger::FungibleLedger;
use crate::security::Ownable;

/// Constructor arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeParams {
    /// Externally owned account holding the token reserve
    pub token_vault: Address,
    /// Ledger the exchange trades against
    pub reserve_token: Address,
    /// Tokens pulled from the deployer into the vault at construction
    pub token_amount: U256,
}

#[derive(Debug, Clone)]
pub struct Exchange {
    address: Address,
    ownable: Ownable,
    token_vault: Address,
    reserve_token: Address,
    fee_rate: FeeRate,
    fees_collected: U256,
    invariant: U256,
    withdrawal_threshold: U256,
    events: Vec<ContractEvent>,
}

impl Exchange {
    /// Deploy at `address`, seeding the reserves.
    ///
    /// The attached value becomes the native reserve and `token_amount` is
    /// pulled from the deployer into the vault, so the deployer must have
    /// approved `address` beforehand. The vault must already hold at least
    /// `token_amount`.
    pub fn deploy(
        env: &mut impl Environment,
        ledger: &mut impl FungibleLedger,
        ctx: &CallContext,
        address: Address,
        params: ExchangeParams,
        config: &ExchangeConfig,
    ) -> Result<Self, ExchangeError> {
        let ExchangeParams {
            token_vault,
            reserve_token,
            token_amount,
        } = params;

        if token_amount.is_zero() {
            return Err(ExchangeError::ZeroTokenAmount);
        }
        if token_vault.is_zero() {
            return Err(ExchangeError::ZeroVault);
        }
        if reserve_token.is_zero() {
            return Err(ExchangeError::ZeroReserveToken);
        }
        if ctx.value.is_zero() {
            return Err(ExchangeError::NoEtherDeposited);
        }
        if env.is_contract(&token_vault) {
            return Err(ExchangeError::VaultIsContract);
        }
        if !env.is_contract(&reserve_token) {
            return Err(ExchangeError::ReserveTokenNotContract);
        }
        if ledger.address() != reserve_token {
            return Err(ExchangeError::LedgerMismatch);
        }
        let vault_balance = ledger.balance_of(&token_vault);
        if vault_balance < token_amount {
            return Err(ExchangeError::InsufficientVaultTokens {
                required: token_amount,
                available: vault_balance,
            });
        }
        ensure_native_funds(env, &ctx.caller, ctx.value)?;

        let fee_rate = config.fee_rate()?;
        let withdrawal_threshold = config.withdrawal_threshold()?;
        let vault_after = checked_add(vault_balance, token_amount)?;
        let invariant = mul_div(vault_after, ctx.value, scale())?;

        ledger.transfer_from(&CallContext::new(address), ctx.caller, token_vault, token_amount)?;
        env.transfer_native(ctx.caller, address, ctx.value)?;
        env.register_contract(address);

        info!(
            ?address,
            ?token_vault,
            ?reserve_token,
            %invariant,
            fee_rate = %fee_rate.raw(),
            "Exchange deployed"
        );

        Ok(Self {
            address,
            ownable: Ownable::new(ctx.caller),
            token_vault,
            reserve_token,
            fee_rate,
            fees_collected: U256::zero(),
            invariant,
            withdrawal_threshold,
            events: Vec::new(),
        })
    }

    // ───────────────────────── Reads ─────────────────────────

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.ownable.owner()
    }

    pub fn token_vault(&self) -> Address {
        self.token_vault
    }

    pub fn reserve_token(&self) -> Address {
        self.reserve_token
    }

    /// Stored fee fraction, 18-decimal scaled.
    pub fn fee_percentage(&self) -> U256 {
        self.fee_rate.raw()
    }

    pub fn fees_collected(&self) -> U256 {
        self.fees_collected
    }

    pub fn withdrawal_threshold(&self) -> U256 {
        self.withdrawal_threshold
    }

    pub fn decimals(&self) -> u32 {
        DECIMALS
    }

    /// Cached invariant, rewritten only by deployment, deposit and vault change.
    pub fn invariant(&self) -> U256 {
        self.invariant
    }

    /// Native reserve excluding collected fees.
    pub fn ether_reserve(&self, env: &impl Environment) -> U256 {
        env.native_balance(&self.address)
            .saturating_sub(self.fees_collected)
    }

    /// `vault × reserve / 10^18` from live balances.
    pub fn reserve_product(
        &self,
        env: &impl Environment,
        ledger: &impl FungibleLedger,
    ) -> Result<U256, ExchangeError> {
        let vault = ledger.balance_of(&self.token_vault);
        Ok(mul_div(vault, self.ether_reserve(env), scale())?)
    }

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Quotes ─────────────────────────

    /// Native coin needed to buy `token_amount` tokens, before fee.
    pub fn calculate_ether_amount(
        &self,
        env: &impl Environment,
        ledger: &impl FungibleLedger,
        token_amount: U256,
    ) -> Result<U256, ExchangeError> {
        self.ensure_ledger(ledger)?;
        if token_amount.is_zero() {
            return Err(ExchangeError::ZeroTokenAmount);
        }
        let vault = ledger.balance_of(&self.token_vault);
        self.token_cost(vault, self.ether_reserve(env), token_amount)
    }

    /// Tokens obtainable for exactly one native unit, fee included.
    ///
    /// Calling `buy_token` with the quoted amount and `10^18` attached always
    /// succeeds at the reserves the quote was taken at.
    pub fn get_exchange_rate(
        &self,
        env: &impl Environment,
        ledger: &impl FungibleLedger,
    ) -> Result<U256, ExchangeError> {
        self.ensure_ledger(ledger)?;
        let one = scale();
        let vault = ledger.balance_of(&self.token_vault);
        let reserve = self.ether_reserve(env);

        let spendable = mul_div(one, one, checked_add(one, self.fee_rate.raw())?)?;
        let reserve_after = checked_add(reserve, spendable)?;
        let tokens_after = mul_div_ceil(self.invariant, one, reserve_after)?;
        Ok(vault.saturating_sub(tokens_after))
    }

    // ───────────────────────── Swaps ─────────────────────────

    /// Sell `token_amount` tokens for native coin.
    ///
    /// The caller must have approved the exchange for `token_amount`.
    /// Returns the native amount paid out after fee.
    pub fn buy_ether(
        &mut self,
        env: &mut impl Environment,
        ledger: &mut impl FungibleLedger,
        ctx: &CallContext,
        token_amount: U256,
    ) -> Result<U256, ExchangeError> {
        ensure_no_value(ctx)?;
        self.ensure_ledger(ledger)?;
        if token_amount.is_zero() {
            return Err(ExchangeError::ZeroExchangeAmount);
        }

        let vault = ledger.balance_of(&self.token_vault);
        let reserve = self.ether_reserve(env);
        let vault_after = checked_add(vault, token_amount)?;
        let reserve_after = mul_div(self.invariant, scale(), vault_after)?;
        let payout = reserve
            .checked_sub(reserve_after)
            .ok_or(ExchangeError::InsufficientReserve)?;
        let fee = self.fee_rate.fee_on(payout)?;
        let net = checked_sub(payout, fee)?;
        let fees_after = checked_add(self.fees_collected, fee)?;
        ensure_native_funds(env, &self.address, net)?;

        ledger.transfer_from(&self.as_caller(), ctx.caller, self.token_vault, token_amount)?;
        env.transfer_native(self.address, ctx.caller, net)?;
        self.fees_collected = fees_after;

        debug!(
            buyer = ?ctx.caller,
            %token_amount,
            %payout,
            %fee,
            "Ether purchased"
        );
        self.events.push(ContractEvent::EtherPurchased(EtherPurchased {
            buyer: ctx.caller,
            token_amount,
            ether_amount: net,
            fee,
        }));
        Ok(net)
    }

    /// Buy `token_amount` tokens out of the vault.
    ///
    /// Exactly `cost + fee` is taken from the caller; attached value above
    /// that stays with the caller. Returns the total charged.
    pub fn buy_token(
        &mut self,
        env: &mut impl Environment,
        ledger: &mut impl FungibleLedger,
        ctx: &CallContext,
        token_amount: U256,
    ) -> Result<U256, ExchangeError> {
        self.ensure_ledger(ledger)?;
        if token_amount.is_zero() {
            return Err(ExchangeError::ZeroBuyAmount);
        }

        let vault = ledger.balance_of(&self.token_vault);
        let reserve = self.ether_reserve(env);
        let cost = self.token_cost(vault, reserve, token_amount)?;
        let fee = self.fee_rate.fee_on(cost)?;
        let total = checked_add(cost, fee)?;
        if ctx.value < total {
            return Err(ExchangeError::InsufficientEther {
                required: total,
                sent: ctx.value,
            });
        }
        ensure_native_funds(env, &ctx.caller, total)?;
        let fees_after = checked_add(self.fees_collected, fee)?;

        ledger.transfer_from(&self.as_caller(), self.token_vault, ctx.caller, token_amount)?;
        env.transfer_native(ctx.caller, self.address, total)?;
        self.fees_collected = fees_after;

        debug!(
            buyer = ?ctx.caller,
            %token_amount,
            %cost,
            %fee,
            "Token purchased"
        );
        self.events.push(ContractEvent::TokenPurchased(TokenPurchased {
            buyer: ctx.caller,
            token_amount,
            ether_amount: total,
            fee,
        }));
        Ok(total)
    }

    // ───────────────────────── Owner operations ─────────────────────────

    /// Set the fee from a percentage scaled by `10^18`; stores `percentage / 100`.
    pub fn set_fee_percentage(
        &mut self,
        ctx: &CallContext,
        percentage: U256,
    ) -> Result<(), ExchangeError> {
        self.ownable
            .ensure_owner(&ctx.caller, ExchangeError::Unauthorized)?;
        ensure_no_value(ctx)?;
        let rate = FeeRate::from_percentage(percentage)?;
        self.fee_rate = rate;

        info!(%percentage, stored = %rate.raw(), "Fee percentage changed");
        self.events
            .push(ContractEvent::FeePercentageChanged(FeePercentageChanged {
                fee_percentage: rate.raw(),
            }));
        Ok(())
    }

    /// Add native liquidity and pull the matching tokens from the owner.
    ///
    /// The owner must have approved the exchange for the pulled amount.
    pub fn deposit(
        &mut self,
        env: &mut impl Environment,
        ledger: &mut impl FungibleLedger,
        ctx: &CallContext,
    ) -> Result<U256, ExchangeError> {
        self.ownable
            .ensure_owner(&ctx.caller, ExchangeError::Unauthorized)?;
        self.ensure_ledger(ledger)?;
        if ctx.value.is_zero() {
            return Err(ExchangeError::NoEtherDeposited);
        }

        let vault = ledger.balance_of(&self.token_vault);
        let reserve_after = checked_add(self.ether_reserve(env), ctx.value)?;
        let target_tokens = mul_div(self.invariant, scale(), reserve_after)?;
        let token_amount = vault.saturating_sub(target_tokens);

        let owner_tokens = ledger.balance_of(&ctx.caller);
        if owner_tokens < token_amount {
            return Err(ExchangeError::InsufficientOwnerTokens {
                required: token_amount,
                available: owner_tokens,
            });
        }
        ensure_native_funds(env, &ctx.caller, ctx.value)?;
        let invariant = mul_div(checked_add(vault, token_amount)?, reserve_after, scale())?;

        if !token_amount.is_zero() {
            ledger.transfer_from(&self.as_caller(), ctx.caller, self.token_vault, token_amount)?;
        }
        env.transfer_native(ctx.caller, self.address, ctx.value)?;
        self.invariant = invariant;

        info!(ether = %ctx.value, tokens = %token_amount, %invariant, "Liquidity deposited");
        self.events
            .push(ContractEvent::LiquidityDeposited(LiquidityDeposited {
                owner: ctx.caller,
                ether_amount: ctx.value,
                token_amount,
                invariant,
            }));
        Ok(token_amount)
    }

    /// Point the exchange at a new vault and re-derive the invariant from it.
    ///
    /// The new vault must hold tokens and have approved the exchange for at
    /// least its whole balance.
    pub fn set_token_vault(
        &mut self,
        env: &impl Environment,
        ledger: &impl FungibleLedger,
        ctx: &CallContext,
        new_vault: Address,
    ) -> Result<(), ExchangeError> {
        self.ownable
            .ensure_owner(&ctx.caller, ExchangeError::Unauthorized)?;
        ensure_no_value(ctx)?;
        self.ensure_ledger(ledger)?;
        if new_vault.is_zero() {
            return Err(ExchangeError::ZeroVault);
        }
        if env.is_contract(&new_vault) {
            return Err(ExchangeError::VaultIsContract);
        }
        let balance = ledger.balance_of(&new_vault);
        if balance.is_zero() || ledger.allowance(&new_vault, &self.address) < balance {
            return Err(ExchangeError::VaultNotApproved);
        }

        let invariant = mul_div(balance, self.ether_reserve(env), scale())?;
        let previous = self.token_vault;
        self.token_vault = new_vault;
        self.invariant = invariant;

        info!(?previous, current = ?new_vault, %invariant, "Token vault changed");
        self.events
            .push(ContractEvent::TokenVaultChanged(TokenVaultChanged {
                previous,
                current: new_vault,
                invariant,
            }));
        Ok(())
    }

    /// Send all collected fees to the owner once they exceed the threshold.
    pub fn withdraw_fees_amount(
        &mut self,
        env: &mut impl Environment,
        ctx: &CallContext,
    ) -> Result<U256, ExchangeError> {
        self.ownable
            .ensure_owner(&ctx.caller, ExchangeError::Unauthorized)?;
        ensure_no_value(ctx)?;
        let amount = self.fees_collected;
        if amount <= self.withdrawal_threshold {
            return Err(ExchangeError::FeesBelowThreshold {
                collected: amount,
                threshold: self.withdrawal_threshold,
            });
        }

        env.transfer_native(self.address, ctx.caller, amount)?;
        self.fees_collected = U256::zero();

        info!(%amount, "Fees withdrawn");
        self.events.push(ContractEvent::FeesWithdrawn(FeesWithdrawn {
            owner: ctx.caller,
            amount,
        }));
        Ok(amount)
    }

    // ───────────────────────── Internal ─────────────────────────

    /// `invariant × 10^18 / (vault − amount) − reserve`
    fn token_cost(&self, vault: U256, reserve: U256, token_amount: U256) -> Result<U256, ExchangeError> {
        if token_amount >= vault {
            return Err(ExchangeError::VaultDrained {
                requested: token_amount,
                available: vault,
            });
        }
        let vault_after = vault - token_amount;
        let reserve_after = mul_div(self.invariant, scale(), vault_after)?;
        Ok(checked_sub(reserve_after, reserve)?)
    }

    fn ensure_ledger(&self, ledger: &impl FungibleLedger) -> Result<(), ExchangeError> {
        if ledger.address() != self.reserve_token {
            return Err(ExchangeError::LedgerMismatch);
        }
        Ok(())
    }

    fn as_caller(&self) -> CallContext {
        CallContext::new(self.address)
    }
}

fn ensure_no_value(ctx: &CallContext) -> Result<(), ExchangeError> {
    if ctx.has_value() {
        return Err(ExchangeError::NonPayable);
    }
    Ok(())
}

fn ensure_native_funds(
    env: &impl Environment,
    account: &Address,
    amount: U256,
) -> Result<(), EnvError> {
    let available = env.native_balance(account);
    if available < amount {
        return Err(EnvError::InsufficientNativeBalance {
            required: amount,
            available,
        });
    }
    Ok(())
}
