//! Contract events
//!
//! Events are immutable records emitted by contract operations and form the
//! audit log the relayer and front end consume. Field order of the ledger and
//! bridge records is part of the compatibility surface:
//! `(from, to, value)` for transfer/approval/burn and `(to|from, amount)` for
//! mint-order and cross-chain transfer intents.

use serde::{Deserialize, Serialize};
use types::ids::Address;
use types::numeric::U256;

/// Ledger balance movement. Mints use the zero address as `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

/// Allowance set by `owner` for `spender`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
}

/// Tokens destroyed on the destination ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burn {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

/// Destination bridge minted wrapped tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintOrder {
    pub to: Address,
    pub amount: U256,
}

/// Tokens escrowed on the origin side, awaiting a destination mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToPolygon {
    pub from: Address,
    pub amount: U256,
}

/// Wrapped tokens burned on the destination side, awaiting an origin unstake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToEthereum {
    pub from: Address,
    pub amount: U256,
}

/// Origin-side stake released by the bridge owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnStake {
    pub owner: Address,
    pub amount: U256,
}

/// Blacklist membership changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistUpdated {
    pub address: Address,
    pub listed: bool,
}

/// Caller sold tokens for native coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtherPurchased {
    pub buyer: Address,
    pub token_amount: U256,
    pub ether_amount: U256,
    pub fee: U256,
}

/// Caller bought tokens with native coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPurchased {
    pub buyer: Address,
    pub token_amount: U256,
    pub ether_amount: U256,
    pub fee: U256,
}

/// Owner injected liquidity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityDeposited {
    pub owner: Address,
    pub ether_amount: U256,
    pub token_amount: U256,
    pub invariant: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenVaultChanged {
    pub previous: Address,
    pub current: Address,
    pub invariant: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePercentageChanged {
    pub fee_percentage: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeesWithdrawn {
    pub owner: Address,
    pub amount: U256,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Transfer(Transfer),
    Approval(Approval),
    Burn(Burn),
    MintOrder(MintOrder),
    TransferToPolygon(TransferToPolygon),
    TransferToEthereum(TransferToEthereum),
    UnStake(UnStake),
    BlacklistUpdated(BlacklistUpdated),
    EtherPurchased(EtherPurchased),
    TokenPurchased(TokenPurchased),
    LiquidityDeposited(LiquidityDeposited),
    TokenVaultChanged(TokenVaultChanged),
    FeePercentageChanged(FeePercentageChanged),
    FeesWithdrawn(FeesWithdrawn),
}

impl ContractEvent {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ContractEvent::Transfer(_) => "Transfer",
            ContractEvent::Approval(_) => "Approval",
            ContractEvent::Burn(_) => "Burn",
            ContractEvent::MintOrder(_) => "MintOrder",
            ContractEvent::TransferToPolygon(_) => "TransferToPolygon",
            ContractEvent::TransferToEthereum(_) => "TransferToEthereum",
            ContractEvent::UnStake(_) => "UnStake",
            ContractEvent::BlacklistUpdated(_) => "BlacklistUpdated",
            ContractEvent::EtherPurchased(_) => "EtherPurchased",
            ContractEvent::TokenPurchased(_) => "TokenPurchased",
            ContractEvent::LiquidityDeposited(_) => "LiquidityDeposited",
            ContractEvent::TokenVaultChanged(_) => "TokenVaultChanged",
            ContractEvent::FeePercentageChanged(_) => "FeePercentageChanged",
            ContractEvent::FeesWithdrawn(_) => "FeesWithdrawn",
        }
    }
}
