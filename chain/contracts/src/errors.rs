//! Contract-specific error types
//!
//! Every variant's display string is the reason string surfaced to callers
//! when an operation is rejected. A rejected operation leaves all state as it
//! was before the call.

use thiserror::Error;
use types::errors::{FeeError, NumericError};
use types::numeric::U256;

/// Fungible ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid parameter: _name")]
    EmptyName,

    #[error("Invalid parameter: _symbol")]
    EmptySymbol,

    #[error("_to cannot be zero address")]
    ZeroRecipient,

    #[error("_from cannot be zero address")]
    ZeroSender,

    #[error("_spender cannot be zero address")]
    ZeroSpender,

    #[error("_recipient cannot be zero address")]
    ZeroMintRecipient,

    #[error("Invalid recipient, same as remittent")]
    SelfTransfer,

    #[error("Insufficient balance")]
    InsufficientBalance { required: U256, available: U256 },

    #[error("Insufficient allowance")]
    InsufficientAllowance { required: U256, available: U256 },

    #[error("Invalid allowance amount. Set to zero first")]
    AllowanceNotReset,

    #[error("_amountToMint must be greater than zero")]
    ZeroMint,

    #[error("_value must be greater than zero")]
    ZeroBurn,

    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// Native-coin environment errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("Insufficient native balance: required {required}, available {available}")]
    InsufficientNativeBalance { required: U256, available: U256 },

    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// Blacklist membership errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlacklistError {
    #[error("_invalidAddress cannot be zero address")]
    ZeroAddress,

    #[error("Invalid address _invalidAddress")]
    OwnerAddress,

    #[error("Address already in the list")]
    AlreadyListed,

    #[error("Address not found")]
    NotListed,
}

/// Exchange engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Not authorized")]
    Unauthorized,

    #[error("Function is not payable")]
    NonPayable,

    #[error("Ledger address mismatch")]
    LedgerMismatch,

    #[error("Invalid _tokenAmount value")]
    ZeroTokenAmount,

    #[error("Invalid address _tokenVault")]
    ZeroVault,

    #[error("_erc20Contract cannot be zero address")]
    ZeroReserveToken,

    #[error("No ethers deposited")]
    NoEtherDeposited,

    #[error("_tokenVault cannot be a contract")]
    VaultIsContract,

    #[error("_erc20Contract is not a contract")]
    ReserveTokenNotContract,

    #[error("Insufficient tokens in the vault")]
    InsufficientVaultTokens { required: U256, available: U256 },

    #[error("Invalid _amountToExchange value")]
    ZeroExchangeAmount,

    #[error("Invalid _amountToBuy value")]
    ZeroBuyAmount,

    #[error("Token amount would drain the vault")]
    VaultDrained { requested: U256, available: U256 },

    #[error("Insufficient balance")]
    InsufficientReserve,

    #[error("Insufficient ethers")]
    InsufficientEther { required: U256, sent: U256 },

    #[error("Insufficient balance")]
    InsufficientOwnerTokens { required: U256, available: U256 },

    #[error("Invalid tokenVault address")]
    VaultNotApproved,

    #[error("Insufficient amount of fees")]
    FeesBelowThreshold { collected: U256, threshold: U256 },

    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// Bridge errors (both origin and destination sides)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Not authorized")]
    Unauthorized,

    #[error("Function is not payable")]
    NonPayable,

    #[error("Ledger address mismatch")]
    LedgerMismatch,

    #[error("_erc20Contract cannot be zero address")]
    ZeroTokenAddress,

    #[error("Invalid address _erc20Contract")]
    InvalidTokenAddress,

    #[error("_erc20Contract is not a contract")]
    TokenNotContract,

    #[error("_tokenAmount must be greater than zero")]
    ZeroTokenAmount,

    #[error("_maxSupply must be greater than zero")]
    ZeroMaxSupply,

    #[error("_tokenAmount exceeds max supply")]
    ExceedsMaxSupply,

    #[error("Invalid sender")]
    SenderBlacklisted,

    #[error("Insufficient balance")]
    InsufficientBalance { required: U256, available: U256 },

    #[error("_tokenAmount value exceed balance")]
    ExceedsBalance { required: U256, available: U256 },

    #[error("_owner cannot be zero address")]
    ZeroOwner,

    #[error("_owner address is in blacklist")]
    OwnerBlacklisted,

    #[error("_owner address has no stake")]
    NoStake,

    #[error("_tokenAmount value exceed staking")]
    ExceedsStake { requested: U256, staked: U256 },

    #[error("_to cannot be zero address")]
    ZeroRecipient,

    #[error("_to address is in blacklist")]
    RecipientBlacklisted,

    #[error(transparent)]
    Blacklist(#[from] BlacklistError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Numeric(#[from] NumericError),
}
