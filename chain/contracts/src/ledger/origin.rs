//! Origin-chain token with a fixed supply minted to the deployer.

use tracing::info;
use types::ids::Address;
use types::numeric::U256;

use super::{validate_metadata, CappedSupply, LedgerBook};
use crate::context::{CallContext, Environment};
use crate::errors::LedgerError;

#[derive(Debug, Clone)]
pub struct OriginToken {
    address: Address,
    name: String,
    symbol: String,
    max_supply: U256,
    book: LedgerBook,
}

impl OriginToken {
    /// Deploy at `address`, crediting the whole `max_supply` to the caller.
    pub fn deploy(
        env: &mut impl Environment,
        ctx: &CallContext,
        address: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        max_supply: U256,
    ) -> Result<Self, LedgerError> {
        let name = name.into();
        let symbol = symbol.into();
        validate_metadata(&name, &symbol)?;

        let mut book = LedgerBook::new();
        book.credit_new_supply(ctx.caller, max_supply)?;
        env.register_contract(address);
        info!(?address, %name, %symbol, %max_supply, deployer = ?ctx.caller, "Origin token deployed");

        Ok(Self {
            address,
            name,
            symbol,
            max_supply,
            book,
        })
    }
}

impl_fungible_ledger!(OriginToken);

impl CappedSupply for OriginToken {
    fn max_supply(&self) -> U256 {
        self.max_supply
    }
}
