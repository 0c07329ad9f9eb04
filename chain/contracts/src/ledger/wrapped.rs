//! Destination-chain wrapped token. Starts empty; supply follows mint and burn.

use tracing::{debug, info};
use types::ids::Address;
use types::numeric::U256;

use super::{validate_metadata, LedgerBook, Mintable};
use crate::context::{CallContext, Environment};
use crate::errors::LedgerError;

#[derive(Debug, Clone)]
pub struct WrappedToken {
    address: Address,
    name: String,
    symbol: String,
    book: LedgerBook,
}

impl WrappedToken {
    /// Deploy at `address`. Emits a zero-value mint record to the deployer.
    pub fn deploy(
        env: &mut impl Environment,
        ctx: &CallContext,
        address: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        let name = name.into();
        let symbol = symbol.into();
        validate_metadata(&name, &symbol)?;

        let mut book = LedgerBook::new();
        book.credit_new_supply(ctx.caller, U256::zero())?;
        env.register_contract(address);
        info!(?address, %name, %symbol, deployer = ?ctx.caller, "Wrapped token deployed");

        Ok(Self {
            address,
            name,
            symbol,
            book,
        })
    }
}

impl_fungible_ledger!(WrappedToken);

impl Mintable for WrappedToken {
    fn mint(&mut self, ctx: &CallContext, to: Address, amount: U256) -> Result<(), LedgerError> {
        self.book.mint(to, amount)?;
        debug!(minter = ?ctx.caller, ?to, %amount, "Minted");
        Ok(())
    }

    fn burn(&mut self, ctx: &CallContext, amount: U256) -> Result<(), LedgerError> {
        self.book.burn(ctx.caller, amount)?;
        debug!(holder = ?ctx.caller, %amount, "Burned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Bank;
    use crate::events::{Burn, ContractEvent, Transfer};
    use crate::ledger::FungibleLedger;
    use types::ids::address_from_index;

    fn deploy(deployer: Address) -> WrappedToken {
        let mut bank = Bank::new();
        WrappedToken::deploy(
            &mut bank,
            &CallContext::new(deployer),
            address_from_index(200),
            "ERC20_Polygon",
            "TPOL",
        )
        .unwrap()
    }

    #[test]
    fn test_deploy_emits_zero_transfer() {
        let deployer = address_from_index(1);
        let token = deploy(deployer);
        assert!(token.total_supply().is_zero());
        assert_eq!(
            token.events(),
            &[ContractEvent::Transfer(Transfer {
                from: Address::zero(),
                to: deployer,
                value: U256::zero(),
            })]
        );
    }

    #[test]
    fn test_mint_is_open_to_any_caller() {
        let mut token = deploy(address_from_index(1));
        token.drain_events();
        let stranger = CallContext::new(address_from_index(9));
        let to = address_from_index(2);
        token.mint(&stranger, to, U256::from(100)).unwrap();
        assert_eq!(token.balance_of(&to), U256::from(100));
        assert_eq!(token.total_supply(), U256::from(100));
        assert_eq!(
            token.drain_events(),
            vec![ContractEvent::Transfer(Transfer {
                from: Address::zero(),
                to,
                value: U256::from(100),
            })]
        );
    }

    #[test]
    fn test_burn_reduces_supply() {
        let holder = address_from_index(2);
        let mut token = deploy(address_from_index(1));
        let ctx = CallContext::new(holder);
        token.mint(&ctx, holder, U256::from(1_000)).unwrap();
        token.drain_events();
        token.burn(&ctx, U256::from(100)).unwrap();
        assert_eq!(token.total_supply(), U256::from(900));
        assert_eq!(
            token.events(),
            &[ContractEvent::Burn(Burn {
                from: holder,
                to: holder,
                value: U256::from(100),
            })]
        );
    }

    #[test]
    fn test_burn_insufficient_balance() {
        let mut token = deploy(address_from_index(1));
        let err = token
            .burn(&CallContext::new(address_from_index(5)), U256::from(10))
            .unwrap_err();
        assert_eq!(err.to_string(), "Insufficient balance");
    }
}
