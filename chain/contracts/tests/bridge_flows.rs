//! Bridge Flow Tests
//!
//! Both chains are driven by hand the way a relayer would:
//! - Origin escrow answered by destination mint
//! - Destination burn answered by origin unstake
//! - Blacklisting on either side

use bridge_contracts::bridge::{DestinationBridge, OriginBridge};
use bridge_contracts::context::{Bank, CallContext};
use bridge_contracts::errors::{BlacklistError, BridgeError};
use bridge_contracts::events::ContractEvent;
use bridge_contracts::ledger::{CappedSupply, FungibleLedger, OriginToken, WrappedToken};
use types::ids::{address_from_index, Address};
use types::numeric::whole_units;

const OWNER: u64 = 1;
const ALICE: u64 = 2;
const BOB: u64 = 3;

// ═══════════════════════════════════════════════════════════════════
// Round Trip
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_round_trip_preserves_supply() {
    let mut c = setup_chains();
    let alice = ctx(ALICE);

    c.origin_token
        .approve(&alice, c.origin.address(), whole_units(100))
        .unwrap();
    c.origin
        .transfer_to_polygon(&mut c.origin_token, &alice, whole_units(100))
        .unwrap();
    relay_to_destination(&mut c);
    assert_eq!(c.wrapped.balance_of(&addr(ALICE)), whole_units(100));
    assert_eq!(c.wrapped.total_supply(), c.origin.total_staked());

    c.wrapped
        .approve(&alice, c.destination.address(), whole_units(40))
        .unwrap();
    c.destination
        .transfer_to_ethereum(&mut c.wrapped, &alice, whole_units(40))
        .unwrap();
    relay_to_origin(&mut c);

    assert_eq!(c.origin.stake_of(&addr(ALICE)), whole_units(60));
    assert_eq!(c.wrapped.total_supply(), whole_units(60));
    assert_eq!(c.wrapped.total_supply(), c.origin.total_staked());
    assert_eq!(
        c.origin_token.balance_of(&c.origin.address()),
        whole_units(100)
    );
    assert_eq!(
        c.origin_token.max_supply(),
        c.origin_token.total_supply()
    );
}

#[test]
fn test_relayed_orders_replayed_twice_are_bounded() {
    let mut c = setup_chains();
    let alice = ctx(ALICE);
    c.origin_token
        .approve(&alice, c.origin.address(), whole_units(10))
        .unwrap();
    c.origin
        .transfer_to_polygon(&mut c.origin_token, &alice, whole_units(10))
        .unwrap();
    relay_to_destination(&mut c);
    c.wrapped
        .approve(&alice, c.destination.address(), whole_units(10))
        .unwrap();
    c.destination
        .transfer_to_ethereum(&mut c.wrapped, &alice, whole_units(10))
        .unwrap();

    let burns = c.destination.drain_events();
    for event in burns.iter().chain(burns.iter()) {
        if let ContractEvent::TransferToEthereum(burn) = event {
            let _ = c.origin.un_stake(&ctx(OWNER), burn.from, burn.amount);
        }
    }
    assert!(c.origin.stake_of(&addr(ALICE)).is_zero());
    assert!(c.origin.total_staked().is_zero());
}

// ═══════════════════════════════════════════════════════════════════
// Blacklist
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_blacklisted_sender_cannot_bridge() {
    let mut c = setup_chains();
    let owner = ctx(OWNER);
    let bob = ctx(BOB);
    c.origin_token
        .approve(&bob, c.origin.address(), whole_units(5))
        .unwrap();
    c.origin
        .add_address_to_black_list(&owner, addr(BOB))
        .unwrap();

    let err = c
        .origin
        .transfer_to_polygon(&mut c.origin_token, &bob, whole_units(5))
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid sender");

    c.origin
        .remove_address_from_black_list(&owner, addr(BOB))
        .unwrap();
    c.origin
        .transfer_to_polygon(&mut c.origin_token, &bob, whole_units(5))
        .unwrap();
    assert_eq!(c.origin.stake_of(&addr(BOB)), whole_units(5));
}

#[test]
fn test_blacklisted_recipient_blocks_mint() {
    let mut c = setup_chains();
    let owner = ctx(OWNER);
    c.destination
        .add_address_to_black_list(&owner, addr(BOB))
        .unwrap();

    let err = c
        .destination
        .mint_to(&mut c.wrapped, &owner, addr(BOB), whole_units(1))
        .unwrap_err();
    assert_eq!(err, BridgeError::RecipientBlacklisted);

    let err = c
        .destination
        .add_address_to_black_list(&owner, addr(BOB))
        .unwrap_err();
    assert_eq!(err, BridgeError::Blacklist(BlacklistError::AlreadyListed));
    let err = c
        .destination
        .remove_address_from_black_list(&owner, addr(ALICE))
        .unwrap_err();
    assert_eq!(err, BridgeError::Blacklist(BlacklistError::NotListed));
}

#[test]
fn test_blacklisted_owner_cannot_unstake() {
    let mut c = setup_chains();
    let owner = ctx(OWNER);
    let alice = ctx(ALICE);
    c.origin_token
        .approve(&alice, c.origin.address(), whole_units(10))
        .unwrap();
    c.origin
        .transfer_to_polygon(&mut c.origin_token, &alice, whole_units(10))
        .unwrap();
    c.origin
        .add_address_to_black_list(&owner, addr(ALICE))
        .unwrap();

    let err = c
        .origin
        .un_stake(&owner, addr(ALICE), whole_units(10))
        .unwrap_err();
    assert_eq!(err, BridgeError::OwnerBlacklisted);
    assert_eq!(c.origin.stake_of(&addr(ALICE)), whole_units(10));
}

#[test]
fn test_blacklist_rejects_zero_and_owner() {
    let mut c = setup_chains();
    let owner = ctx(OWNER);
    assert_eq!(
        c.origin.add_address_to_black_list(&owner, Address::zero()),
        Err(BridgeError::Blacklist(BlacklistError::ZeroAddress))
    );
    assert_eq!(
        c.origin.add_address_to_black_list(&owner, addr(OWNER)),
        Err(BridgeError::Blacklist(BlacklistError::OwnerAddress))
    );
    assert!(!c.origin.is_blacklisted(&addr(OWNER)));
}

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

struct Chains {
    origin_token: OriginToken,
    origin: OriginBridge,
    wrapped: WrappedToken,
    destination: DestinationBridge,
}

fn addr(i: u64) -> Address {
    address_from_index(i)
}

fn ctx(i: u64) -> CallContext {
    CallContext::new(addr(i))
}

/// Origin chain with 1M capped tokens (Alice and Bob hold 1,000 each) and an
/// empty destination chain.
fn setup_chains() -> Chains {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let owner = ctx(OWNER);

    let mut origin_bank = Bank::new();
    let mut origin_token = OriginToken::deploy(
        &mut origin_bank,
        &owner,
        addr(100),
        "ERC20_Ethereum",
        "TETH",
        whole_units(1_000_000),
    )
    .unwrap();
    origin_token
        .transfer(&owner, addr(ALICE), whole_units(1_000))
        .unwrap();
    origin_token
        .transfer(&owner, addr(BOB), whole_units(1_000))
        .unwrap();
    let origin = OriginBridge::deploy(&mut origin_bank, &owner, addr(101), addr(100)).unwrap();

    let mut destination_bank = Bank::new();
    let wrapped =
        WrappedToken::deploy(&mut destination_bank, &owner, addr(200), "ERC20_Polygon", "TPOL")
            .unwrap();
    let destination =
        DestinationBridge::deploy(&mut destination_bank, &owner, addr(201), addr(200)).unwrap();

    Chains {
        origin_token,
        origin,
        wrapped,
        destination,
    }
}

fn relay_to_destination(c: &mut Chains) {
    for event in c.origin.drain_events() {
        if let ContractEvent::TransferToPolygon(order) = event {
            c.destination
                .mint_to(&mut c.wrapped, &ctx(OWNER), order.from, order.amount)
                .unwrap();
        }
    }
}

fn relay_to_origin(c: &mut Chains) {
    for event in c.destination.drain_events() {
        if let ContractEvent::TransferToEthereum(burn) = event {
            c.origin
                .un_stake(&ctx(OWNER), burn.from, burn.amount)
                .unwrap();
        }
    }
}
