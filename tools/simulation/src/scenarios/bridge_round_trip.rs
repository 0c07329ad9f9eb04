//! Bridge round trip
//!
//! Traders escrow random amounts on the origin side and burn random parts
//! of their wrapped balance on the destination side, with the relayer
//! catching up after each call. Wrapped supply must always equal outstanding
//! stake and the bridge's escrow must equal everything ever staked. The run
//! ends by draining every wrapped balance, after which a replayed release
//! must be rejected.

use contracts::ledger::FungibleLedger;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use types::numeric::{checked_add, whole_units, U256};

use crate::chain::Chain;
use crate::config::SimulationConfig;
use crate::metrics::SimMetrics;
use crate::relayer::{self, Relayer};
use crate::scenarios::ScenarioResult;

/// Largest single escrow, in whole tokens.
const MAX_STAKE_TOKENS: u64 = 100;

pub fn run(chain: &mut Chain, config: &SimulationConfig, metrics: &mut SimMetrics) -> ScenarioResult {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1));
    let mut local = SimMetrics::new();
    let mut relayer = Relayer::new();
    let traders = chain.accounts().traders.clone();
    let bridge = chain.state().origin_bridge.address();
    let escrow_start = chain.state().origin_token.balance_of(&bridge);
    let mut staked = U256::zero();
    let mut imbalances = 0u64;
    let mut relay_rejections = 0usize;

    let mut settle = |chain: &mut Chain, relayer: &mut Relayer, staked: U256| -> bool {
        let report = relayer.relay(chain);
        relay_rejections += report.rejected.len();
        let escrow = chain.state().origin_token.balance_of(&bridge);
        chain.bridge_balanced() && escrow == escrow_start.saturating_add(staked)
    };

    for _ in 0..config.bridge_rounds {
        if traders.is_empty() {
            break;
        }
        let trader = rng.gen_range(0..traders.len());
        let amount = whole_units(rng.gen_range(1..=MAX_STAKE_TOKENS));
        let outcome = chain.bridge_out(trader, amount);
        local.record(&outcome);
        if outcome.is_ok() {
            staked = checked_add(staked, amount).unwrap_or(U256::MAX);
        }
        if !settle(chain, &mut relayer, staked) {
            imbalances += 1;
        }

        let wrapped = chain.state().wrapped_token.balance_of(&traders[trader]);
        if wrapped.is_zero() || !rng.gen_bool(0.5) {
            continue;
        }
        let portion = wrapped * U256::from(rng.gen_range(1u64..=100)) / U256::from(100);
        if portion.is_zero() {
            continue;
        }
        let outcome = chain.bridge_back(trader, portion);
        local.record(&outcome);
        if !settle(chain, &mut relayer, staked) {
            imbalances += 1;
        }
    }

    let mut last_release = None;
    for (index, address) in traders.iter().enumerate() {
        let wrapped = chain.state().wrapped_token.balance_of(address);
        if wrapped.is_zero() {
            continue;
        }
        let outcome = chain.bridge_back(index, wrapped);
        local.record(&outcome);
        if outcome.is_ok() {
            last_release = Some((*address, wrapped));
        }
    }
    if !settle(chain, &mut relayer, staked) {
        imbalances += 1;
    }

    let replay_rejected = match last_release {
        Some((owner, amount)) => relayer::release(chain, owner, amount).is_err(),
        None => true,
    };
    let drained = chain.state().origin_bridge.total_staked().is_zero();

    let passed = imbalances == 0 && relay_rejections == 0 && replay_rejected && drained;
    let details = format!(
        "{} bridge calls accepted, {} rejected. Total escrowed {}, imbalances {}, replay rejected: {}.",
        local.accepted, local.rejected, staked, imbalances, replay_rejected,
    );
    let result = ScenarioResult::new(
        "bridge_round_trip",
        config.bridge_rounds as u64,
        chain,
        &local,
        passed,
        details,
    );
    metrics.merge(&local);
    result
}
