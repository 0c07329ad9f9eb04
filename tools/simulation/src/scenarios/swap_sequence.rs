//! Randomized swap sequence
//!
//! Traders alternate between selling and buying tokens at random sizes.
//! After every committed swap the live reserve product must stay within
//! rounding of the cached invariant and collected fees must not decrease.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use types::numeric::{whole_units, U256};

use crate::chain::Chain;
use crate::config::SimulationConfig;
use crate::metrics::SimMetrics;
use crate::scenarios::ScenarioResult;

/// Most native coin a buyer attaches, in whole units.
const MAX_ATTACHED_ETHER: u64 = 20;

pub fn run(chain: &mut Chain, config: &SimulationConfig, metrics: &mut SimMetrics) -> ScenarioResult {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut local = SimMetrics::new();
    let trader_count = chain.accounts().traders.len();
    let mut fees_decreased = 0u64;
    let mut check_failures = 0u64;

    for step in 0..config.swap_steps {
        if trader_count == 0 {
            break;
        }
        let trader = rng.gen_range(0..trader_count);
        let amount = whole_units(rng.gen_range(1..=config.max_trade_tokens.max(1)));
        let fees_before = chain.state().exchange.fees_collected();

        let accepted = if rng.gen_bool(0.5) {
            let outcome = chain.sell_tokens(trader, amount);
            local.record(&outcome);
            outcome.is_ok()
        } else {
            let value = whole_units(rng.gen_range(1..=MAX_ATTACHED_ETHER));
            let outcome = chain.buy_tokens(trader, amount, value);
            local.record(&outcome);
            outcome.is_ok()
        };
        if !accepted {
            continue;
        }

        if !fees_monotonic(fees_before, chain.state().exchange.fees_collected()) {
            fees_decreased += 1;
        }
        match chain.invariant_check() {
            Ok(check) => {
                local.record_invariant(&check);
                debug!(step, drift = %check.drift(), "Invariant checked");
            }
            Err(_) => check_failures += 1,
        }
    }

    let passed = local.invariant_violations == 0 && fees_decreased == 0 && check_failures == 0;
    let details = format!(
        "{} swaps accepted, {} rejected. Max drift {} base units, fees collected {}.",
        local.accepted,
        local.rejected,
        local.max_invariant_drift,
        chain.state().exchange.fees_collected(),
    );
    let result = ScenarioResult::new(
        "swap_sequence",
        config.swap_steps as u64,
        chain,
        &local,
        passed,
        details,
    );
    metrics.merge(&local);
    result
}

/// Fees never shrink between two observations unless withdrawn.
pub fn fees_monotonic(before: U256, after: U256) -> bool {
    after >= before
}
