//! Harness property tests
//!
//! Every scenario must pass for any seed, and the full run must export a
//! consistent report.

use bridge_simulation::chain::Chain;
use bridge_simulation::config::SimulationConfig;
use bridge_simulation::export::{export_json, SimulationExport};
use bridge_simulation::metrics::SimMetrics;
use bridge_simulation::relayer::Relayer;
use bridge_simulation::run_all;
use types::numeric::whole_units;

// ═══════════════════════════════════════════════════════════════════
// Full Run
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_run_all_passes_and_exports() {
    let config = SimulationConfig {
        swap_steps: 80,
        bridge_rounds: 10,
        ..SimulationConfig::default()
    };
    let export = run_all(&config).unwrap();
    assert_eq!(export.scenarios.len(), 3);
    assert!(export.all_passed(), "{:?}", export.scenarios);
    assert_eq!(export.metrics.invariant_violations, 0);

    let parsed: SimulationExport = serde_json::from_str(&export_json(&export)).unwrap();
    assert_eq!(parsed.metrics, export.metrics);
}

#[test]
fn test_bootstrap_rejects_bad_config() {
    let config = SimulationConfig {
        seed_ether: rust_decimal::Decimal::ZERO,
        ..SimulationConfig::default()
    };
    let err = Chain::bootstrap(&config).err().unwrap();
    assert_eq!(err.reason(), "No ethers deposited");
}

// ═══════════════════════════════════════════════════════════════════
// Relayed Bridge
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_blacklisted_recipient_mint_is_reported() {
    init_tracing();
    let mut chain = Chain::bootstrap(&SimulationConfig::default()).unwrap();
    let mut relayer = Relayer::new();
    let trader = chain.accounts().trader(2).unwrap();

    chain
        .transact("addAddressToBlackList", |s, accounts| {
            Ok(s.destination_bridge.add_address_to_black_list(
                &contracts::context::CallContext::new(accounts.owner),
                trader,
            )?)
        })
        .unwrap();
    chain.bridge_out(2, whole_units(5)).unwrap();
    let report = relayer.relay(&mut chain);

    assert_eq!(report.minted, 0);
    assert_eq!(report.rejected, vec!["_to address is in blacklist".to_string()]);
    assert!(!chain.bridge_balanced());
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ═══════════════════════════════════════════════════════════════════
// Fuzz Tests (Proptest)
// ═══════════════════════════════════════════════════════════════════

mod fuzz {
    use super::*;
    use bridge_simulation::scenarios::{bridge_round_trip, swap_sequence};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Invariant: the swap scenario passes for every seed.
        #[test]
        fn fuzz_swap_sequence_any_seed(seed in any::<u64>()) {
            let config = SimulationConfig { seed, swap_steps: 40, ..SimulationConfig::default() };
            let mut chain = Chain::bootstrap(&config).unwrap();
            let result = swap_sequence::run(&mut chain, &config, &mut SimMetrics::new());
            prop_assert!(result.passed, "{}", result.details);
        }

        /// Invariant: wrapped supply tracks origin stake for every seed.
        #[test]
        fn fuzz_bridge_round_trip_any_seed(seed in any::<u64>()) {
            let config = SimulationConfig { seed, bridge_rounds: 8, ..SimulationConfig::default() };
            let mut chain = Chain::bootstrap(&config).unwrap();
            let result = bridge_round_trip::run(&mut chain, &config, &mut SimMetrics::new());
            prop_assert!(result.passed, "{}", result.details);
            prop_assert!(chain.bridge_balanced());
        }
    }
}
