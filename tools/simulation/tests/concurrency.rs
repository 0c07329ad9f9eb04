//! Concurrency test
//!
//! Verifies that independent chains can run in parallel without data races
//! (each chain owns its state, nothing is shared) and that a seed fully
//! determines the outcome.

use bridge_simulation::chain::Chain;
use bridge_simulation::config::SimulationConfig;
use bridge_simulation::metrics::SimMetrics;
use bridge_simulation::scenarios::{bridge_round_trip, swap_sequence};
use std::thread;

fn config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed,
        swap_steps: 100,
        bridge_rounds: 10,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_concurrent_chains() {
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            thread::spawn(move || {
                let config = config(seed);
                let mut chain = Chain::bootstrap(&config).unwrap();
                let mut metrics = SimMetrics::new();
                let swaps = swap_sequence::run(&mut chain, &config, &mut metrics);
                let bridge = bridge_round_trip::run(&mut chain, &config, &mut metrics);
                assert!(swaps.passed, "{}", swaps.details);
                assert!(bridge.passed, "{}", bridge.details);
                metrics.accepted + metrics.rejected
            })
        })
        .collect();

    let mut total_calls = 0;
    for handle in handles {
        total_calls += handle.join().unwrap();
    }

    assert!(total_calls >= 4 * 100);
}

#[test]
fn test_concurrent_determinism() {
    let run = || {
        thread::spawn(|| {
            let config = config(7);
            let mut chain = Chain::bootstrap(&config).unwrap();
            let mut metrics = SimMetrics::new();
            let result = swap_sequence::run(&mut chain, &config, &mut metrics);
            (
                result,
                metrics,
                chain.state().exchange.fees_collected(),
                chain.ether_reserve(),
            )
        })
    };

    let r1 = run().join().unwrap();
    let r2 = run().join().unwrap();

    assert_eq!(r1, r2, "Parallel runs must produce identical results");
}
