//! Stress test: 10,000 swaps
//!
//! Runs a long seeded swap sequence on one chain and asserts the invariant
//! held after every committed swap.

use bridge_simulation::chain::Chain;
use bridge_simulation::config::SimulationConfig;
use bridge_simulation::metrics::SimMetrics;
use bridge_simulation::scenarios::swap_sequence;
use std::time::Instant;

#[test]
#[ignore] // Run with: cargo test --test stress_swaps -- --ignored
fn test_10k_swaps() {
    let config = SimulationConfig {
        swap_steps: 10_000,
        trader_count: 10,
        ..SimulationConfig::default()
    };
    let mut chain = Chain::bootstrap(&config).unwrap();
    let mut metrics = SimMetrics::new();

    let start = Instant::now();
    let result = swap_sequence::run(&mut chain, &config, &mut metrics);
    let elapsed = start.elapsed();

    assert!(result.passed, "{}", result.details);
    assert_eq!(metrics.accepted + metrics.rejected, 10_000);
    assert_eq!(metrics.invariant_violations, 0);
    println!("{} in {:?}", metrics.summary(), elapsed);
}

#[test]
fn test_1k_swaps() {
    let config = SimulationConfig {
        swap_steps: 1_000,
        ..SimulationConfig::default()
    };
    let mut chain = Chain::bootstrap(&config).unwrap();
    let mut metrics = SimMetrics::new();
    let result = swap_sequence::run(&mut chain, &config, &mut metrics);
    assert!(result.passed, "{}", result.details);
    assert!(chain.invariant_check().unwrap().holds());
}
