//! Simulation Harness for the Token Bridge & Exchange
//!
//! Drives the contract layer the way a live deployment would: traders,
//! an owner and a relayer issuing calls against an in-memory chain, with
//! seeded randomized scenarios checking conservation properties.
//!
//! # Modules
//! - `chain`: In-memory chain with atomic transactions and receipts
//! - `config`: Simulation configuration
//! - `relayer`: Mirrors bridge records across both sides
//! - `scenarios`: Swap sequence, bridge round trip, fee withdrawal
//! - `metrics`: Accepted/rejected counters, fees and invariant drift
//! - `export`: JSON export of a finished run

pub mod chain;
pub mod config;
pub mod export;
pub mod metrics;
pub mod relayer;
pub mod scenarios;

use chain::{Chain, ChainError};
use config::SimulationConfig;
use export::SimulationExport;
use metrics::SimMetrics;

/// Crate version constant
pub const VERSION: &str = "1.0.0";

/// Run every scenario on its own freshly bootstrapped chain.
pub fn run_all(config: &SimulationConfig) -> Result<SimulationExport, ChainError> {
    let mut metrics = SimMetrics::new();
    let mut results = Vec::new();
    let mut event_count = 0;

    let runners: [fn(&mut Chain, &SimulationConfig, &mut SimMetrics) -> scenarios::ScenarioResult; 3] = [
        scenarios::swap_sequence::run,
        scenarios::bridge_round_trip::run,
        scenarios::fee_withdrawal::run,
    ];
    for run in runners {
        let mut chain = Chain::bootstrap(config)?;
        results.push(run(&mut chain, config, &mut metrics));
        event_count += chain.event_log().len();
    }

    Ok(export::build_export(config, &metrics, results, event_count))
}
