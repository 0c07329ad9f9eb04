//! Scenario simulation modules
//!
//! Each scenario drives a bootstrapped chain with seeded randomness and
//! checks a conservation property after every committed call.

pub mod bridge_round_trip;
pub mod fee_withdrawal;
pub mod swap_sequence;

use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::metrics::SimMetrics;

/// Result of a scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub steps_run: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub events_emitted: usize,
    pub passed: bool,
    pub details: String,
}

impl ScenarioResult {
    fn new(
        name: &str,
        steps_run: u64,
        chain: &Chain,
        metrics: &SimMetrics,
        passed: bool,
        details: String,
    ) -> Self {
        Self {
            name: name.to_string(),
            steps_run,
            accepted: metrics.accepted,
            rejected: metrics.rejected,
            events_emitted: chain.event_log().len(),
            passed,
            details,
        }
    }
}
