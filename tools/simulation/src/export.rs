//! Metrics and report export
//!
//! Serializes a finished simulation to JSON for external consumption.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SimulationConfig;
use crate::metrics::SimMetrics;
use crate::scenarios::ScenarioResult;

/// Combined export containing all simulation outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationExport {
    pub version: String,
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub config: SimulationConfig,
    pub metrics: SimMetrics,
    pub scenarios: Vec<ScenarioResult>,
    pub event_count: usize,
}

impl SimulationExport {
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(|s| s.passed)
    }
}

/// Build a complete simulation export.
pub fn build_export(
    config: &SimulationConfig,
    metrics: &SimMetrics,
    scenarios: Vec<ScenarioResult>,
    event_count: usize,
) -> SimulationExport {
    SimulationExport {
        version: crate::VERSION.to_string(),
        run_id: Uuid::now_v7(),
        generated_at: Utc::now(),
        config: config.clone(),
        metrics: metrics.clone(),
        scenarios,
        event_count,
    }
}

/// Export complete simulation data as JSON.
pub fn export_json(export: &SimulationExport) -> String {
    serde_json::to_string_pretty(export).unwrap_or_default()
}

/// Write export to a file path.
pub fn write_to_file(export: &SimulationExport, path: &str) -> std::io::Result<()> {
    let json = export_json(export);
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, passed: bool) -> ScenarioResult {
        ScenarioResult {
            name: name.to_string(),
            steps_run: 1,
            accepted: 1,
            rejected: 0,
            events_emitted: 2,
            passed,
            details: String::new(),
        }
    }

    #[test]
    fn test_build_export() {
        let export = build_export(&SimulationConfig::default(), &SimMetrics::new(), vec![], 0);
        assert_eq!(export.version, crate::VERSION);
        assert_eq!(export.event_count, 0);
        assert!(export.all_passed());
    }

    #[test]
    fn test_export_json_roundtrip() {
        let export = build_export(
            &SimulationConfig::default(),
            &SimMetrics::new(),
            vec![result("swap_sequence", true)],
            2,
        );
        let json = export_json(&export);
        let parsed: SimulationExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.run_id, export.run_id);
        assert_eq!(parsed.scenarios, export.scenarios);
        assert_eq!(parsed.config, export.config);
    }

    #[test]
    fn test_failed_scenario_flags_export() {
        let export = build_export(
            &SimulationConfig::default(),
            &SimMetrics::new(),
            vec![result("swap_sequence", true), result("fee_withdrawal", false)],
            4,
        );
        assert!(!export.all_passed());
    }
}
