//! Simulation metrics
//!
//! Counts accepted and rejected calls, committed events, fees, and the
//! worst invariant drift seen.

use std::collections::BTreeMap;

use contracts::events::ContractEvent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::numeric::{from_base_units, U256};

use crate::chain::{ChainError, InvariantCheck, Receipt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimMetrics {
    pub accepted: u64,
    pub rejected: u64,
    pub rejections_by_reason: BTreeMap<String, u64>,
    pub events_by_label: BTreeMap<String, u64>,
    /// Native fees charged by swaps, in whole units
    pub fees_charged: Decimal,
    /// Native fees paid out to the owner, in whole units
    pub fees_withdrawn: Decimal,
    /// Largest shortfall of the live reserve product below the invariant
    pub max_invariant_drift: U256,
    pub invariant_violations: u64,
}

impl SimMetrics {
    pub fn new() -> Self {
        Self {
            accepted: 0,
            rejected: 0,
            rejections_by_reason: BTreeMap::new(),
            events_by_label: BTreeMap::new(),
            fees_charged: Decimal::ZERO,
            fees_withdrawn: Decimal::ZERO,
            max_invariant_drift: U256::zero(),
            invariant_violations: 0,
        }
    }

    /// Record a committed transaction and its events.
    pub fn record_receipt<T>(&mut self, receipt: &Receipt<T>) {
        self.accepted += 1;
        for event in &receipt.events {
            *self
                .events_by_label
                .entry(event.label().to_string())
                .or_insert(0) += 1;
            match event {
                ContractEvent::EtherPurchased(e) => self.fees_charged += to_units(e.fee),
                ContractEvent::TokenPurchased(e) => self.fees_charged += to_units(e.fee),
                ContractEvent::FeesWithdrawn(e) => self.fees_withdrawn += to_units(e.amount),
                _ => {}
            }
        }
    }

    pub fn record_rejection(&mut self, err: &ChainError) {
        self.rejected += 1;
        *self.rejections_by_reason.entry(err.reason()).or_insert(0) += 1;
    }

    /// Record either outcome of a call.
    pub fn record<T>(&mut self, outcome: &Result<Receipt<T>, ChainError>) {
        match outcome {
            Ok(receipt) => self.record_receipt(receipt),
            Err(err) => self.record_rejection(err),
        }
    }

    pub fn record_invariant(&mut self, check: &InvariantCheck) {
        if check.drift() > self.max_invariant_drift {
            self.max_invariant_drift = check.drift();
        }
        if !check.holds() {
            self.invariant_violations += 1;
        }
    }

    /// Fold another run's counters into this one.
    pub fn merge(&mut self, other: &SimMetrics) {
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        for (reason, count) in &other.rejections_by_reason {
            *self.rejections_by_reason.entry(reason.clone()).or_insert(0) += count;
        }
        for (label, count) in &other.events_by_label {
            *self.events_by_label.entry(label.clone()).or_insert(0) += count;
        }
        self.fees_charged += other.fees_charged;
        self.fees_withdrawn += other.fees_withdrawn;
        self.max_invariant_drift = self.max_invariant_drift.max(other.max_invariant_drift);
        self.invariant_violations += other.invariant_violations;
    }

    pub fn summary(&self) -> String {
        format!(
            "Accepted: {} | Rejected: {} | Fees charged: {} | Fees withdrawn: {} | Max drift: {} | Violations: {}",
            self.accepted,
            self.rejected,
            self.fees_charged,
            self.fees_withdrawn,
            self.max_invariant_drift,
            self.invariant_violations,
        )
    }
}

impl Default for SimMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole units for reporting; amounts beyond `Decimal` range saturate.
fn to_units(amount: U256) -> Decimal {
    from_base_units(amount).unwrap_or(Decimal::MAX)
}
