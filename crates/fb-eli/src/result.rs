//! Allocation result value objects.

use fb_core::{Real, Zone, ZoneIndex, ZonePair};
use fb_data::{DataResult, ExchangeObservation, ExchangeTable};
use serde::{Deserialize, Serialize};

/// Decomposition of one observed directed exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowDecomposition {
    pub pair: ZonePair,
    /// Observed scheduled exchange.
    pub observed: Real,
    /// Modelled total flow.
    pub total: Real,
    /// Flow-based component.
    pub fb: Real,
    /// Long-term-allocation component.
    pub lta: Real,
    /// LTA limit in this direction (0 where undefined).
    pub lta_limit: Real,
    pub slack_pos: Real,
    pub slack_neg: Real,
}

/// Decomposition of one zone's net position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetPosDecomposition {
    pub zone: Zone,
    /// Observed market clearing point.
    pub mcp: Real,
    /// Modelled total (fixed to the MCP).
    pub total: Real,
    pub fb: Real,
    pub lta: Real,
    /// Net balancing slack (positive minus negative part).
    pub slack: Real,
}

/// One constraint row whose capacity had to be relaxed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityRelaxation {
    pub row: usize,
    pub branch: String,
    pub outage: String,
    /// Capacity slack used by the optimum.
    pub slack: Real,
    /// RAM after adding the slack.
    pub relaxed_ram: Real,
}

/// Output of one allocation solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResult {
    pub flows: Vec<FlowDecomposition>,
    pub net_positions: Vec<NetPosDecomposition>,
    /// Consistent FB/LTA blending ratio in [0, 1].
    pub alpha: Real,
    /// Rows whose capacity slack exceeded the materiality threshold.
    pub relaxations: Vec<CapacityRelaxation>,
    pub total_capacity_slack: Real,
}

impl AllocationResult {
    /// The flow-based exchange view: observed pairs with their FB
    /// component as value. This is what the domain corrector consumes
    /// when re-centering on the FB-only operating point.
    pub fn fb_exchange(&self, zones: &ZoneIndex) -> DataResult<ExchangeTable> {
        let entries = self
            .flows
            .iter()
            .map(|f| ExchangeObservation {
                from: f.pair.from.clone(),
                to: f.pair.to.clone(),
                value: f.fb,
            })
            .collect();
        ExchangeTable::new(entries, zones)
    }
}
