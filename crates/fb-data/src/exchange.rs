//! Observed commercial exchange per directed zone pair.

use fb_core::{Real, Zone, ZoneIndex, ZonePair};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};
use crate::netpos::NetPositions;

/// One directed exchange observation for one time instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeObservation {
    pub from: Zone,
    pub to: Zone,
    pub value: Real,
}

impl ExchangeObservation {
    pub fn pair(&self) -> ZonePair {
        ZonePair::new(self.from.clone(), self.to.clone())
    }
}

/// Validated exchange table for one time instant.
///
/// Observations involving zones outside the supplied ordering are
/// dropped (the published feed reports borders beyond the coupled
/// region); everything kept refers to valid column indices.
#[derive(Debug, Clone, Default)]
pub struct ExchangeTable {
    observations: Vec<ExchangeObservation>,
}

impl ExchangeTable {
    pub fn new(entries: Vec<ExchangeObservation>, zones: &ZoneIndex) -> DataResult<Self> {
        let mut observations = Vec::with_capacity(entries.len());
        let mut dropped = 0usize;
        for obs in entries {
            if !obs.value.is_finite() {
                return Err(DataError::NonFinite {
                    what: format!("exchange {}>{}", obs.from, obs.to),
                });
            }
            if zones.contains(&obs.from) && zones.contains(&obs.to) {
                observations.push(obs);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::debug!(dropped, "dropped exchange observations outside zone set");
        }
        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[ExchangeObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observed value for a directed pair, if an observation exists.
    pub fn value(&self, pair: &ZonePair) -> Option<Real> {
        self.observations
            .iter()
            .find(|o| o.from == pair.from && o.to == pair.to)
            .map(|o| o.value)
    }

    /// Append the hybrid interconnector's virtual-zone exchange.
    ///
    /// The scheduled-exchange feed does not report the border between a
    /// coupled pair of virtual zones (e.g. ALBE↔ALDE); its flow is read
    /// off the MCP instead. The exporting side has the positive net
    /// position.
    pub fn with_coupled_pair(
        mut self,
        mcp: &NetPositions,
        a: &Zone,
        b: &Zone,
        zones: &ZoneIndex,
    ) -> DataResult<Self> {
        let np_a = mcp.value(zones.require(a)?);
        let (from, to, value) = if np_a > 0.0 {
            (a.clone(), b.clone(), np_a)
        } else {
            let np_b = mcp.value(zones.require(b)?);
            (b.clone(), a.clone(), np_b)
        };
        self.observations.push(ExchangeObservation { from, to, value });
        Ok(self)
    }
}
