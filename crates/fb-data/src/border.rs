//! Directed long-term allocation limits (LTA / LTN).

use std::collections::HashMap;

use fb_core::{Real, ZoneIndex, ZonePair};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// One directed border with its allocation limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderLimit {
    pub from: fb_core::Zone,
    pub to: fb_core::Zone,
    pub limit: Real,
}

/// Allocation limits keyed by directed zone pair.
///
/// Absence of a pair means limit = 0: no long-term capacity right exists
/// in that direction.
#[derive(Debug, Clone, Default)]
pub struct BorderLimits {
    limits: HashMap<ZonePair, Real>,
}

impl BorderLimits {
    /// Validate raw entries against the zone ordering.
    pub fn new(entries: Vec<BorderLimit>, zones: &ZoneIndex) -> DataResult<Self> {
        let mut limits = HashMap::with_capacity(entries.len());
        for entry in entries {
            if !entry.limit.is_finite() {
                return Err(DataError::NonFinite {
                    what: format!("border limit {}>{}", entry.from, entry.to),
                });
            }
            zones.require(&entry.from)?;
            zones.require(&entry.to)?;
            limits.insert(ZonePair::new(entry.from, entry.to), entry.limit);
        }
        Ok(Self { limits })
    }

    /// Limit for a directed pair; 0 where no limit is defined.
    pub fn limit(&self, pair: &ZonePair) -> Real {
        self.limits.get(pair).copied().unwrap_or(0.0)
    }

    /// Whether a limit is explicitly defined for this direction.
    pub fn is_defined(&self, pair: &ZonePair) -> bool {
        self.limits.contains_key(pair)
    }

    /// All directed pairs carrying an explicit limit.
    pub fn pairs(&self) -> impl Iterator<Item = (&ZonePair, Real)> {
        self.limits.iter().map(|(p, &l)| (p, l))
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}
