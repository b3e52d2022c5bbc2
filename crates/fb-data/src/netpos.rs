//! Observed market-clearing net positions (MCP).

use std::collections::HashMap;

use fb_core::{Real, Tolerances, Zone, ZoneIndex};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// Zone groups whose net positions must sum to zero on their own,
/// in addition to the global market balance.
///
/// Used for hybrid interconnectors modelled as a pair of virtual zones
/// (e.g. ALBE/ALDE): whatever one virtual zone exports, the other
/// imports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoupledGroups {
    pub groups: Vec<Vec<Zone>>,
}

impl CoupledGroups {
    pub fn new(groups: Vec<Vec<Zone>>) -> Self {
        Self { groups }
    }

    /// Group all zones whose code starts with `prefix` (the convention
    /// used for the ALEGrO virtual zones).
    pub fn from_prefix(zones: &ZoneIndex, prefix: &str) -> Self {
        let group: Vec<Zone> = zones
            .zones()
            .iter()
            .filter(|z| z.as_str().starts_with(prefix))
            .cloned()
            .collect();
        if group.is_empty() {
            Self::default()
        } else {
            Self::new(vec![group])
        }
    }

    /// Column indices per group.
    pub fn indices(&self, zones: &ZoneIndex) -> DataResult<Vec<Vec<usize>>> {
        self.groups
            .iter()
            .map(|g| g.iter().map(|z| Ok(zones.require(z)?)).collect())
            .collect()
    }
}

/// One observed net position per zone, aligned to the zone ordering.
#[derive(Debug, Clone)]
pub struct NetPositions {
    values: Vec<Real>,
}

impl NetPositions {
    /// Build from a zone → value map; every zone of the ordering must be
    /// present.
    pub fn new(by_zone: HashMap<Zone, Real>, zones: &ZoneIndex) -> DataResult<Self> {
        let mut values = Vec::with_capacity(zones.len());
        for zone in zones.zones() {
            let v = *by_zone.get(zone).ok_or_else(|| DataError::MissingZone {
                zone: zone.to_string(),
            })?;
            if !v.is_finite() {
                return Err(DataError::NonFinite {
                    what: format!("net position of {zone}"),
                });
            }
            values.push(v);
        }
        Ok(Self { values })
    }

    pub fn value(&self, zone_idx: usize) -> Real {
        self.values[zone_idx]
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }

    pub fn as_vector(&self) -> DVector<Real> {
        DVector::from_column_slice(&self.values)
    }

    /// Check market balance: the global zone sum and every coupled-group
    /// sum must be zero within tolerance.
    pub fn validate_balance(
        &self,
        zones: &ZoneIndex,
        groups: &CoupledGroups,
        tol: Tolerances,
    ) -> DataResult<()> {
        let total: Real = self.values.iter().sum();
        let scale: Real = self.values.iter().map(|v| v.abs()).sum::<Real>().max(1.0);
        if total.abs() > tol.abs.max(tol.rel * scale) {
            return Err(DataError::Unbalanced {
                group: "all zones".into(),
                sum: total,
            });
        }
        for group_idx in groups.indices(zones)? {
            let sum: Real = group_idx.iter().map(|&i| self.values[i]).sum();
            if sum.abs() > tol.abs.max(tol.rel * scale) {
                let names: Vec<&str> = group_idx
                    .iter()
                    .map(|&i| zones.zone(i).as_str())
                    .collect();
                return Err(DataError::Unbalanced {
                    group: names.join("+"),
                    sum,
                });
            }
        }
        Ok(())
    }
}
