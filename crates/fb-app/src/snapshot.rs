//! One market time unit's worth of validated input data.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use fb_core::{Real, Tolerances, Zone, ZoneIndex};
use fb_data::{
    BorderLimit, BorderLimits, ConstraintRow, ConstraintTable, CoupledGroups, ExchangeObservation,
    ExchangeTable, NetPositions,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Published MCPs are rounded to fractions of a MW; the zero-sum checks
/// tolerate that rounding.
const BALANCE_TOLERANCE: Tolerances = Tolerances {
    abs: 1e-3,
    rel: 1e-9,
};

/// Raw on-disk snapshot schema (already-parsed publication tables).
#[derive(Debug, Deserialize)]
pub struct SnapshotFile {
    /// Market time unit this snapshot describes.
    pub mtu: DateTime<Utc>,
    /// Zone codes in PTDF column order.
    pub zones: Vec<String>,
    pub constraints: Vec<ConstraintRow>,
    #[serde(default)]
    pub lta: Vec<BorderLimit>,
    pub mcp: HashMap<Zone, Real>,
    #[serde(default)]
    pub exchange: Vec<ExchangeObservation>,
    /// Zone-code prefix marking coupled virtual zones (e.g. `"AL"` for
    /// the ALEGrO pair); their exchange is synthesized from the MCP.
    #[serde(default)]
    pub coupled_prefix: Option<String>,
}

/// Validated, immutable inputs for one market time unit.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub mtu: DateTime<Utc>,
    pub zones: ZoneIndex,
    /// Constraint rows after IVA expansion.
    pub constraints: ConstraintTable,
    pub lta: BorderLimits,
    pub mcp: NetPositions,
    pub exchange: ExchangeTable,
    pub coupled_groups: CoupledGroups,
}

impl MarketSnapshot {
    /// Validate a raw snapshot into typed tables.
    ///
    /// IVA rows are expanded, the MCP balance (global and per coupled
    /// group) is checked, and the coupled virtual-zone exchange is
    /// appended from the MCP sign.
    pub fn from_file_schema(raw: SnapshotFile) -> AppResult<Self> {
        if raw.zones.is_empty() {
            return Err(AppError::Snapshot {
                what: "snapshot declares no zones".into(),
            });
        }
        let zones = ZoneIndex::from_ordered(raw.zones.into_iter().map(Zone::new).collect())?;
        let constraints = ConstraintTable::new(raw.constraints, &zones)?.with_iva_rows();
        if constraints.is_empty() {
            return Err(AppError::Snapshot {
                what: "snapshot contains no usable constraint rows".into(),
            });
        }
        let lta = BorderLimits::new(raw.lta, &zones)?;
        let mcp = NetPositions::new(raw.mcp, &zones)?;

        let coupled_groups = match &raw.coupled_prefix {
            Some(prefix) => CoupledGroups::from_prefix(&zones, prefix),
            None => CoupledGroups::default(),
        };
        mcp.validate_balance(&zones, &coupled_groups, BALANCE_TOLERANCE)?;

        let mut exchange = ExchangeTable::new(raw.exchange, &zones)?;
        for group in &coupled_groups.groups {
            match group.as_slice() {
                [a, b] => {
                    exchange = exchange.with_coupled_pair(&mcp, a, b, &zones)?;
                }
                _ => {
                    return Err(AppError::Snapshot {
                        what: format!(
                            "coupled prefix matches {} zones, expected a pair",
                            group.len()
                        ),
                    });
                }
            }
        }

        tracing::debug!(
            mtu = %raw.mtu,
            zones = zones.len(),
            rows = constraints.len(),
            borders = lta.len(),
            observations = exchange.len(),
            "snapshot loaded"
        );
        Ok(Self {
            mtu: raw.mtu,
            zones,
            constraints,
            lta,
            mcp,
            exchange,
            coupled_groups,
        })
    }

    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let raw: SnapshotFile = serde_json::from_str(json)?;
        Self::from_file_schema(raw)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
