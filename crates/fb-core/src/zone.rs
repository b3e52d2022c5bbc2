//! Bidding-zone identifiers and the zone → matrix-column mapping.
//!
//! Every matrix in the engine (zonal PTDF, flow matrices, incidence
//! matrices) is column-indexed by zone. The ordering is not ambient
//! state: it lives in a [`ZoneIndex`] built once per request and passed
//! explicitly to every component that needs it.

use core::fmt;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{FbError, FbResult};

/// Opaque bidding-zone code (e.g. "DE", "FR", "ALBE").
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(String);

impl Zone {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zone({})", self.0)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Zone {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

/// Directed zone pair, e.g. a commercial exchange direction DE → FR.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ZonePair {
    pub from: Zone,
    pub to: Zone,
}

impl ZonePair {
    pub fn new(from: impl Into<Zone>, to: impl Into<Zone>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Same border, opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

impl fmt::Display for ZonePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.from, self.to)
    }
}

impl From<(&str, &str)> for ZonePair {
    fn from((from, to): (&str, &str)) -> Self {
        Self::new(from, to)
    }
}

/// Bijective zone ↔ column-index map.
///
/// The externally supplied zone ordering defines matrix column indices;
/// O(1) lookup in both directions.
#[derive(Debug, Clone)]
pub struct ZoneIndex {
    zones: Vec<Zone>,
    lookup: HashMap<Zone, usize>,
}

impl ZoneIndex {
    /// Build from an ordered zone list. Duplicates are rejected.
    pub fn from_ordered(zones: Vec<Zone>) -> FbResult<Self> {
        let mut lookup = HashMap::with_capacity(zones.len());
        for (i, zone) in zones.iter().enumerate() {
            if lookup.insert(zone.clone(), i).is_some() {
                return Err(FbError::DuplicateZone {
                    zone: zone.to_string(),
                });
            }
        }
        Ok(Self { zones, lookup })
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Column index of a zone, if it is part of this ordering.
    pub fn index_of(&self, zone: &Zone) -> Option<usize> {
        self.lookup.get(zone).copied()
    }

    /// Column index of a zone, erroring on zones outside the ordering.
    pub fn require(&self, zone: &Zone) -> FbResult<usize> {
        self.index_of(zone).ok_or_else(|| FbError::UnknownZone {
            zone: zone.to_string(),
        })
    }

    /// Column indices for a directed pair.
    pub fn pair_indices(&self, pair: &ZonePair) -> FbResult<(usize, usize)> {
        Ok((self.require(&pair.from)?, self.require(&pair.to)?))
    }

    pub fn contains(&self, zone: &Zone) -> bool {
        self.lookup.contains_key(zone)
    }

    /// Zone at a column index (panics if out of bounds).
    pub fn zone(&self, i: usize) -> &Zone {
        &self.zones[i]
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Zone)> {
        self.zones.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(codes: &[&str]) -> ZoneIndex {
        ZoneIndex::from_ordered(codes.iter().map(|c| Zone::from(*c)).collect()).unwrap()
    }

    #[test]
    fn index_round_trip() {
        let idx = index(&["AT", "BE", "DE", "FR"]);
        assert_eq!(idx.len(), 4);
        for (i, zone) in idx.iter() {
            assert_eq!(idx.index_of(zone), Some(i));
            assert_eq!(idx.zone(i), zone);
        }
    }

    #[test]
    fn duplicate_zone_rejected() {
        let err = ZoneIndex::from_ordered(vec![Zone::from("DE"), Zone::from("DE")]).unwrap_err();
        assert!(matches!(err, FbError::DuplicateZone { .. }));
    }

    #[test]
    fn unknown_zone_errors() {
        let idx = index(&["DE", "FR"]);
        assert!(idx.require(&Zone::from("NL")).is_err());
        assert_eq!(idx.index_of(&Zone::from("NL")), None);
    }

    #[test]
    fn pair_indices_follow_ordering() {
        let idx = index(&["DE", "FR", "NL"]);
        let (f, t) = idx.pair_indices(&ZonePair::new("NL", "DE")).unwrap();
        assert_eq!((f, t), (2, 0));
    }

    #[test]
    fn reversed_pair_swaps_direction() {
        let pair = ZonePair::new("BE", "FR");
        let rev = pair.reversed();
        assert_eq!(rev.from, Zone::from("FR"));
        assert_eq!(rev.to, Zone::from("BE"));
    }
}
