//! The two zone pairs spanning a 2D domain cross-section.

use fb_core::{ZoneIndex, ZonePair};
use serde::{Deserialize, Serialize};

use crate::error::DataResult;

/// Axis pairs of a domain plot.
///
/// Each axis plots the commercial exchange between the pair's zones:
/// positive x means exchange from `x.from` to `x.to`, analogously for y.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionAxes {
    pub x: ZonePair,
    pub y: ZonePair,
}

impl ProjectionAxes {
    pub fn new(x: ZonePair, y: ZonePair) -> Self {
        Self { x, y }
    }

    /// Column indices ((x_from, x_to), (y_from, y_to)); errors on zones
    /// outside the ordering.
    pub fn indices(&self, zones: &ZoneIndex) -> DataResult<((usize, usize), (usize, usize))> {
        Ok((zones.pair_indices(&self.x)?, zones.pair_indices(&self.y)?))
    }

    /// The four directed pairs covered by the plot plane. Exchange on
    /// any other pair is "out of plane" for the Domain Corrector.
    pub fn directed_cover(&self) -> [ZonePair; 4] {
        [
            self.x.clone(),
            self.x.reversed(),
            self.y.clone(),
            self.y.reversed(),
        ]
    }
}
