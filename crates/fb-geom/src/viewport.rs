//! Plot viewport bounds.

use fb_core::Real;
use serde::{Deserialize, Serialize};

/// Axis-aligned viewport of a domain plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x_min: Real,
    pub x_max: Real,
    pub y_min: Real,
    pub y_max: Real,
}

impl Viewport {
    /// Viewport covering twice the extent of the polygon.
    ///
    /// The feasible region always contains the origin (capacities are
    /// strictly positive), so doubling the vertex extrema widens the
    /// view on all sides.
    pub fn around(polygon: &[[Real; 2]]) -> Self {
        let fold = |f: fn(Real, Real) -> Real, init: Real, axis: usize| {
            polygon.iter().map(|p| p[axis]).fold(init, f)
        };
        Self {
            x_min: fold(Real::min, Real::INFINITY, 0) * 2.0,
            x_max: fold(Real::max, Real::NEG_INFINITY, 0) * 2.0,
            y_min: fold(Real::min, Real::INFINITY, 1) * 2.0,
            y_max: fold(Real::max, Real::NEG_INFINITY, 1) * 2.0,
        }
    }

    /// Expand to also cover the given points (e.g. an overlay polygon).
    pub fn include_points(&mut self, points: &[[Real; 2]]) {
        for p in points {
            self.x_min = self.x_min.min(p[0]);
            self.x_max = self.x_max.max(p[0]);
            self.y_min = self.y_min.min(p[1]);
            self.y_max = self.y_max.max(p[1]);
        }
    }

    /// Pad each axis by `frac` of its span.
    pub fn expand_margin(&mut self, frac: Real) {
        let x_margin = frac * (self.x_max - self.x_min).abs();
        let y_margin = frac * (self.y_max - self.y_min).abs();
        self.x_min -= x_margin;
        self.x_max += x_margin;
        self.y_min -= y_margin;
        self.y_max += y_margin;
    }
}
