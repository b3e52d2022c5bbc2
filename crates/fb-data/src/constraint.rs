//! Critical branch / contingency constraint rows.

use fb_core::{Real, ZoneIndex};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// Minimum RAM admitted into any geometric or optimization use.
///
/// Zero or negative capacities make the polytope degenerate or empty;
/// the published feed occasionally contains them after corrections.
pub const RAM_FLOOR: Real = 1.0;

/// Rendering/reporting classification of a constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowClass {
    /// Normal network state (no outage).
    Basecase,
    /// Single-contingency (N-1) state.
    Contingency,
    /// Individually validated capacity variant appended by IVA expansion.
    IvaAdjusted,
}

/// One critical branch under one contingency, with its zonal PTDF row
/// and remaining available margin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintRow {
    /// Critical network element name.
    pub branch: String,
    /// Contingency name; `"basecase"` marks the N-0 state.
    pub outage: String,
    pub tso: String,
    /// Zonal PTDF coefficients in `ZoneIndex` column order.
    pub ptdf: Vec<Real>,
    /// Remaining available margin (capacity right-hand side).
    pub ram: Real,
    /// Individual validation adjustment; 0 when none was published.
    #[serde(default)]
    pub iva: Real,
    /// Set on rows appended by [`ConstraintTable::with_iva_rows`].
    #[serde(default)]
    pub iva_adjusted: bool,
}

impl ConstraintRow {
    pub fn is_basecase(&self) -> bool {
        self.outage == "basecase"
    }

    pub fn class(&self) -> RowClass {
        if self.iva_adjusted {
            RowClass::IvaAdjusted
        } else if self.is_basecase() {
            RowClass::Basecase
        } else {
            RowClass::Contingency
        }
    }
}

/// Immutable, validated table of constraint rows for one timestamp.
#[derive(Debug, Clone)]
pub struct ConstraintTable {
    rows: Vec<ConstraintRow>,
    n_zones: usize,
}

impl ConstraintTable {
    /// Validate raw rows against a zone ordering.
    ///
    /// Checks PTDF width and finiteness, and drops rows whose zonal
    /// coefficients are all zero (they constrain nothing in the zonal
    /// projection and break hull normalization).
    pub fn new(rows: Vec<ConstraintRow>, zones: &ZoneIndex) -> DataResult<Self> {
        let n_zones = zones.len();
        let mut kept = Vec::with_capacity(rows.len());
        let mut dropped = 0usize;
        for row in rows {
            if row.ptdf.len() != n_zones {
                return Err(DataError::PtdfLength {
                    branch: row.branch,
                    expected: n_zones,
                    actual: row.ptdf.len(),
                });
            }
            if !row.ram.is_finite()
                || !row.iva.is_finite()
                || row.ptdf.iter().any(|c| !c.is_finite())
            {
                return Err(DataError::NonFinite {
                    what: format!("constraint row '{}' / '{}'", row.branch, row.outage),
                });
            }
            if row.ptdf.iter().all(|&c| c == 0.0) {
                dropped += 1;
                continue;
            }
            kept.push(row);
        }
        if dropped > 0 {
            tracing::debug!(dropped, "dropped all-zero PTDF rows");
        }
        Ok(Self {
            rows: kept,
            n_zones,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ConstraintRow] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &ConstraintRow {
        &self.rows[i]
    }

    pub fn n_zones(&self) -> usize {
        self.n_zones
    }

    /// Zonal PTDF as a rows × zones matrix.
    pub fn ptdf_matrix(&self) -> DMatrix<Real> {
        DMatrix::from_fn(self.rows.len(), self.n_zones, |r, c| self.rows[r].ptdf[c])
    }

    /// RAM values as a column vector.
    pub fn ram_vector(&self) -> DVector<Real> {
        DVector::from_iterator(self.rows.len(), self.rows.iter().map(|r| r.ram))
    }

    /// Append, for every row with `iva > 0`, a copy with `ram += iva`.
    ///
    /// Both the unadjusted and the adjusted row constrain the same
    /// physical branch simultaneously; the published feed treats the IVA
    /// variant as an additional capacity statement, not a replacement.
    pub fn with_iva_rows(&self) -> Self {
        let mut rows = self.rows.clone();
        for row in &self.rows {
            if row.iva > 0.0 {
                let mut adjusted = row.clone();
                adjusted.ram += adjusted.iva;
                adjusted.iva_adjusted = true;
                rows.push(adjusted);
            }
        }
        Self {
            rows,
            n_zones: self.n_zones,
        }
    }

    /// New table with `shift[i]` subtracted from row i's RAM.
    ///
    /// Used by the domain corrector to re-center the cross-section onto
    /// the operating point implied by out-of-plane exchange. Panics if
    /// the shift length does not match the row count.
    pub fn with_ram_shift(&self, shift: &[Real]) -> Self {
        assert_eq!(shift.len(), self.rows.len(), "shift/row length mismatch");
        let rows = self
            .rows
            .iter()
            .zip(shift)
            .map(|(row, &s)| {
                let mut row = row.clone();
                row.ram -= s;
                row
            })
            .collect();
        Self {
            rows,
            n_zones: self.n_zones,
        }
    }

    /// Clamp every RAM below `threshold` up to `threshold`.
    ///
    /// Returns the indices of the floored rows so callers can report the
    /// correction instead of silently proceeding.
    pub fn floor_ram(&mut self, threshold: Real) -> Vec<usize> {
        let mut floored = Vec::new();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if row.ram < threshold {
                row.ram = threshold;
                floored.push(i);
            }
        }
        if !floored.is_empty() {
            tracing::warn!(
                count = floored.len(),
                threshold,
                "RAM floored to keep the polytope non-degenerate"
            );
        }
        floored
    }
}
