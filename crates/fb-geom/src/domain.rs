//! Assembly of a complete 2D domain geometry.

use fb_core::{Real, ZoneIndex};
use fb_data::{ConstraintTable, ExchangeTable, ProjectionAxes, RowClass, RAM_FLOOR};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::correct::{correct_for_out_of_plane, CorrectionReport};
use crate::error::GeomResult;
use crate::hull::non_redundant_indices;
use crate::lines::{generate_lines, LineGenConfig, LineSet};
use crate::project::project_ptdf;
use crate::sort::sort_vertices;
use crate::vertices::enumerate_vertices;
use crate::viewport::Viewport;

/// Knobs of the geometry pipeline.
#[derive(Debug, Clone, Default)]
pub struct DomainConfig {
    pub lines: LineGenConfig,
    /// Extra polygon (e.g. the LTA overlay) the viewport must cover.
    pub overlay: Option<Vec<[Real; 2]>>,
}

/// Row metadata carried alongside the geometry for reporting/rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowInfo {
    pub branch: String,
    pub outage: String,
    pub tso: String,
    pub class: RowClass,
    /// Whether the row is part of the non-redundant feasible boundary.
    pub in_domain: bool,
}

/// Immutable result of one domain request.
///
/// Constructed per (constraint table, axis pair, correction state);
/// superseded by a fresh object on any input change.
#[derive(Debug, Clone)]
pub struct DomainGeometry {
    /// Projected rows × 2 constraint matrix.
    pub a_hat: DMatrix<Real>,
    /// Capacities after correction and flooring.
    pub ram: DVector<Real>,
    /// Indices of the non-redundant rows.
    pub retained: Vec<usize>,
    /// Closed counter-clockwise boundary of the feasible region.
    pub polygon: Vec<[Real; 2]>,
    /// Clipped constraint lines.
    pub lines: LineSet,
    pub viewport: Viewport,
    pub rows: Vec<RowInfo>,
    pub correction: CorrectionReport,
}

/// Run the full geometry pipeline for one request.
///
/// Project → select non-redundant rows → enumerate and order the
/// feasible-region vertices → fit the viewport → clip every row into a
/// drawable segment. When an exchange table is supplied the capacities
/// are first re-centered for out-of-plane exchange.
pub fn build_domain_geometry(
    table: &ConstraintTable,
    zones: &ZoneIndex,
    axes: &ProjectionAxes,
    exchange: Option<&ExchangeTable>,
    config: &DomainConfig,
) -> GeomResult<DomainGeometry> {
    let (mut table, correction) = match exchange {
        Some(exchange) => correct_for_out_of_plane(table, exchange, axes, zones)?,
        None => (table.clone(), CorrectionReport::default()),
    };
    let floored = table.floor_ram(RAM_FLOOR);
    let correction = CorrectionReport {
        floored_rows: {
            let mut rows = correction.floored_rows;
            rows.extend(floored);
            rows.sort_unstable();
            rows.dedup();
            rows
        },
        ..correction
    };

    let a_hat = project_ptdf(&table.ptdf_matrix(), zones, axes)?;
    let ram = table.ram_vector();

    let retained = non_redundant_indices(&a_hat, &ram)?;
    let vertices = enumerate_vertices(&a_hat, &ram)?;
    let polygon = sort_vertices(&vertices);
    tracing::debug!(
        rows = table.len(),
        retained = retained.len(),
        "feasible region computed"
    );

    let mut viewport = Viewport::around(&vertices);
    if let Some(overlay) = &config.overlay {
        viewport.include_points(overlay);
    }
    viewport.expand_margin(0.2);

    let all_rows: Vec<usize> = (0..table.len()).collect();
    let lines = generate_lines(&a_hat, &ram, &all_rows, &viewport, &config.lines)?;

    let rows = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| RowInfo {
            branch: row.branch.clone(),
            outage: row.outage.clone(),
            tso: row.tso.clone(),
            class: row.class(),
            in_domain: retained.contains(&i),
        })
        .collect();

    Ok(DomainGeometry {
        a_hat,
        ram,
        retained,
        polygon,
        lines,
        viewport,
        rows,
        correction,
    })
}
