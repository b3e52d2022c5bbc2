//! Directional sweep approximating the LTA-only feasible region.

use fb_core::{Real, ZoneIndex};
use fb_data::{BorderLimits, ProjectionAxes};
use fb_geom::sort_vertices;
use fb_lp::{LinExpr, LpModel, LpSolve, Relation, Sense};
use rayon::prelude::*;

use crate::error::{EliError, EliResult};

/// Sweep resolution of the boundary tracer.
#[derive(Debug, Clone, Copy)]
pub struct TraceConfig {
    /// Interpolation steps per quadrant; at least 2.
    pub steps_per_quadrant: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            steps_per_quadrant: 8,
        }
    }
}

/// Trace the boundary of the long-term-allocation feasible region in
/// the plot plane.
///
/// Each border with a defined limit gets one exchange variable in
/// `[0, limit]`; zonal net positions are tied to the exchanges through
/// the border incidence and must sum to zero. One LP per objective
/// direction maximizes a weighted combination of the two axis exchanges
/// (weights interpolated across the four sign quadrants) and the
/// optimum's `(netpos[x.from], netpos[y.from])` is recorded as a
/// boundary sample.
///
/// The sweep approximates the exact affine projection of the LTA
/// polytope: a finite number of directions can miss vertices lying
/// between two sampled directions, so the returned polygon is a subset
/// of the true region. Refining `steps_per_quadrant` never shrinks it.
///
/// Returns the sorted, closed overlay polygon (empty when no limit is
/// defined). Solves run in parallel; each direction builds its own
/// model.
pub fn trace_lta_boundary(
    lta: &BorderLimits,
    zones: &ZoneIndex,
    axes: &ProjectionAxes,
    config: &TraceConfig,
    solver: &dyn LpSolve,
) -> EliResult<Vec<[Real; 2]>> {
    if config.steps_per_quadrant < 2 {
        return Err(EliError::Config {
            what: format!(
                "steps_per_quadrant must be at least 2, got {}",
                config.steps_per_quadrant
            ),
        });
    }
    if lta.is_empty() {
        return Ok(Vec::new());
    }

    let ((xf, xt), (yf, yt)) = axes.indices(zones)?;
    let borders: Vec<(usize, usize, Real)> = lta
        .pairs()
        .map(|(pair, limit)| {
            let (f, t) = zones.pair_indices(pair)?;
            Ok((f, t, limit))
        })
        .collect::<Result<_, fb_core::FbError>>()
        .map_err(fb_data::DataError::from)?;

    let n_steps = config.steps_per_quadrant;
    let mut directions = Vec::with_capacity(4 * n_steps);
    for (i, j) in [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)] {
        for n in 0..n_steps {
            let wx = i * (n_steps - 1 - n) as Real;
            let wy = j * n as Real;
            directions.push((wx, wy));
        }
    }

    let samples: Vec<[Real; 2]> = directions
        .par_iter()
        .map(|&(wx, wy)| {
            let mut model = LpModel::new();
            let ex: Vec<_> = borders
                .iter()
                .enumerate()
                .map(|(k, &(_, _, limit))| model.add_var(format!("ex[{k}]"), 0.0, limit))
                .collect();
            let netpos =
                model.add_vector("netpos", zones.len(), -Real::INFINITY, Real::INFINITY);

            for z in 0..zones.len() {
                let mut expr = LinExpr::from(netpos[z]);
                for (k, &(f, t, _)) in borders.iter().enumerate() {
                    if f == z {
                        expr.add_term(ex[k], -1.0);
                    }
                    if t == z {
                        expr.add_term(ex[k], 1.0);
                    }
                }
                model.add_constraint(expr, Relation::Eq);
            }
            model.add_constraint(LinExpr::sum(netpos.iter().copied()), Relation::Eq);

            let mut objective = LinExpr::default();
            objective.add_term(netpos[xf], wx);
            objective.add_term(netpos[xt], -wx);
            objective.add_term(netpos[yf], wy);
            objective.add_term(netpos[yt], -wy);
            model.set_objective(objective, Sense::Maximize);

            let solution = solver.solve(&model)?;
            Ok([solution.value(netpos[xf]), solution.value(netpos[yf])])
        })
        .collect::<EliResult<_>>()?;

    // Repeated directions (zero weights at quadrant edges) yield
    // repeated extreme points.
    let mut points: Vec<[Real; 2]> = Vec::with_capacity(samples.len());
    for p in samples {
        let duplicate = points
            .iter()
            .any(|q| (q[0] - p[0]).abs() < 1e-6 && (q[1] - p[1]).abs() < 1e-6);
        if !duplicate {
            points.push(p);
        }
    }

    tracing::debug!(
        directions = directions.len(),
        distinct = points.len(),
        "traced LTA boundary"
    );
    Ok(sort_vertices(&points))
}
