//! Non-redundancy selection by halfspace/point duality.
//!
//! Each inequality `a·x ≤ b` with `b > 0` normalizes to `(a/b)·x ≤ 1`;
//! the point `D = a/b` lies on the convex hull of all such points
//! exactly when the inequality is not implied by the others (for a
//! bounded system the origin is interior to the hull, which makes the
//! plain hull equivalent to the polar dual).

use fb_core::Real;
use nalgebra::{DMatrix, DVector};

use crate::error::{GeomResult, GeometryError};

/// Indices of the hull vertices of a 2D point set, in counter-clockwise
/// order starting from the lexicographically smallest point.
///
/// Fails on fewer than three distinct points or a fully collinear set;
/// callers must treat that as a degenerate domain, not a crash.
pub fn convex_hull_indices(points: &[[Real; 2]]) -> GeomResult<Vec<usize>> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&i, &j| {
        points[i]
            .partial_cmp(&points[j])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.dedup_by(|&mut i, &mut j| points[i] == points[j]);

    if order.len() < 3 {
        return Err(GeometryError::Degenerate {
            what: format!("{} distinct points, hull needs at least 3", order.len()),
        });
    }

    let cross = |o: usize, a: usize, b: usize| -> Real {
        (points[a][0] - points[o][0]) * (points[b][1] - points[o][1])
            - (points[a][1] - points[o][1]) * (points[b][0] - points[o][0])
    };

    // Andrew monotone chain; strict turns so collinear boundary points
    // (redundant constraints) are excluded.
    let mut hull: Vec<usize> = Vec::with_capacity(order.len() + 1);
    for &i in order.iter().chain(order.iter().rev().skip(1)) {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], i) <= 0.0 {
            hull.pop();
        }
        hull.push(i);
    }
    hull.pop(); // closing duplicate of the start point

    if hull.len() < 3 {
        return Err(GeometryError::Degenerate {
            what: "point set is collinear".into(),
        });
    }
    Ok(hull)
}

/// Row indices of the non-redundant inequalities of `{x : A x ≤ b}`.
///
/// `a_hat` must be the 2-column projected system and every `b` strictly
/// positive (apply the RAM floor first).
pub fn non_redundant_indices(
    a_hat: &DMatrix<Real>,
    ram: &DVector<Real>,
) -> GeomResult<Vec<usize>> {
    if a_hat.nrows() != ram.len() {
        return Err(GeometryError::Degenerate {
            what: format!(
                "matrix has {} rows but {} capacities",
                a_hat.nrows(),
                ram.len()
            ),
        });
    }
    if let Some(i) = ram.iter().position(|&b| b <= 0.0) {
        return Err(GeometryError::Degenerate {
            what: format!("non-positive capacity at row {i} (RAM floor not applied?)"),
        });
    }
    let dual: Vec<[Real; 2]> = (0..a_hat.nrows())
        .map(|r| [a_hat[(r, 0)] / ram[r], a_hat[(r, 1)] / ram[r]])
        .collect();
    convex_hull_indices(&dual)
}
