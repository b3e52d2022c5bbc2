//! Vertex enumeration for 2D bounded halfspace systems.

use fb_core::Real;
use nalgebra::{DMatrix, DVector};

use crate::error::{GeomResult, GeometryError};
use crate::hull::non_redundant_indices;

/// Cartesian vertices of the polygon `{x : A x ≤ b}`, unordered.
///
/// This is the double description method specialized to the plane: with
/// every `b` strictly positive the origin is interior, so the hull-dual
/// reduction yields exactly the facets of the polygon; sorting the facet
/// normals by angle makes adjacent facets neighbours, and each adjacent
/// pair intersects in one vertex. Redundant rows in the input are
/// accepted and filtered out.
///
/// Fails with [`GeometryError::Unbounded`] when the system admits rays
/// (the facet normals leave an angular gap of π or more) and with
/// [`GeometryError::Degenerate`] when no proper polygon exists.
pub fn enumerate_vertices(
    a_hat: &DMatrix<Real>,
    ram: &DVector<Real>,
) -> GeomResult<Vec<[Real; 2]>> {
    // Rays exist iff all constraint normals fit a closed halfplane.
    let mut angles: Vec<Real> = (0..a_hat.nrows())
        .filter(|&r| a_hat[(r, 0)] != 0.0 || a_hat[(r, 1)] != 0.0)
        .map(|r| a_hat[(r, 1)].atan2(a_hat[(r, 0)]))
        .collect();
    if angles.is_empty() {
        return Err(GeometryError::Degenerate {
            what: "all constraint normals are zero".into(),
        });
    }
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let max_gap = angles
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(
            // wrap-around gap
            angles[0] + 2.0 * std::f64::consts::PI - angles[angles.len() - 1],
            Real::max,
        );
    if max_gap >= std::f64::consts::PI - 1e-9 {
        return Err(GeometryError::Unbounded {
            what: format!("normals span an angular gap of {max_gap:.4} rad"),
        });
    }

    let facets = non_redundant_indices(a_hat, ram)?;

    // Order facets by normal angle; neighbours intersect in a vertex.
    let mut ordered = facets;
    ordered.sort_by(|&i, &j| {
        let ai = a_hat[(i, 1)].atan2(a_hat[(i, 0)]);
        let aj = a_hat[(j, 1)].atan2(a_hat[(j, 0)]);
        ai.partial_cmp(&aj).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut vertices = Vec::with_capacity(ordered.len());
    for k in 0..ordered.len() {
        let i = ordered[k];
        let j = ordered[(k + 1) % ordered.len()];
        let (a0, a1, b0) = (a_hat[(i, 0)], a_hat[(i, 1)], ram[i]);
        let (c0, c1, b1) = (a_hat[(j, 0)], a_hat[(j, 1)], ram[j]);
        let det = a0 * c1 - a1 * c0;
        if det.abs() < 1e-12 {
            return Err(GeometryError::Degenerate {
                what: format!("facets {i} and {j} are parallel"),
            });
        }
        let x = (b0 * c1 - b1 * a1) / det;
        let y = (a0 * b1 - c0 * b0) / det;
        vertices.push([x, y]);
    }
    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_yields_three_vertices() {
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, -1.0, 1.0, 0.0, -1.0]);
        let b = DVector::from_column_slice(&[10.0, 10.0, 10.0]);
        let vertices = enumerate_vertices(&a, &b).unwrap();
        assert_eq!(vertices.len(), 3);
        // Every vertex satisfies the full system.
        for v in &vertices {
            for r in 0..3 {
                let lhs = a[(r, 0)] * v[0] + a[(r, 1)] * v[1];
                assert!(lhs <= b[r] + 1e-9);
            }
        }
    }

    #[test]
    fn unit_square() {
        let a = DMatrix::from_row_slice(
            4,
            2,
            &[1.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0, -1.0],
        );
        let b = DVector::from_column_slice(&[1.0, 1.0, 1.0, 1.0]);
        let mut vertices = enumerate_vertices(&a, &b).unwrap();
        vertices.sort_by(|p, q| p.partial_cmp(q).unwrap());
        assert_eq!(
            vertices,
            vec![[-1.0, -1.0], [-1.0, 1.0], [1.0, -1.0], [1.0, 1.0]]
        );
    }

    #[test]
    fn redundant_rows_do_not_add_vertices() {
        let a = DMatrix::from_row_slice(
            5,
            2,
            &[1.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0, -1.0, 1.0, 0.0],
        );
        let b = DVector::from_column_slice(&[1.0, 1.0, 1.0, 1.0, 5.0]);
        let vertices = enumerate_vertices(&a, &b).unwrap();
        assert_eq!(vertices.len(), 4);
    }

    #[test]
    fn open_system_is_unbounded() {
        // Nothing bounds y from below.
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, -1.0, 0.0]);
        let b = DVector::from_column_slice(&[1.0, 1.0, 1.0]);
        let err = enumerate_vertices(&a, &b).unwrap_err();
        assert!(matches!(err, GeometryError::Unbounded { .. }));
    }

    #[test]
    fn strip_is_unbounded() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, -1.0, 0.0]);
        let b = DVector::from_column_slice(&[1.0, 1.0]);
        let err = enumerate_vertices(&a, &b).unwrap_err();
        assert!(matches!(err, GeometryError::Unbounded { .. }));
    }
}
