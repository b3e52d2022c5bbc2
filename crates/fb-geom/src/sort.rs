//! Angular ordering of polygon vertices.

use fb_core::Real;

/// Pseudo-angle of a point in [0°, 360°), `None` at the origin.
///
/// Explicit quadrant split instead of a single `atan2`, so the axis
/// boundaries map deterministically: quadrant I by `asin`, II and III
/// mirrored around 180°, IV wrapped to just below 360°.
pub fn pseudo_angle_deg(x: Real, y: Real) -> Option<Real> {
    let radius = (x * x + y * y).sqrt();
    if radius == 0.0 {
        return None;
    }
    let asin_deg = (y / radius).asin().to_degrees();
    let angle = if x >= 0.0 && y >= 0.0 {
        asin_deg
    } else if x < 0.0 && y > 0.0 {
        180.0 - asin_deg
    } else if x <= 0.0 && y <= 0.0 {
        180.0 - asin_deg
    } else {
        // x > 0, y < 0
        360.0 + asin_deg
    };
    Some(angle)
}

/// Sort points counter-clockwise around the origin and close the
/// polygon by repeating the first point at the end.
///
/// Ties keep input order (stable sort). Points at the origin have no
/// angle; they are excluded rather than fed into a division by zero.
/// An empty input (or one consisting only of origin points) yields an
/// empty polygon.
pub fn sort_vertices(points: &[[Real; 2]]) -> Vec<[Real; 2]> {
    sort_vertices_about(points, [0.0, 0.0])
}

/// [`sort_vertices`] around an arbitrary reference point.
pub fn sort_vertices_about(points: &[[Real; 2]], reference: [Real; 2]) -> Vec<[Real; 2]> {
    let mut angled: Vec<([Real; 2], Real)> = Vec::with_capacity(points.len());
    let mut skipped = 0usize;
    for &p in points {
        match pseudo_angle_deg(p[0] - reference[0], p[1] - reference[1]) {
            Some(angle) => angled.push((p, angle)),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "vertices coincide with the reference point");
    }
    angled.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut sorted: Vec<[Real; 2]> = angled.into_iter().map(|(p, _)| p).collect();
    if let Some(&first) = sorted.first() {
        sorted.push(first);
    }
    sorted
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sorted_angles_are_non_decreasing(
            coords in prop::collection::vec((-1e3_f64..1e3, -1e3_f64..1e3), 1..40)
        ) {
            let points: Vec<[Real; 2]> = coords.iter().map(|&(x, y)| [x, y]).collect();
            let sorted = sort_vertices(&points);
            if sorted.is_empty() {
                return Ok(());
            }
            prop_assert_eq!(sorted.first(), sorted.last());
            let angles: Vec<Real> = sorted[..sorted.len() - 1]
                .iter()
                .filter_map(|p| pseudo_angle_deg(p[0], p[1]))
                .collect();
            for w in angles.windows(2) {
                prop_assert!(w[0] <= w[1]);
            }
        }
    }
}
