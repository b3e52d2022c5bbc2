//! Clipped line segments for each constraint row.

use fb_core::Real;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{GeomResult, GeometryError};
use crate::viewport::Viewport;

/// Sampling configuration for drawable segments.
#[derive(Debug, Clone, Copy)]
pub struct LineGenConfig {
    /// Sample points per segment; cosmetic resolution for hover data.
    pub steps: usize,
    /// Multiplicative visibility tolerance on the viewport bounds
    /// (the viewport spans the origin, so scaling expands both sides).
    pub eps: Real,
}

impl Default for LineGenConfig {
    fn default() -> Self {
        Self { steps: 10, eps: 1.001 }
    }
}

/// One constraint rendered as a sampled polyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Row index into the constraint table this segment belongs to.
    pub row: usize,
    pub xs: Vec<Real>,
    pub ys: Vec<Real>,
}

/// Drawable segments split from numerically degenerate ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineSet {
    /// Segments fully inside the (epsilon-expanded) viewport.
    pub visible: Vec<Segment>,
    /// Segments with non-finite or missing coordinates; reported, not
    /// drawn.
    pub degenerate: Vec<Segment>,
}

fn linspace(lo: Real, hi: Real, steps: usize) -> Vec<Real> {
    // callers guarantee steps >= 2
    let step = (hi - lo) / (steps - 1) as Real;
    (0..steps).map(|i| lo + step * i as Real).collect()
}

/// Convert each selected inequality `a0·x + a1·y ≤ b` into a clipped
/// 2-point (sampled) line segment in the viewport.
///
/// Axis-parallel rows span the viewport directly; for the rest the
/// parametrization axis with the shallower implied slope is chosen so
/// near-vertical lines are not sampled along x (and vice versa).
///
/// Fails with [`GeometryError::Config`] when the configured step count
/// cannot describe a segment (fewer than 2 samples).
pub fn generate_lines(
    a_hat: &DMatrix<Real>,
    ram: &DVector<Real>,
    indices: &[usize],
    viewport: &Viewport,
    config: &LineGenConfig,
) -> GeomResult<LineSet> {
    if config.steps < 2 {
        return Err(GeometryError::Config {
            what: format!("line sampling needs at least 2 steps, got {}", config.steps),
        });
    }
    let Viewport {
        x_min,
        x_max,
        y_min,
        y_max,
    } = *viewport;
    let mut set = LineSet::default();

    for &row in indices {
        let (a0, a1, b) = (a_hat[(row, 0)], a_hat[(row, 1)], ram[row]);
        if a0 == 0.0 && a1 == 0.0 {
            continue;
        }

        let (xs, ys): (Vec<Real>, Vec<Real>) = if a0 == 0.0 {
            let xs = linspace(x_min, x_max, config.steps);
            let ys = vec![b / a1; xs.len()];
            (xs, ys)
        } else if a1 == 0.0 {
            let ys = linspace(y_min, y_max, config.steps);
            let xs = vec![b / a0; ys.len()];
            (xs, ys)
        } else if (a1 / a0).abs() > 1.0 {
            // |dy/dx| = |a0/a1| < 1, a shallow line: sample over x,
            // clipping the x range by the y bounds
            let x_at_ymax = (b - y_max * a1) / a0;
            let x_at_ymin = (b - y_min * a1) / a0;
            let lo = x_min.max(x_at_ymax.min(x_at_ymin));
            let hi = x_max.min(x_at_ymax.max(x_at_ymin));
            let xs = linspace(lo, hi, config.steps);
            let ys = xs.iter().map(|&x| (b - x * a0) / a1).collect();
            (xs, ys)
        } else {
            let y_at_xmax = (b - x_max * a0) / a1;
            let y_at_xmin = (b - x_min * a0) / a1;
            let lo = y_min.max(y_at_xmax.min(y_at_xmin));
            let hi = y_max.min(y_at_xmax.max(y_at_xmin));
            let ys = linspace(lo, hi, config.steps);
            let xs = ys.iter().map(|&y| (b - y * a1) / a0).collect();
            (xs, ys)
        };

        let finite = xs.iter().chain(ys.iter()).all(|v| v.is_finite());
        let complete = xs.len() == config.steps && ys.len() == config.steps;
        let visible = finite
            && xs
                .iter()
                .all(|&x| x <= x_max * config.eps && x >= x_min * config.eps)
            && ys
                .iter()
                .all(|&y| y <= y_max * config.eps && y >= y_min * config.eps);

        let segment = Segment { row, xs, ys };
        if !finite || !complete {
            set.degenerate.push(segment);
        } else if visible {
            set.visible.push(segment);
        }
        // finite but out of view: clipped away entirely, nothing to draw
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
        }
    }

    fn lines_for(rows: &[[Real; 3]]) -> LineSet {
        let a = DMatrix::from_fn(rows.len(), 2, |r, c| rows[r][c]);
        let b = DVector::from_iterator(rows.len(), rows.iter().map(|r| r[2]));
        let indices: Vec<usize> = (0..rows.len()).collect();
        generate_lines(&a, &b, &indices, &viewport(), &LineGenConfig::default()).unwrap()
    }

    #[test]
    fn horizontal_line_spans_the_viewport() {
        let set = lines_for(&[[0.0, 2.0, 10.0]]);
        assert_eq!(set.visible.len(), 1);
        let seg = &set.visible[0];
        assert_eq!(seg.xs.first(), Some(&-10.0));
        assert_eq!(seg.xs.last(), Some(&10.0));
        assert!(seg.ys.iter().all(|&y| y == 5.0));
    }

    #[test]
    fn vertical_line_spans_the_viewport() {
        let set = lines_for(&[[4.0, 0.0, 8.0]]);
        assert_eq!(set.visible.len(), 1);
        let seg = &set.visible[0];
        assert!(seg.xs.iter().all(|&x| x == 2.0));
        assert_eq!(seg.ys.first(), Some(&-10.0));
        assert_eq!(seg.ys.last(), Some(&10.0));
    }

    #[test]
    fn sloped_line_stays_in_viewport() {
        // x + y <= 5, slope -1: parametrized over y
        let set = lines_for(&[[1.0, 1.0, 5.0]]);
        assert_eq!(set.visible.len(), 1);
        let seg = &set.visible[0];
        assert_eq!(seg.xs.len(), 10);
        for (x, y) in seg.xs.iter().zip(&seg.ys) {
            assert!((x + y - 5.0).abs() < 1e-9);
            assert!(*x >= -10.001 && *x <= 10.001);
            assert!(*y >= -10.001 && *y <= 10.001);
        }
    }

    #[test]
    fn steep_line_is_parametrized_over_x() {
        // x + 5y <= 5 has |a1/a0| = 5 > 1
        let set = lines_for(&[[1.0, 5.0, 5.0]]);
        assert_eq!(set.visible.len(), 1);
        let seg = &set.visible[0];
        for (x, y) in seg.xs.iter().zip(&seg.ys) {
            assert!((x + 5.0 * y - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn far_away_line_is_dropped_silently() {
        let set = lines_for(&[[0.0, 1.0, 1000.0]]);
        assert!(set.visible.is_empty());
        assert!(set.degenerate.is_empty());
    }

    #[test]
    fn non_finite_coordinates_go_to_the_error_bucket() {
        let set = lines_for(&[[1.0, 2.0, Real::INFINITY]]);
        assert_eq!(set.visible.len(), 0);
        assert_eq!(set.degenerate.len(), 1);
    }

    #[test]
    fn vacuous_rows_are_skipped() {
        let set = lines_for(&[[0.0, 0.0, 1.0]]);
        assert!(set.visible.is_empty());
        assert!(set.degenerate.is_empty());
    }

    #[test]
    fn step_count_is_configurable() {
        let a = DMatrix::from_row_slice(1, 2, &[0.0, 1.0]);
        let b = DVector::from_column_slice(&[5.0]);
        let config = LineGenConfig { steps: 25, eps: 1.001 };
        let set = generate_lines(&a, &b, &[0], &viewport(), &config).unwrap();
        assert_eq!(set.visible[0].xs.len(), 25);
    }

    #[test]
    fn too_few_steps_is_a_configuration_error() {
        let a = DMatrix::from_row_slice(1, 2, &[0.0, 1.0]);
        let b = DVector::from_column_slice(&[5.0]);
        for steps in [0, 1] {
            let config = LineGenConfig { steps, eps: 1.001 };
            let err = generate_lines(&a, &b, &[0], &viewport(), &config).unwrap_err();
            assert!(matches!(err, GeometryError::Config { .. }), "steps = {steps}");
        }
    }
}
