//! Projection of the zonal constraint system onto a 2D cross-section.

use fb_core::{Real, ZoneIndex};
use fb_data::ProjectionAxes;
use nalgebra::DMatrix;

use crate::error::GeomResult;

/// Project a rows × zones PTDF matrix onto two exchange axes.
///
/// Column 0 is `A[:, x.from] − A[:, x.to]`, column 1 the same for the
/// y pair: moving one MW of exchange from `x.from` to `x.to` loads each
/// branch by exactly that coefficient difference, so the plot plane
/// stays balanced for every point.
pub fn project_ptdf(
    ptdf: &DMatrix<Real>,
    zones: &ZoneIndex,
    axes: &ProjectionAxes,
) -> GeomResult<DMatrix<Real>> {
    let ((xf, xt), (yf, yt)) = axes.indices(zones)?;
    let rows = ptdf.nrows();
    let projected = DMatrix::from_fn(rows, 2, |r, c| {
        let (from, to) = if c == 0 { (xf, xt) } else { (yf, yt) };
        ptdf[(r, from)] - ptdf[(r, to)]
    });
    Ok(projected)
}
