//! Geometry error types.

use fb_core::FbError;
use fb_data::DataError;
use thiserror::Error;

pub type GeomResult<T> = Result<T, GeometryError>;

#[derive(Error, Debug)]
pub enum GeometryError {
    /// Hull or vertex enumeration failed on collinear/coplanar or
    /// zero-capacity input. Distinct from a valid empty result.
    #[error("Degenerate geometry: {what}")]
    Degenerate { what: String },

    /// The halfspace system admits rays; no vertex polygon exists.
    #[error("Unbounded halfspace system: {what}")]
    Unbounded { what: String },

    /// A caller-supplied knob is outside its valid range.
    #[error("Invalid geometry configuration: {what}")]
    Config { what: String },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Core(#[from] FbError),
}
