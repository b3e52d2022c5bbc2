//! Boundary-validation error types.

use fb_core::{FbError, Real};
use thiserror::Error;

pub type DataResult<T> = Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error(transparent)]
    Core(#[from] FbError),

    #[error("Constraint row '{branch}' has {actual} PTDF coefficients, expected {expected}")]
    PtdfLength {
        branch: String,
        expected: usize,
        actual: usize,
    },

    #[error("Non-finite value in {what}")]
    NonFinite { what: String },

    #[error("Net positions do not balance over {group}: sum = {sum}")]
    Unbalanced { group: String, sum: Real },

    #[error("Net position table is missing zone {zone}")]
    MissingZone { zone: String },
}
