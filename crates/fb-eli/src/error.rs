//! Allocation error types.

use fb_data::DataError;
use fb_lp::LpError;
use thiserror::Error;

pub type EliResult<T> = Result<T, EliError>;

#[derive(Error, Debug)]
pub enum EliError {
    /// Solver outcome other than optimal; infeasible, unbounded and
    /// numerical failures stay distinguishable.
    #[error(transparent)]
    Lp(#[from] LpError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Invalid allocation configuration: {what}")]
    Config { what: String },
}
