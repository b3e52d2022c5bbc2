//! LP outcome taxonomy.
//!
//! Anything other than an optimal solution must stay distinguishable;
//! none of these are ever converted to zero/NaN results.

use thiserror::Error;

pub type LpResult<T> = Result<T, LpError>;

#[derive(Error, Debug)]
pub enum LpError {
    #[error("LP is infeasible")]
    Infeasible,

    #[error("LP is unbounded")]
    Unbounded,

    #[error("LP solver reported a numerical problem: {what}")]
    Numerical { what: String },

    #[error("Invalid LP model: {what}")]
    InvalidModel { what: String },
}
