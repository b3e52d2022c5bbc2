//! fb-lp: backend-agnostic linear programming layer.
//!
//! Models are described as plain data (variables with bounds, linear
//! constraints, a linear objective) and translated to a concrete
//! solver only at the edge, behind the [`LpSolve`] trait. The default
//! backend is `good_lp` with the pure-Rust minilp solver; each solve
//! builds a fresh problem, so independent solves are safe to run
//! concurrently.

pub mod backend;
pub mod error;
pub mod model;

pub use backend::MinilpBackend;
pub use error::{LpError, LpResult};
pub use model::{LinExpr, LpModel, LpSolution, LpSolve, Relation, Sense, VarId};
