//! fb-data: typed market-data tables for the flow-based domain engine.
//!
//! The upstream publication feed arrives as loosely-typed tabular JSON.
//! This crate turns it into validated, immutable value types keyed by
//! zone identifiers and directed zone pairs:
//!
//! - [`ConstraintTable`]: critical branch / contingency rows (zonal PTDF,
//!   RAM, metadata), with IVA expansion and RAM flooring
//! - [`BorderLimits`]: directed long-term allocation (LTA/LTN) limits
//! - [`ExchangeTable`]: observed commercial exchange per directed pair
//! - [`NetPositions`]: observed market-clearing net positions (MCP)
//! - [`ProjectionAxes`]: the two zone pairs spanning a 2D cross-section

pub mod axes;
pub mod border;
pub mod constraint;
pub mod error;
pub mod exchange;
pub mod netpos;

pub use axes::ProjectionAxes;
pub use border::{BorderLimit, BorderLimits};
pub use constraint::{ConstraintRow, ConstraintTable, RowClass, RAM_FLOOR};
pub use error::{DataError, DataResult};
pub use exchange::{ExchangeObservation, ExchangeTable};
pub use netpos::{CoupledGroups, NetPositions};
