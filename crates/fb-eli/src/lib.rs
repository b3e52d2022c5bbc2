//! fb-eli: extended LTA inclusion.
//!
//! Reconciles observed market outcomes with the flow-based domain: one
//! LP decomposes the observed net positions and commercial exchange
//! into a flow-based component and a long-term-allocation component,
//! and finds the largest consistent blending ratio Alpha. A second,
//! simpler LP family sweeps objective directions to trace the boundary
//! of the LTA-only feasible region in a chosen 2D projection.

pub mod allocation;
pub mod config;
pub mod error;
pub mod result;
pub mod tracer;

pub use allocation::decompose_exchange;
pub use config::EliConfig;
pub use error::{EliError, EliResult};
pub use result::{AllocationResult, CapacityRelaxation, FlowDecomposition, NetPosDecomposition};
pub use tracer::{trace_lta_boundary, TraceConfig};
