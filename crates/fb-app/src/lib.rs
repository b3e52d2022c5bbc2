//! Shared service layer for the flow-based domain engine.
//!
//! Frontends hand in one [`MarketSnapshot`] (the validated tables of one
//! market time unit) plus requests; this crate orchestrates the geometry
//! pipeline, the allocation model and the LTA tracer, and attaches
//! errors per request so a batch never fails as a whole.

pub mod error;
pub mod service;
pub mod snapshot;

pub use error::{AppError, AppResult};
pub use service::{
    compute_domain, compute_domains, decompose, trace_overlay, CorrectionMode, DomainOptions,
    DomainRequest, DomainResponse,
};
pub use snapshot::{MarketSnapshot, SnapshotFile};
