//! fb-core: stable foundation for the flow-based domain engine.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - zone (bidding-zone codes, directed pairs, the ZoneIndex column map)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod zone;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FbError, FbResult};
pub use numeric::*;
pub use zone::*;
