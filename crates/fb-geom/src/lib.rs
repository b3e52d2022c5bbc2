//! fb-geom: 2D geometry of the flow-based domain.
//!
//! Pipeline for one domain request: project the zonal constraint system
//! onto a pair of exchange axes, select the non-redundant rows, compute
//! and order the feasible-region polygon, optionally re-center the
//! capacities for out-of-plane exchange, and clip each retained
//! inequality into a drawable line segment.
//!
//! Everything here is a pure function of immutable inputs; a
//! [`DomainGeometry`] is built once per request and never mutated.

pub mod correct;
pub mod domain;
pub mod error;
pub mod hull;
pub mod lines;
pub mod project;
pub mod sort;
pub mod vertices;
pub mod viewport;

pub use correct::{correct_for_out_of_plane, CorrectionReport};
pub use domain::{build_domain_geometry, DomainConfig, DomainGeometry, RowInfo};
pub use error::{GeomResult, GeometryError};
pub use hull::{convex_hull_indices, non_redundant_indices};
pub use lines::{generate_lines, LineGenConfig, LineSet, Segment};
pub use project::project_ptdf;
pub use sort::{pseudo_angle_deg, sort_vertices, sort_vertices_about};
pub use vertices::enumerate_vertices;
pub use viewport::Viewport;
