//! Capacity analysis engine for exported fabric inventory.
//!
//! Normalizes loosely-typed export records into a canonical class index,
//! derives cross-referenced metrics from hierarchical identifiers, and maps
//! observed scale against release-dependent limits to compute headroom.

pub mod classes;
pub mod completeness;
pub mod engine;
pub mod errors;
pub mod headroom;
pub mod index;
pub mod limits;
pub mod normalize;
pub mod parser;
pub mod report;

pub use engine::{CapacityEngine, LoadState};
pub use errors::IngestError;
pub use limits::{LinecardCatalog, ResolvedLimits, ScalabilityTable};
pub use report::{CapacityReport, CompletenessReport, HeadroomEntry};
