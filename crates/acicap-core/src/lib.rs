//! Core contracts and helpers for acicap.
//!
//! This crate defines the canonical managed-object model, the
//! distinguished-name grammar helpers, and the fabric-descriptor
//! input contract shared by the engine and the CLI.

pub mod dn;
pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{
    Attributes, DatasetDescriptor, FabricDescriptor, ManagedObject, validate_descriptor,
    DEFAULT_CLUSTER_SIZE, DEFAULT_RELEASE, DEFAULT_TENANT, DEFAULT_UPLINKS_PER_LEAF,
    EPG_SPREAD_LIMIT, FABRIC_DATASET_TYPE, MAX_FEX_NODE_ID,
};

/// Current report contract version for `report.json` artifacts.
pub const REPORT_VERSION: &str = "0.1";
