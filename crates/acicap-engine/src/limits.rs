//! Scalability limits table and resolver.
//!
//! The table is versioned reference data, not code: JSON keyed
//! release -> cluster size -> per-cluster metrics, plus release ->
//! per-fabric metrics with named columns for the scale-profile and
//! endpoint-profile selectors. A missing or unparsable table degrades to
//! the empty table; unresolvable lookups degrade to null maxima, never
//! errors.

use std::collections::BTreeMap;

use acicap_core::dn;
use serde::{Deserialize, Serialize};

use crate::classes;
use crate::index::ClassIndex;

const BUNDLED_LIMITS: &str = include_str!("../data/scalability_limits.json");
const BUNDLED_LINECARDS: &str = include_str!("../data/linecard_ports.json");

/// Column used when a scale-profile tag is unrecognized.
pub const DEFAULT_SCALE_COLUMN: &str = "default";

/// Column used when an endpoint-profile tag is unrecognized.
pub const DEFAULT_ENDPOINT_COLUMN: &str = "dual-stack";

/// Release/cluster-size keyed scalability ceilings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScalabilityTable {
    #[serde(default)]
    pub default_release: Option<String>,
    #[serde(default)]
    pub releases: BTreeMap<String, ReleaseLimits>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseLimits {
    /// Cluster-size keyed metrics; JSON object keys, so sizes are strings.
    #[serde(default)]
    pub per_cluster: BTreeMap<String, ClusterLimits>,
    #[serde(default)]
    pub per_fabric: FabricLimits,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterLimits {
    pub leafs: Option<u64>,
    pub fex: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FabricLimits {
    pub tenants: Option<u64>,
    pub vrfs: Option<u64>,
    pub bds: Option<u64>,
    pub epgs: Option<u64>,
    pub subnets: Option<u64>,
    pub contracts: Option<u64>,
    /// L3Out ceiling per scale-profile column (linecard generation).
    #[serde(default)]
    pub l3outs: BTreeMap<String, u64>,
    /// Endpoints-per-leaf ceiling per deployment-profile column.
    #[serde(default)]
    pub endpoints_per_leaf: BTreeMap<String, u64>,
}

/// Limits applicable to one analyzed fabric, columns already selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLimits {
    /// Release row actually used, None when the table had no usable row.
    pub release_row: Option<String>,
    pub leafs: Option<u64>,
    pub fex: Option<u64>,
    pub tenants: Option<u64>,
    pub vrfs: Option<u64>,
    pub bds: Option<u64>,
    pub epgs: Option<u64>,
    pub subnets: Option<u64>,
    pub contracts: Option<u64>,
    pub l3outs: Option<u64>,
    pub endpoints_per_leaf: Option<u64>,
}

impl ScalabilityTable {
    /// Table shipped with the crate.
    pub fn bundled() -> Self {
        serde_json::from_str(BUNDLED_LIMITS).unwrap_or_default()
    }

    /// Empty table; every lookup yields null maxima.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Resolve the applicable row and columns for one fabric.
    ///
    /// An undocumented release falls back to the default-release row; an
    /// undocumented cluster size leaves the per-cluster metrics null.
    pub fn resolve(
        &self,
        release: &str,
        cluster_size: u32,
        scale_profile: &str,
        endpoint_profile: &str,
    ) -> ResolvedLimits {
        let row_key = if self.releases.contains_key(release) {
            Some(release.to_string())
        } else {
            self.default_release
                .clone()
                .filter(|default| self.releases.contains_key(default))
        };
        let Some(row_key) = row_key else {
            return ResolvedLimits::default();
        };
        let Some(row) = self.releases.get(&row_key) else {
            return ResolvedLimits::default();
        };

        let cluster = row.per_cluster.get(&cluster_size.to_string());
        ResolvedLimits {
            release_row: Some(row_key),
            leafs: cluster.and_then(|limits| limits.leafs),
            fex: cluster.and_then(|limits| limits.fex),
            tenants: row.per_fabric.tenants,
            vrfs: row.per_fabric.vrfs,
            bds: row.per_fabric.bds,
            epgs: row.per_fabric.epgs,
            subnets: row.per_fabric.subnets,
            contracts: row.per_fabric.contracts,
            l3outs: select_column(&row.per_fabric.l3outs, scale_profile, DEFAULT_SCALE_COLUMN),
            endpoints_per_leaf: select_column(
                &row.per_fabric.endpoints_per_leaf,
                endpoint_profile,
                DEFAULT_ENDPOINT_COLUMN,
            ),
        }
    }
}

/// Linecard model to physical spine port count reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinecardCatalog {
    #[serde(default)]
    pub models: BTreeMap<String, u64>,
}

impl LinecardCatalog {
    pub fn bundled() -> Self {
        serde_json::from_str(BUNDLED_LINECARDS).unwrap_or_default()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn port_count(&self, model: &str) -> Option<u64> {
        self.models.get(model).copied()
    }
}

/// Pick a named limit column, degrading to the conservative default.
fn select_column(columns: &BTreeMap<String, u64>, tag: &str, fallback: &str) -> Option<u64> {
    let tag = tag.trim().to_ascii_lowercase();
    columns.get(&tag).or_else(|| columns.get(fallback)).copied()
}

/// Scan controller firmware and system-version attributes for a release.
pub fn detect_release(index: &ClassIndex) -> Option<String> {
    for class in [classes::CONTROLLER_FIRMWARE, classes::TOP_SYSTEM] {
        for attributes in index.records(class) {
            if let Some(release) = attributes.get("version").and_then(|value| dn::release(value))
            {
                return Some(release);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ScalabilityTable {
        ScalabilityTable::from_str(
            r#"{
                "default_release": "6.0",
                "releases": {
                    "6.0": {
                        "per_cluster": {
                            "4": {"leafs": 200, "fex": 500}
                        },
                        "per_fabric": {
                            "tenants": 3000,
                            "epgs": 21000,
                            "l3outs": {"default": 400, "fx": 2400},
                            "endpoints_per_leaf": {"dual-stack": 12000, "high-dual-stack": 40000}
                        }
                    }
                }
            }"#,
        )
        .expect("parse table")
    }

    #[test]
    fn undocumented_release_falls_back_to_default_row() {
        let resolved = table().resolve("5.2", 4, "default", "dual-stack");
        assert_eq!(resolved.release_row.as_deref(), Some("6.0"));
        assert_eq!(resolved.leafs, Some(200));
        assert_eq!(resolved.tenants, Some(3000));
        // A metric absent from the row stays null, not zero.
        assert_eq!(resolved.vrfs, None);
    }

    #[test]
    fn undocumented_cluster_size_leaves_cluster_metrics_null() {
        let resolved = table().resolve("6.0", 7, "default", "dual-stack");
        assert_eq!(resolved.leafs, None);
        assert_eq!(resolved.fex, None);
        assert_eq!(resolved.epgs, Some(21000));
    }

    #[test]
    fn profile_columns_select_and_fall_back() {
        let resolved = table().resolve("6.0", 4, "FX", "high-dual-stack");
        assert_eq!(resolved.l3outs, Some(2400));
        assert_eq!(resolved.endpoints_per_leaf, Some(40000));

        let resolved = table().resolve("6.0", 4, "gen9", "quantum");
        assert_eq!(resolved.l3outs, Some(400));
        assert_eq!(resolved.endpoints_per_leaf, Some(12000));
    }

    #[test]
    fn empty_table_resolves_to_all_null() {
        let resolved = ScalabilityTable::empty().resolve("6.0", 4, "default", "dual-stack");
        assert_eq!(resolved, ResolvedLimits::default());
        assert_eq!(resolved.release_row, None);
    }

    #[test]
    fn bundled_tables_parse() {
        assert!(!ScalabilityTable::bundled().releases.is_empty());
        assert!(!LinecardCatalog::bundled().models.is_empty());
    }
}
