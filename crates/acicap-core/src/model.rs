use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dataset type accepted by the ingestion loop.
pub const FABRIC_DATASET_TYPE: &str = "aci";

/// Reserved tenant used when a DN carries no tenant segment.
pub const DEFAULT_TENANT: &str = "common";

/// Controller-cluster size assumed when no controller-role nodes are found.
///
/// Heuristic, not guaranteed accurate; override points do not exist for this
/// value by design (cluster size is always derived from node inventory).
pub const DEFAULT_CLUSTER_SIZE: u32 = 4;

/// Uplinks-per-leaf fallback when neither adjacency evidence nor a
/// descriptor override is available.
pub const DEFAULT_UPLINKS_PER_LEAF: u32 = 2;

/// Limits-table row used when no release is detected or the detected
/// release is undocumented.
pub const DEFAULT_RELEASE: &str = "6.0";

/// Node-number ceiling distinguishing extension-module ids from ordinary
/// switch node ids.
pub const MAX_FEX_NODE_ID: u32 = 200;

/// Row cap for the EPG spread facet.
pub const EPG_SPREAD_LIMIT: usize = 1000;

/// String-keyed attribute map of a managed object.
///
/// `BTreeMap` keeps the serialization canonical, which the dedup key for
/// dn-less records relies on.
pub type Attributes = BTreeMap<String, String>;

/// One configuration/state record from a fabric export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedObject {
    pub class: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl ManagedObject {
    pub fn new(class: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            class: class.into(),
            attributes,
        }
    }

    /// Hierarchical identifier, when the source provided one.
    pub fn dn(&self) -> Option<&str> {
        self.attributes
            .get("dn")
            .map(String::as_str)
            .filter(|dn| !dn.is_empty())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// One declared export file inside a fabric descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(rename = "type")]
    pub dataset_type: String,
    pub format: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Input contract for one fabric: declared datasets plus analysis overrides.
///
/// Dataset list order is significant: it is the sole tie-break for dedup of
/// identifier-less records (first dataset wins).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FabricDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub datasets: Vec<DatasetDescriptor>,
    /// Release override; wins over firmware detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uplinks_per_leaf: Option<u32>,
    /// Scale-profile tag selecting the L3Out limit column; unrecognized
    /// values degrade to the default column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_profile: Option<String>,
    /// Endpoint-profile tag selecting the endpoints-per-leaf limit column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_profile: Option<String>,
}

/// Validate internal consistency of a fabric descriptor.
///
/// This checks:
/// - the fabric name charset and length, when present
/// - non-empty dataset type and format tags
/// - a positive uplinks-per-leaf override
pub fn validate_descriptor(descriptor: &FabricDescriptor) -> Result<()> {
    if let Some(name) = &descriptor.name {
        let valid = Regex::new(r"^[a-zA-Z0-9_.-]{1,64}$")
            .map(|re| re.is_match(name))
            .unwrap_or(false);
        if !valid {
            return Err(Error::InvalidDescriptor(format!(
                "invalid fabric name: {name}"
            )));
        }
    }

    for (idx, dataset) in descriptor.datasets.iter().enumerate() {
        if dataset.dataset_type.trim().is_empty() {
            return Err(Error::InvalidDescriptor(format!(
                "dataset {idx} has an empty type"
            )));
        }
        if dataset.format.trim().is_empty() {
            return Err(Error::InvalidDescriptor(format!(
                "dataset {idx} has an empty format"
            )));
        }
    }

    if descriptor.uplinks_per_leaf == Some(0) {
        return Err(Error::InvalidDescriptor(
            "uplinks_per_leaf must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor_with_name(name: &str) -> FabricDescriptor {
        FabricDescriptor {
            name: Some(name.to_string()),
            ..FabricDescriptor::default()
        }
    }

    #[test]
    fn accepts_plain_names() {
        assert!(validate_descriptor(&descriptor_with_name("dc1_pod-2.prod")).is_ok());
    }

    #[test]
    fn rejects_names_with_separators() {
        assert!(validate_descriptor(&descriptor_with_name("dc1/pod2")).is_err());
        assert!(validate_descriptor(&descriptor_with_name("")).is_err());
    }

    #[test]
    fn rejects_zero_uplink_override() {
        let descriptor = FabricDescriptor {
            uplinks_per_leaf: Some(0),
            ..FabricDescriptor::default()
        };
        assert!(validate_descriptor(&descriptor).is_err());
    }

    #[test]
    fn dn_accessor_hides_empty_values() {
        let mut attributes = Attributes::new();
        attributes.insert("dn".to_string(), String::new());
        let record = ManagedObject::new("fvTenant", attributes);
        assert_eq!(record.dn(), None);
    }
}
