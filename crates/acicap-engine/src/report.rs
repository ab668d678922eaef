//! Serde contract for the consolidated capacity report.
//!
//! The report is rebuilt in full on every analyze call and is immutable
//! once returned; rendering and spreadsheet export live outside the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityReport {
    pub report_version: String,
    pub fabric: FabricCharacteristics,
    pub summary: FabricSummary,
    pub completeness: CompletenessReport,
    pub ports: PortReport,
    pub port_breakdown: PortBreakdown,
    pub tenants: Vec<TenantRollup>,
    pub epg_spread: Vec<EpgSpreadRow>,
    pub vlan_overlap: VlanOverlapReport,
    pub vlan_pools: VlanPoolReport,
    pub vpc: VpcScale,
    pub l3out: L3OutScale,
    pub spine_capacity: SpineCapacity,
    pub uplinks: UplinkReport,
    pub headroom: Vec<HeadroomEntry>,
}

/// Facts about the fabric derived fresh per analyze call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricCharacteristics {
    /// Normalized `major.minor` release used for limits resolution.
    pub release: String,
    pub release_source: ReleaseSource,
    pub cluster_size: u32,
    /// True when no controller-role nodes were found and the documented
    /// default cluster size was assumed.
    pub cluster_size_estimated: bool,
    pub scale_profile: String,
    pub endpoint_profile: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseSource {
    Detected,
    Override,
    Default,
}

/// Flat inventory counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FabricSummary {
    pub leafs: u64,
    pub spines: u64,
    pub controllers: u64,
    pub fex: u64,
    pub tenants: u64,
    pub vrfs: u64,
    pub bds: u64,
    pub epgs: u64,
    pub subnets: u64,
    pub contracts: u64,
    pub endpoints: u64,
}

/// Class coverage rating; required classes weigh 70, optional 30.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub completeness_score: u8,
    pub missing_required: Vec<String>,
    pub missing_optional: Vec<String>,
    pub class_counts: BTreeMap<String, u64>,
}

/// Tri-state operational counters for a set of ports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortStateCounts {
    pub total: u64,
    pub up: u64,
    pub down: u64,
    pub unknown: u64,
}

/// Fabric-wide port stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortReport {
    #[serde(flatten)]
    pub counts: PortStateCounts,
    /// Distinct (node, interface) keys among path attachments with a
    /// resolved interface id.
    pub ports_with_epg: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePortStats {
    pub node: String,
    #[serde(flatten)]
    pub counts: PortStateCounts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FexPortStats {
    pub fex: String,
    #[serde(flatten)]
    pub counts: PortStateCounts,
}

/// Port utilization bucketed per leaf, per spine, and per extension module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortBreakdown {
    pub leafs: Vec<NodePortStats>,
    pub spines: Vec<NodePortStats>,
    pub fex: Vec<FexPortStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantRollup {
    pub tenant: String,
    pub vrfs: u64,
    pub bds: u64,
    pub epgs: u64,
    pub subnets: u64,
    pub contracts: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpgSpreadRow {
    pub tenant: String,
    pub epg: String,
    pub path_count: u64,
    pub node_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VlanOverlapRow {
    pub vlan: u32,
    pub tenant_count: u64,
    pub tenants: Vec<String>,
}

/// Cross-tenant VLAN reuse; only VLANs seen under more than one tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VlanOverlapReport {
    pub total_vlans: u64,
    pub overlaps: Vec<VlanOverlapRow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VlanPoolReport {
    pub pool_count: u64,
    /// Sum of (end - start + 1) across encapsulation blocks.
    pub pool_vlan_capacity: u64,
    /// Distinct VLAN ids actually referenced by path attachments.
    pub used_vlan_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VpcScale {
    pub vpc_domains: u64,
    pub port_channels: u64,
    pub lacp_entities: u64,
    pub vpc_interfaces: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct L3OutScale {
    pub l3outs: u64,
    pub external_epgs: u64,
    pub bgp_peers: u64,
    pub ospf_interfaces: u64,
    pub border_leaf_count: u64,
    pub border_leafs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpineCapacitySource {
    Linecards,
    Interfaces,
}

/// Physical spine port capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpineCapacity {
    pub ports: u64,
    pub source: SpineCapacitySource,
    pub linecards_seen: u64,
    pub linecards_recognized: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UplinkSource {
    Adjacency,
    Override,
    Default,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkReport {
    pub uplinks_per_leaf: u32,
    pub source: UplinkSource,
    pub leafs_with_evidence: u64,
}

/// Remaining capacity against one documented ceiling.
///
/// When no ceiling is documented (or it is zero), `maximum`, `remaining`,
/// and `percent_used` are all null; absence of a limit must stay visibly
/// distinct from zero headroom, so the null fields are serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadroomEntry {
    pub metric: String,
    pub current: u64,
    pub maximum: Option<u64>,
    pub remaining: Option<u64>,
    pub percent_used: Option<f64>,
}
