//! Ingestion and the analyze orchestrator.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

use acicap_core::{
    dn, FabricDescriptor, DEFAULT_CLUSTER_SIZE, DEFAULT_RELEASE, DEFAULT_UPLINKS_PER_LEAF,
    EPG_SPREAD_LIMIT, FABRIC_DATASET_TYPE, REPORT_VERSION,
};
use tracing::{info, warn};

use crate::classes;
use crate::completeness;
use crate::errors::IngestError;
use crate::headroom;
use crate::index::ClassIndex;
use crate::limits::{
    detect_release, LinecardCatalog, ResolvedLimits, ScalabilityTable, DEFAULT_ENDPOINT_COLUMN,
    DEFAULT_SCALE_COLUMN,
};
use crate::normalize::normalize_record;
use crate::parser::parse_export;
use crate::report::{
    CapacityReport, CompletenessReport, EpgSpreadRow, FabricCharacteristics, FabricSummary,
    FexPortStats, HeadroomEntry, L3OutScale, NodePortStats, PortBreakdown, PortReport,
    PortStateCounts, ReleaseSource, SpineCapacity, SpineCapacitySource, TenantRollup,
    UplinkReport, UplinkSource, VlanOverlapReport, VlanOverlapRow, VlanPoolReport, VpcScale,
};

/// One-way ingestion state of an engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
}

/// Capacity analysis engine bound to one fabric's datasets.
///
/// Ingestion is lazy, one-shot, and all-or-nothing; the class index is
/// written once and read-only afterwards. Every analyze call recomputes
/// the full report from the index.
#[derive(Debug)]
pub struct CapacityEngine {
    descriptor: FabricDescriptor,
    limits: ScalabilityTable,
    linecards: LinecardCatalog,
    index: ClassIndex,
    state: LoadState,
}

impl CapacityEngine {
    /// Engine with the bundled reference tables.
    pub fn new(descriptor: FabricDescriptor) -> Self {
        Self::with_reference_data(
            descriptor,
            ScalabilityTable::bundled(),
            LinecardCatalog::bundled(),
        )
    }

    pub fn with_reference_data(
        descriptor: FabricDescriptor,
        limits: ScalabilityTable,
        linecards: LinecardCatalog,
    ) -> Self {
        Self {
            descriptor,
            limits,
            linecards,
            index: ClassIndex::new(),
            state: LoadState::Unloaded,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Read declared datasets into the class index.
    ///
    /// A no-op once loaded. Datasets of other types, empty paths, and
    /// missing files are skipped; a parser failure aborts the whole run
    /// and no partially-populated index survives.
    pub fn ingest(&mut self) -> Result<(), IngestError> {
        if self.state == LoadState::Loaded {
            return Ok(());
        }

        info!(event = "ingest_started", datasets = self.descriptor.datasets.len());
        let mut index = ClassIndex::new();
        let mut loaded = 0usize;

        for dataset in &self.descriptor.datasets {
            if dataset.dataset_type != FABRIC_DATASET_TYPE {
                continue;
            }
            if dataset.path.trim().is_empty() {
                continue;
            }
            let path = Path::new(&dataset.path);
            if !path.exists() {
                warn!(event = "dataset_skipped", reason = "missing_source", path = %dataset.path);
                continue;
            }

            let content = std::fs::read_to_string(path)?;
            let records = parse_export(&content, &dataset.format)?;
            info!(event = "dataset_parsed", path = %dataset.path, records = records.len());
            for mut record in records {
                normalize_record(&mut record);
                index.insert(record);
            }
            loaded += 1;
        }

        info!(event = "ingest_finished", datasets_loaded = loaded);
        self.index = index;
        self.state = LoadState::Loaded;
        Ok(())
    }

    /// Class coverage rating, usable without a full analysis.
    pub fn completeness(&mut self) -> Result<CompletenessReport, IngestError> {
        self.ingest()?;
        Ok(completeness::score(&self.index.raw_counts()))
    }

    /// Flat inventory counts, usable without a full analysis.
    pub fn summary(&mut self) -> Result<FabricSummary, IngestError> {
        self.ingest()?;
        let inventory = node_inventory(&self.index);
        Ok(summary(&self.index, &inventory))
    }

    /// Produce the consolidated utilization and headroom report.
    pub fn analyze(&mut self) -> Result<CapacityReport, IngestError> {
        self.ingest()?;

        let index = &self.index;
        let inventory = node_inventory(index);
        let summary = summary(index, &inventory);
        let fabric = fabric_characteristics(index, &self.descriptor, &inventory);
        let resolved = self.limits.resolve(
            &fabric.release,
            fabric.cluster_size,
            &fabric.scale_profile,
            &fabric.endpoint_profile,
        );
        let l3out = l3out_scale(index);
        let headroom = build_headroom(&summary, &l3out, &resolved);

        Ok(CapacityReport {
            report_version: REPORT_VERSION.to_string(),
            fabric,
            completeness: completeness::score(&index.raw_counts()),
            ports: port_stats(index),
            port_breakdown: port_breakdown(index, &inventory),
            tenants: tenant_rollups(index),
            epg_spread: epg_spread(index),
            vlan_overlap: vlan_overlap(index),
            vlan_pools: vlan_pools(index),
            vpc: vpc_scale(index),
            l3out,
            spine_capacity: spine_capacity(index, &inventory, &self.linecards),
            uplinks: uplink_inference(index, &inventory, self.descriptor.uplinks_per_leaf),
            headroom,
            summary,
        })
    }
}

/// Node ids grouped by role from the switch inventory.
struct NodeInventory {
    roles: HashMap<String, String>,
    leafs: BTreeSet<String>,
    spines: BTreeSet<String>,
    controllers: u64,
}

fn node_inventory(index: &ClassIndex) -> NodeInventory {
    let mut roles = HashMap::new();
    let mut leafs = BTreeSet::new();
    let mut spines = BTreeSet::new();
    let mut controllers = 0u64;

    for attributes in index.records(classes::FABRIC_NODE) {
        let id = attributes.get("id").cloned().or_else(|| {
            attributes
                .get("dn")
                .map(|value| dn::node_ids(value))
                .and_then(|nodes| nodes.into_iter().next())
        });
        let Some(id) = id else {
            continue;
        };
        let role = attributes
            .get("role")
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        match role.as_str() {
            "leaf" => {
                leafs.insert(id.clone());
            }
            "spine" => {
                spines.insert(id.clone());
            }
            "controller" => controllers += 1,
            _ => {}
        }
        roles.insert(id, role);
    }

    NodeInventory {
        roles,
        leafs,
        spines,
        controllers,
    }
}

fn summary(index: &ClassIndex, inventory: &NodeInventory) -> FabricSummary {
    FabricSummary {
        leafs: inventory.leafs.len() as u64,
        spines: inventory.spines.len() as u64,
        controllers: inventory.controllers,
        fex: index.count(classes::FEX),
        tenants: index.count(classes::TENANT),
        vrfs: index.count(classes::VRF),
        bds: index.count(classes::BRIDGE_DOMAIN),
        epgs: index.count(classes::EPG),
        subnets: index.count(classes::SUBNET),
        contracts: index.count(classes::CONTRACT),
        endpoints: index.count(classes::ENDPOINT),
    }
}

fn fabric_characteristics(
    index: &ClassIndex,
    descriptor: &FabricDescriptor,
    inventory: &NodeInventory,
) -> FabricCharacteristics {
    // Discovered version wins; the override covers fabrics whose exports
    // carry no firmware records; the documented default comes last.
    let (release, release_source) = match detect_release(index) {
        Some(release) => (release, ReleaseSource::Detected),
        None => match &descriptor.release {
            Some(value) => (
                dn::release(value).unwrap_or_else(|| value.trim().to_string()),
                ReleaseSource::Override,
            ),
            None => (DEFAULT_RELEASE.to_string(), ReleaseSource::Default),
        },
    };

    let (cluster_size, cluster_size_estimated) = if inventory.controllers > 0 {
        (inventory.controllers as u32, false)
    } else {
        (DEFAULT_CLUSTER_SIZE, true)
    };

    FabricCharacteristics {
        release,
        release_source,
        cluster_size,
        cluster_size_estimated,
        scale_profile: profile_tag(&descriptor.scale_profile, DEFAULT_SCALE_COLUMN),
        endpoint_profile: profile_tag(&descriptor.endpoint_profile, DEFAULT_ENDPOINT_COLUMN),
    }
}

fn profile_tag(tag: &Option<String>, fallback: &str) -> String {
    tag.as_deref()
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn tally(counts: &mut PortStateCounts, oper_st: Option<&String>) {
    counts.total += 1;
    match oper_st.map(|value| value.to_ascii_lowercase()).as_deref() {
        Some("up") => counts.up += 1,
        Some("down") => counts.down += 1,
        _ => counts.unknown += 1,
    }
}

fn port_stats(index: &ClassIndex) -> PortReport {
    let mut counts = PortStateCounts::default();
    for port in index.records(classes::PHYS_IF) {
        tally(&mut counts, port.get("operSt"));
    }

    let mut used: HashSet<(String, String)> = HashSet::new();
    for path in index.records(classes::PATH_ATTACHMENT) {
        let tdn = path.get("tDn").map(String::as_str).unwrap_or("");
        let Some(interface) = dn::interface_id(tdn) else {
            continue;
        };
        let node = dn::node_ids(tdn).into_iter().next().unwrap_or_default();
        used.insert((node, interface));
    }

    PortReport {
        counts,
        ports_with_epg: used.len() as u64,
    }
}

fn port_breakdown(index: &ClassIndex, inventory: &NodeInventory) -> PortBreakdown {
    let mut leafs: BTreeMap<String, PortStateCounts> = BTreeMap::new();
    let mut spines: BTreeMap<String, PortStateCounts> = BTreeMap::new();
    let mut fex: BTreeMap<String, PortStateCounts> = BTreeMap::new();

    let fex_ids: BTreeSet<&str> = index
        .records(classes::FEX)
        .iter()
        .filter_map(|attributes| attributes.get("id"))
        .map(String::as_str)
        .collect();

    for port in index.records(classes::PHYS_IF) {
        let pdn = port.get("dn").map(String::as_str).unwrap_or("");
        let oper_st = port.get("operSt");

        if let Some(node) = dn::node_ids(pdn).into_iter().next() {
            match inventory.roles.get(&node).map(String::as_str) {
                Some("leaf") => tally(leafs.entry(node).or_default(), oper_st),
                Some("spine") => tally(spines.entry(node).or_default(), oper_st),
                _ => {}
            }
        }

        if let Some(interface) = dn::interface_id(pdn) {
            if let Some(module) = dn::fex_interface_module(&interface) {
                if fex_ids.contains(module.as_str()) {
                    tally(fex.entry(module).or_default(), oper_st);
                }
            }
        }
    }

    PortBreakdown {
        leafs: into_node_stats(leafs),
        spines: into_node_stats(spines),
        fex: fex
            .into_iter()
            .map(|(fex, counts)| FexPortStats { fex, counts })
            .collect(),
    }
}

fn into_node_stats(buckets: BTreeMap<String, PortStateCounts>) -> Vec<NodePortStats> {
    let mut rows: Vec<NodePortStats> = buckets
        .into_iter()
        .map(|(node, counts)| NodePortStats { node, counts })
        .collect();
    rows.sort_by_key(|row| numeric_key(&row.node));
    rows
}

fn numeric_key(value: &str) -> (u64, String) {
    (value.parse::<u64>().unwrap_or(u64::MAX), value.to_string())
}

#[derive(Default)]
struct TenantCounts {
    vrfs: u64,
    bds: u64,
    epgs: u64,
    subnets: u64,
    contracts: u64,
}

fn tenant_rollups(index: &ClassIndex) -> Vec<TenantRollup> {
    let mut tenants: BTreeMap<String, TenantCounts> = BTreeMap::new();
    let facets: [(&str, fn(&mut TenantCounts)); 5] = [
        (classes::EPG, |counts| counts.epgs += 1),
        (classes::BRIDGE_DOMAIN, |counts| counts.bds += 1),
        (classes::VRF, |counts| counts.vrfs += 1),
        (classes::SUBNET, |counts| counts.subnets += 1),
        (classes::CONTRACT, |counts| counts.contracts += 1),
    ];

    for (class, bump) in facets {
        for attributes in index.records(class) {
            let record_dn = attributes.get("dn").map(String::as_str).unwrap_or("");
            let tenant = dn::tenant_or_default(record_dn);
            bump(tenants.entry(tenant).or_default());
        }
    }

    let mut rows: Vec<TenantRollup> = tenants
        .into_iter()
        .map(|(tenant, counts)| TenantRollup {
            tenant,
            vrfs: counts.vrfs,
            bds: counts.bds,
            epgs: counts.epgs,
            subnets: counts.subnets,
            contracts: counts.contracts,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.epgs
            .cmp(&a.epgs)
            .then_with(|| a.tenant.cmp(&b.tenant))
    });
    rows
}

fn epg_spread(index: &ClassIndex) -> Vec<EpgSpreadRow> {
    let mut spread: BTreeMap<(String, String), (u64, BTreeSet<String>)> = BTreeMap::new();

    for path in index.records(classes::PATH_ATTACHMENT) {
        let record_dn = path.get("dn").map(String::as_str).unwrap_or("");
        let tenant = dn::tenant_or_default(record_dn);
        let epg = dn::epg(record_dn).unwrap_or_else(|| record_dn.to_string());
        let tdn = path.get("tDn").map(String::as_str).unwrap_or("");

        let entry = spread.entry((tenant, epg)).or_default();
        entry.0 += 1;
        entry.1.extend(dn::node_ids(tdn));
    }

    let mut rows: Vec<EpgSpreadRow> = spread
        .into_iter()
        .map(|((tenant, epg), (path_count, nodes))| EpgSpreadRow {
            tenant,
            epg,
            path_count,
            node_count: nodes.len() as u64,
        })
        .collect();
    rows.sort_by(|a, b| {
        (b.node_count, b.path_count)
            .cmp(&(a.node_count, a.path_count))
            .then_with(|| (a.tenant.as_str(), a.epg.as_str()).cmp(&(b.tenant.as_str(), b.epg.as_str())))
    });
    rows.truncate(EPG_SPREAD_LIMIT);
    rows
}

fn vlan_overlap(index: &ClassIndex) -> VlanOverlapReport {
    let mut vlan_tenants: BTreeMap<u32, BTreeSet<String>> = BTreeMap::new();

    for path in index.records(classes::PATH_ATTACHMENT) {
        let encap = path.get("encap").map(String::as_str).unwrap_or("");
        let Some(vlan) = dn::vlan_id(encap) else {
            continue;
        };
        let record_dn = path.get("dn").map(String::as_str).unwrap_or("");
        vlan_tenants
            .entry(vlan)
            .or_default()
            .insert(dn::tenant_or_default(record_dn));
    }

    let total_vlans = vlan_tenants.len() as u64;
    let mut overlaps: Vec<VlanOverlapRow> = vlan_tenants
        .into_iter()
        .filter(|(_, tenants)| tenants.len() > 1)
        .map(|(vlan, tenants)| VlanOverlapRow {
            vlan,
            tenant_count: tenants.len() as u64,
            tenants: tenants.into_iter().collect(),
        })
        .collect();
    overlaps.sort_by(|a, b| {
        b.tenant_count
            .cmp(&a.tenant_count)
            .then_with(|| a.vlan.cmp(&b.vlan))
    });

    VlanOverlapReport {
        total_vlans,
        overlaps,
    }
}

fn vlan_pools(index: &ClassIndex) -> VlanPoolReport {
    let mut capacity = 0u64;
    for block in index.records(classes::ENCAP_BLOCK) {
        let encap = block.get("encap").map(String::as_str).unwrap_or("");
        if let Some((start, end)) = dn::vlan_block(encap) {
            if end >= start {
                capacity += u64::from(end - start) + 1;
            }
        }
    }

    let mut used: BTreeSet<u32> = BTreeSet::new();
    for path in index.records(classes::PATH_ATTACHMENT) {
        let encap = path.get("encap").map(String::as_str).unwrap_or("");
        if let Some(vlan) = dn::vlan_id(encap) {
            used.insert(vlan);
        }
    }

    VlanPoolReport {
        pool_count: index.count(classes::VLAN_POOL),
        pool_vlan_capacity: capacity,
        used_vlan_count: used.len() as u64,
    }
}

fn vpc_scale(index: &ClassIndex) -> VpcScale {
    VpcScale {
        vpc_domains: index.count(classes::VPC_DOMAIN),
        port_channels: index.count(classes::PORT_CHANNEL),
        lacp_entities: index.count(classes::LACP_ENTITY),
        vpc_interfaces: index.count(classes::VPC_IF),
    }
}

fn l3out_scale(index: &ClassIndex) -> L3OutScale {
    let mut border_leafs: BTreeSet<String> = BTreeSet::new();
    for attachment in index.records(classes::L3OUT_NODE_ATTACHMENT) {
        let tdn = attachment.get("tDn").map(String::as_str).unwrap_or("");
        border_leafs.extend(dn::node_ids(tdn));
    }
    for profile in index.records(classes::L3OUT_NODE_PROFILE) {
        let record_dn = profile.get("dn").map(String::as_str).unwrap_or("");
        border_leafs.extend(dn::node_ids(record_dn));
    }

    let mut border_leafs: Vec<String> = border_leafs.into_iter().collect();
    border_leafs.sort_by_key(|node| numeric_key(node));

    L3OutScale {
        l3outs: index.count(classes::L3OUT),
        external_epgs: index.count(classes::EXTERNAL_EPG),
        bgp_peers: index.count(classes::BGP_PEER),
        ospf_interfaces: index.count(classes::OSPF_IF),
        border_leaf_count: border_leafs.len() as u64,
        border_leafs,
    }
}

fn spine_capacity(
    index: &ClassIndex,
    inventory: &NodeInventory,
    catalog: &LinecardCatalog,
) -> SpineCapacity {
    let mut seen = 0u64;
    let mut recognized = 0u64;
    let mut ports = 0u64;

    for linecard in index.records(classes::LINECARD) {
        let record_dn = linecard.get("dn").map(String::as_str).unwrap_or("");
        let Some(node) = dn::node_ids(record_dn).into_iter().next() else {
            continue;
        };
        if !inventory.spines.contains(&node) {
            continue;
        }
        seen += 1;
        if let Some(count) = linecard
            .get("model")
            .and_then(|model| catalog.port_count(model))
        {
            recognized += 1;
            ports += count;
        }
    }

    if recognized > 0 {
        return SpineCapacity {
            ports,
            source: SpineCapacitySource::Linecards,
            linecards_seen: seen,
            linecards_recognized: recognized,
        };
    }

    // No usable linecard data; count physical spine interfaces directly.
    let mut interfaces = 0u64;
    for port in index.records(classes::PHYS_IF) {
        let pdn = port.get("dn").map(String::as_str).unwrap_or("");
        if let Some(node) = dn::node_ids(pdn).into_iter().next() {
            if inventory.spines.contains(&node) {
                interfaces += 1;
            }
        }
    }

    SpineCapacity {
        ports: interfaces,
        source: SpineCapacitySource::Interfaces,
        linecards_seen: seen,
        linecards_recognized: 0,
    }
}

fn uplink_inference(
    index: &ClassIndex,
    inventory: &NodeInventory,
    override_value: Option<u32>,
) -> UplinkReport {
    let mut per_leaf: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for adjacency in index.records(classes::LLDP_ADJACENCY) {
        let record_dn = adjacency.get("dn").map(String::as_str).unwrap_or("");
        let Some(node) = dn::node_ids(record_dn).into_iter().next() else {
            continue;
        };
        if !inventory.leafs.contains(&node) {
            continue;
        }
        let Some(interface) = dn::bracketed_after(record_dn, "if") else {
            continue;
        };
        let neighbor_is_spine = ["sysName", "sysDesc", "chassisIdV"].iter().any(|attr| {
            adjacency
                .get(*attr)
                .map(|value| value.to_ascii_lowercase().contains("spine"))
                .unwrap_or(false)
        });
        if neighbor_is_spine {
            per_leaf.entry(node).or_default().insert(interface);
        }
    }

    let counts: Vec<u64> = per_leaf
        .values()
        .map(|interfaces| interfaces.len() as u64)
        .filter(|count| *count > 0)
        .collect();

    if !counts.is_empty() {
        return UplinkReport {
            uplinks_per_leaf: median(&counts),
            source: UplinkSource::Adjacency,
            leafs_with_evidence: counts.len() as u64,
        };
    }

    match override_value {
        Some(value) => UplinkReport {
            uplinks_per_leaf: value,
            source: UplinkSource::Override,
            leafs_with_evidence: 0,
        },
        None => UplinkReport {
            uplinks_per_leaf: DEFAULT_UPLINKS_PER_LEAF,
            source: UplinkSource::Default,
            leafs_with_evidence: 0,
        },
    }
}

fn median(counts: &[u64]) -> u32 {
    let mut sorted = counts.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    let value = if sorted.len() % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    };
    value.round() as u32
}

fn build_headroom(
    summary: &FabricSummary,
    l3out: &L3OutScale,
    resolved: &ResolvedLimits,
) -> Vec<HeadroomEntry> {
    let endpoint_ceiling = resolved
        .endpoints_per_leaf
        .filter(|_| summary.leafs > 0)
        .map(|per_leaf| per_leaf * summary.leafs);

    vec![
        headroom::entry("leafs", summary.leafs, resolved.leafs),
        headroom::entry("fex", summary.fex, resolved.fex),
        headroom::entry("tenants", summary.tenants, resolved.tenants),
        headroom::entry("vrfs", summary.vrfs, resolved.vrfs),
        headroom::entry("bds", summary.bds, resolved.bds),
        headroom::entry("epgs", summary.epgs, resolved.epgs),
        headroom::entry("subnets", summary.subnets, resolved.subnets),
        headroom::entry("contracts", summary.contracts, resolved.contracts),
        headroom::entry("l3outs", l3out.l3outs, resolved.l3outs),
        headroom::entry("endpoints", summary.endpoints, endpoint_ceiling),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_rounds_half_up() {
        assert_eq!(median(&[2]), 2);
        assert_eq!(median(&[1, 2, 4]), 2);
        assert_eq!(median(&[2, 4]), 3);
        assert_eq!(median(&[2, 3]), 3);
    }

    #[test]
    fn endpoint_ceiling_needs_leafs() {
        let summary = FabricSummary {
            leafs: 0,
            endpoints: 500,
            ..FabricSummary::default()
        };
        let resolved = ResolvedLimits {
            endpoints_per_leaf: Some(12000),
            ..ResolvedLimits::default()
        };
        let rows = build_headroom(&summary, &L3OutScale::default(), &resolved);
        let endpoints = rows.iter().find(|row| row.metric == "endpoints").unwrap();
        assert_eq!(endpoints.maximum, None);
    }
}
