//! Distinguished-name grammar helpers.
//!
//! Fabric exports carry no normalized foreign keys; the slash-delimited DN
//! is the only structural-relationship carrier. Every cross-referenced
//! metric downstream depends on the extraction rules in this module, so
//! they live here in one place with explicit grammar rules:
//!
//! - tenant: first path segment after the `uni/tn-` container marker
//! - node ids: every `node-<n>` token anywhere in a target path
//! - interface id: trailing `[...]` suffix, else the `pathep-[...]` segment
//! - VLAN: `vlan-<n>`, block form `vlan-<start>-<end>`
//! - release: `major.minor(patch)` or `major.minor.patch`, normalized to
//!   `major.minor`

use std::collections::BTreeSet;

use regex::Regex;

use crate::model::{DEFAULT_TENANT, MAX_FEX_NODE_ID};

/// Tenant name from a DN, when the tenant container marker is present.
pub fn tenant(dn: &str) -> Option<String> {
    capture(r"uni/tn-([^/]+)", dn)
}

/// Tenant name from a DN, falling back to the reserved default tenant.
pub fn tenant_or_default(dn: &str) -> String {
    tenant(dn).unwrap_or_else(|| DEFAULT_TENANT.to_string())
}

/// EPG name segment from a DN containing an `epg-` marker.
pub fn epg(dn: &str) -> Option<String> {
    capture(r"/epg-([^/]+)", dn)
}

/// Distinct node-number tokens in a target path, ascending.
///
/// Redundant (vPC) paths reference two nodes in one `paths-101-102` token;
/// the per-token scan picks up both.
pub fn node_ids(path: &str) -> Vec<String> {
    let mut nodes = BTreeSet::new();
    if let Ok(re) = Regex::new(r"node-(\d+)") {
        for caps in re.captures_iter(path) {
            if let Some(value) = caps.get(1) {
                nodes.insert(value.as_str().to_string());
            }
        }
    }
    // paths-101 and (prot)paths-101-102 tokens name one or two switches.
    if let Ok(re) = Regex::new(r"paths-(\d+)(?:-(\d+))?") {
        for caps in re.captures_iter(path) {
            for group in [1, 2] {
                if let Some(value) = caps.get(group) {
                    nodes.insert(value.as_str().to_string());
                }
            }
        }
    }
    let mut nodes: Vec<String> = nodes.into_iter().collect();
    nodes.sort_by_key(|node| (node.parse::<u64>().unwrap_or(u64::MAX), node.clone()));
    nodes
}

/// Interface id from a path: prefer a trailing bracketed suffix, else the
/// bracketed segment after the path-endpoint marker.
pub fn interface_id(path: &str) -> Option<String> {
    capture(r"\[(.+?)\]$", path).or_else(|| bracketed_after(path, "pathep"))
}

/// Bracketed value following `<marker>-[`, e.g. `if-[eth1/49]`.
pub fn bracketed_after(path: &str, marker: &str) -> Option<String> {
    let pattern = format!(r"{}-\[(.+?)\]", regex::escape(marker));
    capture(&pattern, path)
}

/// Single VLAN id from an encapsulation value such as `vlan-120`.
pub fn vlan_id(encap: &str) -> Option<u32> {
    capture(r"vlan-(\d+)", encap).and_then(|value| value.parse().ok())
}

/// VLAN block bounds from `vlan-<start>-<end>`; a single value means
/// start = end.
pub fn vlan_block(encap: &str) -> Option<(u32, u32)> {
    let re = Regex::new(r"vlan-(\d+)(?:-(\d+))?").ok()?;
    let caps = re.captures(encap)?;
    let start: u32 = caps.get(1)?.as_str().parse().ok()?;
    let end = match caps.get(2) {
        Some(value) => value.as_str().parse().ok()?,
        None => start,
    };
    Some((start, end))
}

/// Normalized `major.minor` release from a firmware/system version string.
///
/// Accepts `5.2(4e)` and `5.2.4` spellings.
pub fn release(version: &str) -> Option<String> {
    let re = Regex::new(r"(\d+)\.(\d+)(?:\((\w+)\)|\.(\d+))").ok()?;
    let caps = re.captures(version)?;
    Some(format!(
        "{}.{}",
        caps.get(1)?.as_str(),
        caps.get(2)?.as_str()
    ))
}

/// Extension-module id derived from a DN.
///
/// Tried in order: a numeric suffix after the `extch-` marker, after the
/// `fex-` marker, then a `node-<n>` token whose value is at most
/// [`MAX_FEX_NODE_ID`] (low-numbered module ids vs. higher switch node ids).
pub fn fex_id(dn: &str) -> Option<String> {
    if let Some(id) = capture(r"extch-(\d+)", dn) {
        return Some(id);
    }
    if let Some(id) = capture(r"fex-(\d+)", dn) {
        return Some(id);
    }
    let id = capture(r"node-(\d+)", dn)?;
    let value: u32 = id.parse().ok()?;
    (value <= MAX_FEX_NODE_ID).then_some(id)
}

/// Extension-module id referenced by an interface id such as `eth101/1/1`,
/// where the leading number names the module.
pub fn fex_interface_module(interface: &str) -> Option<String> {
    capture(r"^eth(\d+)/", interface)
}

fn capture(pattern: &str, value: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    let caps = re.captures(value)?;
    Some(caps.get(1)?.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_takes_first_segment_after_marker() {
        assert_eq!(
            tenant("uni/tn-Prod/ap-web/epg-frontend"),
            Some("Prod".to_string())
        );
        assert_eq!(tenant("topology/pod-1/node-101"), None);
        assert_eq!(tenant_or_default("topology/pod-1/node-101"), "common");
    }

    #[test]
    fn epg_stops_at_path_separator() {
        assert_eq!(
            epg("uni/tn-T1/ap-app/epg-Web/rspathAtt-[topology/pod-1/paths-101/pathep-[eth1/1]]"),
            Some("Web".to_string())
        );
        assert_eq!(epg("uni/tn-T1/ap-app"), None);
    }

    #[test]
    fn node_ids_cover_redundant_paths() {
        // paths-101-102 carries two nodes for a vPC pair.
        assert_eq!(
            node_ids("topology/pod-1/paths-101-102/pathep-[eth1/1]"),
            vec!["101".to_string(), "102".to_string()]
        );
        assert_eq!(
            node_ids("topology/pod-1/protpaths-103-104/pathep-[po1]"),
            vec!["103".to_string(), "104".to_string()]
        );
        assert_eq!(
            node_ids("topology/pod-1/node-102/node-101"),
            vec!["101".to_string(), "102".to_string()]
        );
    }

    #[test]
    fn node_ids_sort_numerically() {
        assert_eq!(
            node_ids("x/node-99/y/node-1000"),
            vec!["99".to_string(), "1000".to_string()]
        );
    }

    #[test]
    fn interface_prefers_trailing_bracket() {
        assert_eq!(
            interface_id("topology/pod-1/paths-101/pathep-[eth1/1]"),
            Some("eth1/1".to_string())
        );
        assert_eq!(
            interface_id("topology/pod-1/node-101/sys/phys-[eth1/33]"),
            Some("eth1/33".to_string())
        );
        assert_eq!(
            interface_id("pathep-[eth1/2]/suffix"),
            Some("eth1/2".to_string())
        );
        assert_eq!(interface_id("topology/pod-1/node-101"), None);
    }

    #[test]
    fn bracketed_after_finds_lldp_local_interface() {
        assert_eq!(
            bracketed_after("topology/pod-1/node-101/sys/lldp/inst/if-[eth1/49]/adj-1", "if"),
            Some("eth1/49".to_string())
        );
    }

    #[test]
    fn vlan_forms() {
        assert_eq!(vlan_id("vlan-120"), Some(120));
        assert_eq!(vlan_id("unknown"), None);
        assert_eq!(vlan_block("vlan-100-200"), Some((100, 200)));
        assert_eq!(vlan_block("vlan-300"), Some((300, 300)));
        assert_eq!(vlan_block("vxlan-foo"), None);
    }

    #[test]
    fn release_normalizes_both_spellings() {
        assert_eq!(release("5.2(4e)"), Some("5.2".to_string()));
        assert_eq!(release("6.0.2"), Some("6.0".to_string()));
        assert_eq!(release("n/a"), None);
    }

    #[test]
    fn fex_id_marker_precedence() {
        assert_eq!(fex_id("topology/pod-1/node-101/sys/extch-103"), Some("103".to_string()));
        assert_eq!(fex_id("topology/pod-1/node-101/fex-102"), Some("102".to_string()));
        assert_eq!(fex_id("topology/pod-1/node-101/sys"), Some("101".to_string()));
        // Switch node ids above the ceiling never look like module ids.
        assert_eq!(fex_id("topology/pod-1/node-201/sys"), None);
    }

    #[test]
    fn fex_interface_module_reads_leading_number() {
        assert_eq!(fex_interface_module("eth101/1/1"), Some("101".to_string()));
        assert_eq!(fex_interface_module("eth1/33"), Some("1".to_string()));
        assert_eq!(fex_interface_module("po1"), None);
    }
}
