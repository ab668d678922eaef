//! Identity and classification normalization.
//!
//! Runs per record during ingestion, before the dedup key is computed.
//! Fabric exports label extension chassis under several classes and often
//! omit the module id; both are repaired here so downstream calculators can
//! treat `eqptFex` as the single canonical extension-module class.

use acicap_core::{dn, ManagedObject};

use crate::classes;

/// Classes that may describe an extension chassis.
pub const EXTENSION_ALIASES: [&str; 2] = [PRIMARY_ALIAS, "eqptCh"];

/// Alias that always denotes an extension chassis, marker or not.
pub const PRIMARY_ALIAS: &str = "eqptExtCh";

/// DN markers indicating an extension chassis.
const EXTENSION_MARKERS: [&str; 2] = ["extch-", "fex-"];

/// Canonicalize aliased classes and backfill missing module ids.
///
/// Rules, first match wins:
/// 1. an aliased class whose record is the primary alias, or whose DN
///    carries an extension marker, is rewritten to the canonical class;
/// 2. a canonical-class record without an explicit id gets one derived
///    from its DN.
pub fn normalize_record(record: &mut ManagedObject) {
    if EXTENSION_ALIASES.contains(&record.class.as_str()) {
        let marked = record
            .dn()
            .map(|dn| EXTENSION_MARKERS.iter().any(|marker| dn.contains(marker)))
            .unwrap_or(false);
        if record.class == PRIMARY_ALIAS || marked {
            record.class = classes::FEX.to_string();
        }
    }

    if record.class == classes::FEX && record.attr("id").is_none() {
        if let Some(id) = record.dn().and_then(dn::fex_id) {
            record.attributes.insert("id".to_string(), id);
        }
    }
}

#[cfg(test)]
mod tests {
    use acicap_core::Attributes;

    use super::*;

    fn record(class: &str, dn: &str) -> ManagedObject {
        let mut attributes = Attributes::new();
        if !dn.is_empty() {
            attributes.insert("dn".to_string(), dn.to_string());
        }
        ManagedObject::new(class, attributes)
    }

    #[test]
    fn primary_alias_rewrites_without_marker() {
        let mut rec = record("eqptExtCh", "topology/pod-1/node-101/sys/ch");
        normalize_record(&mut rec);
        assert_eq!(rec.class, "eqptFex");
    }

    #[test]
    fn secondary_alias_needs_a_marker() {
        let mut plain = record("eqptCh", "topology/pod-1/node-101/sys/ch");
        normalize_record(&mut plain);
        assert_eq!(plain.class, "eqptCh");

        let mut marked = record("eqptCh", "topology/pod-1/node-101/sys/extch-103/ch");
        normalize_record(&mut marked);
        assert_eq!(marked.class, "eqptFex");
    }

    #[test]
    fn backfills_id_from_extch_marker() {
        let mut rec = record("eqptExtCh", "topology/pod-1/node-101/sys/extch-101");
        normalize_record(&mut rec);
        assert_eq!(rec.class, "eqptFex");
        assert_eq!(rec.attr("id"), Some("101"));
    }

    #[test]
    fn backfills_id_from_low_node_number() {
        let mut rec = record("eqptFex", "topology/pod-1/node-102/sys");
        normalize_record(&mut rec);
        assert_eq!(rec.attr("id"), Some("102"));

        let mut high = record("eqptFex", "topology/pod-1/node-2101/sys");
        normalize_record(&mut high);
        assert_eq!(high.attr("id"), None);
    }

    #[test]
    fn explicit_id_is_never_overwritten() {
        let mut rec = record("eqptFex", "topology/pod-1/node-101/sys/extch-103");
        rec.attributes.insert("id".to_string(), "7".to_string());
        normalize_record(&mut rec);
        assert_eq!(rec.attr("id"), Some("7"));
    }

    #[test]
    fn unrelated_classes_pass_through() {
        let mut rec = record("fvTenant", "uni/tn-Prod");
        normalize_record(&mut rec);
        assert_eq!(rec.class, "fvTenant");
        assert_eq!(rec.attr("id"), None);
    }
}
