//! Well-known managed-object class names.

pub const FABRIC_NODE: &str = "fabricNode";
pub const FEX: &str = "eqptFex";
pub const LINECARD: &str = "eqptLC";
pub const TENANT: &str = "fvTenant";
pub const VRF: &str = "fvCtx";
pub const BRIDGE_DOMAIN: &str = "fvBD";
pub const EPG: &str = "fvAEPg";
pub const PATH_ATTACHMENT: &str = "fvRsPathAtt";
pub const SUBNET: &str = "fvSubnet";
pub const ENDPOINT: &str = "fvCEp";
pub const PHYS_IF: &str = "ethpmPhysIf";
pub const CONTRACT: &str = "vzBrCP";
pub const VPC_DOMAIN: &str = "vpcDom";
pub const PORT_CHANNEL: &str = "pcAggrIf";
pub const LACP_ENTITY: &str = "lacpEntity";
pub const VPC_IF: &str = "vpcIf";
pub const L3OUT: &str = "l3extOut";
pub const EXTERNAL_EPG: &str = "l3extInstP";
pub const L3OUT_NODE_PROFILE: &str = "l3extLNodeP";
pub const L3OUT_NODE_ATTACHMENT: &str = "l3extRsNodeL3OutAtt";
pub const BGP_PEER: &str = "bgpPeerP";
pub const OSPF_IF: &str = "ospfIfP";
pub const VLAN_POOL: &str = "fvnsVlanInstP";
pub const ENCAP_BLOCK: &str = "fvnsEncapBlk";
pub const LLDP_ADJACENCY: &str = "lldpAdjEp";
pub const CONTROLLER_FIRMWARE: &str = "firmwareCtrlrRunning";
pub const TOP_SYSTEM: &str = "topSystem";

/// Classes a capacity analysis cannot do without.
pub const REQUIRED_CLASSES: [&str; 10] = [
    FABRIC_NODE,
    FEX,
    TENANT,
    VRF,
    BRIDGE_DOMAIN,
    EPG,
    PATH_ATTACHMENT,
    SUBNET,
    PHYS_IF,
    "physDomP",
];

/// Classes that sharpen the analysis when present.
pub const OPTIONAL_CLASSES: [&str; 22] = [
    CONTRACT,
    VPC_DOMAIN,
    PORT_CHANNEL,
    LACP_ENTITY,
    VPC_IF,
    L3OUT,
    EXTERNAL_EPG,
    L3OUT_NODE_PROFILE,
    "l3extLIfP",
    L3OUT_NODE_ATTACHMENT,
    "l3extSubnet",
    "l3extRsEctx",
    BGP_PEER,
    OSPF_IF,
    "ipRouteP",
    VLAN_POOL,
    ENCAP_BLOCK,
    "vmmDomP",
    "l3extDomP",
    "infraRsVlanNs",
    "vmmRsVlanNs",
    "l3extRsVlanNs",
];
