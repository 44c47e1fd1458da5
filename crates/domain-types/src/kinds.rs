use serde::{Deserialize, Serialize};

/// Closed dispatch tag for the per-kind Node Driver behind `NodeDriverPort`.
///
/// The core never implements emulator-specific behavior for these variants;
/// it only needs the tag to route driver calls and to group nodes into the
/// "always-on" vs "VM" dependency classes used by bulk start/stop (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Dynamips,
    Qemu,
    Docker,
    Vpcs,
    Iou,
    VirtualBox,
    Vmware,
    TraceNg,
    Cloud,
    EthernetSwitch,
    EthernetHub,
    Nat,
}

impl NodeType {
    /// Switches/hubs/clouds/NATs start before VMs in bulk operations (§4.5).
    pub fn is_always_on(self) -> bool {
        matches!(self, NodeType::Cloud | NodeType::EthernetSwitch | NodeType::EthernetHub | NodeType::Nat)
    }

    /// Drivers that never support suspend/resume treat them as no-ops (§4.3).
    pub fn supports_suspend(self) -> bool {
        matches!(self, NodeType::Qemu | NodeType::VirtualBox | NodeType::Vmware)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Stopped,
    Started,
    Suspended,
}

impl Default for NodeStatus {
    fn default() -> Self {
        NodeStatus::Stopped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Ethernet,
    Serial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleType {
    Telnet,
    Vnc,
    Http,
    Https,
    Spice,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeProtocol {
    Http,
    Https,
}
