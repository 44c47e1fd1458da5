use serde::{Deserialize, Serialize};
use thiserror::Error;

use gns3_domain_types::{ComputeId, ConsoleType, ErrorCode, NodeId, NodeStatus, NodeType, ProjectId};

/// One computed port slot on a node, as reported by the driver on every
/// `update` (§4.3) — the core treats this list as authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePort {
    pub adapter_number: u32,
    pub port_number: u32,
    pub name: String,
    pub link_type: gns3_domain_types::LinkType,
}

/// A transition attempted against the §4.3 state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTransition {
    Start,
    Stop,
    Suspend,
    Resume,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NodeLifecycleError {
    #[error("cannot suspend a stopped node; start it first")]
    MustStartFirst,
    #[error("cannot resume a node that is not suspended")]
    NotSuspended,
    #[error("node must be stopped before it can be deleted or moved")]
    NotStopped,
}

impl ErrorCode for NodeLifecycleError {
    fn code(&self) -> &'static str {
        match self {
            NodeLifecycleError::MustStartFirst => "NODE_MUST_START_FIRST",
            NodeLifecycleError::NotSuspended => "NODE_NOT_SUSPENDED",
            NodeLifecycleError::NotStopped => "NODE_NOT_STOPPED",
        }
    }
}

/// Controller-side shadow of a node (§3 Node Adapter, §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub project_id: ProjectId,
    pub compute_id: ComputeId,
    pub node_type: NodeType,
    pub name: String,
    pub symbol: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub label: Option<String>,
    pub console_type: ConsoleType,
    pub console_host: Option<String>,
    pub console_port: Option<u16>,
    pub aux_port: Option<u16>,
    pub properties: serde_json::Value,
    pub ports: Vec<NodePort>,
    pub status: NodeStatus,
}

impl Node {
    pub fn new(
        project_id: ProjectId,
        compute_id: ComputeId,
        node_type: NodeType,
        name: String,
        properties: serde_json::Value,
    ) -> Self {
        Self {
            id: NodeId::new(),
            project_id,
            compute_id,
            node_type,
            name,
            symbol: default_symbol(node_type),
            x: 0,
            y: 0,
            z: 1,
            label: None,
            console_type: default_console_type(node_type),
            console_host: None,
            console_port: None,
            aux_port: None,
            properties,
            ports: Vec::new(),
            status: NodeStatus::Stopped,
        }
    }

    /// Validates `transition` against the §4.3 table without mutating
    /// `self`; callers apply the resulting status only after the remote
    /// driver call has succeeded. `started→started` and
    /// `suspended→suspended` are idempotent no-ops, not errors.
    pub fn validate_transition(&self, transition: NodeTransition) -> Result<NodeStatus, NodeLifecycleError> {
        use NodeStatus::*;
        use NodeTransition::*;
        match (self.status, transition) {
            (Stopped, Start) => Ok(Started),
            (Started, Stop) => Ok(Stopped),
            (Suspended, Stop) => Ok(Stopped),
            (Started, Suspend) => Ok(Suspended),
            (Suspended, Resume) => Ok(Started),
            (Started, Start) => Ok(Started),
            (Suspended, Suspend) => Ok(Suspended),
            (Stopped, Suspend) => Err(NodeLifecycleError::MustStartFirst),
            (Stopped, Resume) => Err(NodeLifecycleError::NotSuspended),
            (Started, Resume) => Err(NodeLifecycleError::NotSuspended),
        }
    }

    pub fn can_delete_or_move(&self) -> bool {
        self.status == NodeStatus::Stopped
    }

    pub fn require_stopped(&self) -> Result<(), NodeLifecycleError> {
        if self.can_delete_or_move() {
            Ok(())
        } else {
            Err(NodeLifecycleError::NotStopped)
        }
    }

    /// Replaces the driver-reported port list; returns the ports that
    /// disappeared so the caller (LinkEngine) can detach any link
    /// endpoint bound to them and emit `link.port-removed` (§4.3).
    pub fn reconcile_ports(&mut self, new_ports: Vec<NodePort>) -> Vec<NodePort> {
        let removed: Vec<NodePort> = self
            .ports
            .iter()
            .filter(|p| !new_ports.contains(p))
            .cloned()
            .collect();
        self.ports = new_ports;
        removed
    }
}

fn default_symbol(node_type: NodeType) -> String {
    match node_type {
        NodeType::EthernetSwitch => ":/symbols/ethernet_switch.svg".into(),
        NodeType::EthernetHub => ":/symbols/hub.svg".into(),
        NodeType::Cloud => ":/symbols/cloud.svg".into(),
        NodeType::Nat => ":/symbols/nat.svg".into(),
        _ => ":/symbols/computer.svg".into(),
    }
}

fn default_console_type(node_type: NodeType) -> ConsoleType {
    match node_type {
        NodeType::Qemu | NodeType::VirtualBox | NodeType::Vmware => ConsoleType::Vnc,
        NodeType::Cloud | NodeType::EthernetSwitch | NodeType::EthernetHub | NodeType::Nat => ConsoleType::None,
        _ => ConsoleType::Telnet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        Node::new(
            ProjectId::new(),
            ComputeId::local(),
            NodeType::Vpcs,
            "pc1".into(),
            serde_json::json!({}),
        )
    }

    #[test]
    fn legal_transitions_follow_the_table() {
        let n = node();
        assert_eq!(n.validate_transition(NodeTransition::Start), Ok(NodeStatus::Started));
        assert_eq!(n.validate_transition(NodeTransition::Suspend), Err(NodeLifecycleError::MustStartFirst));
    }

    #[test]
    fn suspend_resume_roundtrip() {
        let mut n = node();
        n.status = n.validate_transition(NodeTransition::Start).unwrap();
        n.status = n.validate_transition(NodeTransition::Suspend).unwrap();
        assert_eq!(n.status, NodeStatus::Suspended);
        n.status = n.validate_transition(NodeTransition::Resume).unwrap();
        assert_eq!(n.status, NodeStatus::Started);
    }

    #[test]
    fn idempotent_start_and_suspend_are_no_ops() {
        let mut n = node();
        n.status = NodeStatus::Started;
        assert_eq!(n.validate_transition(NodeTransition::Start), Ok(NodeStatus::Started));
        n.status = NodeStatus::Suspended;
        assert_eq!(n.validate_transition(NodeTransition::Suspend), Ok(NodeStatus::Suspended));
    }

    #[test]
    fn cannot_delete_while_running() {
        let mut n = node();
        n.status = NodeStatus::Started;
        assert_eq!(n.require_stopped(), Err(NodeLifecycleError::NotStopped));
    }

    #[test]
    fn reconcile_ports_reports_removed() {
        let mut n = node();
        let p0 = NodePort { adapter_number: 0, port_number: 0, name: "eth0".into(), link_type: gns3_domain_types::LinkType::Ethernet };
        n.ports = vec![p0.clone()];
        let removed = n.reconcile_ports(vec![]);
        assert_eq!(removed, vec![p0]);
    }
}
