use serde::{Deserialize, Serialize};

use gns3_domain_types::{LinkId, LinkType, NodeId};

/// One side of a point-to-point link (§3). The core restricts links to
/// exactly two endpoints; hub-like N-port devices are modeled as nodes
/// with many 2-endpoint links (§9 open question, resolved).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEndpoint {
    pub node_id: NodeId,
    pub adapter_number: u32,
    pub port_number: u32,
    pub label: Option<String>,
}

impl LinkEndpoint {
    pub fn port_key(&self) -> (NodeId, u32, u32) {
        (self.node_id, self.adapter_number, self.port_number)
    }
}

/// Per-direction traffic shaping applied to a link's NIOs (§4.4).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkFilters {
    pub latency_ms: Option<u32>,
    pub jitter_ms: Option<u32>,
    pub loss_pct: Option<f32>,
    pub corrupt_pct: Option<f32>,
    pub bpf: Option<String>,
    pub frequency_drop: Option<u32>,
}

impl LinkFilters {
    pub fn is_empty(&self) -> bool {
        *self == LinkFilters::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkLifecycle {
    /// Endpoints declared but NIOs not yet installed (project just opened).
    Declared,
    Establishing,
    Established,
    CreationFailed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureState {
    pub capturing: bool,
    pub capture_file_name: Option<String>,
    pub capture_node_id: Option<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub link_type: LinkType,
    pub endpoints: [LinkEndpoint; 2],
    pub filters: LinkFilters,
    pub capture: CaptureState,
    pub lifecycle: LinkLifecycle,
    /// The UDP tunnel ports the Link Engine reserved on each endpoint's
    /// compute, in `endpoints` order. `None` until `establish()` succeeds;
    /// this is what `teardown()` releases, never the compute's own
    /// management port.
    #[serde(default)]
    pub allocated_ports: Option<[u16; 2]>,
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum LinkValidationError {
    #[error("a link cannot connect a node to itself")]
    Loopback,
}

impl Link {
    pub fn new(link_type: LinkType, a: LinkEndpoint, b: LinkEndpoint) -> Result<Self, LinkValidationError> {
        if a.node_id == b.node_id {
            return Err(LinkValidationError::Loopback);
        }
        Ok(Self {
            id: LinkId::new(),
            link_type,
            endpoints: [a, b],
            filters: LinkFilters::default(),
            capture: CaptureState::default(),
            lifecycle: LinkLifecycle::Declared,
            allocated_ports: None,
        })
    }

    pub fn touches_port(&self, node_id: NodeId, adapter_number: u32, port_number: u32) -> bool {
        self.endpoints
            .iter()
            .any(|e| e.node_id == node_id && e.adapter_number == adapter_number && e.port_number == port_number)
    }

    pub fn other_endpoint(&self, node_id: NodeId) -> Option<&LinkEndpoint> {
        self.endpoints.iter().find(|e| e.node_id != node_id)
    }

    pub fn endpoint_for(&self, node_id: NodeId) -> Option<&LinkEndpoint> {
        self.endpoints.iter().find(|e| e.node_id == node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(node_id: NodeId) -> LinkEndpoint {
        LinkEndpoint { node_id, adapter_number: 0, port_number: 0, label: None }
    }

    #[test]
    fn rejects_loopback_links() {
        let n = NodeId::new();
        let err = Link::new(LinkType::Ethernet, endpoint(n), endpoint(n)).unwrap_err();
        assert_eq!(err, LinkValidationError::Loopback);
    }

    #[test]
    fn other_endpoint_returns_the_far_side() {
        let a = NodeId::new();
        let b = NodeId::new();
        let link = Link::new(LinkType::Ethernet, endpoint(a), endpoint(b)).unwrap();
        assert_eq!(link.other_endpoint(a).unwrap().node_id, b);
        assert_eq!(link.other_endpoint(b).unwrap().node_id, a);
    }
}
