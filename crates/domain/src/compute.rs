use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gns3_domain_types::{ComputeId, ComputeProtocol, NodeType};

/// What a compute told the controller about itself during the last
/// successful capability handshake (SPEC_FULL §C).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeCapabilities {
    pub supported_node_types: BTreeSet<NodeType>,
    pub platform: String,
    pub cpus: u32,
    pub memory_mb: u64,
}

impl ComputeCapabilities {
    pub fn supports(&self, node_type: NodeType) -> bool {
        self.supported_node_types.contains(&node_type)
    }
}

/// `unregistered → connecting → connected ⇄ disconnected` (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeConnectionState {
    Unregistered,
    Connecting,
    Connected,
    Disconnected,
}

/// Controller-side record of a registered compute (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compute {
    pub id: ComputeId,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub protocol: ComputeProtocol,
    #[serde(skip_serializing)]
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub capabilities: ComputeCapabilities,
    pub connection_state: ComputeConnectionState,
    pub last_error: Option<String>,
    pub last_connected_at: Option<DateTime<Utc>>,
}

impl Compute {
    pub fn new(id: ComputeId, name: String, host: String, port: u16, protocol: ComputeProtocol) -> Self {
        Self {
            id,
            name,
            host,
            port,
            protocol,
            user: None,
            password: None,
            capabilities: ComputeCapabilities::default(),
            connection_state: ComputeConnectionState::Unregistered,
            last_error: None,
            last_connected_at: None,
        }
    }

    pub fn connected(&self) -> bool {
        self.connection_state == ComputeConnectionState::Connected
    }

    pub fn base_url(&self) -> String {
        let scheme = match self.protocol {
            ComputeProtocol::Http => "http",
            ComputeProtocol::Https => "https",
        };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    /// Records a successful handshake: flips to `connected`, clears the
    /// last error, and refreshes the advertised capabilities.
    pub fn mark_connected(&mut self, capabilities: ComputeCapabilities, now: DateTime<Utc>) {
        self.connection_state = ComputeConnectionState::Connected;
        self.last_error = None;
        self.last_connected_at = Some(now);
        self.capabilities = capabilities;
    }

    /// Any I/O failure flips the proxy to `disconnected` and records why
    /// (§4.2); capabilities are left as last-known rather than cleared so
    /// the controller can still reason about what the compute *used to*
    /// support while a reconnector is retrying.
    pub fn mark_disconnected(&mut self, error: impl Into<String>) {
        self.connection_state = ComputeConnectionState::Disconnected;
        self.last_error = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_compute_starts_unregistered_and_disconnected() {
        let c = Compute::new(ComputeId::local(), "local".into(), "127.0.0.1".into(), 3080, ComputeProtocol::Http);
        assert_eq!(c.connection_state, ComputeConnectionState::Unregistered);
        assert!(!c.connected());
    }

    #[test]
    fn mark_connected_then_disconnected_roundtrip() {
        let mut c = Compute::new(ComputeId::local(), "local".into(), "127.0.0.1".into(), 3080, ComputeProtocol::Http);
        c.mark_connected(ComputeCapabilities::default(), Utc::now());
        assert!(c.connected());
        c.mark_disconnected("connection refused");
        assert!(!c.connected());
        assert_eq!(c.last_error.as_deref(), Some("connection refused"));
    }
}
