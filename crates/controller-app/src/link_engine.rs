//! Link Engine (§4.4): three-phase link construction — validate,
//! allocate a UDP pair, install NIOs symmetrically — with rollback at
//! every phase boundary.

use std::sync::Arc;

use gns3_controller_ports::outbound::{NioFilters, UdpNio};
use gns3_controller_ports::LinkError;
use gns3_domain::{Link, LinkEndpoint, LinkFilters};

use crate::compute_proxy::ComputeProxyRegistry;
use crate::node_adapter::NodeAdapter;

/// Everything the Link Engine needs to resolve an endpoint: its node
/// adapter (for port/status checks and driver access) and the compute
/// that hosts it (for UDP port allocation and the advertised tunnel
/// host).
pub struct ResolvedEndpoint {
    pub adapter: Arc<NodeAdapter>,
    pub compute_host: String,
    pub compute_id: gns3_domain_types::ComputeId,
}

/// Stateless coordinator; all mutable state lives in the `Link` value
/// the caller persists and the `PortAllocator`s owned by each compute's
/// `ComputeProxy`.
pub struct LinkEngine;

impl LinkEngine {
    pub fn new() -> Self {
        Self
    }

    /// Phase 1: both endpoints are on distinct nodes and neither port
    /// already belongs to another link. Compute reachability is checked
    /// by the caller against the `ComputeProxyRegistry` directly, since
    /// that is where connection state actually lives (§4.4).
    pub fn validate(&self, a: &LinkEndpoint, b: &LinkEndpoint, existing_links: &[Link]) -> Result<(), LinkError> {
        if a.node_id == b.node_id {
            return Err(LinkError::Validation("a link cannot connect a node to itself".into()));
        }
        for link in existing_links {
            if link.touches_port(a.node_id, a.adapter_number, a.port_number)
                || link.touches_port(b.node_id, b.adapter_number, b.port_number)
            {
                return Err(LinkError::PortInUse);
            }
        }
        Ok(())
    }

    /// Phases 2 and 3: allocate a mirrored UDP pair on each side's
    /// compute and install the NIOs. Rolls back ports on allocation
    /// failure and rolls back both NIOs plus both ports if either
    /// install fails. Returns the `(port_a, port_b)` pair the caller
    /// must record on the `Link` so `teardown` releases the right ports.
    pub async fn establish(
        &self,
        endpoint_a: (&LinkEndpoint, &ResolvedEndpoint),
        endpoint_b: (&LinkEndpoint, &ResolvedEndpoint),
        filters: &LinkFilters,
        computes: &ComputeProxyRegistry,
    ) -> Result<(u16, u16), LinkError> {
        let (a, resolved_a) = endpoint_a;
        let (b, resolved_b) = endpoint_b;

        let proxy_a = computes
            .get(&resolved_a.compute_id)
            .ok_or_else(|| LinkError::ComputeUnreachable(resolved_a.compute_id.to_string()))?;
        let proxy_b = computes
            .get(&resolved_b.compute_id)
            .ok_or_else(|| LinkError::ComputeUnreachable(resolved_b.compute_id.to_string()))?;

        let port_a = proxy_a.ports.reserve_udp().map_err(|_| LinkError::NoPortAvailable(resolved_a.compute_id.to_string()))?;
        let port_b = match proxy_b.ports.reserve_udp() {
            Ok(port) => port,
            Err(_) => {
                proxy_a.ports.release_udp(port_a);
                return Err(LinkError::NoPortAvailable(resolved_b.compute_id.to_string()));
            }
        };

        let nio_a = UdpNio { local_port: port_a, remote_host: resolved_b.compute_host.clone(), remote_port: port_b };
        let nio_b = UdpNio { local_port: port_b, remote_host: resolved_a.compute_host.clone(), remote_port: port_a };

        let install_a = resolved_a.adapter.driver().add_nio(a.adapter_number, a.port_number, nio_a).await;
        if let Err(err) = install_a {
            proxy_a.ports.release_udp(port_a);
            proxy_b.ports.release_udp(port_b);
            return Err(LinkError::Driver(err.to_string()));
        }

        let install_b = resolved_b.adapter.driver().add_nio(b.adapter_number, b.port_number, nio_b).await;
        if let Err(err) = install_b {
            let _ = resolved_a.adapter.driver().remove_nio(a.adapter_number, a.port_number).await;
            proxy_a.ports.release_udp(port_a);
            proxy_b.ports.release_udp(port_b);
            return Err(LinkError::Driver(err.to_string()));
        }

        if !filters.is_empty() {
            self.push_filters(resolved_a, a, filters).await?;
            self.push_filters(resolved_b, b, filters).await?;
        }

        Ok((port_a, port_b))
    }

    async fn push_filters(
        &self,
        resolved: &ResolvedEndpoint,
        endpoint: &LinkEndpoint,
        filters: &LinkFilters,
    ) -> Result<(), LinkError> {
        let driver_filters = NioFilters {
            latency_ms: filters.latency_ms,
            jitter_ms: filters.jitter_ms,
            loss_pct: filters.loss_pct,
            corrupt_pct: filters.corrupt_pct,
            bpf: filters.bpf.clone(),
            frequency_drop: filters.frequency_drop,
        };
        resolved
            .adapter
            .driver()
            .update_nio(endpoint.adapter_number, endpoint.port_number, driver_filters)
            .await
            .map_err(|err| LinkError::Driver(err.to_string()))
    }

    /// Tears down both NIOs and releases both UDP ports (§8 property 2:
    /// after delete, neither NIO remains on either compute). The ports
    /// released are `link.allocated_ports`, the pair `establish`
    /// reserved — never re-derived from the compute's own port.
    pub async fn teardown(
        &self,
        link: &Link,
        endpoints: [&ResolvedEndpoint; 2],
        computes: &ComputeProxyRegistry,
    ) -> Result<(), LinkError> {
        let ports = link.allocated_ports.ok_or_else(|| LinkError::Validation("link has no allocated ports to release".into()))?;
        for (resolved, port) in endpoints.into_iter().zip(ports) {
            let endpoint = link
                .endpoint_for(resolved.adapter.snapshot().id)
                .ok_or_else(|| LinkError::Validation("endpoint not found on link".into()))?;
            let _ = resolved.adapter.driver().remove_nio(endpoint.adapter_number, endpoint.port_number).await;
            if let Some(proxy) = computes.get(&resolved.compute_id) {
                proxy.ports.release_udp(port);
            }
        }
        Ok(())
    }
}

impl Default for LinkEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gns3_domain_types::NodeId;

    fn endpoint(node_id: NodeId) -> LinkEndpoint {
        LinkEndpoint { node_id, adapter_number: 0, port_number: 0, label: None }
    }

    #[test]
    fn validate_rejects_self_link() {
        let n = NodeId::new();
        let engine = LinkEngine::new();
        let err = engine.validate(&endpoint(n), &endpoint(n), &[]).unwrap_err();
        assert!(matches!(err, LinkError::Validation(_)));
    }

    #[test]
    fn validate_rejects_a_port_already_in_use() {
        let a = NodeId::new();
        let b = NodeId::new();
        let c = NodeId::new();
        let existing = Link::new(gns3_domain_types::LinkType::Ethernet, endpoint(a), endpoint(b)).unwrap();
        let engine = LinkEngine::new();
        let err = engine.validate(&endpoint(a), &endpoint(c), std::slice::from_ref(&existing)).unwrap_err();
        assert!(matches!(err, LinkError::PortInUse));
    }
}
