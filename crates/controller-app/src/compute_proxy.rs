//! Compute Proxy (§4.2): one instance per registered compute, owning
//! its RPC client, connection state, and reconnector task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;

use gns3_controller_ports::outbound::{
    ComputeCallResponse, ComputeClientFactoryPort, ComputeClientPort, HttpMethod,
};
use gns3_controller_ports::ComputeError;
use gns3_domain::{Compute, ComputeCapabilities};
use gns3_domain_types::{ComputeId, ComputeProtocol};
use gns3_protocol::NotificationEventDto;

use crate::port_allocator::PortAllocator;

/// Exponential backoff schedule for the reconnector: 1s, 2s, 4s, 8s,
/// 16s, then capped at 30s (§4.2).
fn backoff_delay(attempt: u32) -> Duration {
    match 1u64.checked_shl(attempt).filter(|&secs| secs <= 16) {
        Some(secs) => Duration::from_secs(secs),
        None => Duration::from_secs(30),
    }
}

/// A single registered compute plus its port allocator and RPC client.
pub struct ComputeProxy {
    state: Mutex<Compute>,
    client: Arc<dyn ComputeClientPort>,
    pub ports: PortAllocator,
    reconnect_attempts: AtomicU64,
}

impl ComputeProxy {
    fn new(compute: Compute, client: Arc<dyn ComputeClientPort>) -> Self {
        Self {
            state: Mutex::new(compute),
            client,
            ports: PortAllocator::with_defaults(),
            reconnect_attempts: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> ComputeId {
        self.snapshot().id
    }

    pub fn snapshot(&self) -> Compute {
        self.state.lock().expect("compute proxy mutex poisoned").clone()
    }

    pub fn connected(&self) -> bool {
        self.state.lock().expect("compute proxy mutex poisoned").connected()
    }

    /// Forwards a generic RPC call (§4.2 `call`). A disconnected proxy
    /// fails immediately without touching the network.
    pub async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ComputeCallResponse, ComputeError> {
        if !self.connected() {
            return Err(ComputeError::Unreachable(format!(
                "compute {} is disconnected",
                self.id()
            )));
        }
        match self.client.call(method, path, body).await {
            Ok(response) => Ok(response),
            Err(err @ (ComputeError::Unreachable(_) | ComputeError::Timeout)) => {
                self.mark_disconnected(err.to_string());
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Runs the `GET /version` capability handshake and flips the
    /// connection state accordingly. Returns the refreshed capabilities
    /// on success.
    ///
    /// Reconciles the port allocator against whatever the compute
    /// reports holding (§4.1 reconnect reconciliation): a port this
    /// allocator never reserved but the compute lists as in use becomes
    /// externally held so a subsequent `reserve_*` never double-
    /// allocates it. Ports the allocator already tracks are left alone.
    pub async fn probe(&self) -> Result<ComputeCapabilities, ComputeError> {
        match self.client.version().await {
            Ok(body) => {
                let capabilities = capabilities_from_version(&body);
                self.reconcile_externally_held_ports(&body);
                self.mark_connected(capabilities.clone());
                self.reconnect_attempts.store(0, Ordering::SeqCst);
                Ok(capabilities)
            }
            Err(err) => {
                self.mark_disconnected(err.to_string());
                Err(err)
            }
        }
    }

    fn reconcile_externally_held_ports(&self, body: &Value) {
        let ports_in_use = |key: &str| -> Vec<u16> {
            body.get(key)
                .and_then(Value::as_array)
                .map(|ports| ports.iter().filter_map(Value::as_u64).filter_map(|p| u16::try_from(p).ok()).collect())
                .unwrap_or_default()
        };
        for port in ports_in_use("console_ports_in_use") {
            self.ports.mark_externally_held_console(port);
        }
        for port in ports_in_use("udp_ports_in_use") {
            self.ports.mark_externally_held_udp(port);
        }
    }

    fn mark_connected(&self, capabilities: ComputeCapabilities) {
        self.state.lock().expect("compute proxy mutex poisoned").mark_connected(capabilities, Utc::now());
    }

    fn mark_disconnected(&self, error: impl Into<String>) {
        self.state.lock().expect("compute proxy mutex poisoned").mark_disconnected(error);
    }

    pub fn client(&self) -> Arc<dyn ComputeClientPort> {
        self.client.clone()
    }

    /// Spawns the background reconnector loop (§4.2): probes on an
    /// exponential backoff while disconnected, and emits
    /// `compute.updated` through `on_update` whenever the connection
    /// state flips.
    pub fn spawn_reconnector<F>(self: &Arc<Self>, on_update: F) -> tokio::task::JoinHandle<()>
    where
        F: Fn(NotificationEventDto) + Send + Sync + 'static,
    {
        let proxy = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                if proxy.connected() {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
                let attempt = proxy.reconnect_attempts.fetch_add(1, Ordering::SeqCst) as u32;
                tokio::time::sleep(backoff_delay(attempt)).await;
                if proxy.probe().await.is_ok() {
                    let compute = proxy.snapshot();
                    on_update(NotificationEventDto::new(
                        "compute.updated",
                        serde_json::json!({ "compute_id": compute.id.to_string(), "connected": true }),
                        None,
                    ));
                }
            }
        })
    }
}

fn capabilities_from_version(body: &Value) -> ComputeCapabilities {
    let platform = body.get("platform").and_then(Value::as_str).unwrap_or("unknown").to_string();
    let cpus = body.get("cpus").and_then(Value::as_u64).unwrap_or(0) as u32;
    let memory_mb = body.get("memory_total").and_then(Value::as_u64).unwrap_or(0);
    ComputeCapabilities { supported_node_types: Default::default(), platform, cpus, memory_mb }
}

/// Registry of every known compute, owned by the Controller Core (§4.7).
pub struct ComputeProxyRegistry {
    proxies: DashMap<ComputeId, Arc<ComputeProxy>>,
    client_factory: Arc<dyn ComputeClientFactoryPort>,
}

impl ComputeProxyRegistry {
    pub fn new(client_factory: Arc<dyn ComputeClientFactoryPort>) -> Self {
        Self { proxies: DashMap::new(), client_factory }
    }

    pub fn register(
        &self,
        name: String,
        host: String,
        port: u16,
        protocol: ComputeProtocol,
        compute_id: Option<ComputeId>,
    ) -> Result<Arc<ComputeProxy>, ComputeError> {
        let id = compute_id.unwrap_or_else(|| ComputeId::new(uuid::Uuid::new_v4().to_string()));
        if self.proxies.contains_key(&id) {
            return Err(ComputeError::AlreadyRegistered(id.to_string()));
        }
        let compute = Compute::new(id.clone(), name, host, port, protocol);
        let client = self.client_factory.build(&compute);
        let proxy = Arc::new(ComputeProxy::new(compute, client));
        self.proxies.insert(id, Arc::clone(&proxy));
        Ok(proxy)
    }

    pub fn get(&self, id: &ComputeId) -> Option<Arc<ComputeProxy>> {
        self.proxies.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn require(&self, id: &ComputeId) -> Result<Arc<ComputeProxy>, ComputeError> {
        self.get(id).ok_or_else(|| ComputeError::NotFound(id.to_string()))
    }

    pub fn list(&self) -> Vec<Compute> {
        self.proxies.iter().map(|entry| entry.value().snapshot()).collect()
    }

    pub fn deregister(&self, id: &ComputeId) -> Result<(), ComputeError> {
        self.proxies.remove(id).map(|_| ()).ok_or_else(|| ComputeError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port_allocator::PortAllocationError;

    #[test]
    fn backoff_caps_at_thirty_seconds() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(4), Duration::from_secs(16));
        assert_eq!(backoff_delay(5), Duration::from_secs(30));
        assert_eq!(backoff_delay(20), Duration::from_secs(30));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        use gns3_controller_ports::outbound::MockComputeClientFactoryPort;
        use gns3_controller_ports::outbound::MockComputeClientPort;

        let mut factory = MockComputeClientFactoryPort::new();
        factory.expect_build().returning(|_| Arc::new(MockComputeClientPort::new()) as Arc<dyn ComputeClientPort>);
        let registry = ComputeProxyRegistry::new(Arc::new(factory));
        let shared_id = ComputeId::new("c1");
        registry
            .register("c1".into(), "127.0.0.1".into(), 3080, ComputeProtocol::Http, Some(shared_id.clone()))
            .unwrap();
        let err = registry
            .register("c1-dup".into(), "127.0.0.1".into(), 3080, ComputeProtocol::Http, Some(shared_id))
            .unwrap_err();
        assert!(matches!(err, ComputeError::AlreadyRegistered(_)));
    }

    #[tokio::test]
    async fn probe_marks_reported_ports_as_externally_held() {
        use gns3_controller_ports::outbound::MockComputeClientFactoryPort;
        use gns3_controller_ports::outbound::MockComputeClientPort;

        let mut factory = MockComputeClientFactoryPort::new();
        factory.expect_build().returning(|_| {
            let mut client = MockComputeClientPort::new();
            client.expect_version().returning(|| {
                Ok(serde_json::json!({
                    "platform": "linux",
                    "cpus": 4,
                    "console_ports_in_use": [5001],
                    "udp_ports_in_use": [10001, 10002],
                }))
            });
            Arc::new(client) as Arc<dyn ComputeClientPort>
        });
        let registry = ComputeProxyRegistry::new(Arc::new(factory));
        let proxy = registry
            .register("c1".into(), "127.0.0.1".into(), 3080, ComputeProtocol::Http, Some(ComputeId::new("c1")))
            .unwrap();

        proxy.probe().await.unwrap();

        assert_eq!(proxy.ports.reserve_specific_console(5001).unwrap_err(), PortAllocationError::AlreadyReserved(5001));
        assert_eq!(proxy.ports.reserve_specific_udp(10001).unwrap_err(), PortAllocationError::AlreadyReserved(10001));
        // A port the compute never mentioned is still free.
        proxy.ports.reserve_specific_udp(10003).unwrap();
    }
}
