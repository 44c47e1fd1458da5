use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use serde_json::Value;

use gns3_domain::NodePort;

use crate::errors::NodeError;

/// A UDP tunnel endpoint installed on one side of a link (§4.4, GLOSSARY
/// NIO / UDP tunnel).
#[derive(Debug, Clone, PartialEq)]
pub struct UdpNio {
    pub local_port: u16,
    pub remote_host: String,
    pub remote_port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct NioFilters {
    pub latency_ms: Option<u32>,
    pub jitter_ms: Option<u32>,
    pub loss_pct: Option<f32>,
    pub corrupt_pct: Option<f32>,
    pub bpf: Option<String>,
    pub frequency_drop: Option<u32>,
}

/// The Node Driver Interface (§6): the one contract every emulator
/// driver (Dynamips, QEMU, Docker, VPCS, ...) must implement. This core
/// never implements a real driver — only a `NullDriver` test double
/// (SPEC_FULL §D) — but it owns this trait because the lifecycle state
/// machine and link engine both call through it uniformly, dispatching
/// on `NodeType` as a closed enum rather than dynamic duck typing (§9).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NodeDriverPort: Send + Sync {
    async fn create(&self, properties: Value) -> Result<Value, NodeError>;
    async fn update(&self, properties: Value) -> Result<(Value, Vec<NodePort>), NodeError>;
    async fn delete(&self) -> Result<(), NodeError>;

    async fn start(&self) -> Result<(), NodeError>;
    async fn stop(&self) -> Result<(), NodeError>;
    /// Drivers without native suspend support must return `Ok(())`
    /// unconditionally so heterogeneous "suspend all" bulk ops succeed
    /// (§4.3) — that contract lives in the driver, not here.
    async fn suspend(&self) -> Result<(), NodeError>;
    async fn resume(&self) -> Result<(), NodeError>;
    async fn reload(&self) -> Result<(), NodeError>;

    async fn duplicate(&self) -> Result<Value, NodeError>;

    async fn add_nio(&self, adapter_number: u32, port_number: u32, nio: UdpNio) -> Result<(), NodeError>;
    async fn update_nio(
        &self,
        adapter_number: u32,
        port_number: u32,
        filters: NioFilters,
    ) -> Result<(), NodeError>;
    async fn remove_nio(&self, adapter_number: u32, port_number: u32) -> Result<(), NodeError>;

    async fn start_capture(
        &self,
        adapter_number: u32,
        port_number: u32,
        capture_file_name: &str,
        data_link_type: &str,
    ) -> Result<(), NodeError>;
    async fn stop_capture(&self, adapter_number: u32, port_number: u32) -> Result<(), NodeError>;
    async fn stream_pcap(
        &self,
        adapter_number: u32,
        port_number: u32,
    ) -> Result<BoxStream<'static, std::io::Result<Bytes>>, NodeError>;
}

/// Builds the driver handle a Node Adapter delegates to. One factory is
/// shared by the whole core; it dispatches on `node_type` as a closed
/// enum rather than duck typing (§9), forwarding driver calls through
/// the node's compute's [`crate::ComputeClientPort`].
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait NodeDriverFactoryPort: Send + Sync {
    fn build(
        &self,
        node_type: gns3_domain_types::NodeType,
        node_id: gns3_domain_types::NodeId,
        compute_client: std::sync::Arc<dyn crate::ComputeClientPort>,
    ) -> std::sync::Arc<dyn NodeDriverPort>;
}
