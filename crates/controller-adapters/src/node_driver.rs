//! The Node Driver Interface is implemented here only by an in-process
//! `NullDriver` (SPEC_FULL §D): this core orchestrates emulator
//! lifecycles uniformly but never binds to a real Dynamips/QEMU/Docker
//! process. `NullDriver` accepts every lifecycle call and echoes back
//! the properties it was given, which is enough for the scenario tests
//! in §8 to exercise the full create/start/stop/delete/link path.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use gns3_controller_ports::outbound::{ComputeClientPort, NioFilters, NodeDriverFactoryPort, NodeDriverPort, UdpNio};
use gns3_controller_ports::NodeError;
use gns3_domain::NodePort;
use gns3_domain_types::{NodeId, NodeType};
use serde_json::Value;

pub struct NullDriver {
    node_id: NodeId,
    node_type: NodeType,
}

impl NullDriver {
    pub fn new(node_type: NodeType, node_id: NodeId) -> Self {
        Self { node_id, node_type }
    }
}

#[async_trait]
impl NodeDriverPort for NullDriver {
    async fn create(&self, properties: Value) -> Result<Value, NodeError> {
        tracing::debug!(node_id = %self.node_id, node_type = ?self.node_type, "null driver create");
        Ok(properties)
    }

    async fn update(&self, properties: Value) -> Result<(Value, Vec<NodePort>), NodeError> {
        Ok((properties, Vec::new()))
    }

    async fn delete(&self) -> Result<(), NodeError> {
        Ok(())
    }

    async fn start(&self) -> Result<(), NodeError> {
        Ok(())
    }

    async fn stop(&self) -> Result<(), NodeError> {
        Ok(())
    }

    async fn suspend(&self) -> Result<(), NodeError> {
        Ok(())
    }

    async fn resume(&self) -> Result<(), NodeError> {
        Ok(())
    }

    async fn reload(&self) -> Result<(), NodeError> {
        Ok(())
    }

    async fn duplicate(&self) -> Result<Value, NodeError> {
        Ok(Value::Null)
    }

    async fn add_nio(&self, _adapter_number: u32, _port_number: u32, _nio: UdpNio) -> Result<(), NodeError> {
        Ok(())
    }

    async fn update_nio(&self, _adapter_number: u32, _port_number: u32, _filters: NioFilters) -> Result<(), NodeError> {
        Ok(())
    }

    async fn remove_nio(&self, _adapter_number: u32, _port_number: u32) -> Result<(), NodeError> {
        Ok(())
    }

    async fn start_capture(
        &self,
        _adapter_number: u32,
        _port_number: u32,
        _capture_file_name: &str,
        _data_link_type: &str,
    ) -> Result<(), NodeError> {
        Ok(())
    }

    async fn stop_capture(&self, _adapter_number: u32, _port_number: u32) -> Result<(), NodeError> {
        Ok(())
    }

    async fn stream_pcap(&self, _adapter_number: u32, _port_number: u32) -> Result<BoxStream<'static, std::io::Result<Bytes>>, NodeError> {
        Ok(stream::empty().boxed())
    }
}

pub struct NullDriverFactory;

impl NodeDriverFactoryPort for NullDriverFactory {
    fn build(&self, node_type: NodeType, node_id: NodeId, _compute_client: Arc<dyn ComputeClientPort>) -> Arc<dyn NodeDriverPort> {
        Arc::new(NullDriver::new(node_type, node_id))
    }
}
