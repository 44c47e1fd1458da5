//! Node Adapter (§4.3): the controller-side shadow of one node, its
//! lifecycle state machine, and its delegation to a Node Driver.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex as AsyncMutex;

use gns3_controller_ports::outbound::NodeDriverPort;
use gns3_controller_ports::NodeError;
use gns3_domain::{Node, NodePort, NodeTransition};
use gns3_domain_types::NodeStatus;

/// Per-node state plus the async lock that serializes operations on it
/// (§5: "operations on a single node are serialized by a per-node
/// mutex"). The lock is held across the driver call so a second
/// `start`/`stop`/... queues rather than racing the first.
pub struct NodeAdapter {
    node: std::sync::Mutex<Node>,
    driver: Arc<dyn NodeDriverPort>,
    op_lock: AsyncMutex<()>,
}

impl NodeAdapter {
    pub fn new(node: Node, driver: Arc<dyn NodeDriverPort>) -> Self {
        Self { node: std::sync::Mutex::new(node), driver, op_lock: AsyncMutex::new(()) }
    }

    pub fn snapshot(&self) -> Node {
        self.node.lock().expect("node adapter mutex poisoned").clone()
    }

    pub fn driver(&self) -> Arc<dyn NodeDriverPort> {
        Arc::clone(&self.driver)
    }

    fn status(&self) -> NodeStatus {
        self.node.lock().expect("node adapter mutex poisoned").status
    }

    fn set_status(&self, status: NodeStatus) {
        self.node.lock().expect("node adapter mutex poisoned").status = status;
    }

    async fn apply_transition(&self, transition: NodeTransition) -> Result<(), NodeError> {
        let _guard = self.op_lock.lock().await;
        let current = self.status();
        let target = self.node.lock().expect("node adapter mutex poisoned").validate_transition(transition)?;
        if target == current {
            return Ok(());
        }
        let result = match transition {
            NodeTransition::Start => self.driver.start().await,
            NodeTransition::Stop => self.driver.stop().await,
            NodeTransition::Suspend => self.driver.suspend().await,
            NodeTransition::Resume => self.driver.resume().await,
        };
        result?;
        self.set_status(target);
        Ok(())
    }

    pub async fn start(&self) -> Result<(), NodeError> {
        self.apply_transition(NodeTransition::Start).await
    }

    pub async fn stop(&self) -> Result<(), NodeError> {
        self.apply_transition(NodeTransition::Stop).await
    }

    /// A driver without native suspend support returns `Ok(())`
    /// unconditionally (§4.3), so this just follows the table like any
    /// other transition.
    pub async fn suspend(&self) -> Result<(), NodeError> {
        self.apply_transition(NodeTransition::Suspend).await
    }

    pub async fn resume(&self) -> Result<(), NodeError> {
        self.apply_transition(NodeTransition::Resume).await
    }

    /// `stop → start` as one semantic step (§4.3): if `stop` fails the
    /// node is left stopped-or-whatever-it-was and the error surfaces
    /// without attempting `start`; if `stop` succeeds but `start` fails
    /// the node is left `stopped`.
    pub async fn reload(&self) -> Result<(), NodeError> {
        if self.status() != NodeStatus::Stopped {
            self.stop().await?;
        }
        self.start().await
    }

    /// Pushes new properties to the driver and reconciles the port
    /// list, returning ports that disappeared so the Link Engine can
    /// detach any endpoint bound to them.
    pub async fn update(&self, properties: Value) -> Result<Vec<NodePort>, NodeError> {
        let _guard = self.op_lock.lock().await;
        let (new_properties, new_ports) = self.driver.update(properties).await?;
        let mut node = self.node.lock().expect("node adapter mutex poisoned");
        node.properties = new_properties;
        Ok(node.reconcile_ports(new_ports))
    }

    pub async fn delete(&self) -> Result<(), NodeError> {
        let _guard = self.op_lock.lock().await;
        self.node.lock().expect("node adapter mutex poisoned").require_stopped()?;
        self.driver.delete().await
    }

    pub async fn duplicate(&self) -> Result<Value, NodeError> {
        let _guard = self.op_lock.lock().await;
        self.driver.duplicate().await
    }

    pub async fn rename(&self, new_name: String) -> Result<(), NodeError> {
        let _guard = self.op_lock.lock().await;
        self.node.lock().expect("node adapter mutex poisoned").name = new_name;
        Ok(())
    }

    pub async fn relocate(&self, x: i32, y: i32, z: i32) -> Result<(), NodeError> {
        let _guard = self.op_lock.lock().await;
        let mut node = self.node.lock().expect("node adapter mutex poisoned");
        node.require_stopped()?;
        node.x = x;
        node.y = y;
        node.z = z;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gns3_controller_ports::outbound::MockNodeDriverPort;
    use gns3_domain::Node;
    use gns3_domain_types::{ComputeId, NodeType, ProjectId};

    fn node() -> Node {
        Node::new(ProjectId::new(), ComputeId::local(), NodeType::Vpcs, "pc1".into(), serde_json::json!({}))
    }

    #[tokio::test]
    async fn start_then_stop_round_trips_through_the_driver() {
        let mut driver = MockNodeDriverPort::new();
        driver.expect_start().times(1).returning(|| Ok(()));
        driver.expect_stop().times(1).returning(|| Ok(()));
        let adapter = NodeAdapter::new(node(), Arc::new(driver));

        adapter.start().await.unwrap();
        assert_eq!(adapter.snapshot().status, NodeStatus::Started);
        adapter.stop().await.unwrap();
        assert_eq!(adapter.snapshot().status, NodeStatus::Stopped);
    }

    #[tokio::test]
    async fn reload_stops_a_running_node_before_starting_it() {
        let mut driver = MockNodeDriverPort::new();
        driver.expect_start().times(2).returning(|| Ok(()));
        driver.expect_stop().times(1).returning(|| Ok(()));
        let adapter = NodeAdapter::new(node(), Arc::new(driver));

        adapter.start().await.unwrap();
        adapter.reload().await.unwrap();
        assert_eq!(adapter.snapshot().status, NodeStatus::Started);
    }

    #[tokio::test]
    async fn delete_while_running_is_rejected_before_the_driver_is_called() {
        let mut driver = MockNodeDriverPort::new();
        driver.expect_start().times(1).returning(|| Ok(()));
        driver.expect_delete().times(0);
        let adapter = NodeAdapter::new(node(), Arc::new(driver));

        adapter.start().await.unwrap();
        let err = adapter.delete().await.unwrap_err();
        assert!(matches!(err, NodeError::Lifecycle(_)));
    }
}
