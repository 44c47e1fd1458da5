//! Project Manager (§4.5): owns one project's entity graph, enforces
//! cross-entity invariants, and coordinates bulk operations.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex as AsyncMutex, RwLock, Semaphore};

use gns3_controller_ports::outbound::{ArchiveStorePort, NodeDriverFactoryPort, ProjectStorePort};
use gns3_controller_ports::ProjectError;
use gns3_domain::naming::{next_copy_suffix, normalize};
use gns3_domain::{Drawing, Link, LinkEndpoint, LinkFilters, LinkLifecycle, Node, Project, ProjectStatus, Snapshot};
use gns3_domain_types::{ComputeId, DrawingId, LinkId, LinkType, NodeId, NodeType, ProjectId, SnapshotId};

use crate::compute_proxy::ComputeProxyRegistry;
use crate::link_engine::{LinkEngine, ResolvedEndpoint};
use crate::node_adapter::NodeAdapter;

/// Default concurrency cap for bulk node operations (§4.5).
pub const DEFAULT_BULK_CONCURRENCY: usize = 10;

/// Outcome of one node inside a bulk operation; bulk operations never
/// fail overall on a per-node error (§7, §8 S6).
#[derive(Debug, Clone)]
pub struct BulkOutcome {
    pub node_id: NodeId,
    pub success: bool,
    pub error: Option<String>,
}

/// The portable, serializable shape of a project's full graph — the
/// payload behind `project.gns3` (§6) and behind every `ProjectStorePort`
/// call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectGraph {
    pub project: Project,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub drawings: Vec<Drawing>,
    pub snapshots: Vec<Snapshot>,
}

struct Graph {
    nodes: HashMap<NodeId, Arc<NodeAdapter>>,
    links: HashMap<LinkId, Link>,
    drawings: HashMap<DrawingId, Drawing>,
    snapshots: Vec<Snapshot>,
}

pub struct ProjectManager {
    project: RwLock<Project>,
    graph: RwLock<Graph>,
    driver_factory: Arc<dyn NodeDriverFactoryPort>,
    link_engine: LinkEngine,
    snapshot_lock: AsyncMutex<()>,
}

impl ProjectManager {
    pub fn new(project: Project, driver_factory: Arc<dyn NodeDriverFactoryPort>) -> Self {
        Self {
            project: RwLock::new(project),
            graph: RwLock::new(Graph {
                nodes: HashMap::new(),
                links: HashMap::new(),
                drawings: HashMap::new(),
                snapshots: Vec::new(),
            }),
            driver_factory,
            link_engine: LinkEngine::new(),
            snapshot_lock: AsyncMutex::new(()),
        }
    }

    pub async fn id(&self) -> ProjectId {
        self.project.read().await.id
    }

    pub async fn snapshot_project(&self) -> Project {
        self.project.read().await.clone()
    }

    pub async fn is_opened(&self) -> bool {
        self.project.read().await.is_opened()
    }

    // ---- persistence -------------------------------------------------

    pub async fn to_graph(&self) -> ProjectGraph {
        let project = self.project.read().await.clone();
        let graph = self.graph.read().await;
        ProjectGraph {
            project,
            nodes: graph.nodes.values().map(|a| a.snapshot()).collect(),
            links: graph.links.values().cloned().collect(),
            drawings: graph.drawings.values().cloned().collect(),
            snapshots: graph.snapshots.clone(),
        }
    }

    pub async fn save(&self, store: &dyn ProjectStorePort) -> Result<(), ProjectError> {
        let graph = self.to_graph().await;
        let value = serde_json::to_value(&graph).map_err(|e| ProjectError::Storage(e.to_string()))?;
        store.save_graph(graph.project.id, value).await
    }

    /// Rebuilds the in-memory graph from a persisted [`ProjectGraph`],
    /// constructing a fresh `NodeAdapter` (and driver) for every node
    /// via the node's registered compute (§4.5 open). Nodes whose
    /// compute is not currently registered are skipped and reported —
    /// the project still opens (§3 invariant: an unreachable compute
    /// leaves the node present but marked unreachable is approximated
    /// here by omitting it from the live registry; callers should
    /// surface the skipped list to the operator).
    pub async fn replace_graph(
        &self,
        loaded: ProjectGraph,
        computes: &ComputeProxyRegistry,
    ) -> Result<Vec<NodeId>, ProjectError> {
        let mut skipped = Vec::new();
        let mut nodes = HashMap::new();
        for node in loaded.nodes {
            let Some(proxy) = computes.get(&node.compute_id) else {
                skipped.push(node.id);
                continue;
            };
            let driver = self.driver_factory.build(node.node_type, node.id, proxy.client());
            nodes.insert(node.id, Arc::new(NodeAdapter::new(node, driver)));
        }

        let mut links = HashMap::new();
        for mut link in loaded.links {
            // Links are rebuilt `declared`; NIOs are not reinstalled
            // until the endpoints are started (§4.5 open).
            link.lifecycle = LinkLifecycle::Declared;
            link.allocated_ports = None;
            links.insert(link.id, link);
        }

        let drawings = loaded.drawings.into_iter().map(|d| (d.id, d)).collect();

        *self.project.write().await = loaded.project;
        let mut graph = self.graph.write().await;
        graph.nodes = nodes;
        graph.links = links;
        graph.drawings = drawings;
        graph.snapshots = loaded.snapshots;
        Ok(skipped)
    }

    // ---- nodes ---------------------------------------------------------

    pub async fn list_nodes(&self) -> Vec<Node> {
        self.graph.read().await.nodes.values().map(|a| a.snapshot()).collect()
    }

    pub async fn node(&self, id: NodeId) -> Result<Arc<NodeAdapter>, gns3_controller_ports::NodeError> {
        self.graph
            .read()
            .await
            .nodes
            .get(&id)
            .cloned()
            .ok_or_else(|| gns3_controller_ports::NodeError::NotFound(id.to_string()))
    }

    pub async fn create_node(
        &self,
        compute_id: ComputeId,
        node_type: NodeType,
        name: String,
        properties: Value,
        computes: &ComputeProxyRegistry,
    ) -> Result<Node, gns3_controller_ports::NodeError> {
        use gns3_controller_ports::NodeError;

        let project_id = self.id().await;
        {
            let graph = self.graph.read().await;
            let normalized = normalize(&name);
            if graph.nodes.values().any(|a| normalize(&a.snapshot().name) == normalized) {
                return Err(NodeError::NameTaken(name));
            }
        }
        let proxy = computes.require(&compute_id).map_err(|_| NodeError::ComputeUnreachable(compute_id.to_string()))?;
        if !proxy.connected() {
            return Err(NodeError::ComputeUnreachable(compute_id.to_string()));
        }

        let mut node = Node::new(project_id, compute_id, node_type, name, properties.clone());
        let driver = self.driver_factory.build(node_type, node.id, proxy.client());
        let created_properties = driver.create(properties).await?;
        node.properties = created_properties;

        let adapter = Arc::new(NodeAdapter::new(node.clone(), driver));
        self.graph.write().await.nodes.insert(node.id, adapter);
        Ok(node)
    }

    pub async fn delete_node(&self, id: NodeId) -> Result<(), gns3_controller_ports::NodeError> {
        use gns3_controller_ports::NodeError;

        let adapter = self.node(id).await?;
        adapter.delete().await?;

        let mut graph = self.graph.write().await;
        let attached: Vec<LinkId> = graph
            .links
            .values()
            .filter(|link| link.endpoints.iter().any(|e| e.node_id == id))
            .map(|link| link.id)
            .collect();
        for link_id in attached {
            graph.links.remove(&link_id);
        }
        graph.nodes.remove(&id).ok_or_else(|| NodeError::NotFound(id.to_string()))?;
        Ok(())
    }

    pub async fn rename_node(&self, id: NodeId, new_name: String) -> Result<(), gns3_controller_ports::NodeError> {
        use gns3_controller_ports::NodeError;

        {
            let graph = self.graph.read().await;
            let normalized = normalize(&new_name);
            if graph.nodes.values().any(|a| a.snapshot().id != id && normalize(&a.snapshot().name) == normalized) {
                return Err(NodeError::NameTaken(new_name));
            }
        }
        self.node(id).await?.rename(new_name).await
    }

    /// Duplicates a single node within the same project (§6 `nodes/{nid}/duplicate`):
    /// asks the driver to copy its on-disk working directory, then
    /// registers a fresh `NodeAdapter` under a new UUID with a
    /// collision-free name. The source node must be `stopped`, the same
    /// precondition §3 places on delete/move, since duplicating a
    /// node's working directory while its process is live would copy
    /// inconsistent state. The new node starts `stopped`, has no links,
    /// and sits one grid cell to the right so it doesn't visually
    /// overlap its source.
    pub async fn duplicate_node(
        &self,
        id: NodeId,
        computes: &ComputeProxyRegistry,
    ) -> Result<Node, gns3_controller_ports::NodeError> {
        use gns3_controller_ports::NodeError;

        let source_adapter = self.node(id).await?;
        let source = source_adapter.snapshot();
        source.require_stopped()?;
        let duplicated_properties = source_adapter.duplicate().await?;

        let existing_names: Vec<String> = {
            let graph = self.graph.read().await;
            graph.nodes.values().map(|a| a.snapshot().name).collect()
        };
        let name = next_copy_suffix(&source.name, |candidate| existing_names.iter().any(|n| normalize(n) == normalize(candidate)));

        let proxy = computes.require(&source.compute_id).map_err(|_| NodeError::ComputeUnreachable(source.compute_id.to_string()))?;

        let mut node = Node::new(self.id().await, source.compute_id.clone(), source.node_type, name, duplicated_properties);
        node.x = source.x + 50;
        node.y = source.y + 50;
        node.z = source.z;
        node.symbol = source.symbol.clone();

        let driver = self.driver_factory.build(source.node_type, node.id, proxy.client());
        self.graph.write().await.nodes.insert(node.id, Arc::new(NodeAdapter::new(node.clone(), driver)));
        Ok(node)
    }

    // ---- links -----------------------------------------------------------

    pub async fn list_links(&self) -> Vec<Link> {
        self.graph.read().await.links.values().cloned().collect()
    }

    pub async fn create_link(
        &self,
        link_type: LinkType,
        a: LinkEndpoint,
        b: LinkEndpoint,
        computes: &ComputeProxyRegistry,
    ) -> Result<Link, gns3_controller_ports::LinkError> {
        use gns3_controller_ports::LinkError;

        let existing: Vec<Link> = self.list_links().await;
        self.link_engine.validate(&a, &b, &existing)?;

        let adapter_a = self.node(a.node_id).await.map_err(|_| LinkError::NotFound(a.node_id.to_string()))?;
        let adapter_b = self.node(b.node_id).await.map_err(|_| LinkError::NotFound(b.node_id.to_string()))?;
        let compute_a = adapter_a.snapshot().compute_id;
        let compute_b = adapter_b.snapshot().compute_id;
        let proxy_a = computes.get(&compute_a).ok_or_else(|| LinkError::ComputeUnreachable(compute_a.to_string()))?;
        let proxy_b = computes.get(&compute_b).ok_or_else(|| LinkError::ComputeUnreachable(compute_b.to_string()))?;
        if !proxy_a.connected() || !proxy_b.connected() {
            return Err(LinkError::ComputeUnreachable(compute_a.to_string()));
        }

        let mut link = Link::new(link_type, a.clone(), b.clone()).map_err(|e| LinkError::Validation(e.to_string()))?;
        link.lifecycle = LinkLifecycle::Establishing;

        let resolved_a = ResolvedEndpoint {
            adapter: adapter_a,
            compute_host: proxy_a.snapshot().host,
            compute_id: compute_a,
        };
        let resolved_b = ResolvedEndpoint {
            adapter: adapter_b,
            compute_host: proxy_b.snapshot().host,
            compute_id: compute_b,
        };

        match self
            .link_engine
            .establish((&a, &resolved_a), (&b, &resolved_b), &LinkFilters::default(), computes)
            .await
        {
            Ok((port_a, port_b)) => {
                link.lifecycle = LinkLifecycle::Established;
                link.allocated_ports = Some([port_a, port_b]);
                self.graph.write().await.links.insert(link.id, link.clone());
                Ok(link)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn delete_link(&self, id: LinkId, computes: &ComputeProxyRegistry) -> Result<(), gns3_controller_ports::LinkError> {
        use gns3_controller_ports::LinkError;

        let link = {
            let graph = self.graph.read().await;
            graph.links.get(&id).cloned().ok_or_else(|| LinkError::NotFound(id.to_string()))?
        };

        if link.lifecycle == LinkLifecycle::Established {
            let [a, b] = &link.endpoints;
            let adapter_a = self.node(a.node_id).await.map_err(|_| LinkError::NotFound(a.node_id.to_string()))?;
            let adapter_b = self.node(b.node_id).await.map_err(|_| LinkError::NotFound(b.node_id.to_string()))?;
            let compute_a = adapter_a.snapshot().compute_id;
            let compute_b = adapter_b.snapshot().compute_id;
            let resolved_a = ResolvedEndpoint { adapter: adapter_a, compute_host: String::new(), compute_id: compute_a };
            let resolved_b = ResolvedEndpoint { adapter: adapter_b, compute_host: String::new(), compute_id: compute_b };
            self.link_engine.teardown(&link, [&resolved_a, &resolved_b], computes).await?;
        }

        self.graph.write().await.links.remove(&id);
        Ok(())
    }

    /// Starts a pcap capture on one endpoint of a link (§6): defaults to
    /// the link's first endpoint when `capture_node_id` is omitted.
    pub async fn start_capture(
        &self,
        link_id: LinkId,
        capture_file_name: String,
        data_link_type: String,
        capture_node_id: Option<NodeId>,
    ) -> Result<(), gns3_controller_ports::LinkError> {
        use gns3_controller_ports::LinkError;

        let (node_id, adapter_number, port_number) = {
            let graph = self.graph.read().await;
            let link = graph.links.get(&link_id).ok_or_else(|| LinkError::NotFound(link_id.to_string()))?;
            let node_id = capture_node_id.unwrap_or(link.endpoints[0].node_id);
            let endpoint = link.endpoint_for(node_id).ok_or_else(|| LinkError::Validation("capture node not on link".into()))?;
            (node_id, endpoint.adapter_number, endpoint.port_number)
        };
        let adapter = self.node(node_id).await.map_err(|_| LinkError::NotFound(node_id.to_string()))?;
        adapter
            .driver()
            .start_capture(adapter_number, port_number, &capture_file_name, &data_link_type)
            .await
            .map_err(|e| LinkError::Driver(e.to_string()))?;

        let mut graph = self.graph.write().await;
        if let Some(link) = graph.links.get_mut(&link_id) {
            link.capture.capturing = true;
            link.capture.capture_file_name = Some(capture_file_name);
            link.capture.capture_node_id = Some(node_id);
        }
        Ok(())
    }

    pub async fn stop_capture(&self, link_id: LinkId) -> Result<(), gns3_controller_ports::LinkError> {
        use gns3_controller_ports::LinkError;

        let (node_id, adapter_number, port_number) = {
            let graph = self.graph.read().await;
            let link = graph.links.get(&link_id).ok_or_else(|| LinkError::NotFound(link_id.to_string()))?;
            let node_id = link.capture.capture_node_id.ok_or_else(|| LinkError::Validation("link is not capturing".into()))?;
            let endpoint = link.endpoint_for(node_id).ok_or_else(|| LinkError::Validation("capture node not on link".into()))?;
            (node_id, endpoint.adapter_number, endpoint.port_number)
        };
        let adapter = self.node(node_id).await.map_err(|_| LinkError::NotFound(node_id.to_string()))?;
        adapter.driver().stop_capture(adapter_number, port_number).await.map_err(|e| LinkError::Driver(e.to_string()))?;

        let mut graph = self.graph.write().await;
        if let Some(link) = graph.links.get_mut(&link_id) {
            link.capture = gns3_domain::CaptureState::default();
        }
        Ok(())
    }

    pub async fn stream_pcap(
        &self,
        link_id: LinkId,
    ) -> Result<futures_util::stream::BoxStream<'static, std::io::Result<bytes::Bytes>>, gns3_controller_ports::LinkError> {
        use gns3_controller_ports::LinkError;

        let (node_id, adapter_number, port_number) = {
            let graph = self.graph.read().await;
            let link = graph.links.get(&link_id).ok_or_else(|| LinkError::NotFound(link_id.to_string()))?;
            let node_id = link.capture.capture_node_id.ok_or_else(|| LinkError::Validation("link is not capturing".into()))?;
            let endpoint = link.endpoint_for(node_id).ok_or_else(|| LinkError::Validation("capture node not on link".into()))?;
            (node_id, endpoint.adapter_number, endpoint.port_number)
        };
        let adapter = self.node(node_id).await.map_err(|_| LinkError::NotFound(node_id.to_string()))?;
        adapter.driver().stream_pcap(adapter_number, port_number).await.map_err(|e| LinkError::Driver(e.to_string()))
    }

    // ---- drawings ----------------------------------------------------

    pub async fn list_drawings(&self) -> Vec<Drawing> {
        self.graph.read().await.drawings.values().cloned().collect()
    }

    pub async fn create_drawing(&self, drawing: Drawing) -> Drawing {
        self.graph.write().await.drawings.insert(drawing.id, drawing.clone());
        drawing
    }

    pub async fn update_drawing(&self, drawing: Drawing) -> Result<Drawing, gns3_controller_ports::ProjectError> {
        let mut graph = self.graph.write().await;
        if !graph.drawings.contains_key(&drawing.id) {
            return Err(ProjectError::NotFound(drawing.id.to_string()));
        }
        graph.drawings.insert(drawing.id, drawing.clone());
        Ok(drawing)
    }

    pub async fn delete_drawing(&self, id: DrawingId) -> Result<(), gns3_controller_ports::ProjectError> {
        self.graph.write().await.drawings.remove(&id).map(|_| ()).ok_or_else(|| ProjectError::NotFound(id.to_string()))
    }

    // ---- bulk operations ---------------------------------------------

    /// Runs `op` over every node, always-on kinds first, then the rest,
    /// with a bounded-concurrency fan-out inside each group (§4.5).
    pub async fn bulk_operation<F, Fut>(&self, concurrency: usize, op: F) -> Vec<BulkOutcome>
    where
        F: Fn(Arc<NodeAdapter>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), gns3_controller_ports::NodeError>> + Send + 'static,
    {
        let op = Arc::new(op);
        let nodes: Vec<Arc<NodeAdapter>> = self.graph.read().await.nodes.values().cloned().collect();
        let (always_on, rest): (Vec<_>, Vec<_>) =
            nodes.into_iter().partition(|n| n.snapshot().node_type.is_always_on());

        let mut outcomes = Vec::new();
        outcomes.extend(run_group(always_on, concurrency, Arc::clone(&op)).await);
        outcomes.extend(run_group(rest, concurrency, op).await);
        outcomes
    }

    pub async fn start_all(&self, concurrency: usize) -> Vec<BulkOutcome> {
        self.bulk_operation(concurrency, |adapter| async move { adapter.start().await }).await
    }

    pub async fn stop_all(&self, concurrency: usize) -> Vec<BulkOutcome> {
        self.bulk_operation(concurrency, |adapter| async move { adapter.stop().await }).await
    }

    pub async fn suspend_all(&self, concurrency: usize) -> Vec<BulkOutcome> {
        self.bulk_operation(concurrency, |adapter| async move { adapter.suspend().await }).await
    }

    // ---- lifecycle -----------------------------------------------------

    pub async fn open(&self, computes: &ComputeProxyRegistry, project_store: &dyn ProjectStorePort) -> Result<Vec<NodeId>, ProjectError> {
        let graph_value = project_store.load_graph(self.id().await).await?;
        let graph: ProjectGraph = serde_json::from_value(graph_value).map_err(|e| ProjectError::Storage(e.to_string()))?;
        let auto_start = graph.project.auto_start;
        let skipped = self.replace_graph(graph, computes).await?;
        self.project.write().await.status = ProjectStatus::Opened;
        if auto_start {
            let _ = self.start_all(DEFAULT_BULK_CONCURRENCY).await;
        }
        Ok(skipped)
    }

    pub async fn close(&self) -> Vec<BulkOutcome> {
        let outcomes = self.stop_all(DEFAULT_BULK_CONCURRENCY).await;
        self.project.write().await.status = ProjectStatus::Closed;
        self.graph.write().await.nodes.clear();
        outcomes
    }

    /// Deep-copies the graph under fresh UUIDs for project duplication
    /// (§4.5): every node's on-disk directory is rewritten by invoking
    /// its driver's `duplicate`, the same call `duplicate_node` makes
    /// for a single node, before the caller installs the returned graph
    /// and inserts the new `ProjectManager` into the controller's
    /// project registry.
    pub async fn duplicate_graph(&self, new_name: String) -> Result<ProjectGraph, gns3_controller_ports::NodeError> {
        let current = self.to_graph().await;
        let mut id_map: HashMap<NodeId, NodeId> = HashMap::new();
        let mut nodes: Vec<Node> = Vec::with_capacity(current.nodes.len());
        for mut n in current.nodes {
            let source_adapter = self.node(n.id).await?;
            let duplicated_properties = source_adapter.duplicate().await?;
            let new_id = NodeId::new();
            id_map.insert(n.id, new_id);
            n.id = new_id;
            n.properties = duplicated_properties;
            nodes.push(n);
        }
        let existing_names: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
        let nodes: Vec<Node> = nodes
            .into_iter()
            .map(|mut n| {
                if existing_names.iter().filter(|name| normalize(name) == normalize(&n.name)).count() > 1 {
                    n.name = next_copy_suffix(&n.name, |candidate| existing_names.iter().any(|e| e == candidate));
                }
                n
            })
            .collect();
        let links: Vec<Link> = current
            .links
            .into_iter()
            .filter_map(|mut l| {
                let a = id_map.get(&l.endpoints[0].node_id)?;
                let b = id_map.get(&l.endpoints[1].node_id)?;
                l.id = LinkId::new();
                l.endpoints[0].node_id = *a;
                l.endpoints[1].node_id = *b;
                l.lifecycle = LinkLifecycle::Declared;
                l.allocated_ports = None;
                Some(l)
            })
            .collect();
        let drawings: Vec<Drawing> = current
            .drawings
            .into_iter()
            .map(|mut d| {
                d.id = DrawingId::new();
                d
            })
            .collect();

        let mut project = current.project;
        project.id = ProjectId::new();
        project.name = new_name;
        project.status = ProjectStatus::Closed;

        Ok(ProjectGraph { project, nodes, links, drawings, snapshots: Vec::new() })
    }

    // ---- snapshots -------------------------------------------------------

    pub async fn snapshot_create(
        &self,
        name: String,
        archive_store: &dyn ArchiveStorePort,
        project_store: &dyn ProjectStorePort,
    ) -> Result<Snapshot, ProjectError> {
        let _guard = self.snapshot_lock.lock().await;
        let any_running = self.list_nodes().await.iter().any(|n| n.status != gns3_domain_types::NodeStatus::Stopped);
        if any_running {
            return Err(ProjectError::ProjectRunning);
        }
        self.save(project_store).await?;
        let path = archive_store.write_snapshot(self.id().await, &name).await?;
        let snapshot = Snapshot::new(name, path, chrono::Utc::now());
        self.graph.write().await.snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    pub async fn snapshot_restore(
        &self,
        snapshot_id: SnapshotId,
        archive_store: &dyn ArchiveStorePort,
        project_store: &dyn ProjectStorePort,
        computes: &ComputeProxyRegistry,
    ) -> Result<Vec<NodeId>, ProjectError> {
        let _guard = self.snapshot_lock.lock().await;
        let snapshot = {
            let graph = self.graph.read().await;
            graph.snapshots.iter().find(|s| s.id == snapshot_id).cloned().ok_or(ProjectError::SnapshotNotFound(snapshot_id.to_string()))?
        };
        self.close().await;
        let project_id = self.id().await;
        archive_store.unpack_into(&snapshot.path, project_id).await?;
        self.open(computes, project_store).await
    }
}

async fn run_group<F, Fut>(nodes: Vec<Arc<NodeAdapter>>, concurrency: usize, op: Arc<F>) -> Vec<BulkOutcome>
where
    F: Fn(Arc<NodeAdapter>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<(), gns3_controller_ports::NodeError>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::new();
    for adapter in nodes {
        let permit = Arc::clone(&semaphore);
        let op = Arc::clone(&op);
        handles.push(tokio::spawn(async move {
            let _permit = permit.acquire_owned().await.expect("semaphore closed");
            let node_id = adapter.snapshot().id;
            match op(Arc::clone(&adapter)).await {
                Ok(()) => BulkOutcome { node_id, success: true, error: None },
                Err(err) => BulkOutcome { node_id, success: false, error: Some(err.to_string()) },
            }
        }));
    }
    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await.expect("bulk operation task panicked"));
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use gns3_controller_ports::outbound::{MockNodeDriverFactoryPort, MockNodeDriverPort};
    use gns3_domain_types::ComputeProtocol;

    fn always_returning_ok_factory() -> Arc<dyn NodeDriverFactoryPort> {
        use gns3_controller_ports::outbound::NodeDriverPort;

        let mut factory = MockNodeDriverFactoryPort::new();
        factory.expect_build().returning(|_, _, _| {
            let mut driver = MockNodeDriverPort::new();
            driver.expect_start().returning(|| Ok(()));
            driver.expect_stop().returning(|| Ok(()));
            driver.expect_create().returning(|props| Ok(props));
            Arc::new(driver) as Arc<dyn NodeDriverPort>
        });
        Arc::new(factory)
    }

    #[tokio::test]
    async fn create_node_rejects_duplicate_names_case_insensitively() {
        use gns3_controller_ports::outbound::{ComputeClientPort, MockComputeClientFactoryPort, MockComputeClientPort};

        let mut client_factory = MockComputeClientFactoryPort::new();
        client_factory.expect_build().returning(|_| {
            let mut client = MockComputeClientPort::new();
            client.expect_version().returning(|| Ok(serde_json::json!({})));
            Arc::new(client) as Arc<dyn ComputeClientPort>
        });
        let computes = ComputeProxyRegistry::new(Arc::new(client_factory));
        let proxy = computes
            .register("local".into(), "127.0.0.1".into(), 3080, ComputeProtocol::Http, Some(ComputeId::local()))
            .unwrap();
        proxy.probe().await.unwrap();

        let project = Project::new("t1".into(), "/tmp/t1".into());
        let manager = ProjectManager::new(project, always_returning_ok_factory());

        manager
            .create_node(ComputeId::local(), NodeType::Vpcs, "PC1".into(), serde_json::json!({}), &computes)
            .await
            .unwrap();
        let err = manager
            .create_node(ComputeId::local(), NodeType::Vpcs, " pc1 ".into(), serde_json::json!({}), &computes)
            .await
            .unwrap_err();
        assert!(matches!(err, gns3_controller_ports::NodeError::NameTaken(_)));
    }
}
