//! Controller Core (§4.7): thin top-level coordinator — the compute and
//! project registries, RPC forwarding, and orchestrated shutdown. Hosts
//! the Notification Bus as a singleton; the Link Engine is stateless so
//! each Project Manager holds its own instance with no observable
//! difference from a shared one (see DESIGN.md).

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;

use gns3_controller_ports::outbound::{
    ArchiveStorePort, ComputeCallResponse, ComputeClientFactoryPort, HttpMethod, NodeDriverFactoryPort,
    ProjectStorePort,
};
use gns3_controller_ports::{ComputeError, ProjectError};
use gns3_domain::Project;
use gns3_domain_types::{ComputeId, ComputeProtocol, ProjectId};

use crate::compute_proxy::ComputeProxyRegistry;
use crate::notification_bus::NotificationBus;
use crate::project_manager::ProjectManager;

/// Timeout for graceful shutdown's parallel project close (§4.7).
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Fields accepted by `POST /v2/projects` (§6), gathered into one
/// struct so `ControllerCore::create_project` doesn't grow a
/// positional-argument list every time the wire format adds a flag.
#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    pub name: String,
    pub path: String,
    pub project_id: Option<ProjectId>,
    pub auto_start: bool,
    pub auto_open: bool,
    pub auto_close: bool,
}

pub struct ControllerCore {
    pub computes: ComputeProxyRegistry,
    pub notifications: Arc<NotificationBus>,
    projects: DashMap<ProjectId, Arc<ProjectManager>>,
    driver_factory: Arc<dyn NodeDriverFactoryPort>,
    project_store: Arc<dyn ProjectStorePort>,
    archive_store: Arc<dyn ArchiveStorePort>,
}

impl ControllerCore {
    pub fn new(
        client_factory: Arc<dyn ComputeClientFactoryPort>,
        driver_factory: Arc<dyn NodeDriverFactoryPort>,
        project_store: Arc<dyn ProjectStorePort>,
        archive_store: Arc<dyn ArchiveStorePort>,
    ) -> Self {
        Self {
            computes: ComputeProxyRegistry::new(client_factory),
            notifications: Arc::new(NotificationBus::new()),
            projects: DashMap::new(),
            driver_factory,
            project_store,
            archive_store,
        }
    }

    // ---- computes ------------------------------------------------------

    pub fn register_compute(
        &self,
        name: String,
        host: String,
        port: u16,
        protocol: ComputeProtocol,
        compute_id: Option<ComputeId>,
    ) -> Result<gns3_domain::Compute, ComputeError> {
        let proxy = self.computes.register(name, host, port, protocol, compute_id)?;
        let proxy_for_reconnector = Arc::clone(&proxy);
        let bus = Arc::clone(&self.notifications);
        proxy_for_reconnector.spawn_reconnector(move |event| {
            let bus = Arc::clone(&bus);
            tokio::spawn(async move {
                bus.publish(event).await;
            });
        });
        Ok(proxy.snapshot())
    }

    pub fn list_computes(&self) -> Vec<gns3_domain::Compute> {
        self.computes.list()
    }

    pub fn deregister_compute(&self, id: &ComputeId) -> Result<(), ComputeError> {
        self.computes.deregister(id)
    }

    /// RPC forwarding endpoint (§6): `ANY /v2/computes/{id}/{emulator}/{path...}`.
    pub async fn forward_to_compute(
        &self,
        compute_id: &ComputeId,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ComputeCallResponse, ComputeError> {
        let proxy = self.computes.require(compute_id)?;
        proxy.call(method, path, body).await
    }

    pub fn archive_store(&self) -> &dyn ArchiveStorePort {
        self.archive_store.as_ref()
    }

    pub fn project_store(&self) -> &dyn ProjectStorePort {
        self.project_store.as_ref()
    }

    // ---- projects --------------------------------------------------------

    pub async fn create_project(&self, request: CreateProjectRequest) -> Result<Project, ProjectError> {
        let managers: Vec<Arc<ProjectManager>> = self.projects.iter().map(|entry| Arc::clone(entry.value())).collect();
        for manager in &managers {
            if manager.snapshot_project().await.name.eq_ignore_ascii_case(&request.name) {
                return Err(ProjectError::NameTaken(request.name));
            }
        }
        let mut project = Project::new(request.name, request.path);
        if let Some(id) = request.project_id {
            project.id = id;
        }
        project.auto_start = request.auto_start;
        project.auto_open = request.auto_open;
        project.auto_close = request.auto_close;
        let manager = Arc::new(ProjectManager::new(project.clone(), Arc::clone(&self.driver_factory)));
        manager.save(self.project_store.as_ref()).await?;
        self.projects.insert(project.id, manager);
        Ok(project)
    }

    pub fn project(&self, id: ProjectId) -> Result<Arc<ProjectManager>, ProjectError> {
        self.projects.get(&id).map(|entry| Arc::clone(entry.value())).ok_or_else(|| ProjectError::NotFound(id.to_string()))
    }

    pub async fn list_projects(&self) -> Vec<Project> {
        let mut result = Vec::new();
        for entry in self.projects.iter() {
            result.push(entry.value().snapshot_project().await);
        }
        result
    }

    pub async fn open_project(&self, id: ProjectId) -> Result<Vec<gns3_domain_types::NodeId>, ProjectError> {
        let manager = self.project(id)?;
        manager.open(&self.computes, self.project_store.as_ref()).await
    }

    /// Flushes the in-memory graph to disk without closing the project
    /// (§6 `POST /v2/projects/{id}/commit`) — useful after a burst of
    /// topology edits the caller wants durable before, say, taking a
    /// snapshot of the host filesystem out-of-band.
    pub async fn commit_project(&self, id: ProjectId) -> Result<(), ProjectError> {
        let manager = self.project(id)?;
        manager.save(self.project_store.as_ref()).await
    }

    pub async fn close_project(&self, id: ProjectId) -> Result<(), ProjectError> {
        let manager = self.project(id)?;
        manager.close().await;
        self.notifications.close_project(id).await;
        Ok(())
    }

    pub async fn delete_project(&self, id: ProjectId) -> Result<(), ProjectError> {
        self.close_project(id).await.ok();
        self.project_store.delete_project_dir(id).await?;
        self.projects.remove(&id);
        Ok(())
    }

    pub async fn duplicate_project(&self, id: ProjectId, new_name: String) -> Result<Project, ProjectError> {
        let source = self.project(id)?;
        let graph = source.duplicate_graph(new_name).await.map_err(|e| ProjectError::Validation(e.to_string()))?;
        let project = graph.project.clone();
        let manager = Arc::new(ProjectManager::new(project.clone(), Arc::clone(&self.driver_factory)));
        manager.replace_graph(graph, &self.computes).await?;
        manager.save(self.project_store.as_ref()).await?;
        self.projects.insert(project.id, manager);
        Ok(project)
    }

    pub async fn export_project(
        &self,
        id: ProjectId,
        include_snapshots: bool,
    ) -> Result<futures_util::stream::BoxStream<'static, std::io::Result<bytes::Bytes>>, ProjectError> {
        let manager = self.project(id)?;
        manager.save(self.project_store.as_ref()).await?;
        self.archive_store.export_stream(id, include_snapshots).await
    }

    pub async fn import_project(
        &self,
        data: futures_util::stream::BoxStream<'static, std::io::Result<bytes::Bytes>>,
    ) -> Result<Project, ProjectError> {
        let staged_path = self.archive_store.stage_upload(data).await?;
        let project_id = ProjectId::new();
        self.archive_store.unpack_into(&staged_path, project_id).await?;
        let graph_value = self.project_store.load_graph(project_id).await?;
        let mut graph: crate::project_manager::ProjectGraph =
            serde_json::from_value(graph_value).map_err(|e| ProjectError::Storage(e.to_string()))?;
        graph.project.id = project_id;
        graph.project.status = gns3_domain::ProjectStatus::Closed;
        let project = graph.project.clone();
        let manager = Arc::new(ProjectManager::new(project.clone(), Arc::clone(&self.driver_factory)));
        manager.replace_graph(graph, &self.computes).await?;
        manager.save(self.project_store.as_ref()).await?;
        self.projects.insert(project_id, manager);
        Ok(project)
    }

    /// Closes every project in parallel with a 30s timeout, then returns
    /// (§4.7). Compute Proxy background tasks are cooperative and exit
    /// with the process; there is nothing further to close there.
    pub async fn shutdown(&self) {
        let managers: Vec<Arc<ProjectManager>> = self.projects.iter().map(|entry| Arc::clone(entry.value())).collect();
        let closing = futures_util::future::join_all(managers.iter().map(|m| m.close()));
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, closing).await.is_err() {
            tracing::warn!("shutdown exceeded {}s closing projects; proceeding anyway", SHUTDOWN_TIMEOUT.as_secs());
        }
    }
}
