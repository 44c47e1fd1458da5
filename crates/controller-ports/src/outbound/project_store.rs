use async_trait::async_trait;
use serde_json::Value;

use gns3_domain_types::ProjectId;

use crate::errors::ProjectError;

/// Outbound port for the on-disk `project.gns3` document and its
/// `project-files/<node_id>/...` working directories (§6 portable
/// archive format, §4.5 open/close).
///
/// `Value` is the already-serialized project graph (nodes, links,
/// drawings, metadata) — this port is a thin persistence boundary, not
/// a place for domain logic.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProjectStorePort: Send + Sync {
    async fn save_graph(&self, project_id: ProjectId, graph: Value) -> Result<(), ProjectError>;
    async fn load_graph(&self, project_id: ProjectId) -> Result<Value, ProjectError>;
    async fn delete_project_dir(&self, project_id: ProjectId) -> Result<(), ProjectError>;
    /// Returns the absolute filesystem path of a project's working
    /// directory, creating it if absent.
    async fn project_dir(&self, project_id: ProjectId) -> Result<String, ProjectError>;
    async fn list_project_ids(&self) -> Result<Vec<ProjectId>, ProjectError>;
}
