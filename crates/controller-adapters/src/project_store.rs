//! Filesystem-backed [`ProjectStorePort`]: one directory per project
//! under the configured data directory, holding a `project.gns3` JSON
//! document plus a `project-files/` working tree (§6 portable format).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gns3_controller_ports::outbound::ProjectStorePort;
use gns3_controller_ports::ProjectError;
use gns3_domain_types::ProjectId;
use serde_json::Value;
use tokio::fs;

pub struct FsProjectStore {
    base_dir: PathBuf,
}

impl FsProjectStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn dir_for(&self, project_id: ProjectId) -> PathBuf {
        self.base_dir.join(project_id.to_string())
    }

    fn graph_path(project_dir: &Path) -> PathBuf {
        project_dir.join("project.gns3")
    }
}

#[async_trait]
impl ProjectStorePort for FsProjectStore {
    async fn save_graph(&self, project_id: ProjectId, graph: Value) -> Result<(), ProjectError> {
        let dir = self.dir_for(project_id);
        fs::create_dir_all(&dir).await.map_err(|e| ProjectError::Storage(e.to_string()))?;
        fs::create_dir_all(dir.join("project-files")).await.map_err(|e| ProjectError::Storage(e.to_string()))?;
        let encoded = serde_json::to_vec_pretty(&graph).map_err(|e| ProjectError::Storage(e.to_string()))?;
        fs::write(Self::graph_path(&dir), encoded).await.map_err(|e| ProjectError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn load_graph(&self, project_id: ProjectId) -> Result<Value, ProjectError> {
        let path = Self::graph_path(&self.dir_for(project_id));
        let raw = fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ProjectError::NotFound(project_id.to_string()),
            _ => ProjectError::Storage(e.to_string()),
        })?;
        serde_json::from_slice(&raw).map_err(|e| ProjectError::Storage(e.to_string()))
    }

    async fn delete_project_dir(&self, project_id: ProjectId) -> Result<(), ProjectError> {
        let dir = self.dir_for(project_id);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProjectError::Storage(e.to_string())),
        }
    }

    async fn project_dir(&self, project_id: ProjectId) -> Result<String, ProjectError> {
        let dir = self.dir_for(project_id);
        fs::create_dir_all(&dir).await.map_err(|e| ProjectError::Storage(e.to_string()))?;
        let absolute = fs::canonicalize(&dir).await.map_err(|e| ProjectError::Storage(e.to_string()))?;
        Ok(absolute.to_string_lossy().into_owned())
    }

    async fn list_project_ids(&self) -> Result<Vec<ProjectId>, ProjectError> {
        fs::create_dir_all(&self.base_dir).await.map_err(|e| ProjectError::Storage(e.to_string()))?;
        let mut entries = fs::read_dir(&self.base_dir).await.map_err(|e| ProjectError::Storage(e.to_string()))?;
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| ProjectError::Storage(e.to_string()))? {
            if let Some(name) = entry.file_name().to_str() {
                if let Ok(id) = name.parse::<ProjectId>() {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }
}
