use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use gns3_domain_types::ProjectId;

use crate::errors::ProjectError;

/// Outbound port for streaming portable archives (§6): export, snapshot
/// create, and import/restore all funnel through this port so none of
/// them ever buffers a whole archive in memory (§9).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ArchiveStorePort: Send + Sync {
    /// Streams a tar.gz portable archive of `project_id`'s current
    /// on-disk state (graph + project-files, and nested snapshots when
    /// `include_snapshots`).
    async fn export_stream(
        &self,
        project_id: ProjectId,
        include_snapshots: bool,
    ) -> Result<BoxStream<'static, std::io::Result<Bytes>>, ProjectError>;

    /// Writes a snapshot archive to disk and returns its path.
    async fn write_snapshot(&self, project_id: ProjectId, snapshot_name: &str) -> Result<String, ProjectError>;

    /// Unpacks an archive at `path` into `project_id`'s project
    /// directory, overwriting existing contents (used by both import
    /// and snapshot restore).
    async fn unpack_into(&self, path: &str, project_id: ProjectId) -> Result<(), ProjectError>;

    /// Accepts an inbound archive stream (import) and stages it at a
    /// temporary path, returning that path for a later `unpack_into`.
    async fn stage_upload(
        &self,
        data: BoxStream<'static, std::io::Result<Bytes>>,
    ) -> Result<String, ProjectError>;
}
