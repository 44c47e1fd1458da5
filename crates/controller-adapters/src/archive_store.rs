//! `tar` + `flate2`-backed [`ArchiveStorePort`]. Archives are built on a
//! blocking thread (both crates are synchronous) and streamed to the
//! async caller chunk by chunk over a channel, so an export or snapshot
//! never buffers the whole archive in memory (§9).

use std::io::{self, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use futures_util::stream::BoxStream;
use futures_util::StreamExt as _;
use gns3_controller_ports::outbound::ArchiveStorePort;
use gns3_controller_ports::ProjectError;
use gns3_domain_types::ProjectId;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 16;

/// Adapts a `tokio::sync::mpsc::Sender` into `std::io::Write` for
/// `tar::Builder`/`GzEncoder`, which only know how to write
/// synchronously. Each call blocks the current (blocking-pool) thread
/// on the channel send, which is fine since it only runs inside
/// `spawn_blocking`.
struct ChannelWriter {
    sender: mpsc::Sender<io::Result<Bytes>>,
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sender
            .blocking_send(Ok(Bytes::copy_from_slice(buf)))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "archive receiver dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct FsArchiveStore {
    base_dir: PathBuf,
}

impl FsArchiveStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn project_dir(&self, project_id: ProjectId) -> PathBuf {
        self.base_dir.join(project_id.to_string())
    }

    fn build_archive(project_dir: PathBuf, writer: impl Write, include_snapshots: bool) -> Result<(), ProjectError> {
        let encoder = GzEncoder::new(writer, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder
            .append_dir_all("project-files", project_dir.join("project-files"))
            .map_err(|e| ProjectError::Archive(e.to_string()))?;
        let graph_path = project_dir.join("project.gns3");
        if graph_path.exists() {
            builder.append_path_with_name(&graph_path, "project.gns3").map_err(|e| ProjectError::Archive(e.to_string()))?;
        }
        if include_snapshots {
            let snapshots_dir = project_dir.join("snapshots");
            if snapshots_dir.exists() {
                builder.append_dir_all("snapshots", &snapshots_dir).map_err(|e| ProjectError::Archive(e.to_string()))?;
            }
        }
        builder.into_inner().map_err(|e| ProjectError::Archive(e.to_string()))?.finish().map_err(|e| ProjectError::Archive(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ArchiveStorePort for FsArchiveStore {
    async fn export_stream(
        &self,
        project_id: ProjectId,
        include_snapshots: bool,
    ) -> Result<BoxStream<'static, std::io::Result<Bytes>>, ProjectError> {
        let project_dir = self.project_dir(project_id);
        if !project_dir.exists() {
            return Err(ProjectError::NotFound(project_id.to_string()));
        }
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let tx_for_task = tx.clone();
        tokio::task::spawn_blocking(move || {
            let writer = ChannelWriter { sender: tx_for_task.clone() };
            if let Err(e) = Self::build_archive(project_dir, writer, include_snapshots) {
                let _ = tx_for_task.blocking_send(Err(io::Error::new(io::ErrorKind::Other, e.to_string())));
            }
        });
        let stream = futures_util::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|item| (item, rx)) });
        Ok(stream.boxed())
    }

    async fn write_snapshot(&self, project_id: ProjectId, snapshot_name: &str) -> Result<String, ProjectError> {
        let project_dir = self.project_dir(project_id);
        let snapshots_dir = project_dir.join("snapshots");
        tokio::fs::create_dir_all(&snapshots_dir).await.map_err(|e| ProjectError::Archive(e.to_string()))?;
        let snapshot_path = snapshots_dir.join(format!("{snapshot_name}.gns3project"));
        let path_for_task = snapshot_path.clone();
        tokio::task::spawn_blocking(move || {
            let file = std::fs::File::create(&path_for_task).map_err(|e| ProjectError::Archive(e.to_string()))?;
            Self::build_archive(project_dir, file, true)
        })
        .await
        .map_err(|e| ProjectError::Archive(e.to_string()))??;
        Ok(snapshot_path.to_string_lossy().into_owned())
    }

    async fn unpack_into(&self, path: &str, project_id: ProjectId) -> Result<(), ProjectError> {
        let archive_path = PathBuf::from(path);
        let project_dir = self.project_dir(project_id);
        tokio::fs::create_dir_all(&project_dir).await.map_err(|e| ProjectError::Archive(e.to_string()))?;
        tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(&archive_path).map_err(|e| ProjectError::Archive(e.to_string()))?;
            let decoder = flate2::read::GzDecoder::new(file);
            let mut archive = tar::Archive::new(decoder);
            archive.unpack(&project_dir).map_err(|e| ProjectError::Archive(e.to_string()))
        })
        .await
        .map_err(|e| ProjectError::Archive(e.to_string()))??;
        Ok(())
    }

    async fn stage_upload(&self, mut data: BoxStream<'static, std::io::Result<Bytes>>) -> Result<String, ProjectError> {
        let staging_dir = self.base_dir.join("_staging");
        tokio::fs::create_dir_all(&staging_dir).await.map_err(|e| ProjectError::Archive(e.to_string()))?;
        let staged_path = staging_dir.join(format!("{}.tar.gz", uuid::Uuid::new_v4()));
        let mut file = tokio::fs::File::create(&staged_path).await.map_err(|e| ProjectError::Archive(e.to_string()))?;
        while let Some(chunk) = data.next().await {
            let chunk = chunk.map_err(|e| ProjectError::Archive(e.to_string()))?;
            file.write_all(&chunk).await.map_err(|e| ProjectError::Archive(e.to_string()))?;
        }
        file.flush().await.map_err(|e| ProjectError::Archive(e.to_string()))?;
        Ok(staged_path.to_string_lossy().into_owned())
    }
}
