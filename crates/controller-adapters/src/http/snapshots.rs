use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use gns3_controller_dto::snapshot_to_dto;
use gns3_domain_types::{ProjectId, SnapshotId};
use gns3_protocol::snapshot::{SnapshotCreateRequestDto, SnapshotResponseDto};

use crate::error::ApiError;
use gns3_controller_composition::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<SnapshotResponseDto>>, ApiError> {
    let project = state.core.project(project_id)?;
    let graph = project.to_graph().await;
    Ok(Json(graph.snapshots.iter().map(snapshot_to_dto).collect()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
    Json(dto): Json<SnapshotCreateRequestDto>,
) -> Result<Json<SnapshotResponseDto>, ApiError> {
    let project = state.core.project(project_id)?;
    let snapshot = project.snapshot_create(dto.name, state.core.archive_store(), state.core.project_store()).await?;
    Ok(Json(snapshot_to_dto(&snapshot)))
}

pub async fn restore(
    State(state): State<Arc<AppState>>,
    Path((project_id, snapshot_id)): Path<(ProjectId, SnapshotId)>,
) -> Result<Json<Vec<String>>, ApiError> {
    let project = state.core.project(project_id)?;
    let skipped = project
        .snapshot_restore(snapshot_id, state.core.archive_store(), state.core.project_store(), &state.core.computes)
        .await?;
    Ok(Json(skipped.iter().map(|id| id.to_string()).collect()))
}
