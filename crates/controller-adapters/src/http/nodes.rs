use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use gns3_controller_dto::node_to_dto;
use gns3_controller_ports::NodeError;
use gns3_domain_types::{ComputeId, NodeId, ProjectId};
use gns3_protocol::node::{NodeCreateRequestDto, NodeResponseDto, NodeUpdateRequestDto};
use gns3_protocol::project::BulkOperationOutcomeDto;

use crate::error::ApiError;
use gns3_controller_composition::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<NodeResponseDto>>, ApiError> {
    let project = state.core.project(project_id)?;
    let nodes = project.list_nodes().await;
    Ok(Json(nodes.iter().map(node_to_dto).collect()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
    Json(dto): Json<NodeCreateRequestDto>,
) -> Result<Json<NodeResponseDto>, ApiError> {
    let project = state.core.project(project_id)?;
    let compute_id = ComputeId::new(dto.compute_id);
    let node = project
        .create_node(compute_id, dto.node_type, dto.name, dto.properties, &state.core.computes)
        .await?;
    if let (Some(x), Some(y)) = (dto.x, dto.y) {
        let _ = project.node(node.id).await?.relocate(x, y, node.z).await;
    }
    let node = project.node(node.id).await?.snapshot();
    Ok(Json(node_to_dto(&node)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path((project_id, node_id)): Path<(ProjectId, NodeId)>,
) -> Result<Json<NodeResponseDto>, ApiError> {
    let project = state.core.project(project_id)?;
    let node = project.node(node_id).await?.snapshot();
    Ok(Json(node_to_dto(&node)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path((project_id, node_id)): Path<(ProjectId, NodeId)>,
    Json(dto): Json<NodeUpdateRequestDto>,
) -> Result<Json<NodeResponseDto>, ApiError> {
    let project = state.core.project(project_id)?;
    let adapter = project.node(node_id).await?;
    if let Some(name) = dto.name {
        project.rename_node(node_id, name).await?;
    }
    if let Some(properties) = dto.properties {
        adapter.update(properties).await?;
    }
    if let (Some(x), Some(y)) = (dto.x, dto.y) {
        adapter.relocate(x, y, dto.z.unwrap_or(adapter.snapshot().z)).await?;
    }
    Ok(Json(node_to_dto(&adapter.snapshot())))
}

pub async fn delete_node(
    State(state): State<Arc<AppState>>,
    Path((project_id, node_id)): Path<(ProjectId, NodeId)>,
) -> Result<(), ApiError> {
    let project = state.core.project(project_id)?;
    project.delete_node(node_id).await?;
    Ok(())
}

async fn apply<F, Fut>(state: Arc<AppState>, project_id: ProjectId, node_id: NodeId, op: F) -> Result<(), ApiError>
where
    F: FnOnce(Arc<gns3_controller_app::NodeAdapter>) -> Fut,
    Fut: std::future::Future<Output = Result<(), NodeError>>,
{
    let project = state.core.project(project_id)?;
    let adapter = project.node(node_id).await?;
    op(adapter).await?;
    Ok(())
}

pub async fn start(State(state): State<Arc<AppState>>, Path((project_id, node_id)): Path<(ProjectId, NodeId)>) -> Result<(), ApiError> {
    apply(state, project_id, node_id, |a| async move { a.start().await }).await
}

pub async fn stop(State(state): State<Arc<AppState>>, Path((project_id, node_id)): Path<(ProjectId, NodeId)>) -> Result<(), ApiError> {
    apply(state, project_id, node_id, |a| async move { a.stop().await }).await
}

pub async fn suspend(State(state): State<Arc<AppState>>, Path((project_id, node_id)): Path<(ProjectId, NodeId)>) -> Result<(), ApiError> {
    apply(state, project_id, node_id, |a| async move { a.suspend().await }).await
}

pub async fn resume(State(state): State<Arc<AppState>>, Path((project_id, node_id)): Path<(ProjectId, NodeId)>) -> Result<(), ApiError> {
    apply(state, project_id, node_id, |a| async move { a.resume().await }).await
}

pub async fn reload(State(state): State<Arc<AppState>>, Path((project_id, node_id)): Path<(ProjectId, NodeId)>) -> Result<(), ApiError> {
    apply(state, project_id, node_id, |a| async move { a.reload().await }).await
}

pub async fn duplicate(
    State(state): State<Arc<AppState>>,
    Path((project_id, node_id)): Path<(ProjectId, NodeId)>,
) -> Result<Json<NodeResponseDto>, ApiError> {
    let project = state.core.project(project_id)?;
    let node = project.duplicate_node(node_id, &state.core.computes).await?;
    Ok(Json(node_to_dto(&node)))
}

fn outcomes_to_dto(outcomes: Vec<gns3_controller_app::BulkOutcome>) -> Vec<BulkOperationOutcomeDto> {
    outcomes
        .into_iter()
        .map(|o| BulkOperationOutcomeDto { node_id: o.node_id.to_string(), success: o.success, error: o.error })
        .collect()
}

pub async fn start_all(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<BulkOperationOutcomeDto>>, ApiError> {
    let project = state.core.project(project_id)?;
    let outcomes = project.start_all(state.config.bulk_concurrency).await;
    Ok(Json(outcomes_to_dto(outcomes)))
}

pub async fn stop_all(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<BulkOperationOutcomeDto>>, ApiError> {
    let project = state.core.project(project_id)?;
    let outcomes = project.stop_all(state.config.bulk_concurrency).await;
    Ok(Json(outcomes_to_dto(outcomes)))
}

pub async fn suspend_all(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<BulkOperationOutcomeDto>>, ApiError> {
    let project = state.core.project(project_id)?;
    let outcomes = project.suspend_all(state.config.bulk_concurrency).await;
    Ok(Json(outcomes_to_dto(outcomes)))
}
