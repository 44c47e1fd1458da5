use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use gns3_controller_dto::{link_create_from_dto, link_to_dto};
use gns3_controller_ports::LinkError;
use gns3_domain_types::{LinkId, NodeId, ProjectId};
use gns3_protocol::link::{LinkCreateRequestDto, LinkResponseDto, StartCaptureRequestDto};

use crate::error::ApiError;
use gns3_controller_composition::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<LinkResponseDto>>, ApiError> {
    let project = state.core.project(project_id)?;
    let links = project.list_links().await;
    Ok(Json(links.iter().map(link_to_dto).collect()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
    Json(dto): Json<LinkCreateRequestDto>,
) -> Result<Json<LinkResponseDto>, ApiError> {
    let project = state.core.project(project_id)?;
    let link_type = dto.link_type;
    let (a, b) = link_create_from_dto(&dto).ok_or_else(|| LinkError::Validation("a link requires exactly two valid endpoints".into()))?;
    let link = project.create_link(link_type, a, b, &state.core.computes).await?;
    Ok(Json(link_to_dto(&link)))
}

pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    Path((project_id, link_id)): Path<(ProjectId, LinkId)>,
) -> Result<(), ApiError> {
    let project = state.core.project(project_id)?;
    project.delete_link(link_id, &state.core.computes).await?;
    Ok(())
}

pub async fn start_capture(
    State(state): State<Arc<AppState>>,
    Path((project_id, link_id)): Path<(ProjectId, LinkId)>,
    Json(dto): Json<StartCaptureRequestDto>,
) -> Result<(), ApiError> {
    let project = state.core.project(project_id)?;
    let capture_node_id = dto.capture_node_id.as_deref().and_then(|s| s.parse::<NodeId>().ok());
    project.start_capture(link_id, dto.capture_file_name, dto.data_link_type, capture_node_id).await?;
    Ok(())
}

pub async fn stop_capture(
    State(state): State<Arc<AppState>>,
    Path((project_id, link_id)): Path<(ProjectId, LinkId)>,
) -> Result<(), ApiError> {
    let project = state.core.project(project_id)?;
    project.stop_capture(link_id).await?;
    Ok(())
}

pub async fn stream_capture(
    State(state): State<Arc<AppState>>,
    Path((project_id, link_id)): Path<(ProjectId, LinkId)>,
) -> Result<Response, ApiError> {
    let project = state.core.project(project_id)?;
    let stream = project.stream_pcap(link_id).await?;
    let body = Body::from_stream(stream);
    Ok(Response::builder()
        .header("content-type", "application/vnd.tcpdump.pcap")
        .body(body)
        .expect("static response headers are always valid"))
}
