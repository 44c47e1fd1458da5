use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use futures_util::StreamExt;
use gns3_controller_app::CreateProjectRequest;
use gns3_controller_dto::project_to_dto;
use gns3_domain_types::ProjectId;
use gns3_protocol::project::{ExportQueryDto, ProjectCreateRequestDto, ProjectResponseDto};

use crate::error::ApiError;
use gns3_controller_composition::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<ProjectResponseDto>> {
    let projects = state.core.list_projects().await;
    Json(projects.iter().map(project_to_dto).collect())
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<ProjectCreateRequestDto>,
) -> Result<Json<ProjectResponseDto>, ApiError> {
    let path = dto.path.unwrap_or_else(|| format!("{}/{}", state.config.data_dir, dto.name));
    let project = state
        .core
        .create_project(CreateProjectRequest {
            name: dto.name,
            path,
            project_id: dto.project_id,
            auto_start: dto.auto_start,
            auto_open: dto.auto_open,
            auto_close: dto.auto_close,
        })
        .await?;
    Ok(Json(project_to_dto(&project)))
}

pub async fn get(State(state): State<Arc<AppState>>, Path(project_id): Path<ProjectId>) -> Result<Json<ProjectResponseDto>, ApiError> {
    let project = state.core.project(project_id)?.snapshot_project().await;
    Ok(Json(project_to_dto(&project)))
}

pub async fn delete(State(state): State<Arc<AppState>>, Path(project_id): Path<ProjectId>) -> Result<(), ApiError> {
    state.core.delete_project(project_id).await?;
    Ok(())
}

pub async fn open(State(state): State<Arc<AppState>>, Path(project_id): Path<ProjectId>) -> Result<Json<Vec<String>>, ApiError> {
    let skipped = state.core.open_project(project_id).await?;
    Ok(Json(skipped.iter().map(|id| id.to_string()).collect()))
}

pub async fn close(State(state): State<Arc<AppState>>, Path(project_id): Path<ProjectId>) -> Result<(), ApiError> {
    state.core.close_project(project_id).await?;
    Ok(())
}

#[derive(serde::Deserialize)]
pub struct DuplicateRequestDto {
    pub name: String,
}

pub async fn commit(State(state): State<Arc<AppState>>, Path(project_id): Path<ProjectId>) -> Result<(), ApiError> {
    state.core.commit_project(project_id).await?;
    Ok(())
}

pub async fn duplicate(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
    Json(dto): Json<DuplicateRequestDto>,
) -> Result<Json<ProjectResponseDto>, ApiError> {
    let project = state.core.duplicate_project(project_id, dto.name).await?;
    Ok(Json(project_to_dto(&project)))
}

pub async fn export(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
    Query(query): Query<ExportQueryDto>,
) -> Result<Response, ApiError> {
    let stream = state.core.export_project(project_id, query.include_snapshots).await?;
    let body = Body::from_stream(stream);
    Ok(Response::builder()
        .header("content-type", "application/gzip")
        .header("content-disposition", format!("attachment; filename=\"{project_id}.gns3project\""))
        .body(body)
        .expect("static response headers are always valid"))
}

pub async fn import(State(state): State<Arc<AppState>>, body: Body) -> Result<Json<ProjectResponseDto>, ApiError> {
    let stream = body.into_data_stream().map(|chunk| chunk.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)));
    let project = state.core.import_project(stream.boxed()).await?;
    Ok(Json(project_to_dto(&project)))
}
