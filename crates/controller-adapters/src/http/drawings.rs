use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use gns3_controller_dto::{drawing_from_dto, drawing_to_dto};
use gns3_domain::Drawing;
use gns3_domain_types::{DrawingId, ProjectId};
use gns3_protocol::DrawingDto;

use crate::error::ApiError;
use gns3_controller_composition::AppState;

pub async fn list(State(state): State<Arc<AppState>>, Path(project_id): Path<ProjectId>) -> Result<Json<Vec<DrawingDto>>, ApiError> {
    let project = state.core.project(project_id)?;
    let drawings = project.list_drawings().await;
    Ok(Json(drawings.iter().map(drawing_to_dto).collect()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
    Json(dto): Json<DrawingDto>,
) -> Result<Json<DrawingDto>, ApiError> {
    let project = state.core.project(project_id)?;
    let mut drawing = drawing_from_dto(&dto);
    drawing.id = DrawingId::new();
    let saved = project.create_drawing(drawing).await;
    Ok(Json(drawing_to_dto(&saved)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path((project_id, drawing_id)): Path<(ProjectId, DrawingId)>,
    Json(dto): Json<DrawingDto>,
) -> Result<Json<DrawingDto>, ApiError> {
    let project = state.core.project(project_id)?;
    let mut drawing: Drawing = drawing_from_dto(&dto);
    drawing.id = drawing_id;
    let saved = project.update_drawing(drawing).await?;
    Ok(Json(drawing_to_dto(&saved)))
}

pub async fn delete_drawing(
    State(state): State<Arc<AppState>>,
    Path((project_id, drawing_id)): Path<(ProjectId, DrawingId)>,
) -> Result<(), ApiError> {
    let project = state.core.project(project_id)?;
    project.delete_drawing(drawing_id).await?;
    Ok(())
}
