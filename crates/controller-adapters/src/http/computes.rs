use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use gns3_controller_dto::compute_to_dto;
use gns3_domain_types::ComputeId;
use gns3_protocol::compute::{ComputeCreateRequestDto, ComputeResponseDto};

use crate::error::ApiError;
use gns3_controller_composition::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<ComputeResponseDto>> {
    let computes = state.core.list_computes();
    Json(computes.iter().map(compute_to_dto).collect())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<ComputeCreateRequestDto>,
) -> Result<Json<ComputeResponseDto>, ApiError> {
    let compute_id = dto.compute_id.map(ComputeId::new);
    let name = dto.name.unwrap_or_else(|| dto.host.clone());
    let compute = state.core.register_compute(name, dto.host, dto.port, dto.protocol, compute_id)?;
    Ok(Json(compute_to_dto(&compute)))
}

pub async fn deregister(State(state): State<Arc<AppState>>, Path(compute_id): Path<String>) -> Result<(), ApiError> {
    state.core.deregister_compute(&ComputeId::new(compute_id))?;
    Ok(())
}
