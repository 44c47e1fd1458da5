//! RPC forwarding (§6): `ANY /v2/computes/{id}/{emulator}/{path...}` is
//! rewritten to `/v2/compute/{emulator}/{path...}` and forwarded to the
//! target compute's RPC surface verbatim.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gns3_controller_ports::outbound::HttpMethod;
use gns3_domain_types::ComputeId;
use serde_json::Value;

use crate::error::ApiError;
use gns3_controller_composition::AppState;

fn map_method(method: &Method) -> Result<HttpMethod, ApiError> {
    match *method {
        Method::GET => Ok(HttpMethod::Get),
        Method::POST => Ok(HttpMethod::Post),
        Method::PUT => Ok(HttpMethod::Put),
        Method::DELETE => Ok(HttpMethod::Delete),
        _ => Err(ApiError::new(
            gns3_controller_ports::CoreErrorKind::Validation,
            "RPC_UNSUPPORTED_METHOD",
            format!("method {method} is not forwarded to computes"),
        )),
    }
}

pub async fn forward(
    State(state): State<Arc<AppState>>,
    Path((compute_id, rest)): Path<(String, String)>,
    method: Method,
    body: Bytes,
) -> Result<Response, ApiError> {
    let compute_id = ComputeId::new(compute_id);
    let http_method = map_method(&method)?;
    let body: Option<Value> = if body.is_empty() { None } else { serde_json::from_slice(&body).ok() };
    let path = format!("/v2/compute/{rest}");
    let response = state.core.forward_to_compute(&compute_id, http_method, &path, body).await?;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(response.body)).into_response())
}
