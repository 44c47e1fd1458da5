use serde::{Deserialize, Serialize};

use gns3_domain_types::ProjectId;

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectCreateRequestDto {
    pub name: String,
    pub project_id: Option<ProjectId>,
    pub path: Option<String>,
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default)]
    pub auto_open: bool,
    #[serde(default)]
    pub auto_close: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectResponseDto {
    pub project_id: String,
    pub name: String,
    pub status: String,
    pub path: String,
    pub auto_start: bool,
    pub auto_open: bool,
    pub auto_close: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQueryDto {
    #[serde(default)]
    pub include_snapshots: bool,
}

/// One node's outcome inside a bulk operation response (§4.5, §7 — bulk
/// failures are reported per-item, never as an overall failure code).
#[derive(Debug, Clone, Serialize)]
pub struct BulkOperationOutcomeDto {
    pub node_id: String,
    pub success: bool,
    pub error: Option<String>,
}
