use serde::{Deserialize, Serialize};

use gns3_domain_types::ComputeProtocol;

#[derive(Debug, Clone, Deserialize)]
pub struct ComputeCreateRequestDto {
    pub compute_id: Option<String>,
    pub name: Option<String>,
    pub host: String,
    pub port: u16,
    #[serde(default = "default_protocol")]
    pub protocol: ComputeProtocol,
    pub user: Option<String>,
    pub password: Option<String>,
}

fn default_protocol() -> ComputeProtocol {
    ComputeProtocol::Http
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ComputeUpdateRequestDto {
    pub name: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComputeResponseDto {
    pub compute_id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub protocol: ComputeProtocol,
    pub connected: bool,
    pub last_error: Option<String>,
    pub capabilities: ComputeCapabilitiesDto,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ComputeCapabilitiesDto {
    pub node_types: Vec<String>,
    pub platform: String,
    pub cpus: u32,
    pub memory_mb: u64,
}
