use serde::{Deserialize, Serialize};

use gns3_domain_types::LinkType;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkEndpointDto {
    pub node_id: String,
    pub adapter_number: u32,
    pub port_number: u32,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkCreateRequestDto {
    pub nodes: Vec<LinkEndpointDto>,
    #[serde(default = "default_link_type")]
    pub link_type: LinkType,
}

fn default_link_type() -> LinkType {
    LinkType::Ethernet
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LinkFiltersDto {
    pub latency_ms: Option<u32>,
    pub jitter_ms: Option<u32>,
    pub loss_pct: Option<f32>,
    pub corrupt_pct: Option<f32>,
    pub bpf: Option<String>,
    pub frequency_drop: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkResponseDto {
    pub link_id: String,
    pub link_type: LinkType,
    pub nodes: Vec<LinkEndpointDto>,
    pub filters: LinkFiltersDto,
    pub capturing: bool,
    pub capture_file_name: Option<String>,
    pub capture_node_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartCaptureRequestDto {
    pub capture_file_name: String,
    pub data_link_type: String,
    /// Which endpoint's node is the capture source; defaults to the
    /// link's first endpoint when omitted.
    pub capture_node_id: Option<String>,
}
