use serde::{Deserialize, Serialize};
use serde_json::Value;

use gns3_domain_types::{ConsoleType, LinkType, NodeStatus, NodeType};

#[derive(Debug, Clone, Deserialize)]
pub struct NodeCreateRequestDto {
    pub node_type: NodeType,
    pub compute_id: String,
    pub name: String,
    #[serde(default)]
    pub properties: Value,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub console_type: Option<ConsoleType>,
    pub console_port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NodeUpdateRequestDto {
    pub name: Option<String>,
    pub properties: Option<Value>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub z: Option<i32>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodePortDto {
    pub adapter_number: u32,
    pub port_number: u32,
    pub name: String,
    pub link_type: LinkType,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeResponseDto {
    pub node_id: String,
    pub project_id: String,
    pub compute_id: String,
    pub node_type: NodeType,
    pub name: String,
    pub status: NodeStatus,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub console_type: ConsoleType,
    pub console_host: Option<String>,
    pub console_port: Option<u16>,
    pub properties: Value,
    pub ports: Vec<NodePortDto>,
}
