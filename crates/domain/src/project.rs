use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use gns3_domain_types::ProjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Opened,
    Closed,
}

/// The grid/scene configuration plus the flags that govern open/close/
/// start automation (§3 Project).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub path: String,
    pub status: ProjectStatus,
    pub auto_open: bool,
    pub auto_close: bool,
    pub auto_start: bool,
    pub scene_width: u32,
    pub scene_height: u32,
    pub grid_size: u32,
    pub show_grid: bool,
    pub variables: HashMap<String, String>,
    pub supplier: Option<String>,
}

impl Project {
    pub fn new(name: String, path: String) -> Self {
        Self {
            id: ProjectId::new(),
            name,
            path,
            status: ProjectStatus::Closed,
            auto_open: false,
            auto_close: false,
            auto_start: false,
            scene_width: 2000,
            scene_height: 1000,
            grid_size: 75,
            show_grid: false,
            variables: HashMap::new(),
            supplier: None,
        }
    }

    pub fn is_opened(&self) -> bool {
        self.status == ProjectStatus::Opened
    }
}
