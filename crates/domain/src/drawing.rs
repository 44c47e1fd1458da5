use serde::{Deserialize, Serialize};

use gns3_domain_types::DrawingId;

/// CRUD-only entity; included solely so snapshot/export round-trips
/// reproduce drawings exactly (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drawing {
    pub id: DrawingId,
    pub svg: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub rotation: i32,
    pub locked: bool,
}

impl Drawing {
    pub fn new(svg: String) -> Self {
        Self { id: DrawingId::new(), svg, x: 0, y: 0, z: 0, rotation: 0, locked: false }
    }
}
