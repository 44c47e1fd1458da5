use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DrawingDto {
    pub drawing_id: Option<String>,
    pub svg: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub rotation: i32,
    pub locked: bool,
}
