use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotCreateRequestDto {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponseDto {
    pub snapshot_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
