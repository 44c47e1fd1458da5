use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gns3_domain_types::SnapshotId;

/// Immutable once created (§3); restoration replaces project state from
/// the archive at `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub path: String,
}

impl Snapshot {
    pub fn new(name: String, path: String, created_at: DateTime<Utc>) -> Self {
        Self { id: SnapshotId::new(), name, created_at, path }
    }
}
