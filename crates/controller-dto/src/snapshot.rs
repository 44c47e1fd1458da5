use gns3_domain::Snapshot;
use gns3_protocol::SnapshotResponseDto;

pub fn snapshot_to_dto(snapshot: &Snapshot) -> SnapshotResponseDto {
    SnapshotResponseDto {
        snapshot_id: snapshot.id.to_string(),
        name: snapshot.name.clone(),
        created_at: snapshot.created_at,
    }
}
