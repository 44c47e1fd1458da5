//! Wire DTOs. `gns3-controller-dto` converts between these and
//! `gns3-domain` entities; no handler in `gns3-controller-adapters`
//! serializes a domain entity directly.

pub mod compute;
pub mod drawing;
pub mod link;
pub mod node;
pub mod notification;
pub mod project;
pub mod snapshot;

pub use compute::{ComputeCreateRequestDto, ComputeResponseDto, ComputeUpdateRequestDto};
pub use drawing::DrawingDto;
pub use link::{
    LinkCreateRequestDto, LinkEndpointDto, LinkFiltersDto, LinkResponseDto, StartCaptureRequestDto,
};
pub use node::{NodeCreateRequestDto, NodePortDto, NodeResponseDto, NodeUpdateRequestDto};
pub use notification::NotificationEventDto;
pub use project::{BulkOperationOutcomeDto, ExportQueryDto, ProjectCreateRequestDto, ProjectResponseDto};
pub use snapshot::{SnapshotCreateRequestDto, SnapshotResponseDto};
