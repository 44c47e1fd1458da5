//! `From`/`TryFrom` glue between `gns3-domain` entities and
//! `gns3-protocol` wire DTOs. Handlers in `gns3-controller-adapters`
//! never serialize a domain entity directly — they always go through
//! one of these conversions.

mod compute;
mod drawing;
mod link;
mod node;
mod project;
mod snapshot;

pub use compute::compute_to_dto;
pub use drawing::{drawing_from_dto, drawing_to_dto};
pub use link::{link_create_from_dto, link_to_dto};
pub use node::node_to_dto;
pub use project::project_to_dto;
pub use snapshot::snapshot_to_dto;
