//! Vocabulary types shared by every layer of the controller core.
//!
//! Nothing here depends on `gns3-domain` or any I/O concern; this crate
//! exists so `gns3-protocol` (the wire format) and `gns3-domain` (the
//! entity model) can agree on identifiers and enums without either one
//! depending on the other.

mod error_code;
mod ids;
mod kinds;

pub use error_code::ErrorCode;
pub use ids::{ComputeId, DrawingId, LinkId, NodeId, ProjectId, SnapshotId};
pub use kinds::{ComputeProtocol, ConsoleType, LinkType, NodeStatus, NodeType};
