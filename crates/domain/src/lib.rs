//! Entity model for the controller core.
//!
//! This crate owns the shapes and invariants of §3 of the specification:
//! `Compute`, `Project`, `Node`, `Link`, `Drawing`, `Snapshot`. It has no
//! knowledge of HTTP, storage, or any compute RPC — those are outbound
//! ports implemented in `gns3-controller-adapters`.

pub mod compute;
pub mod drawing;
pub mod link;
pub mod naming;
pub mod node;
pub mod project;
pub mod snapshot;

pub use compute::{Compute, ComputeCapabilities, ComputeConnectionState};
pub use drawing::Drawing;
pub use gns3_domain_types::{
    ComputeId, ComputeProtocol, ConsoleType, DrawingId, ErrorCode, LinkId, LinkType, NodeId,
    NodeStatus, NodeType, ProjectId, SnapshotId,
};
pub use link::{CaptureState, Link, LinkEndpoint, LinkFilters, LinkLifecycle};
pub use node::{Node, NodeLifecycleError, NodePort, NodeTransition};
pub use project::{Project, ProjectStatus};
pub use snapshot::Snapshot;
