//! Port traits and typed errors the controller application layer
//! (`gns3-controller-app`) depends on. Adapters in
//! `gns3-controller-adapters` implement these; nothing here knows about
//! HTTP, the filesystem, or reqwest.

pub mod errors;
pub mod outbound;

pub use errors::{ComputeError, CoreError, CoreErrorKind, LinkError, NodeError, ProjectError};
