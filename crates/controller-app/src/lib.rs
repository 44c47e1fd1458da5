//! Application services (§4): the seven orchestration components that
//! sit between the wire-level DTOs (`gns3-controller-dto`) and the
//! outbound ports (`gns3-controller-ports`). Nothing here knows about
//! HTTP routing or concrete storage/RPC implementations — those live
//! in `gns3-controller-adapters`.

pub mod compute_proxy;
pub mod controller_core;
pub mod link_engine;
pub mod node_adapter;
pub mod notification_bus;
pub mod port_allocator;
pub mod project_manager;

pub use compute_proxy::{ComputeProxy, ComputeProxyRegistry};
pub use controller_core::{ControllerCore, CreateProjectRequest};
pub use link_engine::{LinkEngine, ResolvedEndpoint};
pub use node_adapter::NodeAdapter;
pub use notification_bus::NotificationBus;
pub use port_allocator::{PortAllocationError, PortAllocator, PortRange};
pub use project_manager::{BulkOutcome, ProjectGraph, ProjectManager};
