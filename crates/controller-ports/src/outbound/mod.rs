mod archive_store;
mod compute_client;
mod node_driver;
mod notification_sink;
mod project_store;

pub use archive_store::ArchiveStorePort;
pub use compute_client::{ComputeCallResponse, ComputeClientFactoryPort, ComputeClientPort, HttpMethod};
pub use node_driver::{NioFilters, NodeDriverFactoryPort, NodeDriverPort, UdpNio};
pub use notification_sink::NotificationSinkPort;
pub use project_store::ProjectStorePort;

#[cfg(any(test, feature = "testing"))]
pub use archive_store::MockArchiveStorePort;
#[cfg(any(test, feature = "testing"))]
pub use compute_client::{MockComputeClientFactoryPort, MockComputeClientPort};
#[cfg(any(test, feature = "testing"))]
pub use node_driver::{MockNodeDriverFactoryPort, MockNodeDriverPort};
#[cfg(any(test, feature = "testing"))]
pub use notification_sink::MockNotificationSinkPort;
#[cfg(any(test, feature = "testing"))]
pub use project_store::MockProjectStorePort;
