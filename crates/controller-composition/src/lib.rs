//! Composition root (§9): wires the outbound ports to the application
//! services and exposes the single [`AppState`] handle that the HTTP
//! layer extracts from every request. Mirrors the teacher's
//! `engine-composition` principle: this crate holds `Arc<dyn Trait>`
//! port objects and the app-layer services built from them, never a
//! concrete adapter type.

pub mod config;

pub use config::AppConfig;

use std::sync::Arc;

use gns3_controller_app::ControllerCore;
use gns3_controller_ports::outbound::{ArchiveStorePort, ComputeClientFactoryPort, NodeDriverFactoryPort, ProjectStorePort};

/// Shared application state handed to every axum handler via
/// `State<Arc<AppState>>`. Deliberately flat — `ControllerCore` already
/// groups the compute/project/notification concerns that SPEC_FULL's
/// `ComputeServices`/`ProjectServices`/`NotificationServices` naming
/// suggests, so a synthetic middle layer would just be ceremony (see
/// DESIGN.md).
pub struct AppState {
    pub config: AppConfig,
    pub core: Arc<ControllerCore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        client_factory: Arc<dyn ComputeClientFactoryPort>,
        driver_factory: Arc<dyn NodeDriverFactoryPort>,
        project_store: Arc<dyn ProjectStorePort>,
        archive_store: Arc<dyn ArchiveStorePort>,
    ) -> Arc<Self> {
        let core = Arc::new(ControllerCore::new(client_factory, driver_factory, project_store, archive_store));
        core.notifications.spawn_ping_loop();
        Arc::new(Self { config, core })
    }
}
