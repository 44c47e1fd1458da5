//! Driven and driving adapters (§9): the HTTP API surface, the reqwest
//! compute RPC client, the null node driver test double, and the
//! filesystem-backed project/archive stores. `AppConfig` itself lives in
//! `gns3-controller-composition`, one layer down, so neither crate has to
//! depend back on the other for it (see that crate's `config` module).

mod archive_store;
mod compute_client;
mod error;
mod http;
mod node_driver;
mod project_store;

pub use archive_store::FsArchiveStore;
pub use compute_client::{ComputeHttpClient, ComputeHttpClientFactory};
pub use error::ApiError;
pub use http::create_routes;
pub use node_driver::{NullDriver, NullDriverFactory};
pub use project_store::FsProjectStore;
