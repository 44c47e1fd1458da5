use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use serde_json::Value;

use crate::errors::ComputeError;

/// HTTP method used for a forwarded RPC call (§4.2 `call`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
pub struct ComputeCallResponse {
    pub status: u16,
    pub body: Value,
}

/// Outbound port for a single compute's RPC surface (§4.2).
///
/// Retries are never automatic here — callers (the application layer)
/// decide whether and how to retry; this port only classifies failures
/// into the `network`/`protocol`/`conflict` buckets described in §4.2,
/// which the implementation folds into [`ComputeError`] variants.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ComputeClientPort: Send + Sync {
    /// Generic forwarding call: `method path body -> (status, body)`.
    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ComputeCallResponse, ComputeError>;

    /// Lightweight liveness probe used by the reconnector backoff loop.
    async fn version(&self) -> Result<Value, ComputeError>;

    async fn upload_image(
        &self,
        kind: &str,
        name: &str,
        data: BoxStream<'static, std::io::Result<Bytes>>,
    ) -> Result<(), ComputeError>;

    async fn download_image(
        &self,
        kind: &str,
        name: &str,
    ) -> Result<BoxStream<'static, std::io::Result<Bytes>>, ComputeError>;

    /// Opens the compute's long-lived notification stream. Each item is
    /// a raw `NotificationEventDto`-shaped JSON object; the caller
    /// re-subscribes with the same backoff schedule as `call` when the
    /// stream ends (§4.2).
    async fn subscribe(&self) -> Result<BoxStream<'static, Value>, ComputeError>;
}

/// Builds the RPC client for a freshly registered compute. Kept separate
/// from `ComputeClientPort` so the application layer can register a
/// compute by value without knowing whether the transport is reqwest,
/// an in-process loopback, or a test double.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ComputeClientFactoryPort: Send + Sync {
    fn build(&self, compute: &gns3_domain::Compute) -> std::sync::Arc<dyn ComputeClientPort>;
}
