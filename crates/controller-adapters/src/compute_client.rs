//! reqwest-backed [`ComputeClientPort`]: the controller's RPC client for
//! talking to a gns3server compute instance (§4.2). Grounded in the
//! teacher's use of `reqwest` for all outbound HTTP; the teacher itself
//! has no compute-style RPC client, so the shape here (retry-free,
//! classifying failures into `network`/`protocol`/`conflict` buckets)
//! follows the port contract in `gns3-controller-ports` directly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, StreamExt};
use gns3_controller_ports::outbound::{ComputeCallResponse, ComputeClientFactoryPort, ComputeClientPort, HttpMethod};
use gns3_controller_ports::ComputeError;
use gns3_domain::Compute;
use reqwest::Client;
use serde_json::Value;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ComputeHttpClient {
    client: Client,
    base_url: String,
    user: Option<String>,
    password: Option<String>,
}

impl ComputeHttpClient {
    pub fn new(compute: &Compute) -> Self {
        Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build().unwrap_or_default(),
            base_url: compute.base_url(),
            user: compute.user.clone(),
            password: compute.password.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match (&self.user, &self.password) {
            (Some(user), pass) => builder.basic_auth(user, pass.clone()),
            _ => builder,
        }
    }

    fn classify(err: reqwest::Error) -> ComputeError {
        if err.is_timeout() {
            ComputeError::Timeout
        } else if err.is_connect() {
            ComputeError::Unreachable(err.to_string())
        } else {
            ComputeError::Protocol(err.to_string())
        }
    }
}

#[async_trait]
impl ComputeClientPort for ComputeHttpClient {
    async fn call(&self, method: HttpMethod, path: &str, body: Option<Value>) -> Result<ComputeCallResponse, ComputeError> {
        let builder = match method {
            HttpMethod::Get => self.client.get(self.url(path)),
            HttpMethod::Post => self.client.post(self.url(path)),
            HttpMethod::Put => self.client.put(self.url(path)),
            HttpMethod::Delete => self.client.delete(self.url(path)),
        };
        let builder = self.authed(builder);
        let builder = match body {
            Some(value) => builder.json(&value),
            None => builder,
        };
        let response = builder.send().await.map_err(Self::classify)?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(ComputeCallResponse { status, body })
    }

    async fn version(&self) -> Result<Value, ComputeError> {
        self.call(HttpMethod::Get, "/v2/compute/version", None).await.map(|r| r.body)
    }

    async fn upload_image(
        &self,
        kind: &str,
        name: &str,
        data: BoxStream<'static, std::io::Result<Bytes>>,
    ) -> Result<(), ComputeError> {
        let stream = data.map(|chunk| chunk.map_err(std::io::Error::from));
        let body = reqwest::Body::wrap_stream(stream);
        let builder = self.authed(self.client.post(self.url(&format!("/v2/compute/{kind}/images/{name}"))));
        let response = builder.body(body).send().await.map_err(Self::classify)?;
        if !response.status().is_success() {
            return Err(ComputeError::Protocol(format!("upload rejected with status {}", response.status())));
        }
        Ok(())
    }

    async fn download_image(&self, kind: &str, name: &str) -> Result<BoxStream<'static, std::io::Result<Bytes>>, ComputeError> {
        let builder = self.authed(self.client.get(self.url(&format!("/v2/compute/{kind}/images/{name}"))));
        let response = builder.send().await.map_err(Self::classify)?;
        if !response.status().is_success() {
            return Err(ComputeError::Protocol(format!("download rejected with status {}", response.status())));
        }
        let stream = response.bytes_stream().map(|chunk| chunk.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)));
        Ok(stream.boxed())
    }

    async fn subscribe(&self) -> Result<BoxStream<'static, Value>, ComputeError> {
        let builder = self.authed(self.client.get(self.url("/v2/compute/notifications")));
        let response = builder.send().await.map_err(Self::classify)?;
        if !response.status().is_success() {
            return Err(ComputeError::Protocol(format!("subscribe rejected with status {}", response.status())));
        }
        let byte_stream = response.bytes_stream();
        let events = byte_stream
            .filter_map(|chunk| async move { chunk.ok() })
            .flat_map(|chunk| {
                let events: Vec<Value> = chunk
                    .split(|b| *b == b'\n')
                    .filter(|line| !line.is_empty())
                    .filter_map(|line| serde_json::from_slice::<Value>(line).ok())
                    .collect();
                stream::iter(events)
            });
        Ok(events.boxed())
    }
}

pub struct ComputeHttpClientFactory;

impl ComputeClientFactoryPort for ComputeHttpClientFactory {
    fn build(&self, compute: &Compute) -> Arc<dyn ComputeClientPort> {
        Arc::new(ComputeHttpClient::new(compute))
    }
}
