//! Object store collaborator — resolves opaque image keys to bytes.

use crate::ServiceError;
use async_trait::async_trait;
use attest_types::ImageKey;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Interface to the object store holding document and liveness images.
///
/// Keys are opaque and scoped under a per-user namespace by the uploader;
/// the pipeline only ever reads.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn fetch(&self, key: &ImageKey) -> Result<Vec<u8>, ServiceError>;
}

/// HTTP client for an object-store gateway exposing `GET /objects/{key}`.
pub struct HttpObjectFetcher {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpObjectFetcher {
    pub fn new(base_url: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }
}

#[async_trait]
impl ObjectFetcher for HttpObjectFetcher {
    async fn fetch(&self, key: &ImageKey) -> Result<Vec<u8>, ServiceError> {
        let url = format!("{}/objects/{}", self.base_url, key);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(ServiceError::from_transport)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(key.to_string()));
        }
        if !response.status().is_success() {
            return Err(ServiceError::RequestFailed(format!(
                "HTTP status {} from {url}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::InvalidResponse(format!("failed to read body: {e}")))?;

        Ok(bytes.to_vec())
    }
}
