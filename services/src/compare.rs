//! Face comparison collaborator — scores the similarity of two face images.

use crate::ServiceError;
use async_trait::async_trait;
use attest_types::ImageKey;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// An image handed to the comparison service: either a key the service can
/// resolve from the shared object store, or raw bytes fetched by the
/// pipeline (the liveness reference image is passed this way).
#[derive(Clone, Debug)]
pub enum FaceImage {
    Key(ImageKey),
    Bytes(Vec<u8>),
}

impl FaceImage {
    fn to_wire(&self) -> serde_json::Value {
        match self {
            FaceImage::Key(key) => serde_json::json!({ "key": key }),
            // Bytes travel hex-free as a JSON byte array; the comparison
            // service accepts either form.
            FaceImage::Bytes(bytes) => serde_json::json!({ "bytes": bytes }),
        }
    }
}

impl From<ImageKey> for FaceImage {
    fn from(key: ImageKey) -> Self {
        FaceImage::Key(key)
    }
}

/// One ranked match candidate returned by the comparison service.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Similarity score in [0,100].
    pub similarity: f64,
}

/// Interface to the face-comparison service.
///
/// Returns zero or more ranked candidates; zero candidates is a normal
/// negative result (no face in common), not an error. Thresholding and
/// candidate selection are the pipeline's job, not the service's.
#[async_trait]
pub trait FaceComparator: Send + Sync {
    async fn compare(
        &self,
        source: &FaceImage,
        target: &FaceImage,
    ) -> Result<Vec<MatchCandidate>, ServiceError>;
}

/// Raw JSON response from the comparison endpoint.
#[derive(Debug, Deserialize)]
struct CompareResponse {
    #[serde(default)]
    matches: Vec<MatchCandidate>,
}

/// HTTP client for a face-comparison service.
pub struct HttpFaceComparator {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpFaceComparator {
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
impl FaceComparator for HttpFaceComparator {
    async fn compare(
        &self,
        source: &FaceImage,
        target: &FaceImage,
    ) -> Result<Vec<MatchCandidate>, ServiceError> {
        let url = format!("{}/compare", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({
                "source": source.to_wire(),
                "target": target.to_wire(),
            }))
            .send()
            .await
            .map_err(ServiceError::from_transport)?;

        if !response.status().is_success() {
            return Err(ServiceError::RequestFailed(format!(
                "HTTP status {} from {url}",
                response.status()
            )));
        }

        let raw: CompareResponse = response.json().await.map_err(|e| {
            ServiceError::InvalidResponse(format!("failed to parse compare response: {e}"))
        })?;

        tracing::debug!(candidates = raw.matches.len(), "face comparison returned");

        Ok(raw.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_response_empty_matches() {
        let raw: CompareResponse = serde_json::from_str("{}").unwrap();
        assert!(raw.matches.is_empty());
    }

    #[test]
    fn test_compare_response_ranked() {
        let raw: CompareResponse =
            serde_json::from_str(r#"{"matches": [{"similarity": 88.0}, {"similarity": 72.0}]}"#)
                .unwrap();
        assert_eq!(raw.matches.len(), 2);
        assert_eq!(raw.matches[0].similarity, 88.0);
    }

    #[test]
    fn test_face_image_wire_forms() {
        let by_key = FaceImage::Key(ImageKey::new("docs/u/front.jpg"));
        assert_eq!(
            by_key.to_wire(),
            serde_json::json!({ "key": "docs/u/front.jpg" })
        );

        let by_bytes = FaceImage::Bytes(vec![1, 2, 3]);
        assert_eq!(by_bytes.to_wire(), serde_json::json!({ "bytes": [1, 2, 3] }));
    }
}
