//! Document analysis collaborator — turns a stored document image into
//! structured text lines and per-face quality metrics.

use crate::ServiceError;
use async_trait::async_trait;
use attest_types::ImageKey;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for analysis requests. OCR is the slowest collaborator.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A face detected in the document image, with quality metrics in [0,100]
/// except brightness, which ranges over the analyzer's luminance scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub brightness: f64,
    pub sharpness: f64,
}

/// The structured result of analyzing a document image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// Line-level text blocks, in reading order.
    pub lines: Vec<String>,
    /// Faces detected in the image.
    pub faces: Vec<DetectedFace>,
}

impl DocumentAnalysis {
    /// The full extracted text, one line per block.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Interface to the document-analysis service.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Analyze the document image stored at `key`.
    async fn analyze(&self, key: &ImageKey) -> Result<DocumentAnalysis, ServiceError>;
}

/// Raw JSON response from the analysis endpoint.
///
/// The API contract: `POST /analyze {"key": ...}` returns
/// `{"lines": [...], "faces": [{"brightness": f, "sharpness": f}, ...]}`.
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    lines: Vec<String>,
    #[serde(default)]
    faces: Vec<DetectedFace>,
}

/// HTTP client for a document-analysis service.
pub struct HttpDocumentAnalyzer {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpDocumentAnalyzer {
    /// Create a client pointing at the given base URL.
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
impl DocumentAnalyzer for HttpDocumentAnalyzer {
    async fn analyze(&self, key: &ImageKey) -> Result<DocumentAnalysis, ServiceError> {
        let url = format!("{}/analyze", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "key": key }))
            .send()
            .await
            .map_err(ServiceError::from_transport)?;

        if !response.status().is_success() {
            return Err(ServiceError::RequestFailed(format!(
                "HTTP status {} from {url}",
                response.status()
            )));
        }

        let raw: AnalyzeResponse = response.json().await.map_err(|e| {
            ServiceError::InvalidResponse(format!("failed to parse analysis response: {e}"))
        })?;

        tracing::debug!(
            key = %key,
            lines = raw.lines.len(),
            faces = raw.faces.len(),
            "document analyzed"
        );

        Ok(DocumentAnalysis {
            lines: raw.lines,
            faces: raw.faces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_joins_lines() {
        let analysis = DocumentAnalysis {
            lines: vec!["PASSPORT".to_string(), "Name: Jane Roe".to_string()],
            faces: vec![],
        };
        assert_eq!(analysis.text(), "PASSPORT\nName: Jane Roe");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = HttpDocumentAnalyzer::new("http://analysis.local/");
        assert_eq!(client.base_url, "http://analysis.local");
    }

    #[test]
    fn test_analyze_response_defaults() {
        let raw: AnalyzeResponse = serde_json::from_str("{}").unwrap();
        assert!(raw.lines.is_empty());
        assert!(raw.faces.is_empty());
    }
}
