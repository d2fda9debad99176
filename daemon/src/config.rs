//! Daemon configuration with TOML file support.
//!
//! Threshold settings are `Option` here and resolved exactly once into
//! [`VerificationParams`]: an explicitly configured value — including zero —
//! is honored, and only a genuinely absent setting falls back to the
//! documented default.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use attest_types::{
    params, TypeError, VerificationParams,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Params(#[from] TypeError),
}

/// Configuration for the Attest daemon.
///
/// Can be loaded from a TOML file via [`DaemonConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Data directory for the verification record store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// RPC server port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Base URL of the document-analysis service.
    #[serde(default = "default_analysis_url")]
    pub analysis_url: String,

    /// Base URL of the liveness-biometrics service.
    #[serde(default = "default_liveness_url")]
    pub liveness_url: String,

    /// Base URL of the face-comparison service.
    #[serde(default = "default_compare_url")]
    pub compare_url: String,

    /// Base URL of the object-store gateway.
    #[serde(default = "default_objects_url")]
    pub objects_url: String,

    /// Minimum liveness confidence; absent means the default (90).
    #[serde(default)]
    pub min_liveness_confidence: Option<f64>,

    /// Face similarity threshold; absent means the default (80).
    #[serde(default)]
    pub face_similarity_threshold: Option<f64>,

    /// Audit captures retained per liveness session; absent means the
    /// default (3).
    #[serde(default)]
    pub audit_images_limit: Option<u32>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./attest_data")
}

fn default_rpc_port() -> u16 {
    7080
}

fn default_analysis_url() -> String {
    "http://127.0.0.1:7081".to_string()
}

fn default_liveness_url() -> String {
    "http://127.0.0.1:7082".to_string()
}

fn default_compare_url() -> String {
    "http://127.0.0.1:7083".to_string()
}

fn default_objects_url() -> String {
    "http://127.0.0.1:7084".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("DaemonConfig is always serializable to TOML")
    }

    /// Resolve the threshold settings into verification parameters, once.
    ///
    /// Explicitly configured values are used verbatim (zero included);
    /// absent values take the documented defaults. The result is validated
    /// so a misconfigured threshold fails startup rather than silently
    /// skewing decisions.
    pub fn resolve_params(&self) -> Result<VerificationParams, ConfigError> {
        let resolved = VerificationParams {
            min_liveness_confidence: self
                .min_liveness_confidence
                .unwrap_or(params::DEFAULT_MIN_LIVENESS_CONFIDENCE),
            face_similarity_threshold: self
                .face_similarity_threshold
                .unwrap_or(params::DEFAULT_FACE_SIMILARITY_THRESHOLD),
            audit_images_limit: self
                .audit_images_limit
                .unwrap_or(params::DEFAULT_AUDIT_IMAGES_LIMIT),
        };
        resolved.validate()?;
        Ok(resolved)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rpc_port: default_rpc_port(),
            analysis_url: default_analysis_url(),
            liveness_url: default_liveness_url(),
            compare_url: default_compare_url(),
            objects_url: default_objects_url(),
            min_liveness_confidence: None,
            face_similarity_threshold: None,
            audit_images_limit: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
