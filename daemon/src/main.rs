//! Attest daemon — entry point for running the verification service.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use attest_rpc::RpcServer;
use attest_services::{
    HttpDocumentAnalyzer, HttpFaceComparator, HttpLivenessService, HttpObjectFetcher,
};
use attest_store_lmdb::{LmdbEnvironment, LmdbVerificationStore};
use attest_verification::VerificationOrchestrator;

use config::DaemonConfig;

#[derive(Parser)]
#[command(name = "attest-daemon", about = "Attest identity-verification daemon")]
struct Cli {
    /// Data directory for the verification record store.
    #[arg(long, env = "ATTEST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// RPC server port.
    #[arg(long, env = "ATTEST_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Base URL of the document-analysis service.
    #[arg(long, env = "ATTEST_ANALYSIS_URL")]
    analysis_url: Option<String>,

    /// Base URL of the liveness-biometrics service.
    #[arg(long, env = "ATTEST_LIVENESS_URL")]
    liveness_url: Option<String>,

    /// Base URL of the face-comparison service.
    #[arg(long, env = "ATTEST_COMPARE_URL")]
    compare_url: Option<String>,

    /// Base URL of the object-store gateway.
    #[arg(long, env = "ATTEST_OBJECTS_URL")]
    objects_url: Option<String>,

    /// Minimum liveness confidence (explicit values, zero included, are
    /// honored; unset means the default of 90).
    #[arg(long, env = "ATTEST_MIN_LIVENESS_CONFIDENCE")]
    min_liveness_confidence: Option<f64>,

    /// Face similarity threshold (unset means the default of 80).
    #[arg(long, env = "ATTEST_FACE_SIMILARITY_THRESHOLD")]
    face_similarity_threshold: Option<f64>,

    /// Audit captures retained per liveness session (unset means 3).
    #[arg(long, env = "ATTEST_AUDIT_IMAGES_LIMIT")]
    audit_images_limit: Option<u32>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ATTEST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer CLI/env settings over the file configuration.
    ///
    /// Runs before tracing is initialized (the log settings live in the
    /// config), so the file-load outcome is returned as a note for the
    /// caller to log afterwards.
    fn into_config(self) -> (DaemonConfig, Option<String>) {
        let mut note = None;
        let base = match self.config.as_ref() {
            Some(path) => match DaemonConfig::from_toml_file(&path.display().to_string()) {
                Ok(cfg) => {
                    note = Some(format!("Loaded config from {}", path.display()));
                    cfg
                }
                Err(e) => {
                    note = Some(format!("Failed to read config file: {e}, using defaults"));
                    DaemonConfig::default()
                }
            },
            None => DaemonConfig::default(),
        };

        let config = DaemonConfig {
            data_dir: self.data_dir.unwrap_or(base.data_dir),
            rpc_port: self.rpc_port.unwrap_or(base.rpc_port),
            analysis_url: self.analysis_url.unwrap_or(base.analysis_url),
            liveness_url: self.liveness_url.unwrap_or(base.liveness_url),
            compare_url: self.compare_url.unwrap_or(base.compare_url),
            objects_url: self.objects_url.unwrap_or(base.objects_url),
            min_liveness_confidence: self
                .min_liveness_confidence
                .or(base.min_liveness_confidence),
            face_similarity_threshold: self
                .face_similarity_threshold
                .or(base.face_similarity_threshold),
            audit_images_limit: self.audit_images_limit.or(base.audit_images_limit),
            log_format: base.log_format,
            log_level: self.log_level.unwrap_or(base.log_level),
        };
        (config, note)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_note) = cli.into_config();

    attest_utils::init_tracing_with(&config.log_format, &config.log_level);
    if let Some(note) = config_note {
        tracing::info!("{note}");
    }

    let params = config.resolve_params()?;
    tracing::info!(
        min_liveness_confidence = params.min_liveness_confidence,
        face_similarity_threshold = params.face_similarity_threshold,
        audit_images_limit = params.audit_images_limit,
        "Starting Attest daemon (RPC:{})",
        config.rpc_port,
    );

    let environment = LmdbEnvironment::open_default(&config.data_dir)?;
    let store = Arc::new(LmdbVerificationStore::new(&environment));

    let orchestrator = VerificationOrchestrator::new(
        params,
        store,
        Arc::new(HttpDocumentAnalyzer::new(&config.analysis_url)),
        Arc::new(HttpLivenessService::new(&config.liveness_url)),
        Arc::new(HttpFaceComparator::new(&config.compare_url)),
        Arc::new(HttpObjectFetcher::new(&config.objects_url)),
    );

    let server = RpcServer::new(config.rpc_port, orchestrator);
    server.start().await?;

    tracing::info!("Attest daemon exited cleanly");
    Ok(())
}
