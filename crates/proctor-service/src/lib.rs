//! Proctoring Service
//!
//! Async façade over the frame analyzer: runs inference on the blocking
//! pool, persists events, scores session risk and evicts idle sessions.

mod service;
mod settings;

pub use service::ProctorService;
pub use settings::{ServiceConfig, Settings};

use proctor::ProctorError;
use risk::RiskError;
use std::str::FromStr;
use storage::StorageError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Analyzer error: {0}")]
    Proctor(#[from] ProctorError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Risk scoring error: {0}")]
    Risk(#[from] RiskError),

    #[error("Analysis worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

/// Initialize logging
pub fn init_logging(level: &str) -> Result<(), ServiceError> {
    let level = Level::from_str(level)
        .map_err(|_| ServiceError::Config(format!("unknown log level: {}", level)))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ServiceError::Config(format!("Failed to set tracing subscriber: {}", e)))
}
