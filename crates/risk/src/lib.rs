//! Risk Scoring
//!
//! Folds a session's full event history into a weighted score and a
//! categorical risk level, then records the result as the session's
//! current snapshot.

mod scorer;

pub use scorer::{RiskConfig, RiskLevel, RiskScorer, SessionRisk};

use storage::StorageError;
use thiserror::Error;

/// Risk scoring errors
#[derive(Debug, Error)]
pub enum RiskError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
