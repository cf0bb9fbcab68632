//! Storage Layer
//!
//! Persists proctoring events and per-session risk snapshots behind the
//! `EventStore` trait.

mod repository;

pub use repository::{EventRecord, EventStore, Repository, SessionRiskRecord};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}
