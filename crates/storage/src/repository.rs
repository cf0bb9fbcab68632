//! Repository Implementation

use crate::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Persisted proctoring event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub session_id: i64,
    pub event_type: String,
    pub severity: u32,
    pub timestamp: DateTime<Utc>,
}

impl EventRecord {
    /// New record; the id is assigned on insert
    pub fn new(session_id: i64, event_type: impl Into<String>, severity: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            session_id,
            event_type: event_type.into(),
            severity,
            timestamp,
        }
    }
}

/// Current risk snapshot of an exam session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRiskRecord {
    pub session_id: i64,
    pub risk_score: u64,
    pub risk_level: String,
}

/// Persistence contract used by the proctoring core
pub trait EventStore: Send + Sync {
    /// Append an event, returning its id
    fn append_event(&self, record: EventRecord) -> Result<i64, StorageError>;

    /// Full event history of a session, in insertion order
    fn session_events(&self, session_id: i64) -> Result<Vec<EventRecord>, StorageError>;

    /// Overwrite a session's risk snapshot
    fn update_session_risk(&self, session_id: i64, risk_score: u64, risk_level: &str) -> Result<(), StorageError>;

    /// Current risk snapshot, if one was written
    fn session_risk(&self, session_id: i64) -> Result<Option<SessionRiskRecord>, StorageError>;
}

struct Tables {
    events: Vec<EventRecord>,
    risks: HashMap<i64, SessionRiskRecord>,
    next_event_id: i64,
}

/// In-memory repository
pub struct Repository {
    tables: Mutex<Tables>,
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        info!("Creating in-memory repository");
        Self {
            tables: Mutex::new(Tables {
                events: Vec::with_capacity(1000),
                risks: HashMap::new(),
                next_event_id: 1,
            }),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))
    }

    /// Get total event count
    pub fn event_count(&self) -> usize {
        self.tables.lock().map(|t| t.events.len()).unwrap_or(0)
    }

    /// Clear all data (for testing)
    pub fn clear(&self) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.events.clear();
            tables.risks.clear();
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore for Repository {
    fn append_event(&self, mut record: EventRecord) -> Result<i64, StorageError> {
        if record.severity == 0 {
            return Err(StorageError::InvalidRecord("severity must be >= 1".into()));
        }
        if record.event_type.is_empty() {
            return Err(StorageError::InvalidRecord("empty event type".into()));
        }

        let mut tables = self.tables()?;
        record.id = tables.next_event_id;
        tables.next_event_id += 1;

        let id = record.id;
        debug!(
            "Inserted event {} ({}) for session {}",
            id, record.event_type, record.session_id
        );
        tables.events.push(record);
        Ok(id)
    }

    fn session_events(&self, session_id: i64) -> Result<Vec<EventRecord>, StorageError> {
        let tables = self.tables()?;
        Ok(tables
            .events
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect())
    }

    fn update_session_risk(&self, session_id: i64, risk_score: u64, risk_level: &str) -> Result<(), StorageError> {
        let mut tables = self.tables()?;
        tables.risks.insert(
            session_id,
            SessionRiskRecord {
                session_id,
                risk_score,
                risk_level: risk_level.to_string(),
            },
        );
        Ok(())
    }

    fn session_risk(&self, session_id: i64) -> Result<Option<SessionRiskRecord>, StorageError> {
        Ok(self.tables()?.risks.get(&session_id).cloned())
    }
}
