//! Risk Scorer Implementation

use crate::RiskError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use storage::{EventRecord, EventStore};
use tracing::{debug, info};

/// Risk scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Weight per event type; unlisted types weigh 1
    pub weights: HashMap<String, u64>,
    /// Scores at or above this are Medium (default: 5)
    pub medium_threshold: u64,
    /// Scores at or above this are High (default: 10)
    pub high_threshold: u64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        let weights = [
            ("NO_FACE", 2),
            ("MULTIPLE_FACES", 4),
            ("LOOKING_AWAY", 2),
            ("TAB_SWITCH", 3),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            weights,
            medium_threshold: 5,
            high_threshold: 10,
        }
    }
}

/// Categorical risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}

/// Derived risk of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRisk {
    pub score: u64,
    pub level: RiskLevel,
}

/// Weighted event scorer
#[derive(Debug, Clone)]
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    /// Configured weight keys are normalised to upper case; event types are
    /// looked up as stored
    pub fn new(mut config: RiskConfig) -> Self {
        config.weights = config
            .weights
            .into_iter()
            .map(|(k, v)| (k.to_ascii_uppercase(), v))
            .collect();
        Self { config }
    }

    /// Weight of an event type
    pub fn weight(&self, event_type: &str) -> u64 {
        self.config
            .weights
            .get(event_type)
            .copied()
            .unwrap_or(1)
    }

    /// Classify a score
    pub fn level(&self, score: u64) -> RiskLevel {
        if score >= self.config.high_threshold {
            RiskLevel::High
        } else if score >= self.config.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Score an event history
    pub fn compute(&self, events: &[EventRecord]) -> SessionRisk {
        let score = events
            .iter()
            .map(|e| self.weight(&e.event_type).saturating_mul(u64::from(e.severity)))
            .fold(0u64, u64::saturating_add);
        SessionRisk {
            score,
            level: self.level(score),
        }
    }

    /// Recompute a session's risk from its full history and overwrite the
    /// stored snapshot
    pub fn score(&self, store: &dyn EventStore, session_id: i64) -> Result<SessionRisk, RiskError> {
        let events = store.session_events(session_id)?;
        let risk = self.compute(&events);
        debug!(
            "Session {}: {} events, score {}",
            session_id,
            events.len(),
            risk.score
        );

        store.update_session_risk(session_id, risk.score, risk.level.as_str())?;
        info!("Session {} risk: {} ({})", session_id, risk.level, risk.score);
        Ok(risk)
    }
}
