//! Proctoring service: analysis off the async executor, persistence, scoring

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use proctor::{Clock, FrameAnalyzer, FrameEvent, FrameGuard, SessionId};
use risk::{RiskScorer, SessionRisk};
use std::sync::Arc;
use std::time::{Duration, Instant, UNIX_EPOCH};
use storage::{EventRecord, EventStore, Repository};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::settings::{ServiceConfig, Settings};
use crate::ServiceError;

/// Proctoring core as consumed by a request layer
pub struct ProctorService {
    analyzer: Arc<FrameAnalyzer>,
    store: Arc<dyn EventStore>,
    scorer: RiskScorer,
    frame_timeout: Option<Duration>,
}

impl ProctorService {
    pub fn new(
        analyzer: FrameAnalyzer,
        store: Arc<dyn EventStore>,
        scorer: RiskScorer,
        config: &ServiceConfig,
    ) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            store,
            scorer,
            frame_timeout: config.frame_timeout_ms.map(Duration::from_millis),
        }
    }

    /// Build from settings with ONNX models and an in-memory repository
    pub fn from_settings(settings: &Settings, clock: Arc<dyn Clock>) -> Result<Self, ServiceError> {
        let analyzer = FrameAnalyzer::from_config(settings.analyzer.clone(), clock)?;
        Ok(Self::new(
            analyzer,
            Arc::new(Repository::new()),
            RiskScorer::new(settings.risk.clone()),
            &settings.service,
        ))
    }

    pub fn analyzer(&self) -> &FrameAnalyzer {
        &self.analyzer
    }

    fn timestamp(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(UNIX_EPOCH + self.analyzer.clock().now())
    }

    /// Analyze an uploaded frame and persist the resulting events.
    ///
    /// A frame that misses the timeout yields no events and leaves the
    /// session state as it was.
    ///
    /// Callers submit one frame at a time per session; the analyzer's
    /// session lock guards state but does not order queued frames.
    pub async fn submit_frame(
        &self,
        session_id: SessionId,
        image_bytes: Vec<u8>,
    ) -> Result<Vec<FrameEvent>, ServiceError> {
        counter!("proctor_frames_total").increment(1);
        let started = Instant::now();

        let analyzer = Arc::clone(&self.analyzer);
        let guard = Arc::new(FrameGuard::new());
        let frame_guard = Arc::clone(&guard);
        let mut task = tokio::task::spawn_blocking(move || {
            analyzer.analyze_guarded(&image_bytes, session_id, &frame_guard)
        });
        let events = match self.frame_timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut task).await.ok() {
                Some(joined) => joined?,
                None if guard.abandon() => {
                    warn!(
                        "Session {}: frame analysis exceeded {} ms, dropping frame",
                        session_id,
                        limit.as_millis()
                    );
                    counter!("proctor_frames_dropped_total").increment(1);
                    return Ok(Vec::new());
                }
                // Already committed to session state: collect its events
                None => task.await?,
            },
            None => task.await?,
        };
        histogram!("proctor_frame_analysis_seconds").record(started.elapsed().as_secs_f64());

        let timestamp = self.timestamp();
        for event in &events {
            self.store.append_event(EventRecord::new(
                session_id,
                event.event_type.as_str(),
                event.severity,
                timestamp,
            ))?;
            counter!("proctor_events_total", "event_type" => event.event_type.as_str()).increment(1);
        }
        if !events.is_empty() {
            debug!("Session {}: stored {} events", session_id, events.len());
        }
        Ok(events)
    }

    /// Record an event reported outside frame analysis (e.g. TAB_SWITCH)
    pub fn record_event(
        &self,
        session_id: SessionId,
        event_type: &str,
        severity: u32,
    ) -> Result<i64, ServiceError> {
        if severity == 0 {
            return Err(ServiceError::InvalidEvent("severity must be >= 1".into()));
        }
        if event_type.trim().is_empty() {
            return Err(ServiceError::InvalidEvent("empty event type".into()));
        }

        let id = self.store.append_event(EventRecord::new(
            session_id,
            event_type,
            severity,
            self.timestamp(),
        ))?;
        counter!("proctor_events_total", "event_type" => event_type.to_string()).increment(1);
        Ok(id)
    }

    /// Recompute and store the session's risk
    pub fn session_risk(&self, session_id: SessionId) -> Result<SessionRisk, ServiceError> {
        Ok(self.scorer.score(self.store.as_ref(), session_id)?)
    }

    pub fn evict_idle_sessions(&self) -> usize {
        self.analyzer.evict_idle_sessions()
    }

    /// Periodically evict idle sessions until the handle is aborted
    pub fn spawn_eviction_task(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        info!("Evicting idle sessions every {}s", interval.as_secs());
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                service.evict_idle_sessions();
            }
        })
    }
}
