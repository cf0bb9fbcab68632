//! Per-session temporal state

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

/// Opaque exam session handle
pub type SessionId = i64;

/// Smoothing and hysteresis state of one exam session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// When the current continuous away period began
    pub away_start: Option<Duration>,

    /// When LOOKING_AWAY was last emitted (epoch until the first one)
    pub last_event_time: Duration,

    /// Smoothed yaw (degrees)
    pub yaw_ema: f64,

    /// Smoothed pitch (degrees)
    pub pitch_ema: f64,
}

impl SessionState {
    /// Fold a raw pose sample into the moving averages
    pub fn update_ema(&mut self, alpha: f64, yaw: f64, pitch: f64) {
        self.yaw_ema = alpha * self.yaw_ema + (1.0 - alpha) * yaw;
        self.pitch_ema = alpha * self.pitch_ema + (1.0 - alpha) * pitch;
    }

    /// Reset state (on session restart)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Shared handle to one session's state; the mutex serialises its frames
pub type SessionHandle = Arc<Mutex<SessionState>>;

struct SessionEntry {
    state: SessionHandle,
    last_seen: Duration,
}

/// Store of session states, keyed by session id
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get the state for a session, creating it on first access
    pub fn get_or_create(&self, session_id: SessionId, now: Duration) -> SessionHandle {
        let mut sessions = self.sessions();
        let entry = sessions.entry(session_id).or_insert_with(|| {
            debug!("Creating state for session {}", session_id);
            SessionEntry {
                state: Arc::new(Mutex::new(SessionState::default())),
                last_seen: now,
            }
        });
        entry.last_seen = now;
        Arc::clone(&entry.state)
    }

    /// Copy of a session's current state
    pub fn snapshot(&self, session_id: SessionId) -> Option<SessionState> {
        let handle = self.sessions().get(&session_id).map(|e| Arc::clone(&e.state))?;
        let state = handle.lock().unwrap_or_else(|e| e.into_inner());
        Some(state.clone())
    }

    /// Drop a session's state (explicit session restart)
    pub fn remove(&self, session_id: SessionId) -> bool {
        self.sessions().remove(&session_id).is_some()
    }

    /// Evict sessions not seen for longer than `max_idle`.
    ///
    /// Entries whose handle is still held by an in-flight frame are kept.
    pub fn evict_idle(&self, now: Duration, max_idle: Duration) -> usize {
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, entry| {
            now.saturating_sub(entry.last_seen) <= max_idle || Arc::strong_count(&entry.state) > 1
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle sessions ({} remaining)", evicted, sessions.len());
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_created_with_defaults() {
        let store = SessionStore::new();
        let handle = store.get_or_create(7, Duration::from_secs(10));
        let state = handle.lock().unwrap();
        assert_eq!(state.away_start, None);
        assert_eq!(state.last_event_time, Duration::ZERO);
        assert_eq!(state.yaw_ema, 0.0);
        assert_eq!(state.pitch_ema, 0.0);
    }

    #[test]
    fn test_same_session_same_state() {
        let store = SessionStore::new();
        store.get_or_create(1, Duration::ZERO).lock().unwrap().yaw_ema = 5.0;
        assert_eq!(store.get_or_create(1, Duration::ZERO).lock().unwrap().yaw_ema, 5.0);
        assert_eq!(store.get_or_create(2, Duration::ZERO).lock().unwrap().yaw_ema, 0.0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_snapshot_and_remove() {
        let store = SessionStore::new();
        assert!(store.snapshot(3).is_none());
        store.get_or_create(3, Duration::ZERO).lock().unwrap().pitch_ema = -2.0;
        assert_eq!(store.snapshot(3).unwrap().pitch_ema, -2.0);
        assert!(store.remove(3));
        assert!(!store.remove(3));
        assert!(store.is_empty());
    }

    #[test]
    fn test_ema_update() {
        let mut state = SessionState::default();
        state.update_ema(0.7, 40.0, -10.0);
        assert!((state.yaw_ema - 12.0).abs() < 1e-9);
        assert!((state.pitch_ema + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_evict_idle() {
        let store = SessionStore::new();
        store.get_or_create(1, Duration::from_secs(0));
        store.get_or_create(2, Duration::from_secs(50));
        let busy = store.get_or_create(3, Duration::from_secs(0));

        let evicted = store.evict_idle(Duration::from_secs(100), Duration::from_secs(60));
        assert_eq!(evicted, 1);
        assert!(store.snapshot(1).is_none());
        assert!(store.snapshot(2).is_some());
        assert!(store.snapshot(3).is_some());

        drop(busy);
        assert_eq!(store.evict_idle(Duration::from_secs(100), Duration::from_secs(60)), 1);
        assert_eq!(store.len(), 1);
    }

    proptest! {
        #[test]
        fn ema_stays_within_sample_bounds(samples in proptest::collection::vec(-90.0f64..90.0, 1..50)) {
            let mut state = SessionState::default();
            for &s in &samples {
                state.update_ema(0.7, s, s);
            }
            let lo = samples.iter().cloned().fold(0.0f64, f64::min);
            let hi = samples.iter().cloned().fold(0.0f64, f64::max);
            prop_assert!(state.yaw_ema >= lo - 1e-9 && state.yaw_ema <= hi + 1e-9);
        }
    }
}
