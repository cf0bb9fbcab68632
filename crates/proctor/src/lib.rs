//! Exam Proctoring Frame Analysis
//!
//! Per-session behavioural analysis of webcam frames:
//! - Face presence and multiple-face detection
//! - Head pose estimation from face-mesh landmarks
//! - EMA smoothing of yaw/pitch
//! - Hysteresis-gated, rate-limited "looking away" events

pub mod analysis;
pub mod clock;
pub mod config;
pub mod detector;
pub mod guard;
pub mod pose;
pub mod state;

pub use analysis::{EventType, FrameEvent};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ProctorConfig;
pub use detector::{
    Detection, FaceDetector, LandmarkDetector, LandmarkSet, OnnxFaceDetector,
    OnnxLandmarkDetector,
};
pub use guard::FrameGuard;
pub use pose::{PnpPoseSolver, PoseEstimate, PoseSolver};
pub use state::{SessionId, SessionState, SessionStore};
pub use frame_decode::VideoFrame;

use frame_decode::FrameError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Proctoring error types
#[derive(Error, Debug)]
pub enum ProctorError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),
}

/// Frame analyzer: one instance per process, shared across request handlers
pub struct FrameAnalyzer {
    config: ProctorConfig,
    face_detector: Box<dyn FaceDetector>,
    landmark_detector: Box<dyn LandmarkDetector>,
    pose_solver: Box<dyn PoseSolver>,
    sessions: SessionStore,
    clock: Arc<dyn Clock>,
}

impl FrameAnalyzer {
    /// Create an analyzer from explicit components
    pub fn new(
        config: ProctorConfig,
        face_detector: Box<dyn FaceDetector>,
        landmark_detector: Box<dyn LandmarkDetector>,
        pose_solver: Box<dyn PoseSolver>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ProctorError> {
        config.validate()?;
        info!(
            "Creating frame analyzer (yaw > {}°, pitch > {}°, away {} ms, cooldown {} ms)",
            config.yaw_threshold_degrees,
            config.pitch_threshold_degrees,
            config.away_duration_ms,
            config.looking_away_cooldown_ms
        );
        Ok(Self {
            config,
            face_detector,
            landmark_detector,
            pose_solver,
            sessions: SessionStore::new(),
            clock,
        })
    }

    /// Create an analyzer backed by the ONNX models named in `config`
    pub fn from_config(config: ProctorConfig, clock: Arc<dyn Clock>) -> Result<Self, ProctorError> {
        let face_detector = OnnxFaceDetector::new(&config)?;
        let landmark_detector = OnnxLandmarkDetector::new(&config)?;
        Self::new(
            config,
            Box::new(face_detector),
            Box::new(landmark_detector),
            Box::new(PnpPoseSolver::new()),
            clock,
        )
    }

    pub fn config(&self) -> &ProctorConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Analyze one uploaded frame for a session.
    ///
    /// Never fails: decode problems become diagnostic events and inference
    /// gaps end the frame early with whatever events were found so far.
    /// Frames of one session are serialised on that session's lock.
    pub fn analyze(&self, image_bytes: &[u8], session_id: SessionId) -> Vec<FrameEvent> {
        self.analyze_guarded(image_bytes, session_id, &FrameGuard::new())
    }

    /// Like [`analyze`](Self::analyze), but leaves session state untouched
    /// if `guard` is abandoned before the temporal update.
    pub fn analyze_guarded(
        &self,
        image_bytes: &[u8],
        session_id: SessionId,
        guard: &FrameGuard,
    ) -> Vec<FrameEvent> {
        let frame = match VideoFrame::decode(image_bytes) {
            Ok(frame) => frame,
            Err(FrameError::Empty) => return vec![FrameEvent::new(EventType::NoFrameReceived)],
            Err(e) => {
                debug!("Session {}: {}", session_id, e);
                return vec![FrameEvent::new(EventType::InvalidImage)];
            }
        };

        let handle = self.sessions.get_or_create(session_id, self.clock.now());
        let mut state = handle.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_abandoned() {
            return Vec::new();
        }
        let mut events = Vec::new();

        let detections = match self.face_detector.detect(&frame) {
            Ok(d) => d,
            Err(e) => {
                warn!("Session {}: face detection failed: {}", session_id, e);
                return events;
            }
        };
        let Some(primary) = detections.first() else {
            return vec![FrameEvent::new(EventType::NoFace)];
        };
        if primary.confidence < self.config.min_face_confidence {
            debug!(
                "Session {}: face confidence {:.2} too low, frame discarded",
                session_id, primary.confidence
            );
            return events;
        }
        if detections.len() > 1 {
            events.push(FrameEvent::new(EventType::MultipleFaces));
        }

        let landmarks = match self.landmark_detector.landmarks(&frame) {
            Ok(l) => l,
            Err(e) => {
                warn!("Session {}: landmark detection failed: {}", session_id, e);
                return events;
            }
        };
        let Some(points) = landmarks.first().and_then(|set| set.pose_points()) else {
            return events;
        };

        let pose = self.pose_solver.solve(&points, frame.width, frame.height);
        if !pose.success {
            debug!("Session {}: pose solve did not converge", session_id);
        }
        if !guard.commit() {
            debug!("Session {}: frame abandoned, state unchanged", session_id);
            return Vec::new();
        }
        let now = self.clock.now();
        let raw_away = pose.is_looking_away(
            self.config.yaw_threshold_degrees,
            self.config.pitch_threshold_degrees,
        );

        // A failed solve still feeds 0/0 into the average.
        state.update_ema(self.config.ema_alpha, pose.yaw, pose.pitch);
        let away_now = state.yaw_ema.abs() > self.config.yaw_threshold_degrees
            || state.pitch_ema.abs() > self.config.pitch_threshold_degrees;
        debug!(
            "Session {}: yaw {:.1} (ema {:.1}), pitch {:.1} (ema {:.1}), raw away {}, away {}",
            session_id, pose.yaw, state.yaw_ema, pose.pitch, state.pitch_ema, raw_away, away_now
        );

        if !away_now {
            state.away_start = None;
            return events;
        }
        let away_start = *state.away_start.get_or_insert(now);

        let duration = now.saturating_sub(away_start);
        let since_last = now.saturating_sub(state.last_event_time);
        if duration >= Duration::from_millis(self.config.away_duration_ms)
            && since_last > Duration::from_millis(self.config.looking_away_cooldown_ms)
        {
            info!(
                "Session {}: looking away for {:.1}s",
                session_id,
                duration.as_secs_f64()
            );
            events.push(FrameEvent::new(EventType::LookingAway));
            state.last_event_time = now;
        }

        events
    }

    /// Copy of a session's state, if the session has been seen
    pub fn session_state(&self, session_id: SessionId) -> Option<SessionState> {
        self.sessions.snapshot(session_id)
    }

    /// Forget a session's state (session restart)
    pub fn reset_session(&self, session_id: SessionId) -> bool {
        self.sessions.remove(session_id)
    }

    /// Evict sessions idle past the configured timeout
    pub fn evict_idle_sessions(&self) -> usize {
        match self.config.session_idle_timeout_secs {
            Some(secs) => self
                .sessions
                .evict_idle(self.clock.now(), Duration::from_secs(secs)),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::Mutex;

    /// Detector, landmark model and pose solver driven from the test
    #[derive(Clone, Default)]
    struct Script {
        inner: Arc<Mutex<ScriptState>>,
    }

    #[derive(Default)]
    struct ScriptState {
        detections: Vec<f32>,
        landmarks: bool,
        pose: PoseEstimate,
        detect_calls: usize,
    }

    impl Script {
        fn faces(&self, confidences: &[f32]) {
            self.inner.lock().unwrap().detections = confidences.to_vec();
        }

        fn landmarks(&self, present: bool) {
            self.inner.lock().unwrap().landmarks = present;
        }

        fn pose(&self, yaw: f64, pitch: f64) {
            self.inner.lock().unwrap().pose = PoseEstimate {
                success: true,
                yaw,
                pitch,
            };
        }

        fn failed_pose(&self) {
            self.inner.lock().unwrap().pose = PoseEstimate::failed();
        }
    }

    impl FaceDetector for Script {
        fn detect(&self, _frame: &VideoFrame) -> Result<Vec<Detection>, ProctorError> {
            let mut inner = self.inner.lock().unwrap();
            inner.detect_calls += 1;
            Ok(inner
                .detections
                .iter()
                .map(|&confidence| Detection {
                    confidence,
                    bbox: Default::default(),
                })
                .collect())
        }
    }

    impl LandmarkDetector for Script {
        fn landmarks(&self, _frame: &VideoFrame) -> Result<Vec<LandmarkSet>, ProctorError> {
            if self.inner.lock().unwrap().landmarks {
                Ok(vec![LandmarkSet {
                    points: vec![(0.5, 0.5); 468],
                }])
            } else {
                Ok(Vec::new())
            }
        }
    }

    impl PoseSolver for Script {
        fn solve(&self, _points: &[(f32, f32); 6], _w: u32, _h: u32) -> PoseEstimate {
            self.inner.lock().unwrap().pose
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(&self, _frame: &VideoFrame) -> Result<Vec<Detection>, ProctorError> {
            Err(ProctorError::Inference("backend unavailable".into()))
        }
    }

    /// Face detector whose inference takes a simulated second
    struct SlowDetector {
        script: Script,
        clock: Arc<ManualClock>,
    }

    impl FaceDetector for SlowDetector {
        fn detect(&self, frame: &VideoFrame) -> Result<Vec<Detection>, ProctorError> {
            self.clock.advance(Duration::from_secs(1));
            self.script.detect(frame)
        }
    }

    const START: Duration = Duration::from_secs(1_700_000_000);

    fn setup() -> (FrameAnalyzer, Script, Arc<ManualClock>) {
        let script = Script::default();
        let clock = Arc::new(ManualClock::new(START));
        let analyzer = FrameAnalyzer::new(
            ProctorConfig::default(),
            Box::new(script.clone()),
            Box::new(script.clone()),
            Box::new(script.clone()),
            clock.clone(),
        )
        .unwrap();
        script.faces(&[0.9]);
        script.landmarks(true);
        script.pose(0.0, 0.0);
        (analyzer, script, clock)
    }

    fn png() -> Vec<u8> {
        let img = RgbImage::from_pixel(16, 12, Rgb([90, 120, 150]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn types(events: &[FrameEvent]) -> Vec<EventType> {
        events.iter().map(|e| e.event_type).collect()
    }

    #[test]
    fn test_empty_frame() {
        let (analyzer, script, _) = setup();
        script.pose(40.0, 0.0);

        let events = analyzer.analyze(&[], 1);
        assert_eq!(events, vec![FrameEvent::new(EventType::NoFrameReceived)]);
        assert!(analyzer.session_state(1).is_none());

        // First real frame starts from a zero average
        analyzer.analyze(&png(), 1);
        let state = analyzer.session_state(1).unwrap();
        assert!((state.yaw_ema - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_image() {
        let (analyzer, script, _) = setup();
        let events = analyzer.analyze(b"\x89PNG not really", 1);
        assert_eq!(types(&events), vec![EventType::InvalidImage]);
        assert!(analyzer.session_state(1).is_none());
        assert_eq!(script.inner.lock().unwrap().detect_calls, 0);
    }

    #[test]
    fn test_no_face() {
        let (analyzer, script, _) = setup();
        script.faces(&[]);
        assert_eq!(types(&analyzer.analyze(&png(), 1)), vec![EventType::NoFace]);
    }

    #[test]
    fn test_no_face_keeps_away_timer() {
        let (analyzer, script, clock) = setup();
        script.pose(100.0, 0.0);
        analyzer.analyze(&png(), 1);
        let before = analyzer.session_state(1).unwrap();
        assert_eq!(before.away_start, Some(START));

        script.faces(&[]);
        clock.advance(Duration::from_secs(1));
        assert_eq!(types(&analyzer.analyze(&png(), 1)), vec![EventType::NoFace]);
        assert_eq!(analyzer.session_state(1).unwrap(), before);

        // The away period continues across the face-less frame
        script.faces(&[0.9]);
        clock.advance(Duration::from_millis(1500));
        assert_eq!(types(&analyzer.analyze(&png(), 1)), vec![EventType::LookingAway]);
    }

    #[test]
    fn test_confidence_gate() {
        let (analyzer, script, _) = setup();
        script.pose(40.0, 0.0);

        script.faces(&[0.69, 0.95]);
        assert!(analyzer.analyze(&png(), 1).is_empty());
        assert_eq!(analyzer.session_state(1).unwrap().yaw_ema, 0.0);

        script.faces(&[0.70]);
        assert!(analyzer.analyze(&png(), 1).is_empty());
        assert!((analyzer.session_state(1).unwrap().yaw_ema - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiple_faces_without_landmarks() {
        let (analyzer, script, _) = setup();
        script.faces(&[0.9, 0.8]);
        script.landmarks(false);
        script.pose(90.0, 90.0);

        let events = analyzer.analyze(&png(), 1);
        assert_eq!(types(&events), vec![EventType::MultipleFaces]);
        assert_eq!(analyzer.session_state(1).unwrap(), SessionState::default());
    }

    #[test]
    fn test_multiple_faces_with_pose() {
        let (analyzer, script, _) = setup();
        script.faces(&[0.9, 0.8, 0.75]);
        let events = analyzer.analyze(&png(), 1);
        assert_eq!(events, vec![FrameEvent::new(EventType::MultipleFaces)]);
    }

    #[test]
    fn test_detector_error_yields_no_events() {
        let script = Script::default();
        script.landmarks(true);
        let analyzer = FrameAnalyzer::new(
            ProctorConfig::default(),
            Box::new(FailingDetector),
            Box::new(script.clone()),
            Box::new(script),
            Arc::new(ManualClock::new(START)),
        )
        .unwrap();
        assert!(analyzer.analyze(&png(), 1).is_empty());
    }

    #[test]
    fn test_ema_update() {
        let (analyzer, script, _) = setup();
        script.pose(40.0, -10.0);
        analyzer.analyze(&png(), 1);
        let state = analyzer.session_state(1).unwrap();
        assert!((state.yaw_ema - 12.0).abs() < 1e-9);
        assert!((state.pitch_ema + 3.0).abs() < 1e-9);
        // 12 < 20 and 3 < 15: attentive
        assert_eq!(state.away_start, None);
    }

    #[test]
    fn test_failed_pose_pulls_average_to_zero() {
        let (analyzer, script, _) = setup();
        script.pose(100.0, 0.0);
        analyzer.analyze(&png(), 1);
        script.failed_pose();
        analyzer.analyze(&png(), 1);
        let state = analyzer.session_state(1).unwrap();
        assert!((state.yaw_ema - 21.0).abs() < 1e-9);
        assert!(state.away_start.is_some());
    }

    #[test]
    fn test_looking_away_requires_sustained_period() {
        let (analyzer, script, clock) = setup();
        script.pose(100.0, 0.0);

        // ema 30: away from the first frame
        assert!(analyzer.analyze(&png(), 1).is_empty());
        clock.advance(Duration::from_millis(1000));
        assert!(analyzer.analyze(&png(), 1).is_empty());
        clock.advance(Duration::from_millis(1499));
        assert!(analyzer.analyze(&png(), 1).is_empty());
        clock.advance(Duration::from_millis(1));
        assert_eq!(types(&analyzer.analyze(&png(), 1)), vec![EventType::LookingAway]);

        let state = analyzer.session_state(1).unwrap();
        assert_eq!(state.last_event_time, START + Duration::from_millis(2500));
        assert_eq!(state.away_start, Some(START));
    }

    #[test]
    fn test_pitch_alone_triggers_away() {
        let (analyzer, script, clock) = setup();
        script.pose(0.0, -60.0);
        analyzer.analyze(&png(), 1);
        clock.advance(Duration::from_secs(3));
        assert_eq!(types(&analyzer.analyze(&png(), 1)), vec![EventType::LookingAway]);
    }

    #[test]
    fn test_cooldown_survives_attentive_frames() {
        let (analyzer, script, clock) = setup();
        script.pose(100.0, 0.0);
        analyzer.analyze(&png(), 1); // ema 30
        clock.advance(Duration::from_secs(3));
        assert_eq!(types(&analyzer.analyze(&png(), 1)), vec![EventType::LookingAway]); // ema 51

        // Glance back: ema 0.7*51 - 0.3*119 = 0
        script.pose(-119.0, 0.0);
        clock.advance(Duration::from_secs(1));
        assert!(analyzer.analyze(&png(), 1).is_empty());
        assert_eq!(analyzer.session_state(1).unwrap().away_start, None);

        // Away again; timer restarts, cooldown still running
        script.pose(100.0, 0.0);
        clock.advance(Duration::from_secs(1));
        analyzer.analyze(&png(), 1);
        let restarted = analyzer.session_state(1).unwrap().away_start;
        assert_eq!(restarted, Some(START + Duration::from_secs(5)));
        clock.advance(Duration::from_secs(3));
        assert!(analyzer.analyze(&png(), 1).is_empty()); // 5s after the event

        clock.advance(Duration::from_secs(5));
        assert!(analyzer.analyze(&png(), 1).is_empty()); // exactly 10s: still cooling down
        clock.advance(Duration::from_millis(1));
        assert_eq!(types(&analyzer.analyze(&png(), 1)), vec![EventType::LookingAway]);
    }

    #[test]
    fn test_attentive_frame_resets_timer() {
        let (analyzer, script, clock) = setup();
        script.pose(100.0, 0.0);
        analyzer.analyze(&png(), 1); // ema 30
        clock.advance(Duration::from_secs(2));
        script.pose(-70.0, 0.0);
        analyzer.analyze(&png(), 1); // ema 0
        assert_eq!(analyzer.session_state(1).unwrap().away_start, None);

        script.pose(100.0, 0.0);
        clock.advance(Duration::from_secs(1));
        analyzer.analyze(&png(), 1); // ema 30, timer restarts
        clock.advance(Duration::from_secs(2));
        assert!(analyzer.analyze(&png(), 1).is_empty());
        clock.advance(Duration::from_millis(500));
        assert_eq!(types(&analyzer.analyze(&png(), 1)), vec![EventType::LookingAway]);
    }

    #[test]
    fn test_session_isolation() {
        let (analyzer, script, clock) = setup();
        for _ in 0..4 {
            script.pose(100.0, 0.0);
            analyzer.analyze(&png(), 1);
            script.pose(0.0, 0.0);
            analyzer.analyze(&png(), 2);
            clock.advance(Duration::from_secs(1));
        }
        let a = analyzer.session_state(1).unwrap();
        let b = analyzer.session_state(2).unwrap();
        assert!(a.away_start.is_some());
        assert_ne!(a.last_event_time, Duration::ZERO);
        assert_eq!(b, SessionState::default());
    }

    #[test]
    fn test_concurrent_sessions() {
        let (analyzer, script, _) = setup();
        script.pose(40.0, 0.0);
        let analyzer = Arc::new(analyzer);
        let frame = Arc::new(png());

        let handles: Vec<_> = (0..4)
            .map(|session| {
                let analyzer = Arc::clone(&analyzer);
                let frame = Arc::clone(&frame);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        analyzer.analyze(&frame, session);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let expected = (0..10).fold(0.0, |ema, _| 0.7 * ema + 0.3 * 40.0);
        for session in 0..4 {
            let state = analyzer.session_state(session).unwrap();
            assert!((state.yaw_ema - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_concurrent_frames_same_session() {
        let (analyzer, script, _) = setup();
        script.pose(40.0, -10.0);
        let analyzer = Arc::new(analyzer);
        let frame = Arc::new(png());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let analyzer = Arc::clone(&analyzer);
                let frame = Arc::clone(&frame);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        analyzer.analyze(&frame, 7);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut expected = SessionState::default();
        for _ in 0..8 * 25 {
            expected.update_ema(0.7, 40.0, -10.0);
        }
        let state = analyzer.session_state(7).unwrap();
        assert_eq!(state.yaw_ema, expected.yaw_ema);
        assert_eq!(state.pitch_ema, expected.pitch_ema);
        assert_eq!(state.away_start, Some(START));
    }

    #[test]
    fn test_abandoned_frame_leaves_state() {
        let (analyzer, script, clock) = setup();
        script.pose(100.0, 0.0);
        analyzer.analyze(&png(), 1);
        let before = analyzer.session_state(1).unwrap();

        // Would have emitted LOOKING_AWAY had it been kept
        clock.advance(Duration::from_secs(3));
        let guard = FrameGuard::new();
        assert!(guard.abandon());
        assert!(analyzer.analyze_guarded(&png(), 1, &guard).is_empty());
        assert_eq!(analyzer.session_state(1).unwrap(), before);

        clock.advance(Duration::from_secs(1));
        assert_eq!(types(&analyzer.analyze(&png(), 1)), vec![EventType::LookingAway]);
    }

    #[test]
    fn test_committed_frame_keeps_result() {
        let (analyzer, script, clock) = setup();
        script.pose(100.0, 0.0);
        analyzer.analyze(&png(), 1);
        clock.advance(Duration::from_secs(3));

        let guard = FrameGuard::new();
        let events = analyzer.analyze_guarded(&png(), 1, &guard);
        assert_eq!(types(&events), vec![EventType::LookingAway]);
        assert!(!guard.abandon());
    }

    #[test]
    fn test_frame_time_read_after_inference() {
        let script = Script::default();
        let clock = Arc::new(ManualClock::new(START));
        let analyzer = FrameAnalyzer::new(
            ProctorConfig::default(),
            Box::new(SlowDetector {
                script: script.clone(),
                clock: clock.clone(),
            }),
            Box::new(script.clone()),
            Box::new(script.clone()),
            clock.clone(),
        )
        .unwrap();
        script.faces(&[0.9]);
        script.landmarks(true);
        script.pose(100.0, 0.0);

        analyzer.analyze(&png(), 1);
        let state = analyzer.session_state(1).unwrap();
        assert_eq!(state.away_start, Some(START + Duration::from_secs(1)));

        // Third frame is 2s into the away period, the fourth 3s
        analyzer.analyze(&png(), 1);
        assert!(analyzer.analyze(&png(), 1).is_empty());
        assert_eq!(types(&analyzer.analyze(&png(), 1)), vec![EventType::LookingAway]);
        assert_eq!(
            analyzer.session_state(1).unwrap().last_event_time,
            START + Duration::from_secs(4)
        );
    }

    #[test]
    fn test_reset_and_evict() {
        let (analyzer, _, clock) = setup();
        analyzer.analyze(&png(), 1);
        analyzer.analyze(&png(), 2);
        assert!(analyzer.reset_session(1));
        assert_eq!(analyzer.sessions().len(), 1);

        clock.advance(Duration::from_secs(3601));
        assert_eq!(analyzer.evict_idle_sessions(), 1);
        assert!(analyzer.sessions().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let script = Script::default();
        let result = FrameAnalyzer::new(
            ProctorConfig {
                max_tracked_faces: 0,
                ..Default::default()
            },
            Box::new(script.clone()),
            Box::new(script.clone()),
            Box::new(script),
            Arc::new(SystemClock),
        );
        assert!(matches!(result, Err(ProctorError::Config(_))));
    }
}
