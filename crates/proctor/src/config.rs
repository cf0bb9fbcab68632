//! Frame analyzer configuration

use serde::{Deserialize, Serialize};

use crate::ProctorError;

/// Frame analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProctorConfig {
    /// Primary face confidence below which a frame is discarded
    pub min_face_confidence: f32,

    /// Score floor for raw face detector candidates
    pub detector_score_threshold: f32,

    /// Smoothed yaw beyond which the subject counts as away (degrees)
    pub yaw_threshold_degrees: f64,

    /// Smoothed pitch beyond which the subject counts as away (degrees)
    pub pitch_threshold_degrees: f64,

    /// Weight of the previous EMA value; the new sample gets `1 - ema_alpha`
    pub ema_alpha: f64,

    /// Continuous away time before LOOKING_AWAY is raised (milliseconds)
    pub away_duration_ms: u64,

    /// Minimum spacing between LOOKING_AWAY events of one session (milliseconds)
    pub looking_away_cooldown_ms: u64,

    /// Faces tracked by the landmark model
    pub max_tracked_faces: usize,

    /// Sessions idle longer than this are evicted (seconds, None = never)
    pub session_idle_timeout_secs: Option<u64>,

    /// Model paths
    pub face_model_path: Option<String>,
    pub landmark_model_path: Option<String>,
}

impl Default for ProctorConfig {
    fn default() -> Self {
        Self {
            min_face_confidence: 0.7,
            detector_score_threshold: 0.5,
            yaw_threshold_degrees: 20.0,
            pitch_threshold_degrees: 15.0,
            ema_alpha: 0.7,
            away_duration_ms: 2500,
            looking_away_cooldown_ms: 10_000,
            max_tracked_faces: 1,
            session_idle_timeout_secs: Some(3600),
            face_model_path: None,
            landmark_model_path: None,
        }
    }
}

impl ProctorConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ProctorError> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.min_face_confidence) {
            return Err(ProctorError::Config(format!(
                "min_face_confidence {} outside [0, 1]",
                self.min_face_confidence
            )));
        }
        if !unit.contains(&self.detector_score_threshold) {
            return Err(ProctorError::Config(format!(
                "detector_score_threshold {} outside [0, 1]",
                self.detector_score_threshold
            )));
        }
        if !(0.0..1.0).contains(&self.ema_alpha) {
            return Err(ProctorError::Config(format!(
                "ema_alpha {} outside [0, 1)",
                self.ema_alpha
            )));
        }
        if !(self.yaw_threshold_degrees > 0.0 && self.pitch_threshold_degrees > 0.0) {
            return Err(ProctorError::Config(
                "angle thresholds must be positive".into(),
            ));
        }
        if self.max_tracked_faces == 0 {
            return Err(ProctorError::Config("max_tracked_faces must be >= 1".into()));
        }
        Ok(())
    }
}
