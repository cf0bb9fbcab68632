//! Proctoring events produced by frame analysis

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event types emitted by the frame analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Upload carried no bytes
    NoFrameReceived,

    /// Upload could not be decoded as an image
    InvalidImage,

    /// No face in front of the camera
    NoFace,

    /// More than one face in the frame
    MultipleFaces,

    /// Head turned away for a sustained period
    LookingAway,
}

impl EventType {
    /// Get string representation (as persisted)
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::NoFrameReceived => "NO_FRAME_RECEIVED",
            EventType::InvalidImage => "INVALID_IMAGE",
            EventType::NoFace => "NO_FACE",
            EventType::MultipleFaces => "MULTIPLE_FACES",
            EventType::LookingAway => "LOOKING_AWAY",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete event detected in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameEvent {
    pub event_type: EventType,
    /// Always >= 1
    pub severity: u32,
}

impl FrameEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            severity: 1,
        }
    }
}
