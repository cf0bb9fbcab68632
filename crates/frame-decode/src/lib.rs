//! Frame Decoding
//!
//! Turns the raw bytes of an uploaded webcam frame (JPEG, PNG, ...) into a
//! packed RGB buffer the inference adapters can consume.

pub mod frame;

pub use frame::VideoFrame;

use thiserror::Error;

/// Frame decoding errors
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("No frame data received")]
    Empty,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}
