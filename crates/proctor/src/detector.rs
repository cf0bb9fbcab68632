//! Face detection and face-mesh landmark models

use frame_decode::VideoFrame;
use image::RgbImage;
use ndarray::{Array4, ArrayViewD};
use ort::session::{builder::GraphOptimizationLevel, Session};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::pose::POSE_POINT_COUNT;
use crate::{ProctorConfig, ProctorError};

/// Face-mesh indices of the pose landmarks: nose tip, chin, left eye,
/// right eye, left mouth corner, right mouth corner
pub const POSE_LANDMARK_IDS: [usize; POSE_POINT_COUNT] = [1, 199, 33, 263, 61, 291];

/// Face bounding box (normalized image coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    fn iou(&self, other: &BoundingBox) -> f32 {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width).min(other.x + other.width);
        let y1 = (self.y + self.height).min(other.y + other.height);
        let inter = (x1 - x0).max(0.0) * (y1 - y0).max(0.0);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// One detected face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Confidence in [0, 1]
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Face-mesh landmarks of one face (normalized image coordinates)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub points: Vec<(f32, f32)>,
}

impl LandmarkSet {
    /// The six landmarks the pose solver needs, if the set contains them
    pub fn pose_points(&self) -> Option<[(f32, f32); POSE_POINT_COUNT]> {
        let mut out = [(0.0, 0.0); POSE_POINT_COUNT];
        for (slot, &idx) in out.iter_mut().zip(POSE_LANDMARK_IDS.iter()) {
            *slot = *self.points.get(idx)?;
        }
        Some(out)
    }
}

/// Face detection seam; results ordered by confidence, highest first
pub trait FaceDetector: Send + Sync {
    fn detect(&self, frame: &VideoFrame) -> Result<Vec<Detection>, ProctorError>;
}

/// Landmark seam; one set per tracked face, primary face first
pub trait LandmarkDetector: Send + Sync {
    fn landmarks(&self, frame: &VideoFrame) -> Result<Vec<LandmarkSet>, ProctorError>;
}

fn load_session(path: &str, what: &str) -> Result<Session, ProctorError> {
    info!("Loading {} model from {}", what, path);
    Session::builder()
        .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
        .and_then(|b| b.commit_from_file(path))
        .map_err(|e| {
            error!("Failed to load {} model: {}", what, e);
            ProctorError::ModelLoad(e.to_string())
        })
}

/// NCHW float tensor from an RGB image with per-channel `(p - mean) / scale`
fn to_nchw(img: &RgbImage, mean: f32, scale: f32) -> Array4<f32> {
    let (w, h) = img.dimensions();
    let mut input = Array4::<f32>::zeros((1, 3, h as usize, w as usize));
    for (x, y, pixel) in img.enumerate_pixels() {
        for c in 0..3 {
            input[[0, c, y as usize, x as usize]] = (pixel[c] as f32 - mean) / scale;
        }
    }
    input
}

fn flatten(view: ArrayViewD<'_, f32>) -> Vec<f32> {
    view.iter().copied().collect()
}

/// UltraFace-style detector (320x240 input, scores `[1,N,2]`, corner boxes `[1,N,4]`)
pub struct OnnxFaceDetector {
    score_threshold: f32,
    session: Session,
}

impl OnnxFaceDetector {
    const INPUT_WIDTH: u32 = 320;
    const INPUT_HEIGHT: u32 = 240;
    const NMS_IOU: f32 = 0.3;

    pub fn new(config: &ProctorConfig) -> Result<Self, ProctorError> {
        let path = config
            .face_model_path
            .as_deref()
            .ok_or_else(|| ProctorError::Config("face_model_path not set".into()))?;
        Ok(Self {
            score_threshold: config.detector_score_threshold,
            session: load_session(path, "face detection")?,
        })
    }
}

impl FaceDetector for OnnxFaceDetector {
    fn detect(&self, frame: &VideoFrame) -> Result<Vec<Detection>, ProctorError> {
        let resized = frame
            .resize(Self::INPUT_WIDTH, Self::INPUT_HEIGHT)
            .map_err(|e| ProctorError::ImageProcessing(e.to_string()))?;
        let input = to_nchw(&resized, 127.0, 128.0);

        let outputs = self
            .session
            .run(ort::inputs![input].map_err(|e| ProctorError::Inference(e.to_string()))?)
            .map_err(|e| ProctorError::Inference(e.to_string()))?;
        let scores = flatten(
            outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| ProctorError::Inference(e.to_string()))?,
        );
        let boxes = flatten(
            outputs[1]
                .try_extract_tensor::<f32>()
                .map_err(|e| ProctorError::Inference(e.to_string()))?,
        );
        if scores.len() / 2 != boxes.len() / 4 {
            return Err(ProctorError::Inference(format!(
                "score/box count mismatch: {} vs {}",
                scores.len() / 2,
                boxes.len() / 4
            )));
        }

        let candidates = scores
            .chunks_exact(2)
            .zip(boxes.chunks_exact(4))
            .filter(|(s, _)| s[1] >= self.score_threshold)
            .map(|(s, b)| Detection {
                confidence: s[1].clamp(0.0, 1.0),
                bbox: BoundingBox {
                    x: b[0],
                    y: b[1],
                    width: b[2] - b[0],
                    height: b[3] - b[1],
                },
            })
            .collect();

        let faces = non_max_suppression(candidates, Self::NMS_IOU);
        debug!("Face detector kept {} faces", faces.len());
        Ok(faces)
    }
}

/// Greedy NMS; output sorted by confidence, highest first
pub fn non_max_suppression(mut candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut kept: Vec<Detection> = Vec::new();
    for candidate in candidates {
        if kept.iter().all(|k| k.bbox.iou(&candidate.bbox) <= iou_threshold) {
            kept.push(candidate);
        }
    }
    kept
}

/// Face-mesh landmark model (192x192 input; outputs landmarks `(x, y, z)`
/// in input pixels and a face-presence logit)
pub struct OnnxLandmarkDetector {
    max_faces: usize,
    session: Session,
}

impl OnnxLandmarkDetector {
    const INPUT_SIZE: u32 = 192;
    const MIN_PRESENCE: f32 = 0.5;

    pub fn new(config: &ProctorConfig) -> Result<Self, ProctorError> {
        let path = config
            .landmark_model_path
            .as_deref()
            .ok_or_else(|| ProctorError::Config("landmark_model_path not set".into()))?;
        Ok(Self {
            max_faces: config.max_tracked_faces,
            session: load_session(path, "face mesh")?,
        })
    }
}

impl LandmarkDetector for OnnxLandmarkDetector {
    fn landmarks(&self, frame: &VideoFrame) -> Result<Vec<LandmarkSet>, ProctorError> {
        let resized = frame
            .resize(Self::INPUT_SIZE, Self::INPUT_SIZE)
            .map_err(|e| ProctorError::ImageProcessing(e.to_string()))?;
        let input = to_nchw(&resized, 0.0, 255.0);

        let outputs = self
            .session
            .run(ort::inputs![input].map_err(|e| ProctorError::Inference(e.to_string()))?)
            .map_err(|e| ProctorError::Inference(e.to_string()))?;
        let coords = flatten(
            outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| ProctorError::Inference(e.to_string()))?,
        );
        let presence_logit = flatten(
            outputs[1]
                .try_extract_tensor::<f32>()
                .map_err(|e| ProctorError::Inference(e.to_string()))?,
        )
        .first()
        .copied()
        .unwrap_or(f32::NEG_INFINITY);

        let presence = 1.0 / (1.0 + (-presence_logit).exp());
        if presence < Self::MIN_PRESENCE {
            debug!("Face mesh presence {:.2} below threshold", presence);
            return Ok(Vec::new());
        }

        let size = Self::INPUT_SIZE as f32;
        let set = LandmarkSet {
            points: coords
                .chunks_exact(3)
                .map(|p| (p[0] / size, p[1] / size))
                .collect(),
        };
        Ok(std::iter::once(set).take(self.max_faces).collect())
    }
}
