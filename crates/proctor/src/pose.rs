//! Head pose from facial landmarks
//!
//! Solves the perspective-n-point problem for six landmarks against a fixed
//! anthropometric face model, then decomposes the rotation into Euler angles.

use nalgebra::{Matrix3, Rotation3, SMatrix, SVector, Vector3, Vector6};
use serde::{Deserialize, Serialize};

/// Number of landmarks the solver needs
pub const POSE_POINT_COUNT: usize = 6;

/// Face model in millimetres: nose tip, chin, left eye, right eye,
/// left mouth corner, right mouth corner
pub const MODEL_POINTS: [[f64; 3]; POSE_POINT_COUNT] = [
    [0.0, 0.0, 0.0],
    [0.0, -63.6, -12.5],
    [-43.3, 32.7, -26.0],
    [43.3, 32.7, -26.0],
    [-28.9, -28.9, -24.1],
    [28.9, -28.9, -24.1],
];

/// Scale applied to the decomposed angles before thresholding
pub const ANGLE_SCALE: f64 = 180.0;

const RESIDUALS: usize = POSE_POINT_COUNT * 2;
const MAX_ITERATIONS: usize = 100;
const MAX_REPROJECTION_RMS_PX: f64 = 1e3;
/// Landmarks packed tighter than this (mean distance from centroid) are degenerate
const MIN_IMAGE_SPREAD_PX: f64 = 1.0;

/// Result of one pose solve
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseEstimate {
    /// Whether the solver converged; angles are 0.0 otherwise
    pub success: bool,
    pub yaw: f64,
    pub pitch: f64,
}

impl PoseEstimate {
    pub fn failed() -> Self {
        Self::default()
    }

    /// Single-frame test, before any smoothing
    pub fn is_looking_away(&self, yaw_threshold: f64, pitch_threshold: f64) -> bool {
        self.yaw.abs() > yaw_threshold || self.pitch.abs() > pitch_threshold
    }
}

/// Head pose solver seam
pub trait PoseSolver: Send + Sync {
    /// `points` are normalized image coordinates in model-point order
    fn solve(&self, points: &[(f32, f32); POSE_POINT_COUNT], width: u32, height: u32) -> PoseEstimate;
}

/// Iterative PnP solver (Levenberg-Marquardt on rotation vector + translation)
#[derive(Debug, Clone)]
pub struct PnpPoseSolver {
    model: [Vector3<f64>; POSE_POINT_COUNT],
    max_iterations: usize,
}

impl Default for PnpPoseSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Pinhole camera: focal length = image width, principal point at centre
#[derive(Debug, Clone, Copy)]
struct Camera {
    focal: f64,
    cx: f64,
    cy: f64,
}

impl Camera {
    fn project(&self, p: &Vector3<f64>) -> Option<(f64, f64)> {
        if p.z <= f64::EPSILON {
            return None;
        }
        Some((self.focal * p.x / p.z + self.cx, self.focal * p.y / p.z + self.cy))
    }
}

impl PnpPoseSolver {
    pub fn new() -> Self {
        Self {
            model: MODEL_POINTS.map(|[x, y, z]| Vector3::new(x, y, z)),
            max_iterations: MAX_ITERATIONS,
        }
    }

    fn residuals(
        &self,
        camera: &Camera,
        image: &[(f64, f64); POSE_POINT_COUNT],
        params: &Vector6<f64>,
    ) -> Option<SVector<f64, RESIDUALS>> {
        let rotation = Rotation3::from_scaled_axis(Vector3::new(params[0], params[1], params[2]));
        let translation = Vector3::new(params[3], params[4], params[5]);
        let mut r = SVector::<f64, RESIDUALS>::zeros();
        for (i, (model, &(u, v))) in self.model.iter().zip(image.iter()).enumerate() {
            let (pu, pv) = camera.project(&(rotation * model + translation))?;
            r[2 * i] = pu - u;
            r[2 * i + 1] = pv - v;
        }
        Some(r)
    }

    /// Frontal initial guess: model y-up maps to image y-down, depth from scale
    fn initial_guess(&self, camera: &Camera, image: &[(f64, f64); POSE_POINT_COUNT]) -> Option<Vector6<f64>> {
        let n = POSE_POINT_COUNT as f64;
        let (mu, mv) = image
            .iter()
            .fold((0.0, 0.0), |(su, sv), &(u, v)| (su + u / n, sv + v / n));
        let image_spread = image
            .iter()
            .map(|&(u, v)| ((u - mu).powi(2) + (v - mv).powi(2)).sqrt())
            .sum::<f64>()
            / n;
        if image_spread < MIN_IMAGE_SPREAD_PX {
            return None;
        }

        let centroid = self.model.iter().fold(Vector3::zeros(), |acc, p| acc + p) / n;
        let model_spread = self.model.iter().map(|p| (p - centroid).norm()).sum::<f64>() / n;

        let tz = camera.focal * model_spread / image_spread;
        let tx = (mu - camera.cx) * tz / camera.focal;
        let ty = (mv - camera.cy) * tz / camera.focal;
        Some(Vector6::new(std::f64::consts::PI, 0.0, 0.0, tx, ty, tz))
    }

    fn jacobian(
        &self,
        camera: &Camera,
        image: &[(f64, f64); POSE_POINT_COUNT],
        params: &Vector6<f64>,
    ) -> Option<SMatrix<f64, RESIDUALS, 6>> {
        let mut jac = SMatrix::<f64, RESIDUALS, 6>::zeros();
        for j in 0..6 {
            let h = 1e-6 * params[j].abs().max(1.0);
            let mut plus = *params;
            let mut minus = *params;
            plus[j] += h;
            minus[j] -= h;
            let col = (self.residuals(camera, image, &plus)? - self.residuals(camera, image, &minus)?)
                / (2.0 * h);
            jac.set_column(j, &col);
        }
        Some(jac)
    }

    /// Returns the refined rotation vector, or None if the solve fails
    fn refine(&self, camera: &Camera, image: &[(f64, f64); POSE_POINT_COUNT]) -> Option<Vector3<f64>> {
        let mut params = self.initial_guess(camera, image)?;
        let mut cost = self.residuals(camera, image, &params)?.norm_squared();
        let mut lambda = 1e-3;

        for _ in 0..self.max_iterations {
            let r = self.residuals(camera, image, &params)?;
            let jac = self.jacobian(camera, image, &params)?;
            let jtj = jac.transpose() * jac;
            let jtr = jac.transpose() * r;

            let mut damped = jtj;
            for k in 0..6 {
                damped[(k, k)] += lambda * jtj[(k, k)].max(1e-12);
            }
            let Some(step) = damped.lu().solve(&(-jtr)) else {
                lambda *= 10.0;
                continue;
            };

            let candidate = params + step;
            match self.residuals(camera, image, &candidate).map(|r| r.norm_squared()) {
                Some(new_cost) if new_cost.is_finite() && new_cost < cost => {
                    let improvement = cost - new_cost;
                    params = candidate;
                    cost = new_cost;
                    lambda = (lambda / 10.0).max(1e-12);
                    if step.norm() < 1e-10 || improvement < 1e-14 * cost.max(1.0) {
                        break;
                    }
                }
                _ => {
                    lambda *= 10.0;
                    if lambda > 1e12 {
                        break;
                    }
                }
            }
        }

        let rms = (cost / RESIDUALS as f64).sqrt();
        let converged = params.iter().all(|v| v.is_finite()) && params[5] > 0.0 && rms < MAX_REPROJECTION_RMS_PX;
        converged.then(|| Vector3::new(params[0], params[1], params[2]))
    }
}

impl PoseSolver for PnpPoseSolver {
    fn solve(&self, points: &[(f32, f32); POSE_POINT_COUNT], width: u32, height: u32) -> PoseEstimate {
        if width == 0 || height == 0 {
            return PoseEstimate::failed();
        }
        let (w, h) = (width as f64, height as f64);
        let image = points.map(|(x, y)| (x as f64 * w, y as f64 * h));
        if image.iter().any(|(u, v)| !u.is_finite() || !v.is_finite()) {
            return PoseEstimate::failed();
        }

        let camera = Camera {
            focal: w,
            cx: w / 2.0,
            cy: h / 2.0,
        };
        let Some(rvec) = self.refine(&camera, &image) else {
            return PoseEstimate::failed();
        };

        let rotation = Rotation3::from_scaled_axis(rvec);
        let [pitch, yaw, _roll] = rq_decompose_angles(rotation.matrix());
        PoseEstimate {
            success: true,
            yaw: yaw * ANGLE_SCALE,
            pitch: pitch * ANGLE_SCALE,
        }
    }
}

/// Euler angles (degrees, about x, y, z) from a Givens-rotation RQ
/// decomposition of a 3x3 matrix, including the sign disambiguation that
/// keeps the first two diagonal entries of R positive.
pub fn rq_decompose_angles(m: &Matrix3<f64>) -> [f64; 3] {
    fn givens(c: f64, s: f64) -> (f64, f64) {
        let z = 1.0 / (c * c + s * s + f64::EPSILON).sqrt();
        (c * z, s * z)
    }

    let (c, s) = givens(m[(2, 2)], m[(2, 1)]);
    let mut qx = Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c);
    let r = m * qx;

    let (c, s) = givens(r[(2, 2)], -r[(2, 0)]);
    let mut qy = Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c);
    let m2 = r * qy;

    let (c, s) = givens(m2[(1, 1)], m2[(1, 0)]);
    let mut qz = Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0);
    let r = m2 * qz;

    if r[(0, 0)] < 0.0 {
        if r[(1, 1)] < 0.0 {
            // 180 degrees about z
            for (i, j) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                qz[(i, j)] *= -1.0;
            }
        } else {
            // 180 degrees about y
            qz.transpose_mut();
            for (i, j) in [(0, 0), (0, 2), (2, 0), (2, 2)] {
                qy[(i, j)] *= -1.0;
            }
        }
    } else if r[(1, 1)] < 0.0 {
        // 180 degrees about x
        qz.transpose_mut();
        qy.transpose_mut();
        for (i, j) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            qx[(i, j)] *= -1.0;
        }
    }

    let angle = |cos: f64, sign_src: f64| {
        let sign = if sign_src >= 0.0 { 1.0 } else { -1.0 };
        cos.clamp(-1.0, 1.0).acos() * sign * (180.0 / std::f64::consts::PI)
    };
    [
        angle(qx[(1, 1)], qx[(1, 2)]),
        angle(qy[(0, 0)], qy[(2, 0)]),
        angle(qz[(0, 0)], qz[(0, 1)]),
    ]
}
