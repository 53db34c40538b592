use serde::{Deserialize, Serialize};

use crate::{Mat2, Mat3, Real, Vec2};

/// Intrinsics that map sensor-plane coordinates to pixel coordinates.
pub trait IntrinsicsModel {
    /// Convert sensor-plane coordinates into pixel coordinates.
    fn sensor_to_pixel(&self, sensor: &Vec2) -> Vec2;
    /// Convert pixel coordinates into sensor-plane coordinates.
    fn pixel_to_sensor(&self, pixel: &Vec2) -> Vec2;
    /// Derivative `∂pixel / ∂sensor` (constant for affine intrinsics).
    fn jacobian(&self) -> Mat2;
}

/// Standard pinhole intrinsics with optional skew.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FxFyCxCySkew {
    /// Focal length in pixels along X.
    pub fx: Real,
    /// Focal length in pixels along Y.
    pub fy: Real,
    /// Principal point X coordinate in pixels.
    pub cx: Real,
    /// Principal point Y coordinate in pixels.
    pub cy: Real,
    /// Skew term (typically 0).
    #[serde(default)]
    pub skew: Real,
}

impl FxFyCxCySkew {
    /// Return the 3x3 camera intrinsics matrix K.
    pub fn k_matrix(&self) -> Mat3 {
        Mat3::new(
            self.fx, self.skew, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }
}

impl IntrinsicsModel for FxFyCxCySkew {
    fn sensor_to_pixel(&self, sensor: &Vec2) -> Vec2 {
        let u = self.fx * sensor.x + self.skew * sensor.y + self.cx;
        let v = self.fy * sensor.y + self.cy;
        Vec2::new(u, v)
    }

    fn pixel_to_sensor(&self, pixel: &Vec2) -> Vec2 {
        let sy = (pixel.y - self.cy) / self.fy;
        let sx = (pixel.x - self.cx - self.skew * sy) / self.fx;
        Vec2::new(sx, sy)
    }

    fn jacobian(&self) -> Mat2 {
        Mat2::new(self.fx, self.skew, 0.0, self.fy)
    }
}
