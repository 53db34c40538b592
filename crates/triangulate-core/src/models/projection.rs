use serde::{Deserialize, Serialize};

use crate::{Mat23, Real, Vec2, Vec3, PROJECTION_EPS};

/// Projection model from a camera-frame direction to normalized coordinates.
pub trait ProjectionModel {
    /// Project a direction in camera coordinates to normalized coordinates.
    ///
    /// Returns `None` when the direction is not projectable (behind the camera).
    fn project_dir(&self, dir_c: &Vec3) -> Option<Vec2>;
    /// Project a camera-frame point and return `∂n / ∂p_c`.
    ///
    /// No chirality check is applied; `None` only when the depth vanishes.
    fn project_dir_jacobian(&self, p_c: &Vec3) -> Option<(Vec2, Mat23)>;
    /// Unproject normalized coordinates to a direction in camera coordinates.
    fn unproject_dir(&self, n: &Vec2) -> Vec3;
}

/// Classic pinhole projection model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pinhole;

impl ProjectionModel for Pinhole {
    fn project_dir(&self, dir_c: &Vec3) -> Option<Vec2> {
        if dir_c.z <= 0.0 {
            return None;
        }
        Some(Vec2::new(dir_c.x / dir_c.z, dir_c.y / dir_c.z))
    }

    fn project_dir_jacobian(&self, p_c: &Vec3) -> Option<(Vec2, Mat23)> {
        if p_c.z.abs() < PROJECTION_EPS {
            return None;
        }
        let inv_z: Real = 1.0 / p_c.z;
        let x = p_c.x * inv_z;
        let y = p_c.y * inv_z;
        #[rustfmt::skip]
        let j = Mat23::new(
            inv_z, 0.0,   -x * inv_z,
            0.0,   inv_z, -y * inv_z,
        );
        Some((Vec2::new(x, y), j))
    }

    fn unproject_dir(&self, n: &Vec2) -> Vec3 {
        Vec3::new(n.x, n.y, 1.0)
    }
}
