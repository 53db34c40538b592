//! Camera model building blocks.
//!
//! A [`PerspectiveCamera`] chains three stages:
//!
//! 1. [`ProjectionModel`]: camera-frame point to normalized coordinates (pinhole).
//! 2. [`DistortionModel`]: radial/tangential distortion in normalized space.
//! 3. [`IntrinsicsModel`]: normalized coordinates to pixels (K matrix).
//!
//! Each stage also exposes its derivative so the full projection Jacobian
//! with respect to a world point is available analytically.

mod camera;
mod distortion;
mod intrinsics;
mod projection;

pub use camera::*;
pub use distortion::*;
pub use intrinsics::*;
pub use projection::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Iso3, Pt2, Pt3, Vec3};
    use nalgebra::{Translation3, UnitQuaternion};

    fn test_camera(distortion: BrownConrady5) -> PerspectiveCamera {
        let k = FxFyCxCySkew {
            fx: 800.0,
            fy: 810.0,
            cx: 640.0,
            cy: 360.0,
            skew: 0.5,
        };
        let pose = Iso3::from_parts(
            Translation3::new(0.05, -0.1, 0.4),
            UnitQuaternion::from_euler_angles(0.05, -0.1, 0.2),
        );
        PerspectiveCamera::new(k, distortion, pose)
    }

    fn distorted() -> BrownConrady5 {
        BrownConrady5 {
            k1: -0.12,
            k2: 0.03,
            k3: 0.001,
            p1: 0.0005,
            p2: -0.0007,
            iters: 12,
        }
    }

    #[test]
    fn normalize_inverts_projection() {
        let cam = test_camera(distorted());
        let pw = Pt3::new(0.2, -0.1, 3.0);
        let px = cam.project(&pw).unwrap();
        let n = cam.normalize_pixel(&px);

        let pc = cam.camera_se3_world.transform_point(&pw);
        let expected = Pt2::new(pc.x / pc.z, pc.y / pc.z);
        let err = (n - expected).norm();
        assert!(err < 1e-9, "err={err}");
    }

    #[test]
    fn point_behind_camera_is_not_projectable() {
        let cam = test_camera(BrownConrady5::default());
        let behind = cam.camera_se3_world.inverse_transform_point(&Pt3::new(0.0, 0.0, -1.0));
        assert!(cam.project(&behind).is_none());
        assert!(cam.project_with_jacobian(&behind).is_some());
    }

    #[test]
    fn analytic_jacobian_matches_finite_differences() {
        let cam = test_camera(distorted());
        let pw = Pt3::new(0.3, 0.2, 2.5);
        let (_, j) = cam.project_with_jacobian(&pw).unwrap();

        let h = 1e-6;
        for k in 0..3 {
            let mut step = Vec3::zeros();
            step[k] = h;
            let plus = cam.reproject(&(pw + step)).unwrap();
            let minus = cam.reproject(&(pw - step)).unwrap();
            let col = (plus - minus) / (2.0 * h);
            let err = (col - j.column(k)).norm();
            assert!(err < 1e-4, "column {k}: err={err}");
        }
    }

    #[test]
    fn center_is_pose_origin() {
        let cam = test_camera(BrownConrady5::default());
        let center = cam.center();
        let in_cam = cam.camera_se3_world.transform_point(&center);
        assert!(in_cam.coords.norm() < 1e-12);
    }

    #[test]
    fn projection_matrix_matches_project_without_distortion() {
        let cam = test_camera(BrownConrady5::default());
        let pw = Pt3::new(-0.4, 0.1, 4.0);
        let h = cam.projection_matrix() * pw.to_homogeneous();
        let via_matrix = Pt2::new(h.x / h.z, h.y / h.z);
        let via_model = cam.project(&pw).unwrap();
        assert!((via_matrix - via_model).norm() < 1e-9);
    }
}
