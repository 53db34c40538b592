use serde::{Deserialize, Serialize};

use super::{
    BrownConrady5, DistortionModel, FxFyCxCySkew, IntrinsicsModel, Pinhole, ProjectionModel,
};
use crate::{rigid_matrix34, Iso3, Mat23, Mat34, Pt2, Pt3};

/// Capability of a calibrated, posed camera as consumed by the solvers.
///
/// Implementors map world points to pixels. Triangulation only needs
/// read access, so every method takes `&self`.
pub trait ProjectiveCamera {
    /// Project a world point to pixels.
    ///
    /// Returns `None` when the point is not in front of the camera.
    fn project(&self, p_w: &Pt3) -> Option<Pt2>;

    /// Project a world point and return `∂pixel / ∂p_w`.
    ///
    /// No chirality check is applied so that iterative solvers see a smooth
    /// cost; `None` only when the point lies on the camera plane.
    fn project_with_jacobian(&self, p_w: &Pt3) -> Option<(Pt2, Mat23)>;

    /// Map a pixel to undistorted normalized image coordinates.
    fn normalize_pixel(&self, px: &Pt2) -> Pt2;

    /// World-to-camera transform.
    fn camera_se3_world(&self) -> Iso3;

    /// Projection matrix `[R | t]` acting on normalized coordinates.
    fn normalized_projection_matrix(&self) -> Mat34 {
        rigid_matrix34(&self.camera_se3_world())
    }

    /// Reproject a world point without a chirality check.
    fn reproject(&self, p_w: &Pt3) -> Option<Pt2> {
        self.project_with_jacobian(p_w).map(|(px, _)| px)
    }

    /// Camera center in world coordinates.
    fn center(&self) -> Pt3 {
        self.camera_se3_world().inverse().transform_point(&Pt3::origin())
    }
}

/// Pinhole camera with Brown-Conrady distortion at a fixed world pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub intrinsics: FxFyCxCySkew,
    #[serde(default)]
    pub distortion: BrownConrady5,
    /// Maps world points into the camera frame.
    pub camera_se3_world: Iso3,
}

impl PerspectiveCamera {
    pub fn new(
        intrinsics: FxFyCxCySkew,
        distortion: BrownConrady5,
        camera_se3_world: Iso3,
    ) -> Self {
        Self {
            intrinsics,
            distortion,
            camera_se3_world,
        }
    }

    /// Distortion-free camera.
    pub fn pinhole(intrinsics: FxFyCxCySkew, camera_se3_world: Iso3) -> Self {
        Self::new(intrinsics, BrownConrady5::default(), camera_se3_world)
    }

    /// Full projection matrix `K [R | t]`.
    ///
    /// Exact only when the camera has no distortion.
    pub fn projection_matrix(&self) -> Mat34 {
        self.intrinsics.k_matrix() * rigid_matrix34(&self.camera_se3_world)
    }
}

impl ProjectiveCamera for PerspectiveCamera {
    fn project(&self, p_w: &Pt3) -> Option<Pt2> {
        let p_c = self.camera_se3_world.transform_point(p_w);
        let n_u = Pinhole.project_dir(&p_c.coords)?;
        let n_d = self.distortion.distort(&n_u);
        Some(self.intrinsics.sensor_to_pixel(&n_d).into())
    }

    fn project_with_jacobian(&self, p_w: &Pt3) -> Option<(Pt2, Mat23)> {
        let p_c = self.camera_se3_world.transform_point(p_w);
        let (n_u, j_proj) = Pinhole.project_dir_jacobian(&p_c.coords)?;
        let n_d = self.distortion.distort(&n_u);
        let px = self.intrinsics.sensor_to_pixel(&n_d);

        let rot = self.camera_se3_world.rotation.to_rotation_matrix();
        let j =
            self.intrinsics.jacobian() * self.distortion.jacobian(&n_u) * j_proj * rot.matrix();
        Some((px.into(), j))
    }

    fn normalize_pixel(&self, px: &Pt2) -> Pt2 {
        let n_d = self.intrinsics.pixel_to_sensor(&px.coords);
        self.distortion.undistort(&n_d).into()
    }

    fn camera_se3_world(&self) -> Iso3 {
        self.camera_se3_world
    }
}
