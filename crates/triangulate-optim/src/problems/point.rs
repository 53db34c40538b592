//! Reprojection error of a single world point observed by several cameras.
//!
//! Parameters are the three world coordinates of the point. Each view adds two
//! residual rows `project(X) - observed` in pixels, with the analytic Jacobian
//! supplied by the camera model.

use crate::{NllsProblem, RobustKernel};
use nalgebra::{DMatrix, DVector};
use triangulate_core::{ProjectiveCamera, Pt2, Pt3, Real};

/// One point, `n` views, `2n` residuals.
#[derive(Debug, Clone, Copy)]
pub struct PointReprojectionProblem<'a, C> {
    cameras: &'a [&'a C],
    pixels: &'a [Pt2],
    kernel: RobustKernel,
}

impl<'a, C: ProjectiveCamera> PointReprojectionProblem<'a, C> {
    /// `cameras[i]` observes `pixels[i]`; lengths are expected to match.
    pub fn new(cameras: &'a [&'a C], pixels: &'a [Pt2], kernel: RobustKernel) -> Self {
        debug_assert_eq!(cameras.len(), pixels.len());
        Self {
            cameras,
            pixels,
            kernel,
        }
    }

    pub fn num_views(&self) -> usize {
        self.cameras.len()
    }

    fn point(x: &DVector<Real>) -> Pt3 {
        Pt3::new(x[0], x[1], x[2])
    }
}

impl<C: ProjectiveCamera> NllsProblem for PointReprojectionProblem<'_, C> {
    fn num_params(&self) -> usize {
        3
    }

    fn num_residuals(&self) -> usize {
        2 * self.cameras.len()
    }

    fn residuals_unweighted(&self, x: &DVector<Real>) -> DVector<Real> {
        let p = Self::point(x);
        let mut r = DVector::zeros(self.num_residuals());
        for (i, (cam, obs)) in self.cameras.iter().zip(self.pixels).enumerate() {
            // Points on a camera plane have no image; NaN aborts the solve.
            let (u, v) = match cam.reproject(&p) {
                Some(px) => (px.x - obs.x, px.y - obs.y),
                None => (Real::NAN, Real::NAN),
            };
            r[2 * i] = u;
            r[2 * i + 1] = v;
        }
        r
    }

    fn jacobian_unweighted(&self, x: &DVector<Real>) -> DMatrix<Real> {
        let p = Self::point(x);
        let mut j = DMatrix::zeros(self.num_residuals(), 3);
        for (i, cam) in self.cameras.iter().enumerate() {
            match cam.project_with_jacobian(&p) {
                Some((_, jac)) => j.fixed_view_mut::<2, 3>(2 * i, 0).copy_from(&jac),
                None => j.fixed_view_mut::<2, 3>(2 * i, 0).fill(Real::NAN),
            }
        }
        j
    }

    fn robust_row_scales(&self, r_unweighted: &DVector<Real>) -> DVector<Real> {
        let mut scales = DVector::from_element(r_unweighted.len(), 1.0);
        if self.kernel == RobustKernel::None {
            return scales;
        }
        for i in 0..self.cameras.len() {
            let (u, v) = (r_unweighted[2 * i], r_unweighted[2 * i + 1]);
            let s = self.kernel.row_scale(u * u + v * v);
            scales[2 * i] = s;
            scales[2 * i + 1] = s;
        }
        scales
    }
}
