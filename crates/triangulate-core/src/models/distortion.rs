use serde::{Deserialize, Serialize};

use crate::{Mat2, Real, Vec2};

/// Lens distortion applied in normalized image coordinates.
pub trait DistortionModel {
    fn distort(&self, n_undist: &Vec2) -> Vec2;
    fn undistort(&self, n_dist: &Vec2) -> Vec2;
    /// Derivative `∂distort(n) / ∂n` evaluated at an undistorted point.
    fn jacobian(&self, n_undist: &Vec2) -> Mat2;
}

/// Brown-Conrady 5-parameter radial-tangential model.
///
/// All-zero coefficients (the `Default`) describe a distortion-free lens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BrownConrady5 {
    pub k1: Real,
    pub k2: Real,
    pub k3: Real,
    pub p1: Real,
    pub p2: Real,
    /// Fixed-point iterations used by [`DistortionModel::undistort`] (0 means 8).
    #[serde(default)]
    pub iters: u32,
}

impl BrownConrady5 {
    /// Returns true if every coefficient is zero.
    pub fn is_identity(&self) -> bool {
        self.k1 == 0.0 && self.k2 == 0.0 && self.k3 == 0.0 && self.p1 == 0.0 && self.p2 == 0.0
    }

    fn radial(&self, r2: Real) -> Real {
        1.0 + r2 * (self.k1 + r2 * (self.k2 + r2 * self.k3))
    }

    fn distort_impl(&self, x: Real, y: Real) -> (Real, Real) {
        let r2 = x * x + y * y;
        let radial = self.radial(r2);

        let x_tan = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let y_tan = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;

        (x * radial + x_tan, y * radial + y_tan)
    }
}

impl DistortionModel for BrownConrady5 {
    fn distort(&self, n_undist: &Vec2) -> Vec2 {
        let (xd, yd) = self.distort_impl(n_undist.x, n_undist.y);
        Vec2::new(xd, yd)
    }

    fn undistort(&self, n_dist: &Vec2) -> Vec2 {
        if self.is_identity() {
            return *n_dist;
        }
        let mut x = n_dist.x;
        let mut y = n_dist.y;

        let iters = if self.iters == 0 { 8 } else { self.iters };
        for _ in 0..iters {
            let (xd, yd) = self.distort_impl(x, y);
            x -= xd - n_dist.x;
            y -= yd - n_dist.y;
        }
        Vec2::new(x, y)
    }

    fn jacobian(&self, n_undist: &Vec2) -> Mat2 {
        let (x, y) = (n_undist.x, n_undist.y);
        let r2 = x * x + y * y;
        let radial = self.radial(r2);
        // d(radial)/d(r2)
        let d_radial = self.k1 + r2 * (2.0 * self.k2 + 3.0 * self.k3 * r2);
        let dr_dx = 2.0 * x * d_radial;
        let dr_dy = 2.0 * y * d_radial;

        let dxd_dx = radial + x * dr_dx + 2.0 * self.p1 * y + 6.0 * self.p2 * x;
        let dxd_dy = x * dr_dy + 2.0 * self.p1 * x + 2.0 * self.p2 * y;
        let dyd_dx = y * dr_dx + 2.0 * self.p1 * x + 2.0 * self.p2 * y;
        let dyd_dy = radial + y * dr_dy + 6.0 * self.p1 * y + 2.0 * self.p2 * x;

        Mat2::new(dxd_dx, dxd_dy, dyd_dx, dyd_dy)
    }
}
