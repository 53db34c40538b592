//! Robust loss kernels applied to per-observation reprojection residuals.

use serde::{Deserialize, Serialize};
use triangulate_core::Real;

/// Robust loss for iteratively re-weighted least squares (IRLS).
///
/// Thresholds are expressed in the residual unit, which for point
/// triangulation is pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RobustKernel {
    /// Plain squared error.
    #[default]
    None,
    /// Quadratic up to `delta`, linear beyond.
    Huber { delta: Real },
    /// `c^2 * ln(1 + r^2 / c^2)`.
    Cauchy { c: Real },
}

impl RobustKernel {
    /// Return the loss `rho(r^2)` and IRLS weight `w` for a squared residual norm.
    ///
    /// Rows belonging to the residual are scaled by `sqrt(w)` before the linearised
    /// step is solved.
    pub fn rho_and_weight(self, r2: Real) -> (Real, Real) {
        match self {
            RobustKernel::None => (r2, 1.0),
            RobustKernel::Huber { delta } => {
                let r = r2.sqrt();
                if r <= delta {
                    (r2, 1.0)
                } else {
                    (2.0 * delta * r - delta * delta, delta / r)
                }
            }
            RobustKernel::Cauchy { c } => {
                let t = r2 / (c * c);
                (c * c * (1.0 + t).ln(), 1.0 / (1.0 + t))
            }
        }
    }

    /// `sqrt(w)` for a squared residual norm.
    pub fn row_scale(self, r2: Real) -> Real {
        match self {
            RobustKernel::None => 1.0,
            _ => self.rho_and_weight(r2).1.sqrt(),
        }
    }

    /// Whether the kernel parameter is usable (positive and finite).
    pub fn is_valid(self) -> bool {
        match self {
            RobustKernel::None => true,
            RobustKernel::Huber { delta } => delta.is_finite() && delta > 0.0,
            RobustKernel::Cauchy { c } => c.is_finite() && c > 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_kernel_never_rescales() {
        let kernel = RobustKernel::None;
        assert_eq!(kernel.rho_and_weight(49.0), (49.0, 1.0));
        assert_eq!(kernel.row_scale(1e6), 1.0);
    }

    #[test]
    fn huber_downweights_pixels_beyond_threshold() {
        let kernel = RobustKernel::Huber { delta: 2.0 };

        let (rho_in, w_in) = kernel.rho_and_weight(1.5 * 1.5);
        assert!((rho_in - 2.25).abs() < 1e-12);
        assert_eq!(w_in, 1.0);

        let (rho_out, w_out) = kernel.rho_and_weight(8.0 * 8.0);
        assert!((rho_out - (2.0 * 2.0 * 8.0 - 4.0)).abs() < 1e-12);
        assert!((w_out - 0.25).abs() < 1e-12);
        assert!((kernel.row_scale(64.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn cauchy_weight_is_monotone() {
        let kernel = RobustKernel::Cauchy { c: 1.5 };
        let weights: Vec<Real> = [0.0, 0.5, 2.0, 10.0, 100.0]
            .iter()
            .map(|r: &Real| kernel.rho_and_weight(r * r).1)
            .collect();
        assert_eq!(weights[0], 1.0);
        assert!(
            weights.windows(2).all(|w| w[1] < w[0]),
            "weights should shrink with the residual: {weights:?}"
        );
    }

    #[test]
    fn invalid_parameters_are_detected() {
        assert!(RobustKernel::Huber { delta: 1.0 }.is_valid());
        assert!(!RobustKernel::Huber { delta: 0.0 }.is_valid());
        assert!(!RobustKernel::Cauchy { c: Real::NAN }.is_valid());
    }

    #[test]
    fn kernel_json_is_tagged() {
        let json = serde_json::to_string(&RobustKernel::Huber { delta: 1.5 }).unwrap();
        assert_eq!(json, r#"{"type":"huber","delta":1.5}"#);
        let back: RobustKernel = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(back, RobustKernel::None);
    }
}
