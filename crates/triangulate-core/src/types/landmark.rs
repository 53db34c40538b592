//! 3D landmarks and their uncertainty.

use serde::{Deserialize, Serialize};

use crate::{Mat3, Pt3, Real};

/// Symmetric 3×3 position covariance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Covariance3(Mat3);

impl Covariance3 {
    /// Wrap a full covariance matrix, symmetrizing it.
    pub fn from_matrix(m: Mat3) -> Self {
        Self((m + m.transpose()) * 0.5)
    }

    /// Isotropic covariance `sigma² · I` for a standard deviation `sigma`.
    pub fn isotropic(sigma: Real) -> Self {
        Self(Mat3::identity() * (sigma * sigma))
    }

    pub fn matrix(&self) -> &Mat3 {
        &self.0
    }

    /// Returns true if the matrix is a multiple of the identity.
    pub fn is_isotropic(&self) -> bool {
        let d = self.0[(0, 0)];
        self.0 == Mat3::identity() * d
    }

    /// Standard deviation of an isotropic covariance, `None` otherwise.
    pub fn isotropic_sigma(&self) -> Option<Real> {
        self.is_isotropic().then(|| self.0[(0, 0)].sqrt())
    }
}

/// A 3D point estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Position in world coordinates.
    pub loc: Pt3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covar: Option<Covariance3>,
    /// Number of views used by the triangulation that produced this estimate.
    #[serde(default)]
    pub observations: u32,
}

impl Landmark {
    /// An initial guess with no uncertainty attached.
    pub fn new(loc: Pt3) -> Self {
        Self {
            loc,
            covar: None,
            observations: 0,
        }
    }

    pub fn with_covariance(loc: Pt3, covar: Covariance3, observations: u32) -> Self {
        Self {
            loc,
            covar: Some(covar),
            observations,
        }
    }
}
