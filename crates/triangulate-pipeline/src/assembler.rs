//! Turning point estimates into output landmarks.

use triangulate_core::{Covariance3, Landmark, LandmarkId, LandmarkMap};
use triangulate_optim::PointEstimate;

/// Builds new landmarks from solver output; input landmarks are never touched.
#[derive(Debug, Default, Clone, Copy)]
pub struct LandmarkAssembler;

impl LandmarkAssembler {
    /// Landmark at the estimated point with covariance `rms_error² · I`.
    pub fn assemble(estimate: &PointEstimate, num_views: usize) -> Landmark {
        Landmark::with_covariance(
            estimate.point,
            Covariance3::isotropic(estimate.rms_error),
            u32::try_from(num_views).unwrap_or(u32::MAX),
        )
    }

    pub fn collect<I>(landmarks: I) -> LandmarkMap
    where
        I: IntoIterator<Item = (LandmarkId, Landmark)>,
    {
        landmarks.into_iter().collect()
    }
}
