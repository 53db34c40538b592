use triangulate_core::{CameraMap, LandmarkMap, TrackSet};
use triangulate_optim::RefinedPointSolver;

use crate::algorithm::require_inputs;
use crate::{
    run_triangulation, ConfigBlock, ConfigError, Configurable, EngineSettings,
    TriangulateError, TriangulateLandmarks, TriangulationOutcome,
};

/// The base strategy: iterative multi-view triangulation with no tunables.
///
/// Each landmark with at least two views is refined from the better of the
/// linear estimate and its current position, and gets an isotropic covariance
/// from the RMS reprojection error.
#[derive(Debug, Clone, Default)]
pub struct MultiViewTriangulator {
    solver: RefinedPointSolver,
}

impl MultiViewTriangulator {
    pub const NAME: &'static str = "multiview";

    pub fn new() -> Self {
        Self::default()
    }
}

impl Configurable for MultiViewTriangulator {
    fn get_configuration(&self) -> ConfigBlock {
        ConfigBlock::new()
    }

    fn set_configuration(&mut self, _config: &ConfigBlock) -> Result<(), ConfigError> {
        Ok(())
    }

    fn check_configuration(&self, _config: &ConfigBlock) -> bool {
        true
    }
}

impl TriangulateLandmarks for MultiViewTriangulator {
    fn impl_name(&self) -> &'static str {
        Self::NAME
    }

    fn triangulate_with_report(
        &self,
        cameras: Option<&CameraMap>,
        tracks: Option<&TrackSet>,
        landmarks: Option<&LandmarkMap>,
    ) -> Result<TriangulationOutcome, TriangulateError> {
        let (cameras, tracks, landmarks) = require_inputs(cameras, tracks, landmarks)?;
        Ok(run_triangulation(
            &self.solver,
            &EngineSettings::default(),
            cameras,
            tracks,
            landmarks,
        ))
    }

    fn clone_box(&self) -> Box<dyn TriangulateLandmarks> {
        Box::new(self.clone())
    }
}
