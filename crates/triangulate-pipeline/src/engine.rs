//! Per-landmark triangulation over the whole landmark collection.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use triangulate_core::{CameraMap, Landmark, LandmarkId, LandmarkMap, Real, TrackSet};
use triangulate_optim::PointSolver;

use crate::{
    CorrespondenceResolver, LandmarkAssembler, ObservationIndex, SkipReason,
    TriangulationOutcome, TriangulationReport,
};

/// A landmark needs more than one view to be triangulated.
pub const MIN_TRIANGULATION_VIEWS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Sequential,
    #[default]
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Minimum number of valid views; values below [`MIN_TRIANGULATION_VIEWS`] are raised to it.
    pub min_views: usize,
    /// Drop landmarks whose RMS reprojection error exceeds this many pixels.
    pub max_reprojection_error: Option<Real>,
    pub mode: ExecutionMode,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_views: MIN_TRIANGULATION_VIEWS,
            max_reprojection_error: None,
            mode: ExecutionMode::Parallel,
        }
    }
}

/// Triangulate every landmark of `landmarks` that has enough views.
///
/// Inputs are only read. Landmarks are independent, so the parallel mode
/// processes them on the rayon pool; results are gathered in id order and
/// both modes produce identical output.
pub fn run_triangulation<S: PointSolver + Sync>(
    solver: &S,
    settings: &EngineSettings,
    cameras: &CameraMap,
    tracks: &TrackSet,
    landmarks: &LandmarkMap,
) -> TriangulationOutcome {
    let index = ObservationIndex::build(cameras, tracks);
    let resolver = CorrespondenceResolver::new(&index);
    let min_views = settings.min_views.max(MIN_TRIANGULATION_VIEWS);

    let work = |(&id, landmark): (&LandmarkId, &Landmark)| {
        let result = triangulate_landmark(solver, &resolver, settings, min_views, id, landmark);
        (id, result)
    };
    let results: Vec<(LandmarkId, Result<Landmark, SkipReason>)> = match settings.mode {
        ExecutionMode::Sequential => landmarks.iter().map(work).collect(),
        ExecutionMode::Parallel => {
            let entries: Vec<_> = landmarks.iter().collect();
            entries.into_par_iter().map(work).collect()
        }
    };

    let mut report = TriangulationReport {
        input_landmarks: landmarks.len(),
        ..Default::default()
    };
    let mut produced = Vec::with_capacity(results.len());
    for (id, result) in results {
        match result {
            Ok(landmark) => produced.push((id, landmark)),
            Err(reason) => {
                debug!("landmark {id} skipped: {reason}");
                report.skipped.insert(id, reason);
            }
        }
    }
    report.triangulated = produced.len();

    info!(
        "triangulated {} of {} landmarks ({} skipped, {} cameras, {} tracks)",
        report.triangulated,
        report.input_landmarks,
        report.num_skipped(),
        index.num_cameras(),
        index.num_tracks()
    );

    TriangulationOutcome {
        landmarks: LandmarkAssembler::collect(produced),
        report,
    }
}

fn triangulate_landmark<S: PointSolver>(
    solver: &S,
    resolver: &CorrespondenceResolver<'_, '_>,
    settings: &EngineSettings,
    min_views: usize,
    id: LandmarkId,
    landmark: &Landmark,
) -> Result<Landmark, SkipReason> {
    let resolved = resolver.resolve(id).ok_or(SkipReason::NoTrack)?;
    if resolved.len() < min_views {
        return Err(SkipReason::TooFewViews {
            valid: resolved.len(),
            missing_feature: resolved.missing_feature,
            missing_camera: resolved.missing_camera,
        });
    }

    let cameras = resolved.cameras();
    let pixels = resolved.pixels();
    let estimate = solver
        .solve(&cameras, &pixels, &landmark.loc)
        .map_err(|e| SkipReason::SolverFailure {
            message: e.to_string(),
        })?;

    if let Some(limit) = settings.max_reprojection_error {
        if estimate.rms_error > limit {
            return Err(SkipReason::ResidualTooLarge {
                rms_error: estimate.rms_error,
                limit,
            });
        }
    }

    Ok(LandmarkAssembler::assemble(&estimate, resolved.len()))
}
