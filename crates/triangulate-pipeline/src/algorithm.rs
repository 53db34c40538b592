use triangulate_core::{CameraMap, LandmarkMap, TrackSet};

use crate::{Configurable, InputCollection, TriangulateError, TriangulationOutcome};

/// A landmark triangulation strategy.
///
/// Inputs are optional so that a host passing an absent collection gets
/// [`TriangulateError::MissingInput`] instead of an empty result.
pub trait TriangulateLandmarks: Configurable + Send + Sync {
    /// Registry name of the implementation.
    fn impl_name(&self) -> &'static str;

    /// Refined landmarks plus the reasons for every landmark left out.
    fn triangulate_with_report(
        &self,
        cameras: Option<&CameraMap>,
        tracks: Option<&TrackSet>,
        landmarks: Option<&LandmarkMap>,
    ) -> Result<TriangulationOutcome, TriangulateError>;

    /// Refined landmarks only. The result is a new collection whose ids are a
    /// subset of the input landmark ids that also have a track.
    fn triangulate(
        &self,
        cameras: Option<&CameraMap>,
        tracks: Option<&TrackSet>,
        landmarks: Option<&LandmarkMap>,
    ) -> Result<LandmarkMap, TriangulateError> {
        self.triangulate_with_report(cameras, tracks, landmarks)
            .map(|outcome| outcome.landmarks)
    }

    /// Independent copy with the same configuration.
    fn clone_box(&self) -> Box<dyn TriangulateLandmarks>;
}

impl Clone for Box<dyn TriangulateLandmarks> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

pub(crate) fn require_inputs<'a>(
    cameras: Option<&'a CameraMap>,
    tracks: Option<&'a TrackSet>,
    landmarks: Option<&'a LandmarkMap>,
) -> Result<(&'a CameraMap, &'a TrackSet, &'a LandmarkMap), TriangulateError> {
    let cameras = cameras.ok_or(TriangulateError::MissingInput(InputCollection::Cameras))?;
    let tracks = tracks.ok_or(TriangulateError::MissingInput(InputCollection::Tracks))?;
    let landmarks =
        landmarks.ok_or(TriangulateError::MissingInput(InputCollection::Landmarks))?;
    Ok((cameras, tracks, landmarks))
}
