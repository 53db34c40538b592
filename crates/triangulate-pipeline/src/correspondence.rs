//! Pairing a landmark's track history with the cameras that observed it.

use crate::ObservationIndex;
use triangulate_core::{FrameId, LandmarkId, PerspectiveCamera, Pt2};

/// One view of a landmark: the camera at a frame and the feature it saw.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub frame_id: FrameId,
    pub camera: &'a PerspectiveCamera,
    pub pixel: Pt2,
}

/// Valid views of one landmark, in track order, plus what was discarded.
#[derive(Debug, Clone, Default)]
pub struct ResolvedObservations<'a> {
    pub observations: Vec<Observation<'a>>,
    /// Track states without a feature location.
    pub missing_feature: usize,
    /// Track states with a feature but no camera at their frame.
    pub missing_camera: usize,
}

impl<'a> ResolvedObservations<'a> {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn cameras(&self) -> Vec<&'a PerspectiveCamera> {
        self.observations.iter().map(|o| o.camera).collect()
    }

    pub fn pixels(&self) -> Vec<Pt2> {
        self.observations.iter().map(|o| o.pixel).collect()
    }

    pub fn frame_ids(&self) -> Vec<FrameId> {
        self.observations.iter().map(|o| o.frame_id).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CorrespondenceResolver<'i, 'a> {
    index: &'i ObservationIndex<'a>,
}

impl<'i, 'a> CorrespondenceResolver<'i, 'a> {
    pub fn new(index: &'i ObservationIndex<'a>) -> Self {
        Self { index }
    }

    /// Views of `landmark_id`, or `None` when no track shares its id.
    pub fn resolve(&self, landmark_id: LandmarkId) -> Option<ResolvedObservations<'a>> {
        let track = self.index.track(landmark_id)?;
        let mut resolved = ResolvedObservations {
            observations: Vec::with_capacity(track.len()),
            ..Default::default()
        };

        for state in track.history() {
            let Some(feature) = state.feature else {
                resolved.missing_feature += 1;
                continue;
            };
            let Some(camera) = self.index.camera(state.frame_id) else {
                resolved.missing_camera += 1;
                continue;
            };
            resolved.observations.push(Observation {
                frame_id: state.frame_id,
                camera,
                pixel: feature.loc,
            });
        }
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triangulate_core::synthetic::scene::arc_cameras;
    use triangulate_core::{CameraMap, FxFyCxCySkew, Track, TrackSet, TrackState};

    fn cameras(frames: &[FrameId]) -> CameraMap {
        let k = FxFyCxCySkew {
            fx: 500.0,
            fy: 500.0,
            cx: 320.0,
            cy: 240.0,
            skew: 0.0,
        };
        let all = arc_cameras(8, 4.0, 0.8, k);
        frames
            .iter()
            .filter_map(|f| all.get(*f).map(|c| (*f, c.clone())))
            .collect()
    }

    #[test]
    fn pairs_only_states_with_feature_and_camera() {
        let cams = cameras(&[0, 2, 3]);
        let track = Track::from_states(
            7,
            vec![
                TrackState::new(0, Pt2::new(10.0, 20.0)),
                TrackState::new(1, Pt2::new(11.0, 21.0)),
                TrackState::missing(2),
                TrackState::new(3, Pt2::new(13.0, 23.0)),
            ],
        )
        .unwrap();
        let tracks = TrackSet::new(vec![track]);
        let index = ObservationIndex::build(&cams, &tracks);

        let resolved = CorrespondenceResolver::new(&index).resolve(7).unwrap();
        assert_eq!(resolved.frame_ids(), vec![0, 3]);
        assert_eq!(resolved.pixels()[1], Pt2::new(13.0, 23.0));
        assert_eq!(resolved.missing_feature, 1);
        assert_eq!(resolved.missing_camera, 1);
        assert!(std::ptr::eq(resolved.cameras()[0], cams.get(0).unwrap()));
    }

    #[test]
    fn unknown_landmark_has_no_observations() {
        let cams = cameras(&[0, 1]);
        let tracks = TrackSet::new(vec![Track::new(1)]);
        let index = ObservationIndex::build(&cams, &tracks);
        let resolver = CorrespondenceResolver::new(&index);

        assert!(resolver.resolve(2).is_none());
        let empty = resolver.resolve(1).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.missing_feature + empty.missing_camera, 0);
    }
}
