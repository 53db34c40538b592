//! Id lookups built once per triangulation call.

use std::collections::HashMap;
use triangulate_core::{CameraMap, FrameId, PerspectiveCamera, Track, TrackId, TrackSet};

/// Frame id → camera and track id → track, borrowed from the inputs.
///
/// Built in one pass over each collection. Duplicate ids are not checked:
/// the last entry wins.
#[derive(Debug, Clone, Default)]
pub struct ObservationIndex<'a> {
    cameras: HashMap<FrameId, &'a PerspectiveCamera>,
    tracks: HashMap<TrackId, &'a Track>,
}

impl<'a> ObservationIndex<'a> {
    pub fn build(cameras: &'a CameraMap, tracks: &'a TrackSet) -> Self {
        Self {
            cameras: cameras.iter().map(|(&id, cam)| (id, cam)).collect(),
            tracks: tracks.iter().map(|t| (t.id(), t)).collect(),
        }
    }

    pub fn camera(&self, frame_id: FrameId) -> Option<&'a PerspectiveCamera> {
        self.cameras.get(&frame_id).copied()
    }

    pub fn track(&self, track_id: TrackId) -> Option<&'a Track> {
        self.tracks.get(&track_id).copied()
    }

    pub fn num_cameras(&self) -> usize {
        self.cameras.len()
    }

    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }
}
