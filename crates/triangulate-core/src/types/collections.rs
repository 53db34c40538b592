//! Id-keyed collections passed into and out of the triangulation engine.
//!
//! Cameras and landmarks are ordered maps so that iteration (and therefore
//! any output built from it) is deterministic.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{FrameId, Landmark, LandmarkId, Track, TrackId};
use crate::PerspectiveCamera;

/// Cameras keyed by the frame they were posed at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraMap {
    cameras: BTreeMap<FrameId, PerspectiveCamera>,
}

impl CameraMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a camera, returning the one previously posed at `frame_id`.
    pub fn insert(
        &mut self,
        frame_id: FrameId,
        camera: PerspectiveCamera,
    ) -> Option<PerspectiveCamera> {
        self.cameras.insert(frame_id, camera)
    }

    pub fn get(&self, frame_id: FrameId) -> Option<&PerspectiveCamera> {
        self.cameras.get(&frame_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, FrameId, PerspectiveCamera> {
        self.cameras.iter()
    }

    pub fn frame_ids(&self) -> impl Iterator<Item = FrameId> + '_ {
        self.cameras.keys().copied()
    }

    pub fn into_inner(self) -> BTreeMap<FrameId, PerspectiveCamera> {
        self.cameras
    }
}

impl FromIterator<(FrameId, PerspectiveCamera)> for CameraMap {
    fn from_iter<I: IntoIterator<Item = (FrameId, PerspectiveCamera)>>(iter: I) -> Self {
        Self {
            cameras: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CameraMap {
    type Item = (&'a FrameId, &'a PerspectiveCamera);
    type IntoIter = btree_map::Iter<'a, FrameId, PerspectiveCamera>;

    fn into_iter(self) -> Self::IntoIter {
        self.cameras.iter()
    }
}

/// Landmarks keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkMap {
    landmarks: BTreeMap<LandmarkId, Landmark>,
}

impl LandmarkMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: LandmarkId, landmark: Landmark) -> Option<Landmark> {
        self.landmarks.insert(id, landmark)
    }

    pub fn get(&self, id: LandmarkId) -> Option<&Landmark> {
        self.landmarks.get(&id)
    }

    pub fn contains(&self, id: LandmarkId) -> bool {
        self.landmarks.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, LandmarkId, Landmark> {
        self.landmarks.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = LandmarkId> + '_ {
        self.landmarks.keys().copied()
    }

    pub fn into_inner(self) -> BTreeMap<LandmarkId, Landmark> {
        self.landmarks
    }
}

impl FromIterator<(LandmarkId, Landmark)> for LandmarkMap {
    fn from_iter<I: IntoIterator<Item = (LandmarkId, Landmark)>>(iter: I) -> Self {
        Self {
            landmarks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LandmarkMap {
    type Item = (&'a LandmarkId, &'a Landmark);
    type IntoIter = btree_map::Iter<'a, LandmarkId, Landmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.landmarks.iter()
    }
}

/// Ordered list of tracks, each with a unique id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackSet {
    tracks: Vec<Track>,
}

impl TrackSet {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Linear lookup by id; build an index for repeated queries.
    pub fn get_track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    pub fn all_track_ids(&self) -> BTreeSet<TrackId> {
        self.tracks.iter().map(Track::id).collect()
    }

    /// Every frame touched by at least one track state.
    pub fn all_frame_ids(&self) -> BTreeSet<FrameId> {
        self.tracks
            .iter()
            .flat_map(|t| t.iter().map(|s| s.frame_id))
            .collect()
    }

    pub fn first_frame(&self) -> Option<FrameId> {
        self.tracks.iter().filter_map(Track::first_frame).min()
    }

    pub fn last_frame(&self) -> Option<FrameId> {
        self.tracks.iter().filter_map(Track::last_frame).max()
    }

    /// Tracks that have a state at `frame_id`.
    pub fn active_tracks(&self, frame_id: FrameId) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|t| t.find(frame_id).is_some())
            .collect()
    }
}

impl FromIterator<Track> for TrackSet {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TrackSet {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
