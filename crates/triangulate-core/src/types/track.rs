//! Feature tracks: per-frame observation histories of one physical point.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use super::{FrameId, TrackId};
use crate::Pt2;

/// A detected image feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Location in pixels.
    pub loc: Pt2,
}

impl Feature {
    pub fn new(loc: Pt2) -> Self {
        Self { loc }
    }
}

/// One frame's entry in a track.
///
/// `feature` is `None` when detection was attempted but failed at this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackState {
    pub frame_id: FrameId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<Feature>,
}

impl TrackState {
    pub fn new(frame_id: FrameId, loc: Pt2) -> Self {
        Self {
            frame_id,
            feature: Some(Feature::new(loc)),
        }
    }

    /// A state for a frame where the feature was not detected.
    pub fn missing(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            feature: None,
        }
    }
}

/// Frame-ordered history of a single tracked feature.
///
/// Frame ids are strictly increasing along `history`; deserialization
/// enforces the same rule as [`Track::from_states`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrackRepr")]
pub struct Track {
    id: TrackId,
    history: Vec<TrackState>,
}

#[derive(Deserialize)]
struct TrackRepr {
    id: TrackId,
    #[serde(default)]
    history: Vec<TrackState>,
}

impl TryFrom<TrackRepr> for Track {
    type Error = anyhow::Error;

    fn try_from(repr: TrackRepr) -> Result<Self> {
        Self::from_states(repr.id, repr.history)
    }
}

impl Track {
    pub fn new(id: TrackId) -> Self {
        Self {
            id,
            history: Vec::new(),
        }
    }

    /// Build a track from states.
    ///
    /// # Errors
    ///
    /// Returns an error if frame ids are not strictly increasing.
    pub fn from_states(id: TrackId, states: Vec<TrackState>) -> Result<Self> {
        for pair in states.windows(2) {
            ensure!(
                pair[0].frame_id < pair[1].frame_id,
                "track {}: frame ids must be strictly increasing ({} then {})",
                id,
                pair[0].frame_id,
                pair[1].frame_id
            );
        }
        Ok(Self {
            id,
            history: states,
        })
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    /// Append a state; rejected (returns `false`) unless it comes after the last frame.
    pub fn append(&mut self, state: TrackState) -> bool {
        if let Some(last) = self.history.last() {
            if state.frame_id <= last.frame_id {
                return false;
            }
        }
        self.history.push(state);
        true
    }

    pub fn history(&self) -> &[TrackState] {
        &self.history
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackState> {
        self.history.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn first_frame(&self) -> Option<FrameId> {
        self.history.first().map(|s| s.frame_id)
    }

    pub fn last_frame(&self) -> Option<FrameId> {
        self.history.last().map(|s| s.frame_id)
    }

    /// State recorded at `frame_id`, if any.
    pub fn find(&self, frame_id: FrameId) -> Option<&TrackState> {
        self.history
            .binary_search_by_key(&frame_id, |s| s.frame_id)
            .ok()
            .map(|idx| &self.history[idx])
    }

    pub fn all_frame_ids(&self) -> Vec<FrameId> {
        self.history.iter().map(|s| s.frame_id).collect()
    }
}
