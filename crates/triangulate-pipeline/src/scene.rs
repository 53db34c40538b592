//! Serialized triangulation input.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use triangulate_core::synthetic::SyntheticScene;
use triangulate_core::{CameraMap, LandmarkMap, TrackSet};

use crate::{TriangulateError, TriangulateLandmarks, TriangulationOutcome};

/// Cameras, tracks and initial landmarks as stored on disk.
///
/// Each collection is optional; an absent one reaches the algorithm as
/// `None` and fails the call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cameras: Option<CameraMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<TrackSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<LandmarkMap>,
}

impl SceneInput {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn triangulate_with(
        &self,
        algorithm: &dyn TriangulateLandmarks,
    ) -> Result<TriangulationOutcome, TriangulateError> {
        algorithm.triangulate_with_report(
            self.cameras.as_ref(),
            self.tracks.as_ref(),
            self.landmarks.as_ref(),
        )
    }
}

impl From<SyntheticScene> for SceneInput {
    fn from(scene: SyntheticScene) -> Self {
        Self {
            cameras: Some(scene.cameras),
            tracks: Some(scene.tracks),
            landmarks: Some(scene.initial),
        }
    }
}
