//! Per-call bookkeeping of which landmarks were left out and why.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use triangulate_core::{LandmarkId, LandmarkMap, Real};

/// Why a landmark is absent from the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// No track shares the landmark's id.
    NoTrack,
    /// Fewer valid views than the minimum.
    TooFewViews {
        valid: usize,
        missing_feature: usize,
        missing_camera: usize,
    },
    /// The point solver returned an error.
    SolverFailure { message: String },
    /// RMS reprojection error above the configured cutoff.
    ResidualTooLarge { rms_error: Real, limit: Real },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoTrack => write!(f, "no track with this id"),
            SkipReason::TooFewViews {
                valid,
                missing_feature,
                missing_camera,
            } => write!(
                f,
                "{valid} valid view(s) ({missing_feature} without feature, \
                 {missing_camera} without camera)"
            ),
            SkipReason::SolverFailure { message } => write!(f, "solver failed: {message}"),
            SkipReason::ResidualTooLarge { rms_error, limit } => {
                write!(f, "rms error {rms_error:.3} px exceeds {limit:.3} px")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangulationReport {
    pub input_landmarks: usize,
    pub triangulated: usize,
    pub skipped: BTreeMap<LandmarkId, SkipReason>,
}

impl TriangulationReport {
    pub fn num_skipped(&self) -> usize {
        self.skipped.len()
    }

    /// Number of skips whose reason satisfies `pred`.
    pub fn count_where(&self, pred: impl Fn(&SkipReason) -> bool) -> usize {
        self.skipped.values().filter(|r| pred(*r)).count()
    }
}

/// Refined landmarks together with the report of the call that produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangulationOutcome {
    pub landmarks: LandmarkMap,
    pub report: TriangulationReport,
}
