//! Triangulation strategy with tunable solver, view threshold and outlier cutoff.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use triangulate_core::{CameraMap, LandmarkMap, Real, TrackSet};
use triangulate_optim::{LinearPointSolver, RefinedPointSolver, RobustKernel, SolveOptions};

use crate::algorithm::require_inputs;
use crate::{
    run_triangulation, ConfigBlock, ConfigError, Configurable, EngineSettings, ExecutionMode,
    TriangulateError, TriangulateLandmarks, TriangulationOutcome, MIN_TRIANGULATION_VIEWS,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethod {
    /// Closed-form DLT only.
    Linear,
    /// DLT start refined by Levenberg-Marquardt.
    #[default]
    Refined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulatorConfig {
    pub method: SolverMethod,
    /// Iteration cap for the refined method.
    pub max_iters: usize,
    pub robust_kernel: RobustKernel,
    /// Minimum number of valid views, at least 2.
    pub min_views: usize,
    /// Drop landmarks whose RMS reprojection error exceeds this (pixels).
    pub max_reprojection_error: Option<Real>,
    pub parallel: bool,
}

impl Default for TriangulatorConfig {
    fn default() -> Self {
        Self {
            method: SolverMethod::Refined,
            max_iters: SolveOptions::default().max_iters,
            robust_kernel: RobustKernel::None,
            min_views: MIN_TRIANGULATION_VIEWS,
            max_reprojection_error: None,
            parallel: true,
        }
    }
}

const DESCRIPTIONS: [(&str, &str); 6] = [
    ("method", "\"linear\" (DLT only) or \"refined\" (DLT + Levenberg-Marquardt)"),
    ("max_iters", "iteration cap of the refined method"),
    ("robust_kernel", "IRLS kernel of the refined method, e.g. {\"type\":\"huber\",\"delta\":2.0}"),
    ("min_views", "minimum number of valid views per landmark (>= 2)"),
    ("max_reprojection_error", "drop landmarks above this RMS error in pixels (null: keep all)"),
    ("parallel", "process landmarks on the rayon thread pool"),
];

impl TriangulatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_views < MIN_TRIANGULATION_VIEWS {
            return Err(ConfigError::Rejected(format!(
                "min_views must be at least {MIN_TRIANGULATION_VIEWS}, got {}",
                self.min_views
            )));
        }
        if self.max_iters == 0 {
            return Err(ConfigError::Rejected("max_iters must be positive".into()));
        }
        if !self.robust_kernel.is_valid() {
            return Err(ConfigError::Rejected(format!(
                "invalid robust kernel {:?}",
                self.robust_kernel
            )));
        }
        if let Some(limit) = self.max_reprojection_error {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(ConfigError::Rejected(format!(
                    "max_reprojection_error must be positive, got {limit}"
                )));
            }
        }
        Ok(())
    }

    /// Current config with the entries of `block` applied, validated.
    pub fn patched(&self, block: &ConfigBlock) -> Result<Self, ConfigError> {
        let mut json = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                return Err(ConfigError::Rejected("config is not a JSON object".into()))
            }
        };
        for (key, value) in block.iter() {
            let slot = json
                .get_mut(key)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_owned()))?;
            *slot = value.clone();
        }
        let patched: Self = serde_json::from_value(Value::Object(json)).map_err(|e| {
            ConfigError::InvalidValue {
                key: block.keys().collect::<Vec<_>>().join(", "),
                message: e.to_string(),
            }
        })?;
        patched.validate()?;
        Ok(patched)
    }

    fn settings(&self) -> EngineSettings {
        EngineSettings {
            min_views: self.min_views,
            max_reprojection_error: self.max_reprojection_error,
            mode: if self.parallel {
                ExecutionMode::Parallel
            } else {
                ExecutionMode::Sequential
            },
        }
    }
}

/// Multi-view triangulation whose behavior is set through a [`ConfigBlock`].
///
/// With the default configuration it behaves exactly like
/// [`MultiViewTriangulator`](crate::MultiViewTriangulator).
#[derive(Debug, Clone, Default)]
pub struct ConfigurableTriangulator {
    config: TriangulatorConfig,
}

impl ConfigurableTriangulator {
    pub const NAME: &'static str = "configurable";

    pub fn new(config: TriangulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TriangulatorConfig {
        &self.config
    }
}

impl Configurable for ConfigurableTriangulator {
    fn get_configuration(&self) -> ConfigBlock {
        let mut block = ConfigBlock::new();
        if let Ok(Value::Object(map)) = serde_json::to_value(&self.config) {
            for (key, value) in map {
                block.set_raw(key, value);
            }
        }
        for (key, text) in DESCRIPTIONS {
            block.set_description(key, text);
        }
        block
    }

    fn set_configuration(&mut self, config: &ConfigBlock) -> Result<(), ConfigError> {
        self.config = self.config.patched(config)?;
        Ok(())
    }

    fn check_configuration(&self, config: &ConfigBlock) -> bool {
        self.config.patched(config).is_ok()
    }
}

impl TriangulateLandmarks for ConfigurableTriangulator {
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
        let settings = self.config.settings();
        let outcome = match self.config.method {
            SolverMethod::Linear => {
                run_triangulation(&LinearPointSolver, &settings, cameras, tracks, landmarks)
            }
            SolverMethod::Refined => {
                let options = SolveOptions {
                    max_iters: self.config.max_iters,
                    ..SolveOptions::default()
                };
                let solver = RefinedPointSolver::new(options, self.config.robust_kernel);
                run_triangulation(&solver, &settings, cameras, tracks, landmarks)
            }
        };
        Ok(outcome)
    }

    fn clone_box(&self) -> Box<dyn TriangulateLandmarks> {
        Box::new(self.clone())
    }
}
