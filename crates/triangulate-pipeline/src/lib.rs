//! Landmark triangulation over camera, track and landmark collections.
//!
//! For every input landmark the engine
//! 1. finds the track with the same id ([`ObservationIndex`]),
//! 2. pairs each track state that has a feature with the camera posed at that
//!    frame ([`CorrespondenceResolver`]),
//! 3. solves for the point when at least [`MIN_TRIANGULATION_VIEWS`] views
//!    survive (a [`PointSolver`](triangulate_optim::PointSolver)),
//! 4. builds a fresh landmark with an isotropic covariance from the RMS
//!    reprojection error ([`LandmarkAssembler`]).
//!
//! Landmarks that cannot be triangulated are left out of the result; the
//! reason is recorded in a [`TriangulationReport`].
//!
//! ```no_run
//! use triangulate_core::synthetic::{scene, SceneSpec};
//! use triangulate_pipeline::{MultiViewTriangulator, TriangulateLandmarks};
//! # fn main() -> anyhow::Result<()> {
//! let scene = scene::build(&SceneSpec::default())?;
//! let refined = MultiViewTriangulator::new().triangulate(
//!     Some(&scene.cameras),
//!     Some(&scene.tracks),
//!     Some(&scene.initial),
//! )?;
//! assert!(refined.len() <= scene.initial.len());
//! # Ok(())
//! # }
//! ```

mod algorithm;
mod assembler;
pub mod config;
mod configurable;
mod correspondence;
mod engine;
mod error;
mod index;
mod multiview;
mod registry;
mod report;
mod scene;

pub use algorithm::TriangulateLandmarks;
pub use assembler::LandmarkAssembler;
pub use config::{ConfigBlock, Configurable};
pub use configurable::{ConfigurableTriangulator, SolverMethod, TriangulatorConfig};
pub use correspondence::{CorrespondenceResolver, Observation, ResolvedObservations};
pub use engine::{run_triangulation, EngineSettings, ExecutionMode, MIN_TRIANGULATION_VIEWS};
pub use error::{ConfigError, InputCollection, TriangulateError};
pub use index::ObservationIndex;
pub use multiview::MultiViewTriangulator;
pub use registry::{available_triangulators, create_triangulator};
pub use report::{SkipReason, TriangulationOutcome, TriangulationReport};
pub use scene::SceneInput;
