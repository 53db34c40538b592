//! High-level entry crate for the `triangulate-rs` toolkit.
//!
//! Given posed cameras, feature tracks and initial landmark positions, the
//! toolkit re-estimates every landmark seen in at least two views and attaches
//! an isotropic covariance derived from its RMS reprojection error.
//!
//! ```no_run
//! use triangulate::prelude::*;
//! use triangulate::core::synthetic::{scene, SceneSpec};
//!
//! # fn main() -> anyhow::Result<()> {
//! let scene = scene::build(&SceneSpec::default())?;
//!
//! let mut algo = create_triangulator("configurable")?;
//! let mut config = ConfigBlock::new();
//! config.set_value("min_views", 3)?;
//! algo.set_configuration(&config)?;
//!
//! let outcome = algo.triangulate_with_report(
//!     Some(&scene.cameras),
//!     Some(&scene.tracks),
//!     Some(&scene.initial),
//! )?;
//! println!(
//!     "{} triangulated, {} skipped",
//!     outcome.report.triangulated,
//!     outcome.report.num_skipped()
//! );
//! # Ok(())
//! # }
//! ```

/// Math aliases, camera models, tracks, landmarks and synthetic scenes.
pub mod core {
    pub use triangulate_core::*;
}

/// Closed-form DLT triangulation.
pub mod linear {
    pub use triangulate_linear::*;
}

/// Least-squares backends, robust kernels and point solvers.
pub mod optim {
    pub use triangulate_optim::*;
}

/// The landmark triangulation engine and its configurable strategies.
pub mod pipeline {
    pub use triangulate_pipeline::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use triangulate::prelude::*;`.
pub mod prelude {
    pub use triangulate_core::{
        CameraMap, Covariance3, Landmark, LandmarkMap, PerspectiveCamera, ProjectiveCamera, Pt2,
        Pt3, Real, Track, TrackSet, TrackState,
    };
    pub use triangulate_optim::{
        LinearPointSolver, PointEstimate, PointSolver, RefinedPointSolver, RobustKernel,
    };
    pub use triangulate_pipeline::{
        available_triangulators, create_triangulator, ConfigBlock, Configurable,
        ConfigurableTriangulator, MultiViewTriangulator, SceneInput, SkipReason,
        TriangulateError, TriangulateLandmarks, TriangulationOutcome, TriangulationReport,
    };
}
