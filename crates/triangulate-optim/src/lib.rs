//! Non-linear refinement of triangulated points.
//!
//! The crate is split into reusable solver plumbing and the triangulation
//! problem built on it:
//!
//! - [`NllsProblem`] / [`NllsSolverBackend`]: dense least-squares problems and
//!   the backends that minimize them ([`LmBackend`] wraps
//!   `levenberg-marquardt`),
//! - [`RobustKernel`]: IRLS row weighting,
//! - [`PointReprojectionProblem`]: reprojection error of one 3D point seen by
//!   several cameras,
//! - [`PointSolver`]: the "triangulate(points, cameras, initial) → (point,
//!   error)" capability, with a closed-form ([`LinearPointSolver`]) and an
//!   iterative ([`RefinedPointSolver`]) implementation.

pub mod backend_lm;
pub mod problems;
pub mod robust;
mod solver;
mod traits;

pub use backend_lm::LmBackend;
pub use problems::PointReprojectionProblem;
pub use robust::RobustKernel;
pub use solver::*;
pub use traits::*;
