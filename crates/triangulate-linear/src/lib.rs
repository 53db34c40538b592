//! Linear multi-view triangulation.
//!
//! Closed-form DLT solvers used on their own or to seed the iterative
//! refinement in `triangulate-optim`.

mod triangulation;

pub use triangulation::*;
