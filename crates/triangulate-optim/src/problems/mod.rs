//! Least-squares problems solved by the refinement backends.

pub mod point;

pub use point::PointReprojectionProblem;
