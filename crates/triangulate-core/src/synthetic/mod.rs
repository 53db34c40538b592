//! Deterministic synthetic scenes.
//!
//! Building blocks for constructing triangulation problems with known
//! ground truth:
//! - camera arcs looking at a common target,
//! - seeded point clouds,
//! - projection of points into per-landmark tracks, with optional pixel noise
//!   and dropped detections,
//! - perturbed initial landmark guesses.
//!
//! Everything is seeded explicitly and iterates in a stable order.
//!
//! # Example
//!
//! ```
//! use triangulate_core::synthetic::{scene, SceneSpec};
//!
//! let s = scene::build(&SceneSpec::default()).unwrap();
//! assert_eq!(s.cameras.len(), SceneSpec::default().num_cameras);
//! assert_eq!(s.tracks.len(), s.ground_truth.len());
//! ```

pub mod noise;
pub mod scene;

pub use noise::UniformPixelNoise;
pub use scene::{SceneSpec, SyntheticScene};
