//! Core math, camera models and data model for `triangulate-rs`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Pt2`, `Pt3`, `Mat34`, ...),
//! - the projective camera capability ([`ProjectiveCamera`]) and a concrete
//!   posed pinhole camera ([`PerspectiveCamera`]),
//! - the track / landmark data model and the three id-keyed collections
//!   consumed by the triangulation engine ([`CameraMap`], [`TrackSet`],
//!   [`LandmarkMap`]),
//! - deterministic synthetic scene helpers for tests and benchmarks.
//!
//! Camera pipeline:
//! `pixel = K ∘ distortion ∘ pinhole(R · p_w + t)`

/// Linear algebra type aliases and helpers.
pub mod math;
/// Camera models and their projection stages.
pub mod models;
/// Deterministic synthetic scene generation helpers.
///
/// Used by workspace tests and the CLI smoke tests; not intended for
/// production data.
pub mod synthetic;
/// Tracks, landmarks, covariance and the input/output collections.
mod types;

pub use math::*;
pub use models::*;
pub use types::*;
