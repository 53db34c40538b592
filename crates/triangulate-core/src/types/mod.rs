//! Data model shared by the triangulation engine and its callers.

mod collections;
mod landmark;
mod track;

pub use collections::*;
pub use landmark::*;
pub use track::*;

/// Identifier of a video/image frame; keys cameras and track states.
pub type FrameId = u64;
/// Identifier of a feature track.
pub type TrackId = u64;
/// Identifier of a landmark; equal to the id of the track it was built from.
pub type LandmarkId = TrackId;
