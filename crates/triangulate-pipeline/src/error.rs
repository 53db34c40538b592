use std::fmt;
use thiserror::Error;

/// The three read-only inputs of a triangulation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCollection {
    Cameras,
    Tracks,
    Landmarks,
}

impl fmt::Display for InputCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputCollection::Cameras => "cameras",
            InputCollection::Tracks => "tracks",
            InputCollection::Landmarks => "landmarks",
        })
    }
}

/// Batch-level failures. Per-landmark problems are reported as
/// [`SkipReason`](crate::SkipReason)s instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TriangulateError {
    #[error("invalid input: the {0} collection is missing")]
    MissingInput(InputCollection),
    #[error("unknown triangulation implementation {name:?} (available: {available})")]
    UnknownImplementation { name: String, available: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown configuration key {0:?}")]
    UnknownKey(String),
    #[error("invalid value for {key:?}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("configuration rejected: {0}")]
    Rejected(String),
}
