//! Lookup of triangulation implementations by name.

use crate::{
    ConfigurableTriangulator, MultiViewTriangulator, TriangulateError, TriangulateLandmarks,
};

/// Names accepted by [`create_triangulator`].
pub fn available_triangulators() -> &'static [&'static str] {
    &[MultiViewTriangulator::NAME, ConfigurableTriangulator::NAME]
}

/// A fresh, default-configured instance of the named implementation.
pub fn create_triangulator(name: &str) -> Result<Box<dyn TriangulateLandmarks>, TriangulateError> {
    match name {
        MultiViewTriangulator::NAME => Ok(Box::new(MultiViewTriangulator::new())),
        ConfigurableTriangulator::NAME => Ok(Box::new(ConfigurableTriangulator::default())),
        _ => Err(TriangulateError::UnknownImplementation {
            name: name.to_owned(),
            available: available_triangulators().join(", "),
        }),
    }
}
