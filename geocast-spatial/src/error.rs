//! Error types for the spatial index.

use thiserror::Error;

/// Result type for spatial operations.
pub type Result<T> = std::result::Result<T, SpatialError>;

/// Spatial index errors.
#[derive(Error, Debug)]
pub enum SpatialError {
    /// Latitude or longitude outside the canonical range.
    #[error("invalid coordinate: latitude {lat}, longitude {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Invalid covering configuration.
    #[error("invalid covering configuration: {0}")]
    Config(String),
}

impl SpatialError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        SpatialError::Config(msg.into())
    }
}
