//! Error types for badpix-core.

use thiserror::Error;

/// Result type alias for badpix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for badpix operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Pixel index outside the sensor grid.
    #[error("pixel {pixel} is outside the sensor grid of {len} pixels")]
    PixelOutOfBounds { pixel: usize, len: usize },

    /// Neighborhood window that is not a positive odd size.
    #[error("invalid window size {0}: must be a positive odd number")]
    InvalidWindowSize(usize),

    /// The center pixel was missing from its own window.
    #[error("geometry invariant violated: pixel {pixel} not found in its own window")]
    GeometryInvariant { pixel: usize },

    /// No threshold configured for a sector the grid produces.
    #[error("no threshold configured for sector {sector}")]
    MissingThreshold { sector: usize },

    /// Frame buffer length does not match the sensor geometry.
    #[error("frame has {actual} samples, sensor geometry expects {expected}")]
    FrameSizeMismatch { expected: usize, actual: usize },

    /// Invalid sensor geometry.
    #[error("invalid sensor geometry: {0}")]
    InvalidGeometry(String),

    /// A frame could not be retrieved from the frame source.
    #[error("failed to acquire frame {frame}: {message}")]
    Acquisition { frame: u32, message: String },

    /// The pedestal baseline could not be produced.
    #[error("pedestal unavailable: {0}")]
    PedestalUnavailable(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
