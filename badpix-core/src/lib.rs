//! badpix-core: Core types for bad pixel handling on imaging sensors.
//!
//! This crate provides the sensor geometry, frame buffers, per-sector
//! thresholds, pixel neighborhoods and the bad pixel collections shared by
//! detection, correction and persistence.
//!

pub mod bad_pixels;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod neighborhood;
pub mod threshold;

pub use bad_pixels::{BadPixelSet, DetectionStatistics, FrequencyMap};
pub use config::SensorConfig;
pub use error::{Error, Result};
pub use frame::{AcquisitionParams, Frame, FrameSource, PedestalSource};
pub use geometry::{PixelCoord, SensorGeometry};
pub use neighborhood::{neighbors, DEFAULT_WINDOW_SIZE};
pub use threshold::SectorThresholds;
