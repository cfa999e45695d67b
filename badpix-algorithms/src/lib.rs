//! badpix-algorithms: Bad pixel detection and correction.
//!
//! This crate provides:
//! - **Detection** - per-sector thresholding of dark frames against a pedestal
//! - **Correction** - replacement of bad pixels by the mean of healthy neighbors
//!
#![warn(missing_docs)]

mod correction;
mod detection;
mod processing;

pub use correction::{BadPixelCorrector, CorrectionSummary};
pub use detection::{BadPixelDetector, DetectionConfig};
pub use processing::{correct, detect, DetectionOutcome};

// Re-export core types used in the public API
pub use badpix_core::{BadPixelSet, FrequencyMap};
