//! Bad pixel correction by neighborhood interpolation.
//!
//! Each bad pixel is replaced with the integer mean of its healthy
//! neighbors. Neighbors that are themselves bad never contribute, and all
//! means are taken from the uncorrected frame, so the result does not depend
//! on the order in which bad pixels are visited.

use badpix_core::{
    neighbors, BadPixelSet, Frame, Result, SensorConfig, SensorGeometry, DEFAULT_WINDOW_SIZE,
};
use rayon::prelude::*;
use std::ops::AddAssign;

/// Outcome of correcting one or more frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionSummary {
    /// Bad pixels replaced by an interpolated value.
    pub corrected: usize,
    /// Bad pixels with no healthy neighbor, set to 0.
    pub without_neighbors: usize,
    /// Bad pixel indices outside the frame, left untouched.
    pub skipped: usize,
}

impl AddAssign for CorrectionSummary {
    fn add_assign(&mut self, other: Self) {
        self.corrected += other.corrected;
        self.without_neighbors += other.without_neighbors;
        self.skipped += other.skipped;
    }
}

/// Replaces bad pixel values with the mean of their healthy neighbors.
pub struct BadPixelCorrector {
    geometry: SensorGeometry,
    window_size: usize,
}

impl BadPixelCorrector {
    /// Create a corrector using the default 3x3 window.
    pub fn new(geometry: SensorGeometry) -> Self {
        Self {
            geometry,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Create a corrector from a sensor configuration.
    pub fn from_sensor(sensor: &SensorConfig) -> Self {
        Self::new(sensor.geometry).with_window_size(sensor.window_size)
    }

    /// Set the interpolation window size.
    #[must_use]
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Get window size.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Corrects `frame` in place.
    ///
    /// Bad pixels with every neighbor bad (or off-grid) are set to 0 and
    /// counted in [`CorrectionSummary::without_neighbors`].
    ///
    /// # Errors
    /// Returns an error if the frame does not match the geometry or the
    /// window size is invalid.
    pub fn correct(
        &self,
        bad_pixels: &BadPixelSet,
        frame: &mut Frame,
    ) -> Result<CorrectionSummary> {
        frame.check_geometry(&self.geometry)?;

        let mut summary = CorrectionSummary::default();
        let mut replacements = Vec::with_capacity(bad_pixels.len());
        {
            let snapshot = frame.as_slice();
            for pixel in bad_pixels {
                if !self.geometry.contains(pixel) {
                    summary.skipped += 1;
                    continue;
                }

                let healthy: Vec<usize> = neighbors(&self.geometry, pixel, self.window_size)?
                    .into_iter()
                    .filter(|&neighbor| !bad_pixels.contains(neighbor))
                    .collect();

                let value = if healthy.is_empty() {
                    summary.without_neighbors += 1;
                    log::warn!("Bad pixel {pixel} has no healthy neighbors, setting it to 0");
                    0
                } else {
                    summary.corrected += 1;
                    mean(healthy.iter().map(|&neighbor| snapshot[neighbor]))
                };
                replacements.push((pixel, value));
            }
        }

        let samples = frame.as_mut_slice();
        for (pixel, value) in replacements {
            samples[pixel] = value;
        }

        if summary.skipped > 0 {
            log::debug!(
                "{} bad pixels outside the {}x{} grid were skipped",
                summary.skipped,
                self.geometry.rows,
                self.geometry.columns
            );
        }

        Ok(summary)
    }

    /// Corrects independent frames concurrently.
    ///
    /// # Errors
    /// Returns the first error encountered; frames already corrected stay
    /// corrected.
    pub fn correct_frames(
        &self,
        bad_pixels: &BadPixelSet,
        frames: &mut [Frame],
    ) -> Result<CorrectionSummary> {
        let summaries: Vec<CorrectionSummary> = frames
            .par_iter_mut()
            .map(|frame| self.correct(bad_pixels, frame))
            .collect::<Result<_>>()?;

        let mut total = CorrectionSummary::default();
        for summary in summaries {
            total += summary;
        }
        Ok(total)
    }
}

/// Integer mean truncated toward zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn mean(values: impl ExactSizeIterator<Item = i32>) -> i32 {
    let count = values.len() as i64;
    let total: i64 = values.map(i64::from).sum();
    // The mean of i32 samples is always within i32 range.
    (total / count) as i32
}
