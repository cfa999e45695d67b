//! Dark-frame bad pixel detection.
//!
//! Each frame of a dark acquisition is compared pixel by pixel against the
//! pedestal. A pixel whose deviation exceeds the threshold of its readout
//! sector is counted; the count over all frames is its frequency.

use badpix_core::{
    AcquisitionParams, Error, Frame, FrameSource, FrequencyMap, Result, SectorThresholds,
    SensorConfig, SensorGeometry,
};
use rayon::prelude::*;

/// Detection configuration.
#[derive(Clone, Debug)]
pub struct DetectionConfig {
    /// Compare pixels of a frame in parallel.
    pub parallel: bool,
    /// Minimum frequency for a pixel to be reported as bad.
    pub min_frequency: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_frequency: 1,
        }
    }
}

/// Detects bad pixels by per-sector thresholding of dark frames.
pub struct BadPixelDetector {
    geometry: SensorGeometry,
    thresholds: SectorThresholds,
    config: DetectionConfig,
}

impl BadPixelDetector {
    /// Create a detector for `geometry` with the given sector thresholds.
    pub fn new(geometry: SensorGeometry, thresholds: SectorThresholds) -> Self {
        Self {
            geometry,
            thresholds,
            config: DetectionConfig::default(),
        }
    }

    /// Create a detector from a sensor configuration.
    pub fn from_sensor(sensor: &SensorConfig) -> Self {
        Self::new(sensor.geometry, sensor.thresholds.clone())
    }

    /// Replace the detection configuration.
    #[must_use]
    pub fn with_config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Detection configuration in use.
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Scans frames `params.min_frame..=params.max_frame` and counts, per
    /// pixel, the frames where `|frame - pedestal|` exceeds the threshold.
    ///
    /// Thresholds are checked for full sector coverage before any frame is
    /// requested. A frame that cannot be retrieved aborts the scan; no
    /// partial map is returned.
    ///
    /// # Errors
    /// - [`Error::MissingThreshold`] if a sector has no threshold.
    /// - [`Error::FrameSizeMismatch`] if the pedestal or a frame does not
    ///   match the geometry.
    /// - any error from the frame source, typically [`Error::Acquisition`].
    pub fn detect<S>(
        &self,
        source: &S,
        params: &AcquisitionParams,
        pedestal: &Frame,
    ) -> Result<FrequencyMap>
    where
        S: FrameSource + ?Sized,
    {
        self.geometry.validate()?;
        self.thresholds.validate_coverage(&self.geometry)?;
        pedestal.check_geometry(&self.geometry)?;

        let column_thresholds = self.thresholds.per_column(&self.geometry)?;
        let mut frequencies = FrequencyMap::new();

        log::info!(
            "Scanning frames {}..={} at {} for bad pixels",
            params.min_frame,
            params.max_frame,
            params.location
        );

        for index in params.frames() {
            let frame = source.frame(&params.location, index)?;
            if let Err(e) = frame.check_geometry(&self.geometry) {
                return Err(Error::Acquisition {
                    frame: index,
                    message: e.to_string(),
                });
            }

            let flagged = self.flagged_pixels(&frame, pedestal, &column_thresholds);
            log::debug!("Frame {index}: {} pixels above threshold", flagged.len());

            for pixel in flagged {
                frequencies.increment(pixel);
            }
            frequencies.record_frame();
        }

        let stats = frequencies.statistics();
        log::info!(
            "Scanned {} frames: {} pixels flagged, max frequency {}",
            stats.frames_scanned,
            stats.flagged_pixels,
            stats.max_count
        );

        Ok(frequencies)
    }

    /// Pixels of one frame exceeding their sector threshold, ascending.
    fn flagged_pixels(
        &self,
        frame: &Frame,
        pedestal: &Frame,
        column_thresholds: &[i32],
    ) -> Vec<usize> {
        let columns = self.geometry.columns;
        let samples = frame.as_slice();
        let baseline = pedestal.as_slice();
        let exceeds = |pixel: usize| {
            let delta = i64::from(samples[pixel]) - i64::from(baseline[pixel]);
            delta.abs() > i64::from(column_thresholds[pixel % columns])
        };

        if self.config.parallel {
            (0..samples.len())
                .into_par_iter()
                .filter(|&pixel| exceeds(pixel))
                .collect()
        } else {
            (0..samples.len()).filter(|&pixel| exceeds(pixel)).collect()
        }
    }
}
