//! High-level helpers that run detection and correction from a sensor configuration.

use crate::{BadPixelCorrector, BadPixelDetector, CorrectionSummary, DetectionConfig};
use badpix_core::{
    AcquisitionParams, BadPixelSet, Frame, FrameSource, FrequencyMap, PedestalSource, Result,
    SensorConfig,
};

/// Result of a detection run.
#[derive(Debug, Clone, Default)]
pub struct DetectionOutcome {
    /// Exceedance count per flagged pixel.
    pub frequencies: FrequencyMap,
    /// Pixels whose count reached the configured minimum frequency.
    pub bad_pixels: BadPixelSet,
}

/// Detect bad pixels over the acquisition range of `params`.
///
/// The pedestal is requested once from `pedestal` before the scan starts.
///
/// # Errors
/// Returns any configuration, pedestal or acquisition error; no partial
/// outcome is returned.
pub fn detect<S, P>(
    source: &S,
    params: &AcquisitionParams,
    pedestal: &P,
    sensor: &SensorConfig,
    detection: &DetectionConfig,
) -> Result<DetectionOutcome>
where
    S: FrameSource + ?Sized,
    P: PedestalSource + ?Sized,
{
    // Fail on missing thresholds before touching the pedestal source.
    sensor.validate()?;
    let baseline = pedestal.values()?;

    let detector = BadPixelDetector::from_sensor(sensor).with_config(detection.clone());
    let frequencies = detector.detect(source, params, &baseline)?;
    let bad_pixels = frequencies.bad_pixels(detection.min_frequency);

    log::info!(
        "{} of {} flagged pixels reached frequency {}",
        bad_pixels.len(),
        frequencies.len(),
        detection.min_frequency
    );

    Ok(DetectionOutcome {
        frequencies,
        bad_pixels,
    })
}

/// Correct one frame in place using the sensor's geometry and window.
///
/// # Errors
/// Returns an error if the frame does not match the geometry.
pub fn correct(
    sensor: &SensorConfig,
    bad_pixels: &BadPixelSet,
    frame: &mut Frame,
) -> Result<CorrectionSummary> {
    BadPixelCorrector::from_sensor(sensor).correct(bad_pixels, frame)
}
