//! Sensor configuration loaded from JSON.
//!
//! ```json
//! {
//!   "sensor": {
//!     "geometry": { "rows": 512, "columns": 512, "sector_width": 64 },
//!     "thresholds": [ { "sector": 0, "threshold": 120 } ],
//!     "default_threshold": 100,
//!     "window_size": 3
//!   }
//! }
//! ```
//!
//! Every field is optional. [`SensorConfig::from_file`] additionally requires
//! the resulting threshold table to cover every sector of the geometry;
//! [`SensorConfig::layout_from_file`] does not, for uses that never read a
//! threshold.

use crate::neighborhood::DEFAULT_WINDOW_SIZE;
use crate::{Error, Result, SectorThresholds, SensorGeometry};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Geometry, thresholds and interpolation window of one sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorConfig {
    /// Pixel layout.
    pub geometry: SensorGeometry,
    /// Detection threshold per readout sector.
    pub thresholds: SectorThresholds,
    /// Neighborhood window used when correcting bad pixels.
    pub window_size: usize,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::new(SensorGeometry::default())
    }
}

#[derive(Deserialize)]
struct JsonConfig {
    sensor: JsonSensor,
}

#[derive(Deserialize)]
#[serde(default)]
struct JsonSensor {
    geometry: SensorGeometry,
    thresholds: Vec<JsonThreshold>,
    default_threshold: Option<i32>,
    window_size: usize,
}

impl Default for JsonSensor {
    fn default() -> Self {
        Self {
            geometry: SensorGeometry::default(),
            thresholds: Vec::new(),
            default_threshold: None,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

#[derive(Deserialize)]
struct JsonThreshold {
    sector: usize,
    threshold: i32,
}

impl SensorConfig {
    /// Creates a configuration with no thresholds and the default window.
    #[must_use]
    pub fn new(geometry: SensorGeometry) -> Self {
        Self {
            geometry,
            thresholds: SectorThresholds::new(),
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Replaces the threshold table.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: SectorThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Uses one threshold for every sector.
    #[must_use]
    pub fn with_uniform_threshold(mut self, threshold: i32) -> Self {
        self.thresholds = SectorThresholds::uniform(&self.geometry, threshold);
        self
    }

    /// Sets the correction window size.
    #[must_use]
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if the file cannot be read or parsed, or
    /// any validation error from [`SensorConfig::validate`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::parse_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file, checking geometry and window size only.
    ///
    /// Thresholds may be missing or partial.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if the file cannot be read or parsed, or
    /// any error from [`SensorConfig::validate_layout`].
    pub fn layout_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::parse_file(path.as_ref())?;
        config.validate_layout()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::ConfigError(format!("cannot open {}: {e}", path.display())))?;
        let json_config: JsonConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::ConfigError(format!("cannot parse {}: {e}", path.display())))?;
        Self::from_json_config(json_config)
    }

    /// Parses and validates a configuration string.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] on malformed JSON, or any validation
    /// error from [`SensorConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let json_config: JsonConfig =
            serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))?;
        let config = Self::from_json_config(json_config)?;
        config.validate()?;
        Ok(config)
    }

    fn from_json_config(config: JsonConfig) -> Result<Self> {
        let sensor = config.sensor;
        let geometry = sensor.geometry;
        geometry.validate()?;

        let mut thresholds = match sensor.default_threshold {
            Some(threshold) => SectorThresholds::uniform(&geometry, threshold),
            None => SectorThresholds::new(),
        };
        for entry in sensor.thresholds {
            if entry.sector >= geometry.sector_count() {
                return Err(Error::ConfigError(format!(
                    "threshold for sector {} but the sensor has {} sectors",
                    entry.sector,
                    geometry.sector_count()
                )));
            }
            thresholds.insert(entry.sector, entry.threshold);
        }

        Ok(Self {
            geometry,
            thresholds,
            window_size: sensor.window_size,
        })
    }

    /// Validates geometry, threshold coverage and window size.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.validate_layout()?;
        self.thresholds.validate_coverage(&self.geometry)
    }

    /// Validates geometry and window size, ignoring thresholds.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate_layout(&self) -> Result<()> {
        self.geometry.validate()?;
        if self.window_size == 0 || self.window_size % 2 == 0 {
            return Err(Error::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }
}
