//! Per-sector detection thresholds.

use crate::{Error, Result, SensorGeometry};
use std::collections::BTreeMap;

/// Detection threshold for each readout sector.
///
/// A pixel is flagged when `|sample - pedestal|` is strictly greater than the
/// threshold of its sector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorThresholds {
    thresholds: BTreeMap<usize, i32>,
}

impl SectorThresholds {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table assigning the same threshold to every sector of `geometry`.
    #[must_use]
    pub fn uniform(geometry: &SensorGeometry, threshold: i32) -> Self {
        (0..geometry.sector_count())
            .map(|sector| (sector, threshold))
            .collect()
    }

    /// Sets the threshold of a sector.
    #[must_use]
    pub fn with_threshold(mut self, sector: usize, threshold: i32) -> Self {
        self.insert(sector, threshold);
        self
    }

    /// Sets the threshold of a sector, returning the previous one.
    pub fn insert(&mut self, sector: usize, threshold: i32) -> Option<i32> {
        self.thresholds.insert(sector, threshold)
    }

    /// Threshold of `sector`.
    ///
    /// # Errors
    /// Returns [`Error::MissingThreshold`] if the sector has no entry.
    pub fn get(&self, sector: usize) -> Result<i32> {
        self.thresholds
            .get(&sector)
            .copied()
            .ok_or(Error::MissingThreshold { sector })
    }

    /// Number of configured sectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Returns true if no sector is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Iterates `(sector, threshold)` in ascending sector order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.thresholds
            .iter()
            .map(|(&sector, &threshold)| (sector, threshold))
    }

    /// Checks that every sector of `geometry` has a non-negative threshold.
    ///
    /// # Errors
    /// Returns [`Error::MissingThreshold`] for the first uncovered sector, or
    /// [`Error::ConfigError`] for a negative threshold.
    pub fn validate_coverage(&self, geometry: &SensorGeometry) -> Result<()> {
        for sector in 0..geometry.sector_count() {
            let threshold = self.get(sector)?;
            if threshold < 0 {
                return Err(Error::ConfigError(format!(
                    "sector {sector} has negative threshold {threshold}"
                )));
            }
        }
        Ok(())
    }

    /// Expands the table into one threshold per column of `geometry`.
    ///
    /// # Errors
    /// Returns [`Error::MissingThreshold`] if a column's sector has no entry.
    pub fn per_column(&self, geometry: &SensorGeometry) -> Result<Vec<i32>> {
        (0..geometry.columns)
            .map(|column| self.get(column / geometry.sector_width))
            .collect()
    }
}

impl FromIterator<(usize, i32)> for SectorThresholds {
    fn from_iter<I: IntoIterator<Item = (usize, i32)>>(iter: I) -> Self {
        Self {
            thresholds: iter.into_iter().collect(),
        }
    }
}
