//! Sensor grid geometry.
//!
//! Pixels are addressed by a single flat index in row-major order:
//! `row = index / columns`, `column = index % columns`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Row and column of a pixel on the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    /// Row (slow axis).
    pub row: usize,
    /// Column (fast axis).
    pub column: usize,
}

impl PixelCoord {
    /// Creates a new pixel coordinate.
    #[inline]
    #[must_use]
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Rectangular pixel layout of the sensor and its readout sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorGeometry {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
    /// Width in columns of one readout sector.
    pub sector_width: usize,
}

impl Default for SensorGeometry {
    fn default() -> Self {
        Self {
            rows: 512,
            columns: 512,
            sector_width: 64,
        }
    }
}

impl SensorGeometry {
    /// Creates a geometry, rejecting empty dimensions.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGeometry`] if any dimension is zero or the
    /// pixel count does not fit a stored index.
    pub fn new(rows: usize, columns: usize, sector_width: usize) -> Result<Self> {
        let geometry = Self {
            rows,
            columns,
            sector_width,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Checks that the geometry describes a usable grid.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGeometry`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(Error::InvalidGeometry(format!(
                "grid must be non-empty, got {}x{}",
                self.rows, self.columns
            )));
        }
        if self.sector_width == 0 {
            return Err(Error::InvalidGeometry(
                "sector width must be at least one column".to_string(),
            ));
        }
        // Stored indices are 4-byte signed integers.
        match self.rows.checked_mul(self.columns) {
            Some(len) if len <= i32::MAX as usize => Ok(()),
            _ => Err(Error::InvalidGeometry(format!(
                "{}x{} pixels exceed the addressable index range",
                self.rows, self.columns
            ))),
        }
    }

    /// Total number of pixels.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    /// Returns true if the grid has no pixels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `pixel` addresses a pixel of this grid.
    #[inline]
    #[must_use]
    pub fn contains(&self, pixel: usize) -> bool {
        pixel < self.len()
    }

    /// Splits a flat index into row and column.
    #[inline]
    #[must_use]
    pub fn coord(&self, pixel: usize) -> PixelCoord {
        PixelCoord::new(pixel / self.columns, pixel % self.columns)
    }

    /// Flat index of a row and column.
    #[inline]
    #[must_use]
    pub fn index(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    /// Readout sector a pixel belongs to.
    #[inline]
    #[must_use]
    pub fn sector_of(&self, pixel: usize) -> usize {
        (pixel % self.columns) / self.sector_width
    }

    /// Number of sectors spanned by the columns.
    #[must_use]
    pub fn sector_count(&self) -> usize {
        self.columns.div_ceil(self.sector_width)
    }
}
