//! Frame buffers and the acquisition collaborators that supply them.

use crate::{Error, Result, SensorGeometry};

/// One exposure: a signed sample per pixel in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    samples: Vec<i32>,
}

impl Frame {
    /// Wraps decoded samples.
    #[must_use]
    pub fn new(samples: Vec<i32>) -> Self {
        Self { samples }
    }

    /// Creates a frame of `len` zero samples.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            samples: vec![0; len],
        }
    }

    /// Creates a frame with every sample set to `value`.
    #[must_use]
    pub fn filled(len: usize, value: i32) -> Self {
        Self {
            samples: vec![value; len],
        }
    }

    /// Number of samples.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the frame holds no samples.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `pixel`, if present.
    #[inline]
    #[must_use]
    pub fn get(&self, pixel: usize) -> Option<i32> {
        self.samples.get(pixel).copied()
    }

    /// Overwrites the sample at `pixel`.
    ///
    /// # Errors
    /// Returns [`Error::PixelOutOfBounds`] if the frame has no such pixel.
    pub fn set(&mut self, pixel: usize, value: i32) -> Result<()> {
        let len = self.samples.len();
        let sample = self
            .samples
            .get_mut(pixel)
            .ok_or(Error::PixelOutOfBounds { pixel, len })?;
        *sample = value;
        Ok(())
    }

    /// Samples as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.samples
    }

    /// Samples as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.samples
    }

    /// Consumes the frame, returning its samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<i32> {
        self.samples
    }

    /// Checks that the frame covers exactly the sensor grid.
    ///
    /// # Errors
    /// Returns [`Error::FrameSizeMismatch`] on a length mismatch.
    pub fn check_geometry(&self, geometry: &SensorGeometry) -> Result<()> {
        if self.samples.len() == geometry.len() {
            Ok(())
        } else {
            Err(Error::FrameSizeMismatch {
                expected: geometry.len(),
                actual: self.samples.len(),
            })
        }
    }
}

impl From<Vec<i32>> for Frame {
    fn from(samples: Vec<i32>) -> Self {
        Self::new(samples)
    }
}

impl FromIterator<i32> for Frame {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// Parameters of a dark acquisition run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionParams {
    /// First frame index to scan (inclusive).
    pub min_frame: u32,
    /// Last frame index to scan (inclusive).
    pub max_frame: u32,
    /// Location token handed to the frame source (directory, start address).
    pub location: String,
}

impl AcquisitionParams {
    /// Creates acquisition parameters for the inclusive range `[min_frame, max_frame]`.
    pub fn new(min_frame: u32, max_frame: u32, location: impl Into<String>) -> Self {
        Self {
            min_frame,
            max_frame,
            location: location.into(),
        }
    }

    /// Iterator over the frame indices to scan.
    pub fn frames(&self) -> impl Iterator<Item = u32> {
        self.min_frame..=self.max_frame
    }

    /// Number of frames in the range.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        if self.max_frame < self.min_frame {
            0
        } else {
            (self.max_frame - self.min_frame) as usize + 1
        }
    }
}

/// Supplier of decoded frames.
///
/// Implementations map a location token and frame index to a frame buffer.
/// A failure must be reported, never replaced with an empty or stale frame.
pub trait FrameSource {
    /// Retrieves frame `index` from `location`.
    ///
    /// # Errors
    /// Returns [`Error::Acquisition`] if the frame cannot be retrieved.
    fn frame(&self, location: &str, index: u32) -> Result<Frame>;
}

/// Supplier of the dark-current baseline.
pub trait PedestalSource {
    /// Returns the pedestal frame.
    ///
    /// # Errors
    /// Returns an error if the pedestal cannot be produced.
    fn values(&self) -> Result<Frame>;
}

impl PedestalSource for Frame {
    fn values(&self) -> Result<Frame> {
        Ok(self.clone())
    }
}

impl<F: Fn(&str, u32) -> Result<Frame>> FrameSource for F {
    fn frame(&self, location: &str, index: u32) -> Result<Frame> {
        self(location, index)
    }
}
