//! Bad pixel collections: detection frequencies and the corrected set.

use std::collections::{btree_map, BTreeMap, BTreeSet};

/// Number of scanned frames in which each pixel exceeded its threshold.
///
/// Keys iterate in ascending pixel order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: BTreeMap<usize, u32>,
    frames_scanned: usize,
}

impl FrequencyMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one exceedance at `pixel`.
    #[inline]
    pub fn increment(&mut self, pixel: usize) {
        *self.counts.entry(pixel).or_insert(0) += 1;
    }

    /// Records that one more frame was scanned.
    pub fn record_frame(&mut self) {
        self.frames_scanned += 1;
    }

    /// Adds the counts and frames of `other` into this map.
    pub fn merge(&mut self, other: &FrequencyMap) {
        for (&pixel, &count) in &other.counts {
            *self.counts.entry(pixel).or_insert(0) += count;
        }
        self.frames_scanned += other.frames_scanned;
    }

    /// Count for `pixel` (0 if never flagged).
    #[must_use]
    pub fn count(&self, pixel: usize) -> u32 {
        self.counts.get(&pixel).copied().unwrap_or(0)
    }

    /// Number of frames that contributed to the map.
    #[must_use]
    pub fn frames_scanned(&self) -> usize {
        self.frames_scanned
    }

    /// Number of flagged pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no pixel was flagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(pixel, count)` in ascending pixel order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.counts.iter().map(|(&pixel, &count)| (pixel, count))
    }

    /// Flagged pixels in ascending order.
    pub fn pixels(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts.keys().copied()
    }

    /// Pixels flagged in at least `min_frequency` frames.
    #[must_use]
    pub fn bad_pixels(&self, min_frequency: u32) -> BadPixelSet {
        self.iter()
            .filter(|&(_, count)| count >= min_frequency)
            .map(|(pixel, _)| pixel)
            .collect()
    }

    /// Summary of the detection run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn statistics(&self) -> DetectionStatistics {
        let total: u64 = self.counts.values().map(|&count| u64::from(count)).sum();
        let mean_count = if self.counts.is_empty() {
            0.0
        } else {
            total as f64 / self.counts.len() as f64
        };
        DetectionStatistics {
            frames_scanned: self.frames_scanned,
            flagged_pixels: self.counts.len(),
            max_count: self.counts.values().copied().max().unwrap_or(0),
            mean_count,
        }
    }
}

impl<'a> IntoIterator for &'a FrequencyMap {
    type Item = (&'a usize, &'a u32);
    type IntoIter = btree_map::Iter<'a, usize, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

/// Summary statistics of a detection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionStatistics {
    /// Frames compared against the thresholds.
    pub frames_scanned: usize,
    /// Pixels flagged at least once.
    pub flagged_pixels: usize,
    /// Highest count of any pixel.
    pub max_count: u32,
    /// Mean count over flagged pixels.
    pub mean_count: f64,
}

/// Unique pixel indices known to be defective.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadPixelSet {
    pixels: BTreeSet<usize>,
}

impl BadPixelSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pixel, returning false if it was already present.
    pub fn insert(&mut self, pixel: usize) -> bool {
        self.pixels.insert(pixel)
    }

    /// Returns true if `pixel` is bad.
    #[inline]
    #[must_use]
    pub fn contains(&self, pixel: usize) -> bool {
        self.pixels.contains(&pixel)
    }

    /// Number of bad pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Iterates pixels in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.pixels.iter().copied()
    }

    /// Adds every pixel of `other`.
    pub fn extend_from(&mut self, other: &BadPixelSet) {
        self.pixels.extend(other.iter());
    }
}

impl FromIterator<usize> for BadPixelSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            pixels: iter.into_iter().collect(),
        }
    }
}

impl Extend<usize> for BadPixelSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        self.pixels.extend(iter);
    }
}

impl IntoIterator for BadPixelSet {
    type Item = usize;
    type IntoIter = std::collections::btree_set::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.pixels.into_iter()
    }
}

impl<'a> IntoIterator for &'a BadPixelSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter().copied()
    }
}
