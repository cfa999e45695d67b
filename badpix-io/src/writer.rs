//! File writers for frames and detection reports.

use crate::Result;
use badpix_core::{Frame, FrequencyMap, SensorGeometry};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes a frame as raw little-endian i32 samples.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_raw_frame<P: AsRef<Path>>(path: P, frame: &Frame) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for sample in frame.as_slice() {
        writer.write_all(&sample.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Writer for detection frequency reports.
///
/// The report lists every flagged pixel with its position and the number of
/// dark frames in which it exceeded its threshold, for chip diagnostics.
pub struct FrequencyReportWriter {
    writer: BufWriter<File>,
}

impl FrequencyReportWriter {
    /// Creates a new report file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Writes the frequency map as CSV: `pixel,row,column,sector,count`.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_csv(
        &mut self,
        frequencies: &FrequencyMap,
        geometry: &SensorGeometry,
    ) -> Result<()> {
        writeln!(self.writer, "pixel,row,column,sector,count")?;

        for (pixel, count) in frequencies.iter() {
            let coord = geometry.coord(pixel);
            writeln!(
                self.writer,
                "{},{},{},{},{}",
                pixel,
                coord.row,
                coord.column,
                geometry.sector_of(pixel),
                count
            )?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
