//! Memory-mapped raw frame readers.
//!
//! A raw frame file is a flat sequence of 4-byte little-endian signed
//! samples in row-major order, with no header.

use crate::{Error, Result};
use badpix_core::{Frame, FrameSource, PedestalSource};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Size in bytes of one raw sample.
pub const SAMPLE_SIZE: usize = 4;

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without copying them into a buffer
/// first.
pub struct MappedFileReader {
    mmap: Mmap,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
        // This is the standard safety contract for memory mapping.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            mmap,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Path of the mapped file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decodes the file as a raw frame.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the size is not a whole number of samples.
    pub fn read_frame(&self) -> Result<Frame> {
        if self.len() % SAMPLE_SIZE != 0 {
            return Err(Error::InvalidFormat(format!(
                "file size {} is not a multiple of {SAMPLE_SIZE} (file: {})",
                self.len(),
                self.path.display()
            )));
        }

        Ok(self
            .as_bytes()
            .chunks_exact(SAMPLE_SIZE)
            .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }
}

/// Reads one raw frame file.
///
/// # Errors
/// Returns an error if the file cannot be mapped or is not a whole number of samples.
pub fn read_raw_frame<P: AsRef<Path>>(path: P) -> Result<Frame> {
    MappedFileReader::open(path)?.read_frame()
}

/// Frame source reading numbered raw frame files from a directory.
///
/// The acquisition location is the directory; frame `n` is read from
/// `<location>/<prefix><n:06>.raw`.
#[derive(Debug, Clone)]
pub struct RawFrameDirectory {
    prefix: String,
}

impl Default for RawFrameDirectory {
    fn default() -> Self {
        Self {
            prefix: "frame_".to_string(),
        }
    }
}

impl RawFrameDirectory {
    /// Creates a source using the `frame_` file prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Path of frame `index` under `location`.
    #[must_use]
    pub fn frame_path(&self, location: &str, index: u32) -> PathBuf {
        Path::new(location).join(format!("{}{index:06}.raw", self.prefix))
    }
}

impl FrameSource for RawFrameDirectory {
    fn frame(&self, location: &str, index: u32) -> badpix_core::Result<Frame> {
        let path = self.frame_path(location, index);
        read_raw_frame(&path).map_err(|e| badpix_core::Error::Acquisition {
            frame: index,
            message: format!("{}: {e}", path.display()),
        })
    }
}

/// Pedestal source reading a single raw frame file.
#[derive(Debug, Clone)]
pub struct RawPedestalFile {
    path: PathBuf,
}

impl RawPedestalFile {
    /// Creates a pedestal source for `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PedestalSource for RawPedestalFile {
    fn values(&self) -> badpix_core::Result<Frame> {
        read_raw_frame(&self.path).map_err(|e| {
            badpix_core::Error::PedestalUnavailable(format!("{}: {e}", self.path.display()))
        })
    }
}
