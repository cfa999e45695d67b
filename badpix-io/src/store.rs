//! Persistent store of bad pixel locations.
//!
//! Format: a flat sequence of 4-byte little-endian signed integers, one pixel
//! index each. No header, length prefix or checksum. Indices are unique when
//! written through [`BadPixelStore::append`].
//!
//! Every operation holds an OS lock on the store file for its duration:
//! shared for reads, exclusive for writes.

use crate::{Error, Result};
use badpix_core::{BadPixelSet, FrequencyMap};
use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Size in bytes of one stored pixel index.
pub const INDEX_SIZE: usize = 4;

/// File-backed list of bad pixel indices.
#[derive(Debug, Clone)]
pub struct BadPixelStore {
    path: PathBuf,
}

impl BadPixelStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the store contents with `pixels`, in iteration order.
    ///
    /// Returns the number of indices written.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if an index does not fit in 4 bytes
    /// (the store is left untouched), or [`Error::Io`] if the file cannot be
    /// opened, locked or written.
    pub fn save<I>(&self, pixels: I) -> Result<usize>
    where
        I: IntoIterator<Item = usize>,
    {
        let bytes = encode_indices(pixels)?;
        let mut file = self.open_for_write()?;
        file.lock()?;
        rewrite(&mut file, &bytes)?;
        let count = bytes.len() / INDEX_SIZE;
        log::debug!("Wrote {count} bad pixels to {}", self.path.display());
        Ok(count)
    }

    /// Replaces the store contents with the pixels of a frequency map, ascending.
    ///
    /// # Errors
    /// See [`BadPixelStore::save`].
    pub fn save_frequencies(&self, frequencies: &FrequencyMap) -> Result<usize> {
        self.save(frequencies.pixels())
    }

    /// Reads every stored index in file order.
    ///
    /// A missing or empty store yields an empty list.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file exists but cannot be opened or read,
    /// or [`Error::InvalidFormat`] if its contents are not a whole number of
    /// non-negative indices.
    pub fn load(&self) -> Result<Vec<usize>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No bad pixel store at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        file.lock_shared()?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        decode_indices(&bytes)
    }

    /// Reads the store as a set.
    ///
    /// # Errors
    /// See [`BadPixelStore::load`].
    pub fn load_set(&self) -> Result<BadPixelSet> {
        Ok(self.load()?.into_iter().collect())
    }

    /// Merges `new_pixels` into the store without duplicates.
    ///
    /// The store is rewritten as the sorted union of its previous contents
    /// and `new_pixels`. Returns the number of indices now stored.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the existing store is corrupt or a
    /// new index does not fit in 4 bytes; the store is left untouched in
    /// both cases. Returns [`Error::Io`] on any file failure.
    pub fn append<I>(&self, new_pixels: I) -> Result<usize>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut file = self.open_for_write()?;
        file.lock()?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let existing = decode_indices(&bytes)?;
        let previous = existing.len();

        let union: BTreeSet<usize> = existing.into_iter().chain(new_pixels).collect();
        let bytes = encode_indices(union.iter().copied())?;
        rewrite(&mut file, &bytes)?;

        log::info!(
            "Bad pixel store {}: {} -> {} entries",
            self.path.display(),
            previous,
            union.len()
        );
        Ok(union.len())
    }

    fn open_for_write(&self) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        Ok(file)
    }
}

/// Truncates `file` and writes `bytes` from the start.
fn rewrite(file: &mut File, bytes: &[u8]) -> Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(())
}

/// Encodes pixel indices as 4-byte little-endian integers.
///
/// # Errors
/// Returns [`Error::InvalidFormat`] if an index exceeds `i32::MAX`.
pub fn encode_indices<I>(pixels: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = usize>,
{
    let pixels = pixels.into_iter();
    let mut bytes = Vec::with_capacity(pixels.size_hint().0 * INDEX_SIZE);
    for pixel in pixels {
        let value = i32::try_from(pixel).map_err(|_| {
            Error::InvalidFormat(format!("pixel index {pixel} does not fit in 4 bytes"))
        })?;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    Ok(bytes)
}

/// Decodes 4-byte little-endian integers into pixel indices.
///
/// # Errors
/// Returns [`Error::InvalidFormat`] if the length is not a multiple of 4 or
/// an index is negative.
pub fn decode_indices(bytes: &[u8]) -> Result<Vec<usize>> {
    if bytes.len() % INDEX_SIZE != 0 {
        return Err(Error::InvalidFormat(format!(
            "store size {} is not a multiple of {INDEX_SIZE}",
            bytes.len()
        )));
    }

    bytes
        .chunks_exact(INDEX_SIZE)
        .enumerate()
        .map(|(position, chunk)| {
            let value = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            usize::try_from(value).map_err(|_| {
                Error::InvalidFormat(format!("negative pixel index {value} at entry {position}"))
            })
        })
        .collect()
}
