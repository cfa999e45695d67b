//! badpix-io: File I/O for badpix.
//!
//! This crate provides the persistent bad pixel store and memory-mapped
//! raw frame readers (via memmap2) implementing the acquisition sources.
//!

mod error;
mod reader;
pub mod store;
mod writer;

pub use error::{Error, Result};
pub use reader::{read_raw_frame, MappedFileReader, RawFrameDirectory, RawPedestalFile};
pub use store::BadPixelStore;
pub use writer::{write_raw_frame, FrequencyReportWriter};
