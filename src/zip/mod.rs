//! ZIP archive writing and reading.
//!
//! ## Architecture
//!
//! - [`structures`]: format constants, the EOCD record, DOS timestamps
//! - [`writer`]: builds a deflate-compressed archive in memory
//! - [`reader`]: parses an in-memory archive back into entries
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Limitations
//!
//! - Only DEFLATE is written; STORED and DEFLATE are read
//! - No ZIP64, no encryption, no multi-disk archives

mod reader;
mod structures;
mod writer;

pub use reader::ArchiveReader;
pub use structures::*;
pub use writer::{ArchiveBuilder, build_archive};

/// Failure while writing or reading an archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive cannot hold more than {0} entries")]
    TooManyEntries(usize),

    #[error("{0} exceeds zip32 size limits")]
    TooLarge(String),

    #[error("malformed archive: {0}")]
    Malformed(&'static str),

    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    #[error("checksum mismatch for {0}")]
    ChecksumMismatch(String),
}
