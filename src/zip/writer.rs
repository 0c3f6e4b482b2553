//! In-memory ZIP archive writer.
//!
//! Entries are appended in call order. Each one is deflated into the output
//! buffer right away, preceded by its Local File Header; the Central
//! Directory and the EOCD record are emitted by [`ArchiveBuilder::finish`].
//!
//! Only the classic (zip32) layout is produced. Inputs that would need ZIP64
//! are rejected instead of being written as a truncated archive.

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use std::io::Write;

use super::ArchiveError;
use super::structures::*;

/// Bookkeeping for one written entry, replayed into the Central Directory.
struct WrittenEntry {
    file_name: String,
    crc32: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    lfh_offset: u32,
}

/// Builds a deflate-compressed ZIP archive in memory.
///
/// ```
/// use diskzip::ArchiveBuilder;
///
/// let mut builder = ArchiveBuilder::new();
/// builder.add_file("hello.txt", b"hello world")?;
/// let bytes = builder.finish()?;
/// assert_eq!(&bytes[0..4], b"PK\x03\x04");
/// # Ok::<(), diskzip::ArchiveError>(())
/// ```
pub struct ArchiveBuilder {
    buf: Vec<u8>,
    entries: Vec<WrittenEntry>,
    level: Compression,
    timestamp: DosDateTime,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::with_timestamp(DosDateTime::now())
    }

    /// Use a fixed modification time for every entry.
    pub fn with_timestamp(timestamp: DosDateTime) -> Self {
        Self {
            buf: Vec::new(),
            entries: Vec::new(),
            level: Compression::default(),
            timestamp,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compress `content` and append it under `file_name`.
    ///
    /// Duplicate names are written as separate entries.
    pub fn add_file(&mut self, file_name: &str, content: &[u8]) -> Result<(), ArchiveError> {
        if self.entries.len() >= MAX_ENTRIES {
            return Err(ArchiveError::TooManyEntries(MAX_ENTRIES));
        }
        if file_name.len() > u16::MAX as usize {
            return Err(ArchiveError::TooLarge(file_name.to_string()));
        }

        let mut crc = Crc::new();
        crc.update(content);

        let mut encoder = DeflateEncoder::new(Vec::new(), self.level);
        encoder.write_all(content)?;
        let compressed = encoder.finish()?;

        let too_large = |size: u64| size > MAX_SIZE;
        let lfh_offset = self.buf.len() as u64;
        if too_large(content.len() as u64)
            || too_large(compressed.len() as u64)
            || too_large(lfh_offset)
        {
            return Err(ArchiveError::TooLarge(file_name.to_string()));
        }

        let entry = WrittenEntry {
            file_name: file_name.to_string(),
            crc32: crc.sum(),
            compressed_size: compressed.len() as u32,
            uncompressed_size: content.len() as u32,
            lfh_offset: lfh_offset as u32,
        };

        self.write_local_header(&entry)?;
        self.buf.write_all(&compressed)?;
        self.entries.push(entry);

        Ok(())
    }

    /// Write the Central Directory and EOCD, returning the archive bytes.
    pub fn finish(mut self) -> Result<Vec<u8>, ArchiveError> {
        let cd_offset = self.buf.len() as u64;
        if cd_offset > MAX_SIZE {
            return Err(ArchiveError::TooLarge("central directory".to_string()));
        }

        let entries = std::mem::take(&mut self.entries);
        for entry in &entries {
            self.write_central_header(entry)?;
        }

        let cd_size = self.buf.len() as u64 - cd_offset;
        if cd_size > MAX_SIZE {
            return Err(ArchiveError::TooLarge("central directory".to_string()));
        }
        EndOfCentralDirectory::new(entries.len() as u16, cd_size as u32, cd_offset as u32)
            .write_to(&mut self.buf)?;

        Ok(self.buf)
    }

    fn write_local_header(&mut self, entry: &WrittenEntry) -> Result<(), ArchiveError> {
        let out = &mut self.buf;
        out.write_all(LFH_SIGNATURE)?;
        out.write_u16::<LittleEndian>(VERSION_NEEDED)?;
        out.write_u16::<LittleEndian>(FLAG_UTF8)?;
        out.write_u16::<LittleEndian>(CompressionMethod::Deflate.as_u16())?;
        out.write_u16::<LittleEndian>(self.timestamp.time)?;
        out.write_u16::<LittleEndian>(self.timestamp.date)?;
        out.write_u32::<LittleEndian>(entry.crc32)?;
        out.write_u32::<LittleEndian>(entry.compressed_size)?;
        out.write_u32::<LittleEndian>(entry.uncompressed_size)?;
        out.write_u16::<LittleEndian>(entry.file_name.len() as u16)?;
        out.write_u16::<LittleEndian>(0)?; // extra field length
        out.write_all(entry.file_name.as_bytes())?;
        Ok(())
    }

    fn write_central_header(&mut self, entry: &WrittenEntry) -> Result<(), ArchiveError> {
        let out = &mut self.buf;
        out.write_all(CDFH_SIGNATURE)?;
        out.write_u16::<LittleEndian>(VERSION_NEEDED)?; // version made by
        out.write_u16::<LittleEndian>(VERSION_NEEDED)?;
        out.write_u16::<LittleEndian>(FLAG_UTF8)?;
        out.write_u16::<LittleEndian>(CompressionMethod::Deflate.as_u16())?;
        out.write_u16::<LittleEndian>(self.timestamp.time)?;
        out.write_u16::<LittleEndian>(self.timestamp.date)?;
        out.write_u32::<LittleEndian>(entry.crc32)?;
        out.write_u32::<LittleEndian>(entry.compressed_size)?;
        out.write_u32::<LittleEndian>(entry.uncompressed_size)?;
        out.write_u16::<LittleEndian>(entry.file_name.len() as u16)?;
        out.write_u16::<LittleEndian>(0)?; // extra field length
        out.write_u16::<LittleEndian>(0)?; // file comment length
        out.write_u16::<LittleEndian>(0)?; // disk number start
        out.write_u16::<LittleEndian>(0)?; // internal attributes
        out.write_u32::<LittleEndian>(0)?; // external attributes
        out.write_u32::<LittleEndian>(entry.lfh_offset)?;
        out.write_all(entry.file_name.as_bytes())?;
        Ok(())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bundle `(file_name, content)` pairs into one archive, in order.
pub fn build_archive<N, C>(entries: &[(N, C)]) -> Result<Vec<u8>, ArchiveError>
where
    N: AsRef<str>,
    C: AsRef<[u8]>,
{
    let mut builder = ArchiveBuilder::new();
    for (name, content) in entries {
        builder.add_file(name.as_ref(), content.as_ref())?;
    }
    builder.finish()
}
