//! In-memory ZIP archive reader.
//!
//! Reads archives the way they are designed to be read: locate the EOCD at
//! the tail, walk the Central Directory, then resolve each entry's data
//! through its Local File Header. Used to inspect archives produced by
//! [`ArchiveBuilder`](super::ArchiveBuilder).

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::Crc;
use flate2::read::DeflateDecoder;
use std::io::{Cursor, Read};

use super::ArchiveError;
use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
const MAX_COMMENT_SIZE: usize = 65535;

/// Parsed view over a complete archive held in memory.
pub struct ArchiveReader<'a> {
    data: &'a [u8],
    entries: Vec<ZipFileEntry>,
}

impl<'a> ArchiveReader<'a> {
    /// Parse the Central Directory of `data`.
    pub fn new(data: &'a [u8]) -> Result<Self, ArchiveError> {
        let eocd = find_eocd(data)?;
        if eocd.is_zip64() {
            return Err(ArchiveError::Unsupported("ZIP64 archives"));
        }

        let cd_start = eocd.cd_offset as usize;
        let cd_end = cd_start + eocd.cd_size as usize;
        let cd_data = data
            .get(cd_start..cd_end)
            .ok_or(ArchiveError::Malformed("central directory out of bounds"))?;

        let mut cursor = Cursor::new(cd_data);
        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        for _ in 0..eocd.total_entries {
            entries.push(parse_cdfh(&mut cursor)?);
        }

        Ok(Self { data, entries })
    }

    /// Entries in Central Directory order.
    pub fn entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    /// Decompress one entry and verify its CRC-32.
    pub fn read(&self, entry: &ZipFileEntry) -> Result<Vec<u8>, ArchiveError> {
        let start = self.data_offset(entry)?;
        let end = start + entry.compressed_size as usize;
        let raw = self
            .data
            .get(start..end)
            .ok_or(ArchiveError::Malformed("entry data out of bounds"))?;

        let content = match entry.compression_method {
            CompressionMethod::Stored => raw.to_vec(),
            CompressionMethod::Deflate => {
                let mut out = Vec::with_capacity(entry.uncompressed_size as usize);
                DeflateDecoder::new(raw).read_to_end(&mut out)?;
                out
            }
            CompressionMethod::Unknown(_) => {
                return Err(ArchiveError::Unsupported("compression method"));
            }
        };

        let mut crc = Crc::new();
        crc.update(&content);
        if crc.sum() != entry.crc32 || content.len() as u64 != entry.uncompressed_size {
            return Err(ArchiveError::ChecksumMismatch(entry.file_name.clone()));
        }

        Ok(content)
    }

    /// The Local File Header carries its own name/extra lengths, which may
    /// differ from the Central Directory copy.
    fn data_offset(&self, entry: &ZipFileEntry) -> Result<usize, ArchiveError> {
        let lfh_start = entry.lfh_offset as usize;
        let lfh = self
            .data
            .get(lfh_start..lfh_start + LFH_SIZE)
            .ok_or(ArchiveError::Malformed("local header out of bounds"))?;
        if &lfh[0..4] != LFH_SIGNATURE {
            return Err(ArchiveError::Malformed("invalid local file header"));
        }

        let mut cursor = Cursor::new(&lfh[26..]);
        let file_name_length = cursor.read_u16::<LittleEndian>()? as usize;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as usize;

        Ok(lfh_start + LFH_SIZE + file_name_length + extra_field_length)
    }
}

fn find_eocd(data: &[u8]) -> Result<EndOfCentralDirectory, ArchiveError> {
    if data.len() < EndOfCentralDirectory::SIZE {
        return Err(ArchiveError::Malformed("not a zip archive"));
    }

    // Common case first: no archive comment.
    let tail = &data[data.len() - EndOfCentralDirectory::SIZE..];
    if &tail[0..4] == EndOfCentralDirectory::SIGNATURE && tail[20..22] == [0, 0] {
        return EndOfCentralDirectory::from_bytes(tail);
    }

    let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE).min(data.len());
    let search_start = data.len() - search_size;
    let window = &data[search_start..];

    for i in (0..=window.len() - EndOfCentralDirectory::SIZE).rev() {
        if &window[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
            let comment_len = u16::from_le_bytes([window[i + 20], window[i + 21]]) as usize;
            if comment_len == window.len() - i - EndOfCentralDirectory::SIZE {
                return EndOfCentralDirectory::from_bytes(&window[i..]);
            }
        }
    }

    Err(ArchiveError::Malformed("not a zip archive"))
}

fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry, ArchiveError> {
    let mut sig = [0u8; 4];
    cursor.read_exact(&mut sig)?;
    if sig != CDFH_SIGNATURE {
        return Err(ArchiveError::Malformed("invalid central directory file header"));
    }

    let _version_made_by = cursor.read_u16::<LittleEndian>()?;
    let _version_needed = cursor.read_u16::<LittleEndian>()?;
    let flags = cursor.read_u16::<LittleEndian>()?;
    let compression_method = cursor.read_u16::<LittleEndian>()?;
    let last_mod_time = cursor.read_u16::<LittleEndian>()?;
    let last_mod_date = cursor.read_u16::<LittleEndian>()?;
    let crc32 = cursor.read_u32::<LittleEndian>()?;
    let compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let file_name_length = cursor.read_u16::<LittleEndian>()?;
    let extra_field_length = cursor.read_u16::<LittleEndian>()?;
    let file_comment_length = cursor.read_u16::<LittleEndian>()?;
    let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
    let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
    let _external_attrs = cursor.read_u32::<LittleEndian>()?;
    let lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

    let mut file_name_bytes = vec![0u8; file_name_length as usize];
    cursor.read_exact(&mut file_name_bytes)?;
    let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();
    let is_directory = file_name.ends_with('/');

    cursor.set_position(cursor.position() + extra_field_length as u64 + file_comment_length as u64);

    Ok(ZipFileEntry {
        file_name,
        compression_method: CompressionMethod::from_u16(compression_method),
        flags,
        compressed_size,
        uncompressed_size,
        crc32,
        lfh_offset,
        last_mod_time,
        last_mod_date,
        is_directory,
    })
}
