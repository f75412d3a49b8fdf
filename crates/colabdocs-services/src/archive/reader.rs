//! In-memory ZIP reader
//!
//! Parses an archive held entirely in memory by locating the end of central
//! directory record, walking the central directory and decoding each entry
//! from its local header. Only the stored (0) and deflate (8) methods are
//! supported, which covers archives produced by every common zip tool.
//! ZIP64, encryption and multi-disk archives are not.
//!
//! Layout offsets used below (all little endian):
//!
//! | record                  | signature    | fixed size |
//! |-------------------------|--------------|------------|
//! | end of central directory| `0x06054b50` | 22         |
//! | central directory header| `0x02014b50` | 46         |
//! | local file header       | `0x04034b50` | 30         |

use flate2::read::DeflateDecoder;
use flate2::Crc;
use std::io::Read;
use thiserror::Error;

const EOCD_SIGNATURE: u32 = 0x0605_4b50;
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;
const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;

const EOCD_LEN: usize = 22;
const CENTRAL_HEADER_LEN: usize = 46;
const LOCAL_HEADER_LEN: usize = 30;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

const MIB: u64 = 1024 * 1024;

/// Errors raised when the archive cannot be parsed.
///
/// Any of these aborts the whole import before anything is written.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("End of central directory record not found")]
    MissingEndOfCentralDirectory,

    #[error("Invalid central directory header signature at offset {offset}")]
    InvalidCentralHeader { offset: usize },

    #[error("Invalid local file header signature at offset {offset} ({path})")]
    InvalidLocalHeader { offset: usize, path: String },

    #[error("Unsupported compression method {method} for {path}")]
    UnsupportedCompression { method: u16, path: String },

    #[error("Archive truncated while reading {context} at offset {offset}")]
    Truncated { context: &'static str, offset: usize },

    #[error("Failed to inflate {path}: {source}")]
    Inflate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive limit exceeded: {0}")]
    LimitExceeded(String),
}

/// One entry read from the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Forward-slash separated path as stored in the archive.
    pub path: String,
    /// Decompressed bytes; empty for directories.
    pub content: Vec<u8>,
    pub is_directory: bool,
}

/// Caps applied while reading so a small upload cannot expand without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveLimits {
    pub max_entries: usize,
    pub max_entry_size: u64,
    pub max_total_size: u64,
}

impl Default for ArchiveLimits {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_entry_size: 100 * MIB,
            max_total_size: 512 * MIB,
        }
    }
}

/// Central directory fields needed to extract one entry.
#[derive(Debug)]
struct CentralRecord {
    path: String,
    method: u16,
    crc32: u32,
    compressed_size: usize,
    uncompressed_size: u64,
    local_header_offset: usize,
}

fn read_u16(bytes: &[u8], offset: usize, context: &'static str) -> Result<u16, ArchiveError> {
    bytes
        .get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(ArchiveError::Truncated { context, offset })
}

fn read_u32(bytes: &[u8], offset: usize, context: &'static str) -> Result<u32, ArchiveError> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(ArchiveError::Truncated { context, offset })
}

fn slice<'a>(
    bytes: &'a [u8],
    offset: usize,
    len: usize,
    context: &'static str,
) -> Result<&'a [u8], ArchiveError> {
    offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(ArchiveError::Truncated { context, offset })
}

/// Scan backwards for the end of central directory signature.
///
/// The record is at least 22 bytes and may be followed by a comment, so the
/// scan starts at `len - 22` and walks towards the start of the buffer.
fn find_eocd(bytes: &[u8]) -> Result<usize, ArchiveError> {
    if bytes.len() < EOCD_LEN {
        return Err(ArchiveError::MissingEndOfCentralDirectory);
    }

    (0..=bytes.len() - EOCD_LEN)
        .rev()
        .find(|&pos| {
            u32::from_le_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
                == EOCD_SIGNATURE
        })
        .ok_or(ArchiveError::MissingEndOfCentralDirectory)
}

fn read_central_record(
    bytes: &[u8],
    offset: usize,
) -> Result<(CentralRecord, usize), ArchiveError> {
    let signature = read_u32(bytes, offset, "central directory header")?;
    if signature != CENTRAL_HEADER_SIGNATURE {
        return Err(ArchiveError::InvalidCentralHeader { offset });
    }
    // Make sure the whole fixed header is present before reading fields.
    slice(bytes, offset, CENTRAL_HEADER_LEN, "central directory header")?;

    let method = read_u16(bytes, offset + 10, "central directory header")?;
    let crc32 = read_u32(bytes, offset + 16, "central directory header")?;
    let compressed_size = read_u32(bytes, offset + 20, "central directory header")? as usize;
    let uncompressed_size = read_u32(bytes, offset + 24, "central directory header")? as u64;
    let name_len = read_u16(bytes, offset + 28, "central directory header")? as usize;
    let extra_len = read_u16(bytes, offset + 30, "central directory header")? as usize;
    let comment_len = read_u16(bytes, offset + 32, "central directory header")? as usize;
    let local_header_offset = read_u32(bytes, offset + 42, "central directory header")? as usize;

    let name = slice(bytes, offset + CENTRAL_HEADER_LEN, name_len, "entry name")?;
    let path = String::from_utf8_lossy(name).into_owned();

    let record = CentralRecord {
        path,
        method,
        crc32,
        compressed_size,
        uncompressed_size,
        local_header_offset,
    };
    let next = offset + CENTRAL_HEADER_LEN + name_len + extra_len + comment_len;
    Ok((record, next))
}

/// Locate and decode the payload of a file entry.
fn extract(
    bytes: &[u8],
    record: &CentralRecord,
    limits: &ArchiveLimits,
) -> Result<Vec<u8>, ArchiveError> {
    let local = record.local_header_offset;
    let signature = read_u32(bytes, local, "local file header")?;
    if signature != LOCAL_HEADER_SIGNATURE {
        return Err(ArchiveError::InvalidLocalHeader {
            offset: local,
            path: record.path.clone(),
        });
    }

    // The local name and extra field lengths can differ from the central copy.
    let local_name_len = read_u16(bytes, local + 26, "local file header")? as usize;
    let local_extra_len = read_u16(bytes, local + 28, "local file header")? as usize;
    let data_start = local + LOCAL_HEADER_LEN + local_name_len + local_extra_len;
    let compressed = slice(bytes, data_start, record.compressed_size, "entry data")?;

    match record.method {
        METHOD_STORED => {
            if compressed.len() as u64 > limits.max_entry_size {
                return Err(ArchiveError::LimitExceeded(format!(
                    "{} stores more than {} bytes",
                    record.path, limits.max_entry_size
                )));
            }
            Ok(compressed.to_vec())
        }
        METHOD_DEFLATE => {
            let capacity = record.uncompressed_size.min(limits.max_entry_size) as usize;
            let mut content = Vec::with_capacity(capacity);
            // Read one byte past the limit to detect entries that lie about their size.
            DeflateDecoder::new(compressed)
                .take(limits.max_entry_size + 1)
                .read_to_end(&mut content)
                .map_err(|source| ArchiveError::Inflate {
                    path: record.path.clone(),
                    source,
                })?;
            if content.len() as u64 > limits.max_entry_size {
                return Err(ArchiveError::LimitExceeded(format!(
                    "{} inflates beyond {} bytes",
                    record.path, limits.max_entry_size
                )));
            }
            Ok(content)
        }
        method => Err(ArchiveError::UnsupportedCompression {
            method,
            path: record.path.clone(),
        }),
    }
}

fn verify(record: &CentralRecord, content: &[u8]) {
    if content.len() as u64 != record.uncompressed_size {
        tracing::warn!(
            path = %record.path,
            expected = record.uncompressed_size,
            actual = content.len(),
            "Archive entry size does not match central directory"
        );
    }

    let mut crc = Crc::new();
    crc.update(content);
    if crc.sum() != record.crc32 {
        tracing::warn!(
            path = %record.path,
            expected = %format_args!("{:08x}", record.crc32),
            actual = %format_args!("{:08x}", crc.sum()),
            "Archive entry CRC-32 does not match central directory"
        );
    }
}

/// Read every entry of an in-memory ZIP archive, in central directory order.
pub fn read_archive(
    bytes: &[u8],
    limits: &ArchiveLimits,
) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let eocd = find_eocd(bytes)?;
    let total_entries = read_u16(bytes, eocd + 10, "end of central directory")? as usize;
    let mut offset = read_u32(bytes, eocd + 16, "end of central directory")? as usize;

    if total_entries > limits.max_entries {
        return Err(ArchiveError::LimitExceeded(format!(
            "{} entries (maximum {})",
            total_entries, limits.max_entries
        )));
    }

    let mut entries = Vec::with_capacity(total_entries);
    let mut declared_total: u64 = 0;
    let mut actual_total: u64 = 0;

    for _ in 0..total_entries {
        let (record, next) = read_central_record(bytes, offset)?;
        offset = next;

        if record.path.ends_with('/') {
            entries.push(ArchiveEntry {
                path: record.path,
                content: Vec::new(),
                is_directory: true,
            });
            continue;
        }

        if record.uncompressed_size > limits.max_entry_size {
            return Err(ArchiveError::LimitExceeded(format!(
                "{} declares {} bytes (maximum {} per entry)",
                record.path, record.uncompressed_size, limits.max_entry_size
            )));
        }
        declared_total += record.uncompressed_size;
        if declared_total > limits.max_total_size {
            return Err(ArchiveError::LimitExceeded(format!(
                "archive declares more than {} uncompressed bytes",
                limits.max_total_size
            )));
        }

        let content = extract(bytes, &record, limits)?;
        actual_total += content.len() as u64;
        if actual_total > limits.max_total_size {
            return Err(ArchiveError::LimitExceeded(format!(
                "archive expands beyond {} bytes",
                limits.max_total_size
            )));
        }
        verify(&record, &content);

        entries.push(ArchiveEntry {
            path: record.path,
            content,
            is_directory: false,
        });
    }

    tracing::debug!(entries = entries.len(), bytes = actual_total, "Archive read");
    Ok(entries)
}
