//! XDB header decoding and file verification.

use std::fs::File;
use std::path::Path;

use super::codec::{u16_le, u32_le};
use crate::error::{Error, Result};
use crate::version::Version;

/// Fixed header length at the start of every XDB file.
pub const HEADER_LEN: usize = 256;

/// Absolute file offset of the vector index block.
pub const VECTOR_INDEX_OFFSET: u64 = HEADER_LEN as u64;

/// Rows and columns of the vector index, one per leading key byte.
pub const VECTOR_INDEX_ROWS: usize = 256;
pub const VECTOR_INDEX_COLS: usize = 256;

/// Size in bytes of one vector index cell: two little-endian u32 pointers.
pub const VECTOR_CELL_SIZE: usize = 8;

/// Total vector index length: 256 * 256 * 8.
pub const VECTOR_INDEX_LEN: usize = VECTOR_INDEX_ROWS * VECTOR_INDEX_COLS * VECTOR_CELL_SIZE;

/// Legacy v4-only structure version.
pub const STRUCTURE_V2: u16 = 2;

/// Current structure version carrying an explicit IP version field.
pub const STRUCTURE_V3: u16 = 3;

/// Decoded XDB file header.
///
/// All fields are little-endian on disk. For legacy `structure_version = 2`
/// files the IP version is fixed at 4 and the pointer width at 4 bytes
/// regardless of what the reserved bytes hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub structure_version: u16,
    pub index_policy: u16,
    pub created_at: u32,
    pub start_index_ptr: u32,
    pub end_index_ptr: u32,
    pub ip_version: Version,
    pub runtime_ptr_bytes: u16,
}

impl Header {
    /// Decode a header from the 256-byte file prefix.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(Error::ShortBuffer {
                offset: 0,
                want: HEADER_LEN,
                len: buf.len(),
            });
        }

        let structure_version = u16_le(buf, 0)?;
        let index_policy = u16_le(buf, 2)?;
        let created_at = u32_le(buf, 4)?;
        let start_index_ptr = u32_le(buf, 8)?;
        let end_index_ptr = u32_le(buf, 12)?;

        let (ip_version, runtime_ptr_bytes) = match structure_version {
            STRUCTURE_V2 => (Version::V4, 4),
            STRUCTURE_V3 => (Version::from_id(u16_le(buf, 16)?)?, u16_le(buf, 18)?),
            other => return Err(Error::UnsupportedStructure(other)),
        };

        Ok(Self {
            structure_version,
            index_policy,
            created_at,
            start_index_ptr,
            end_index_ptr,
            ip_version,
            runtime_ptr_bytes,
        })
    }

    /// Largest file size addressable by this header's pointer width.
    fn max_file_size(&self) -> u64 {
        if self.runtime_ptr_bytes >= 8 {
            u64::MAX
        } else {
            (1u64 << (8 * self.runtime_ptr_bytes as u32)) - 1
        }
    }

    /// Check a file size against the pointer-width bound.
    pub fn check_file_size(&self, file_size: u64) -> Result<()> {
        if file_size > self.max_file_size() {
            return Err(Error::FileTooLarge {
                file_size,
                ptr_bytes: self.runtime_ptr_bytes,
            });
        }
        Ok(())
    }
}

/// Verify an XDB file's structure version and size limits.
///
/// Returns the decoded header on success. This is the check to run on a
/// freshly obtained database file before constructing searchers on it.
pub fn verify<P: AsRef<Path>>(path: P) -> Result<Header> {
    let file = File::open(path.as_ref())?;
    let file_size = file.metadata()?.len();

    let mut buf = [0u8; HEADER_LEN];
    read_prefix(&file, &mut buf)?;

    let header = Header::decode(&buf)?;
    header.check_file_size(file_size)?;

    log::debug!(
        "verified {:?}: structure v{}, {}, {} bytes",
        path.as_ref(),
        header.structure_version,
        header.ip_version,
        file_size
    );

    Ok(header)
}

fn read_prefix(mut file: &File, buf: &mut [u8]) -> Result<()> {
    use std::io::Read;

    file.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::ShortRead {
                offset: 0,
                want: buf.len(),
            }
        } else {
            Error::Io(e)
        }
    })
}
