//! The XDB search façade.
//!
//! One query runs the full pipeline: parse the address into a canonical
//! key, take the first two key bytes into the vector index for a
//! `(sPtr, ePtr)` segment range, binary-search that range with the
//! version-specific comparator, and fetch the region payload the matching
//! record points to.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use memmap2::Mmap;

use super::codec::{u16_le, u32_le};
use super::header::{Header, HEADER_LEN, STRUCTURE_V2, VECTOR_INDEX_LEN, VECTOR_INDEX_OFFSET};
use super::store::{Content, Store};
use crate::error::{Error, Result};
use crate::ip::parse_ip;
use crate::version::Version;

/// Largest segment record across versions (IPv6: 38 bytes).
const MAX_SEGMENT_RECORD: usize = Version::V6.segment_record_size();

/// Read-only lookup engine over one XDB file or buffer.
///
/// A searcher is constructed once and queried many times; nothing mutates
/// between queries except the per-query I/O counter and the underlying
/// seek position, which is why queries take `&mut self`. Share across
/// threads behind external locking, or hand each thread its own searcher.
pub struct Searcher {
    version: Version,
    header: Header,
    store: Store,
}

impl Searcher {
    /// Open a file-backed searcher that seeks for every read.
    ///
    /// Cheapest on memory: a few KiB of state plus the file handle.
    pub fn open<P: AsRef<Path>>(version: Version, path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let searcher = Self::from_store(version, Store::file(file))?;
        log::debug!("opened {} searcher on {:?}", version, path.as_ref());
        Ok(searcher)
    }

    /// Open a file-backed searcher with a caller-preloaded vector index.
    ///
    /// Vector-cell reads are answered from `vector_index` without touching
    /// the file; `vector_index` must be exactly the 524288-byte block at
    /// file offset 256 (see [`load_vector_index`]).
    pub fn open_with_vector_index<P: AsRef<Path>>(
        version: Version,
        path: P,
        vector_index: Vec<u8>,
    ) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let store = Store::file_with_vector_index(file, vector_index)?;
        let searcher = Self::from_store(version, store)?;
        log::debug!(
            "opened {} searcher on {:?} with preloaded vector index",
            version,
            path.as_ref()
        );
        Ok(searcher)
    }

    /// Open a searcher over the complete file content.
    ///
    /// No file handle is kept and queries never block on disk.
    pub fn open_with_buffer(version: Version, content: Vec<u8>) -> Result<Self> {
        Self::from_store(version, Store::buffer(Content::Owned(content)))
    }

    /// Open a searcher over a read-only memory mapping of the file.
    ///
    /// Behaves like [`open_with_buffer`](Self::open_with_buffer) without
    /// copying the file into the heap; the OS pages regions in on demand.
    pub fn open_mmap<P: AsRef<Path>>(version: Version, path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mmap = unsafe { Mmap::map(&file)? };
        let searcher = Self::from_store(version, Store::buffer(Content::Mapped(mmap)))?;
        log::debug!("opened {} searcher mapped from {:?}", version, path.as_ref());
        Ok(searcher)
    }

    fn from_store(version: Version, mut store: Store) -> Result<Self> {
        let prefix = store.read(0, HEADER_LEN)?;
        let header = Header::decode(&prefix)?;
        store.reset_io_count();
        Ok(Self {
            version,
            header,
            store,
        })
    }

    /// The engine's IP version, fixed at construction.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The decoded file header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// I/O operations issued against the backing file during the most
    /// recent query. Stays 0 for buffered stores and for vector-cell reads
    /// served from a preloaded slice.
    pub fn io_count(&self) -> u32 {
        self.store.io_count()
    }

    /// Release the backing file or buffer. Idempotent; queries after close
    /// fail with [`Error::Closed`].
    pub fn close(&mut self) {
        self.store.close();
    }

    pub fn is_closed(&self) -> bool {
        self.store.is_closed()
    }

    /// Look up the region payload for an IP address in text form.
    ///
    /// Returns the raw payload bytes; an empty vector means the address is
    /// well-formed but no range in the file contains it.
    pub fn search(&mut self, text: &str) -> Result<Vec<u8>> {
        self.store.reset_io_count();
        if self.store.is_closed() {
            return Err(Error::Closed);
        }
        let key = parse_ip(text)?;
        if key.version() != self.version {
            return Err(Error::VersionMismatch {
                engine: self.version,
                found: format!("address {} is {}", text.trim(), key.version()),
            });
        }
        self.search_bytes(key.as_bytes())
    }

    /// Look up the region payload for a canonical network-order key.
    pub fn search_bytes(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        self.store.reset_io_count();
        if self.store.is_closed() {
            return Err(Error::Closed);
        }
        self.check_file_version()?;

        let key_len = self.version.key_len();
        if key.len() != key_len {
            return Err(Error::VersionMismatch {
                engine: self.version,
                found: format!("key is {} bytes", key.len()),
            });
        }

        let (s_ptr, e_ptr) = self.store.vector_cell(key[0], key[1])?;
        if e_ptr <= s_ptr {
            // Empty cell: no segment in the file starts with these two bytes.
            return Ok(Vec::new());
        }

        let rec_size = self.version.segment_record_size();
        let mut record = [0u8; MAX_SEGMENT_RECORD];
        let record = &mut record[..rec_size];

        let mut l: u64 = 0;
        let mut h: u64 = (e_ptr - s_ptr) as u64 / rec_size as u64;
        let mut data_ptr: u32 = 0;
        let mut data_len: u16 = 0;

        while l <= h {
            let m = (l + h) >> 1;
            let p = s_ptr as u64 + m * rec_size as u64;
            self.store.read_into(p, record)?;

            if self.version.compare_key(key, record, 0) == Ordering::Less {
                if m == 0 {
                    break;
                }
                h = m - 1;
            } else if self.version.compare_key(key, record, key_len) == Ordering::Greater {
                l = m + 1;
            } else {
                data_len = u16_le(record, 2 * key_len)?;
                data_ptr = u32_le(record, 2 * key_len + 2)?;
                break;
            }
        }

        // data_len == 0 covers both a miss and the explicit no-match
        // sentinel; neither reads the payload region.
        if data_len == 0 {
            return Ok(Vec::new());
        }
        self.store.read(data_ptr as u64, data_len as usize)
    }

    fn check_file_version(&self) -> Result<()> {
        if self.header.structure_version == STRUCTURE_V2 && self.version == Version::V6 {
            return Err(Error::UnsupportedStructure(STRUCTURE_V2));
        }
        if self.header.ip_version != self.version {
            return Err(Error::VersionMismatch {
                engine: self.version,
                found: format!("file is {}", self.header.ip_version),
            });
        }
        Ok(())
    }
}

/// Read the 524288-byte vector index block from an XDB file, for feeding
/// [`Searcher::open_with_vector_index`].
pub fn load_vector_index<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let mut file = File::open(path.as_ref())?;
    file.seek(SeekFrom::Start(VECTOR_INDEX_OFFSET))?;
    let mut buf = vec![0u8; VECTOR_INDEX_LEN];
    file.read_exact(&mut buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::ShortRead {
                offset: VECTOR_INDEX_OFFSET,
                want: VECTOR_INDEX_LEN,
            }
        } else {
            Error::Io(e)
        }
    })?;
    Ok(buf)
}

/// Read a whole XDB file, for feeding [`Searcher::open_with_buffer`].
pub fn load_content<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    Ok(std::fs::read(path.as_ref())?)
}
