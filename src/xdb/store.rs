//! Backing store variants behind a uniform read contract.
//!
//! Three strategies serve the same byte ranges: a bare file handle that
//! seeks for every read, a file handle with the vector index preloaded in
//! memory, and a fully resident buffer (owned bytes or a memory mapping).
//! Search code above this layer cannot tell them apart except through the
//! per-query I/O counter.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use memmap2::Mmap;

use super::codec::u32_le;
use super::header::{VECTOR_CELL_SIZE, VECTOR_INDEX_COLS, VECTOR_INDEX_LEN, VECTOR_INDEX_OFFSET};
use crate::error::{Error, Result};

/// Fully resident database content.
#[derive(Debug)]
pub(crate) enum Content {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl AsRef<[u8]> for Content {
    fn as_ref(&self) -> &[u8] {
        match self {
            Content::Owned(v) => v,
            Content::Mapped(m) => m,
        }
    }
}

#[derive(Debug)]
enum Backing {
    File {
        file: File,
        vector_index: Option<Vec<u8>>,
    },
    Buffer(Content),
}

/// One engine's backing data plus its per-query I/O counter.
#[derive(Debug)]
pub(crate) struct Store {
    backing: Option<Backing>,
    io_count: u32,
}

impl Store {
    pub fn file(file: File) -> Self {
        Self {
            backing: Some(Backing::File {
                file,
                vector_index: None,
            }),
            io_count: 0,
        }
    }

    pub fn file_with_vector_index(file: File, vector_index: Vec<u8>) -> Result<Self> {
        if vector_index.len() != VECTOR_INDEX_LEN {
            return Err(Error::InvalidVectorIndex {
                expected: VECTOR_INDEX_LEN,
                actual: vector_index.len(),
            });
        }
        Ok(Self {
            backing: Some(Backing::File {
                file,
                vector_index: Some(vector_index),
            }),
            io_count: 0,
        })
    }

    pub fn buffer(content: Content) -> Self {
        Self {
            backing: Some(Backing::Buffer(content)),
            io_count: 0,
        }
    }

    /// I/O operations issued since the last reset.
    pub fn io_count(&self) -> u32 {
        self.io_count
    }

    /// Called at the top of every query so the counter reports per-query I/O.
    pub fn reset_io_count(&mut self) {
        self.io_count = 0;
    }

    /// Release the backing data. Idempotent.
    pub fn close(&mut self) {
        self.backing = None;
    }

    pub fn is_closed(&self) -> bool {
        self.backing.is_none()
    }

    /// Fill `buf` from the absolute file offset `offset`.
    pub fn read_into(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        match self.backing.as_mut().ok_or(Error::Closed)? {
            Backing::File { file, .. } => {
                file.seek(SeekFrom::Start(offset))?;
                file.read_exact(buf).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::UnexpectedEof {
                        Error::ShortRead {
                            offset,
                            want: buf.len(),
                        }
                    } else {
                        Error::Io(e)
                    }
                })?;
                self.io_count += 1;
                Ok(())
            }
            Backing::Buffer(content) => {
                let data = content.as_ref();
                let start = usize::try_from(offset).ok();
                let end = start.and_then(|s| s.checked_add(buf.len()));
                match (start, end) {
                    (Some(s), Some(e)) if e <= data.len() => {
                        buf.copy_from_slice(&data[s..e]);
                        Ok(())
                    }
                    _ => Err(Error::ShortRead {
                        offset,
                        want: buf.len(),
                    }),
                }
            }
        }
    }

    /// Read `len` bytes at `offset` into a fresh buffer.
    pub fn read(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_into(offset, &mut buf)?;
        Ok(buf)
    }

    /// Fetch the `(sPtr, ePtr)` pair for vector cell `(i, j)`.
    ///
    /// Served from memory without touching the file or the counter whenever
    /// the variant holds the vector index resident.
    pub fn vector_cell(&mut self, i: u8, j: u8) -> Result<(u32, u32)> {
        let cell = i as u64 * (VECTOR_INDEX_COLS * VECTOR_CELL_SIZE) as u64
            + j as u64 * VECTOR_CELL_SIZE as u64;

        match self.backing.as_ref().ok_or(Error::Closed)? {
            Backing::File {
                vector_index: Some(vi),
                ..
            } => {
                let off = cell as usize;
                return Ok((u32_le(vi, off)?, u32_le(vi, off + 4)?));
            }
            Backing::Buffer(content) => {
                let data = content.as_ref();
                let off = VECTOR_INDEX_OFFSET as usize + cell as usize;
                return Ok((u32_le(data, off)?, u32_le(data, off + 4)?));
            }
            Backing::File {
                vector_index: None, ..
            } => {}
        }

        let mut buf = [0u8; VECTOR_CELL_SIZE];
        self.read_into(VECTOR_INDEX_OFFSET + cell, &mut buf)?;
        Ok((u32_le(&buf, 0)?, u32_le(&buf, 4)?))
    }
}
