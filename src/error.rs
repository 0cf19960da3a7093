//! Error types for ipregion.

use thiserror::Error;

use crate::version::Version;

/// Error type for ipregion operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Text that parses as neither an IPv4 nor an IPv6 address
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),

    /// Key or file does not match the engine's IP version
    #[error("version mismatch: engine is {engine}, {found}")]
    VersionMismatch { engine: Version, found: String },

    /// Unsupported XDB structure version
    #[error("unsupported structure version: {0}")]
    UnsupportedStructure(u16),

    /// Header declares an IP version other than 4 or 6
    #[error("unsupported IP version in header: {0}")]
    UnsupportedIpVersion(u16),

    /// File exceeds what the header's pointer width can address
    #[error("file size {file_size} exceeds the {ptr_bytes}-byte pointer limit")]
    FileTooLarge { file_size: u64, ptr_bytes: u16 },

    /// IO error from open/seek/stat on the backing file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes available than requested
    #[error("short read: wanted {want} bytes at offset {offset}")]
    ShortRead { offset: u64, want: usize },

    /// Decode past the end of a buffer (corrupt or truncated file)
    #[error("short buffer: wanted {want} bytes at offset {offset} of a {len}-byte buffer")]
    ShortBuffer {
        offset: usize,
        want: usize,
        len: usize,
    },

    /// Vector index slice has the wrong length
    #[error("vector index must be {expected} bytes, got {actual}")]
    InvalidVectorIndex { expected: usize, actual: usize },

    /// Operation on a closed searcher
    #[error("searcher is closed")]
    Closed,

    /// Global searcher used before initialization
    #[error("searcher not initialized")]
    NotInitialized,

    /// Global searcher initialized twice
    #[error("global searcher already initialized")]
    AlreadyInitialized,
}

/// Result type alias for ipregion operations.
pub type Result<T> = std::result::Result<T, Error>;
