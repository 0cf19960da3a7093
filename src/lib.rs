//! ipregion - IP-to-region lookup over the XDB binary index format.
//!
//! This crate answers "which geographic region does this IP address belong
//! to?" by looking the address up in a pre-built, read-only XDB file. It
//! serves IPv4 and IPv6 from structurally identical files, at memory
//! footprints ranging from a few KiB plus the file to everything resident
//! in RAM, with microsecond-scale queries.
//!
//! # Features
//!
//! - **Three access strategies**: seek-per-read file handle, file handle
//!   with the vector index preloaded, or the whole database buffered
//!   (owned bytes or a memory mapping) - all returning identical results
//! - **IPv4 and IPv6**: 4- and 16-byte keys share one search algorithm
//! - **I/O accounting**: a per-query counter reports exactly how many
//!   reads a lookup issued against the backing file
//! - **Result caching**: an LRU-cached, hot-reloadable wrapper for
//!   high-traffic services
//!
//! # Quick Start
//!
//! ```ignore
//! use ipregion::{Searcher, Version};
//!
//! let mut searcher = Searcher::open(Version::V4, "ip2region_v4.xdb")?;
//! let region = searcher.search("61.142.118.231")?;
//! println!("{}", String::from_utf8_lossy(&region));
//! ```
//!
//! An empty payload means the address is well-formed but no range in the
//! database contains it; it is not an error.
//!
//! # Memory vs. speed
//!
//! ```ignore
//! use ipregion::{xdb, Searcher, Version};
//!
//! // Smallest footprint: every read seeks the file.
//! let file_backed = Searcher::open(Version::V4, path)?;
//!
//! // Middle ground: the 512 KiB vector index lives in memory, so the
//! // prefilter costs no I/O and each query touches only segment records.
//! let vi = xdb::load_vector_index(path)?;
//! let prefetched = Searcher::open_with_vector_index(Version::V4, path, vi)?;
//!
//! // Fastest: the whole file resident, zero I/O per query.
//! let buffered = Searcher::open_with_buffer(Version::V4, xdb::load_content(path)?)?;
//! let mapped = Searcher::open_mmap(Version::V4, path)?;
//! ```
//!
//! # Shared engines
//!
//! A [`Searcher`] owns a seek position and an I/O counter, so queries take
//! `&mut self`. To share one engine across threads use [`CachedSearcher`],
//! which adds locking, an LRU result cache, and atomic hot reload - or the
//! process-wide [`init_global`]/[`lookup`] pair.

mod cached;
mod error;
mod global;
mod ip;
mod version;

pub mod xdb;

// Re-export core types
pub use error::{Error, Result};
pub use ip::{parse_ip, IpKey};
pub use version::Version;

// Re-export the search engine
pub use xdb::{verify, Searcher};

// Re-export the cached searcher
pub use cached::{CacheStats, CachedSearcher, CachedSearcherConfig};

// Re-export the global convenience API
pub use global::{init_global, init_global_from_buffer, is_global_initialized, lookup};
