//! The XDB binary index format and its lookup engine.
//!
//! An XDB file maps inclusive IP ranges to opaque region payloads. The
//! same structure serves IPv4 (4-byte keys, 14-byte records) and IPv6
//! (16-byte keys, 38-byte records); all integers are little-endian.
//!
//! # File Structure
//!
//! ```text
//! +------------------+
//! |      HEADER      |  256 bytes (fixed)
//! +------------------+
//! |   VECTOR INDEX   |  256 x 256 x 8 bytes (fixed)
//! +------------------+
//! |  REGION PAYLOADS |  variable, pointed to by segment records
//! +------------------+
//! |  SEGMENT INDEX   |  [start_index_ptr, end_index_ptr), S-byte records
//! +------------------+
//! ```
//!
//! The vector index bounds every lookup to the records sharing the key's
//! first two bytes, so the binary search touches a handful of records no
//! matter how large the file grows.

mod codec;
mod header;
mod searcher;
mod store;


pub use codec::{u16_le, u32_le};
pub use header::{
    verify, Header, HEADER_LEN, STRUCTURE_V2, STRUCTURE_V3, VECTOR_CELL_SIZE, VECTOR_INDEX_COLS,
    VECTOR_INDEX_LEN, VECTOR_INDEX_OFFSET, VECTOR_INDEX_ROWS,
};
pub use searcher::{load_content, load_vector_index, Searcher};
