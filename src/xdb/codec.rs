//! Bounded little-endian decoding over read-only byte slices.

use crate::error::{Error, Result};

/// Decode a little-endian u16 at `off`.
pub fn u16_le(buf: &[u8], off: usize) -> Result<u16> {
    let end = off.checked_add(2).filter(|&e| e <= buf.len()).ok_or(
        Error::ShortBuffer {
            offset: off,
            want: 2,
            len: buf.len(),
        },
    )?;
    Ok(u16::from_le_bytes([buf[end - 2], buf[end - 1]]))
}

/// Decode a little-endian u32 at `off`.
///
/// The value is always an unsigned 32-bit quantity; file offsets above
/// 2 GiB must not sign-extend.
pub fn u32_le(buf: &[u8], off: usize) -> Result<u32> {
    let end = off.checked_add(4).filter(|&e| e <= buf.len()).ok_or(
        Error::ShortBuffer {
            offset: off,
            want: 4,
            len: buf.len(),
        },
    )?;
    Ok(u32::from_le_bytes([
        buf[end - 4],
        buf[end - 3],
        buf[end - 2],
        buf[end - 1],
    ]))
}
