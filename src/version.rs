//! IP version descriptors and the on-disk key comparator.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

/// IP version an XDB file is built for.
///
/// The version fixes the key width and therefore the segment index record
/// size: `low_key[N] ++ high_key[N] ++ data_len[u16] ++ data_ptr[u32]`,
/// giving 14 bytes for IPv4 and 38 for IPv6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    V4,
    V6,
}

impl Version {
    /// Numeric version id as stored in the XDB header.
    pub fn id(self) -> u16 {
        match self {
            Version::V4 => 4,
            Version::V6 => 6,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Version::V4 => "IPv4",
            Version::V6 => "IPv6",
        }
    }

    /// Key width in bytes: 4 for IPv4, 16 for IPv6.
    pub const fn key_len(self) -> usize {
        match self {
            Version::V4 => 4,
            Version::V6 => 16,
        }
    }

    /// Size in bytes of one segment index record.
    pub const fn segment_record_size(self) -> usize {
        2 * self.key_len() + 2 + 4
    }

    /// Resolve a header version id.
    pub fn from_id(id: u16) -> Result<Self> {
        match id {
            4 => Ok(Version::V4),
            6 => Ok(Version::V6),
            other => Err(Error::UnsupportedIpVersion(other)),
        }
    }

    /// Compare a canonical network-order key against a key field inside a
    /// segment index record.
    ///
    /// IPv6 endpoints are stored in natural network order and compare as a
    /// plain byte-wise memcmp. IPv4 endpoints are stored reversed at rest,
    /// so the key walks forward while the record field is read backward.
    /// The probe key itself is never byte-swapped.
    pub(crate) fn compare_key(self, key: &[u8], record: &[u8], at: usize) -> Ordering {
        let n = self.key_len();
        debug_assert_eq!(key.len(), n);
        match self {
            Version::V6 => key.cmp(&record[at..at + n]),
            Version::V4 => {
                for i in 0..n {
                    let ord = key[i].cmp(&record[at + n - 1 - i]);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            }
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
