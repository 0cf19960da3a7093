//! IP address parsing and key normalization.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{Error, Result};
use crate::version::Version;

/// A canonical network-order lookup key, 4 bytes for IPv4 or 16 for IPv6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpKey {
    V4([u8; 4]),
    V6([u8; 16]),
}

impl IpKey {
    /// The IP version this key belongs to.
    pub fn version(&self) -> Version {
        match self {
            IpKey::V4(_) => Version::V4,
            IpKey::V6(_) => Version::V6,
        }
    }

    /// The key bytes in network order.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IpKey::V4(b) => b,
            IpKey::V6(b) => b,
        }
    }
}

impl From<Ipv4Addr> for IpKey {
    fn from(addr: Ipv4Addr) -> Self {
        IpKey::V4(addr.octets())
    }
}

impl From<Ipv6Addr> for IpKey {
    fn from(addr: Ipv6Addr) -> Self {
        IpKey::V6(addr.octets())
    }
}

/// Parse an IP address string into a canonical key.
///
/// Accepts plain dotted-quad IPv4 and RFC 5952 IPv6 text. Mixed-form
/// addresses (`::ffff:1.2.3.4`) and zone-id suffixes (`fe80::1%eth0`) are
/// rejected.
pub fn parse_ip(text: &str) -> Result<IpKey> {
    let text = text.trim();

    if let Ok(v4) = text.parse::<Ipv4Addr>() {
        return Ok(v4.into());
    }

    // A dot inside IPv6 text means the mixed v4-in-v6 form.
    if !text.contains('.') {
        if let Ok(v6) = text.parse::<Ipv6Addr>() {
            return Ok(v6.into());
        }
    }

    Err(Error::InvalidAddress(text.to_string()))
}
