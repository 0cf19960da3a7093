//! In-memory XDB image builder for tests and benches.
//!
//! Assembles structurally valid databases: a 256-byte header, the dense
//! 256x256 vector index, region payloads, and sorted segment records with
//! IPv4 endpoints reversed at rest. Building real database files is not a
//! library feature, so this lives with the tests.
//!
//! One format constraint matters when authoring fixtures: a vector cell
//! whose `sPtr` equals its `ePtr` reads as empty, so every populated
//! two-byte prefix must hold at least two records, and each segment must
//! stay within a single prefix.

use ipregion::{parse_ip, Version};

pub const HEADER_LEN: usize = 256;
pub const VECTOR_INDEX_LEN: usize = 256 * 256 * 8;

struct Segment {
    low: Vec<u8>,
    high: Vec<u8>,
    region: Vec<u8>,
}

pub struct XdbFixture {
    version: Version,
    structure_version: u16,
    runtime_ptr_bytes: u16,
    segments: Vec<Segment>,
}

impl XdbFixture {
    pub fn v4() -> Self {
        Self::new(Version::V4)
    }

    pub fn v6() -> Self {
        Self::new(Version::V6)
    }

    fn new(version: Version) -> Self {
        Self {
            version,
            structure_version: 3,
            runtime_ptr_bytes: 4,
            segments: Vec::new(),
        }
    }

    pub fn structure_version(mut self, v: u16) -> Self {
        self.structure_version = v;
        self
    }

    pub fn runtime_ptr_bytes(mut self, bytes: u16) -> Self {
        self.runtime_ptr_bytes = bytes;
        self
    }

    /// Add an inclusive `[low, high]` range mapping to `region` (an empty
    /// region becomes a zero-length sentinel record).
    pub fn segment(mut self, low: &str, high: &str, region: &str) -> Self {
        let low = parse_ip(low).expect("fixture low endpoint").as_bytes().to_vec();
        let high = parse_ip(high)
            .expect("fixture high endpoint")
            .as_bytes()
            .to_vec();
        assert_eq!(low.len(), self.version.key_len(), "endpoint width");
        assert_eq!(high.len(), self.version.key_len(), "endpoint width");
        assert_eq!(
            (low[0], low[1]),
            (high[0], high[1]),
            "fixture segments must stay within one two-byte prefix"
        );
        assert!(low <= high, "fixture range must be ordered");
        self.segments.push(Segment {
            low,
            high,
            region: region.as_bytes().to_vec(),
        });
        self
    }

    /// Assemble the complete file image.
    pub fn build(&self) -> Vec<u8> {
        let key_len = self.version.key_len();
        let rec_size = self.version.segment_record_size();

        let mut segments: Vec<&Segment> = self.segments.iter().collect();
        segments.sort_by(|a, b| a.low.cmp(&b.low));

        // Payload region sits between the vector index and the records.
        let payload_base = HEADER_LEN + VECTOR_INDEX_LEN;
        let mut payloads = Vec::new();
        let mut payload_at = Vec::with_capacity(segments.len());
        for seg in &segments {
            payload_at.push(payload_base + payloads.len());
            payloads.extend_from_slice(&seg.region);
        }

        let records_base = payload_base + payloads.len();
        let records_len = segments.len() * rec_size;
        let mut image = vec![0u8; records_base + records_len];

        // Header.
        image[0..2].copy_from_slice(&self.structure_version.to_le_bytes());
        image[2..4].copy_from_slice(&1u16.to_le_bytes());
        image[4..8].copy_from_slice(&1_700_000_000u32.to_le_bytes());
        image[8..12].copy_from_slice(&(records_base as u32).to_le_bytes());
        image[12..16].copy_from_slice(&((records_base + records_len) as u32).to_le_bytes());
        if self.structure_version >= 3 {
            image[16..18].copy_from_slice(&self.version.id().to_le_bytes());
            image[18..20].copy_from_slice(&self.runtime_ptr_bytes.to_le_bytes());
        }

        // Payloads.
        image[payload_base..records_base].copy_from_slice(&payloads);

        // Segment records, ascending by low key; v4 endpoints reversed.
        for (idx, seg) in segments.iter().enumerate() {
            let off = records_base + idx * rec_size;
            let (mut low, mut high) = (seg.low.clone(), seg.high.clone());
            if self.version == Version::V4 {
                low.reverse();
                high.reverse();
            }
            image[off..off + key_len].copy_from_slice(&low);
            image[off + key_len..off + 2 * key_len].copy_from_slice(&high);
            let (data_len, data_ptr) = if seg.region.is_empty() {
                (0u16, 0u32)
            } else {
                (seg.region.len() as u16, payload_at[idx] as u32)
            };
            image[off + 2 * key_len..off + 2 * key_len + 2].copy_from_slice(&data_len.to_le_bytes());
            image[off + 2 * key_len + 2..off + rec_size].copy_from_slice(&data_ptr.to_le_bytes());
        }

        // Vector cells bracket the records sharing their two-byte prefix;
        // ePtr points at the last record, untouched cells stay (0, 0).
        for (idx, seg) in segments.iter().enumerate() {
            let cell = HEADER_LEN + seg.low[0] as usize * 256 * 8 + seg.low[1] as usize * 8;
            let rec_ptr = (records_base + idx * rec_size) as u32;
            let s_ptr = u32::from_le_bytes(image[cell..cell + 4].try_into().unwrap());
            if s_ptr == 0 {
                image[cell..cell + 4].copy_from_slice(&rec_ptr.to_le_bytes());
            }
            image[cell + 4..cell + 8].copy_from_slice(&rec_ptr.to_le_bytes());
        }

        image
    }

    /// Linear reference oracle: scan every fixture segment for one
    /// containing `key`, ignoring the vector index and binary search.
    pub fn reference_lookup(&self, key: &[u8]) -> Vec<u8> {
        for seg in &self.segments {
            if seg.low.as_slice() <= key && key <= seg.high.as_slice() {
                // Prefixes holding a single record read as empty cells.
                let siblings = self
                    .segments
                    .iter()
                    .filter(|s| (s.low[0], s.low[1]) == (seg.low[0], seg.low[1]))
                    .count();
                if siblings < 2 {
                    return Vec::new();
                }
                return seg.region.clone();
            }
        }
        Vec::new()
    }

    /// Write the image to a file inside `dir` and return its path.
    pub fn write_to(&self, dir: &std::path::Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).expect("write fixture");
        path
    }
}
