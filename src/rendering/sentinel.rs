//! Deterministic placeholders for elided bodies.
//!
//! A sentinel records the line count of the original inner text and a short
//! FNV-1a hash of its exact bytes:
//!
//! ```text
//! { /* elided: 12 lines #9f3ac21b */ }
//! ```

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hex digits kept from the 64-bit hash.
pub const HASH_WIDTH: usize = 8;

/// Replacement for a body with no statements.
pub const EMPTY_BODY: &str = "{}";

/// 64-bit FNV-1a over raw bytes.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Line count after normalizing `\r\n` and `\r` to `\n`.
pub fn line_count(inner: &str) -> usize {
    let normalized = inner.replace("\r\n", "\n").replace('\r', "\n");
    normalized.split('\n').count()
}

/// Summary of one elided body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinel {
    pub lines: usize,
    pub hash: u64,
}

impl Sentinel {
    /// Build from the exact inner text between a body's braces.
    pub fn of(inner: &str) -> Self {
        Self {
            lines: line_count(inner),
            hash: fnv1a64(inner.as_bytes()),
        }
    }

    pub fn short_hash(&self) -> String {
        let full = format!("{:016x}", self.hash);
        full[..HASH_WIDTH].to_string()
    }

    /// Brace-wrapped comment replacing the whole body.
    pub fn render(&self) -> String {
        let unit = if self.lines == 1 { "line" } else { "lines" };
        format!("{{ /* elided: {} {} #{} */ }}", self.lines, unit, self.short_hash())
    }
}
