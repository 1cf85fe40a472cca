//! Spaced-seed scheme shared bit-for-bit by the index builder and the mapper.
//!
//! The seed is periodic with period [`SEED_PATTERN_LEN`]: within each period
//! the first three positions are "care" positions and the fourth is ignored.
//! The first `K` care positions form the hash prefix; the remaining ones are
//! used only for in-bucket binary-search refinement.

use crate::error::Error;

/// Span of one seed-pattern period, and therefore also the number of
/// distinct seed shifts per read (shifting a periodic seed by its period
/// selects the same genome positions).
pub const SEED_PATTERN_LEN: usize = 4;

/// Care bitmap within one pattern period.
pub const F2_SEED_PATTERN: [u8; SEED_PATTERN_LEN] = [1, 1, 1, 0];

/// Ordered care-position offsets: the periodic extension of
/// [`F2_SEED_PATTERN`]. Entry `i` is `4 * (i / 3) + i % 3`.
pub const F2_SEED_POSITIONS: [u32; 64] = [
    0, 1, 2, 4, 5, 6, 8, 9, 10, 12, 13, 14, 16, 17, 18, 20, 21, 22, 24, 25, 26, 28, 29, 30, 32,
    33, 34, 36, 37, 38, 40, 41, 42, 44, 45, 46, 48, 49, 50, 52, 53, 54, 56, 57, 58, 60, 61, 62,
    64, 65, 66, 68, 69, 70, 72, 73, 74, 76, 77, 78, 80, 81, 82, 84,
];

/// Width of the sentinel region appended to the genome buffer so that sort
/// keys and refinement probes past the last chromosome stay in bounds.
pub const SEED_SENTINEL_LEN: usize =
    F2_SEED_POSITIONS[F2_SEED_POSITIONS.len() - 1] as usize + SEED_PATTERN_LEN;

/// Inclusive bounds on the configurable k-mer prefix width.
pub const MIN_KMER_WIDTH: u32 = 8;
pub const MAX_KMER_WIDTH: u32 = 14;

/// Two-bit base code used by the prefix hash (A=0, C=1, G=2, T=3).
#[inline]
fn base_code(base: u8) -> u32 {
    match base {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        b'T' => 3,
        _ => 0,
    }
}

/// The spaced-seed configuration threaded through both the builder and the
/// mapper. Builder and mapper must agree exactly or they disagree silently,
/// so the mapper always reconstructs this from the index header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedScheme {
    kmer_width: usize,
}

impl SeedScheme {
    pub fn new(kmer_width: u32) -> Result<Self, Error> {
        if !(MIN_KMER_WIDTH..=MAX_KMER_WIDTH).contains(&kmer_width) {
            return Err(Error::Parameter(format!(
                "k-mer width must be in [{MIN_KMER_WIDTH}, {MAX_KMER_WIDTH}], got {kmer_width}"
            )));
        }
        Ok(Self {
            kmer_width: kmer_width as usize,
        })
    }

    /// Number of care positions contributing to the hash prefix.
    #[inline]
    pub fn kmer_width(&self) -> usize {
        self.kmer_width
    }

    /// Size of the bucket-boundary array: `4^K + 1`.
    #[inline]
    pub fn counter_len(&self) -> usize {
        (1usize << (2 * self.kmer_width)) + 1
    }

    /// Number of buffer bytes the prefix hash consumes.
    #[inline]
    pub fn hash_span(&self) -> usize {
        F2_SEED_POSITIONS[self.kmer_width - 1] as usize + 1
    }

    /// Packed 2K-bit hash of the window's care positions, most-significant
    /// base pair first. The window must be at least `hash_span()` long.
    #[inline]
    pub fn hash(&self, window: &[u8]) -> u32 {
        let mut h = 0u32;
        for &p in &F2_SEED_POSITIONS[..self.kmer_width] {
            h = (h << 2) | base_code(window[p as usize]);
        }
        h
    }

    /// How many care positions a read of length `read_len` may exploit:
    /// every offset whose period still fits the read, clamped so at least
    /// the hash prefix and at most the full care list is used. Deterministic
    /// in `read_len`; longer reads get tighter buckets.
    pub fn seed_length(&self, read_len: usize) -> usize {
        let usable = F2_SEED_POSITIONS
            .iter()
            .take_while(|&&p| p as usize + SEED_PATTERN_LEN <= read_len)
            .count();
        usable.max(self.kmer_width).min(F2_SEED_POSITIONS.len())
    }
}
