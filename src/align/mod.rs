pub mod candidates;
pub mod driver;
pub mod single;

pub use candidates::{CandidatePosition, TopCandidates};
pub use driver::{map_single_end, MappingStats};
pub use single::map_single_read;

/// Running best-known alignment for one read.
///
/// `times` counts tied best candidates as they are visited: `0` means
/// unmapped, `1` uniquely mapped, `> 1` ambiguous. `mismatch` starts at the
/// configured maximum and only ever decreases. The stored position for an
/// ambiguous read is the last tied candidate visited; only the trichotomy is
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMatch {
    pub genome_pos: u32,
    pub times: u32,
    pub strand: char,
    pub mismatch: u32,
}

impl BestMatch {
    /// Fresh per-read state with the mismatch floor at `max_mismatches`.
    pub fn new(max_mismatches: u32) -> Self {
        Self {
            genome_pos: 0,
            times: 0,
            strand: '+',
            mismatch: max_mismatches,
        }
    }

    pub fn is_unmapped(&self) -> bool {
        self.times == 0
    }

    pub fn is_unique(&self) -> bool {
        self.times == 1
    }

    pub fn is_ambiguous(&self) -> bool {
        self.times > 1
    }
}
