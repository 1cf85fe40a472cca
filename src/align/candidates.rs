//! Top-k candidate collection consumed by the paired-end pairing layer.

use std::collections::BinaryHeap;

use crate::alphabet::{convert_read, Conversion};
use crate::genome::Genome;
use crate::index::{HashTable, EXTREMAL_BUCKET_CAP};
use crate::seed::{SeedScheme, SEED_PATTERN_LEN};

/// One candidate genome position with its mismatch count. Ordering (and
/// equality) consider the mismatch count only, so a `BinaryHeap` of
/// candidates keeps the worst one on top.
#[derive(Debug, Clone, Copy)]
pub struct CandidatePosition {
    pub genome_pos: u32,
    pub strand: char,
    pub mismatch: u32,
}

impl PartialEq for CandidatePosition {
    fn eq(&self, other: &Self) -> bool {
        self.mismatch == other.mismatch
    }
}

impl Eq for CandidatePosition {}

impl PartialOrd for CandidatePosition {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidatePosition {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.mismatch.cmp(&other.mismatch)
    }
}

/// Bounded max-heap retaining the k smallest-mismatch candidates for one
/// read. On overflow a strictly better candidate evicts the current worst;
/// ties are kept only up to capacity.
#[derive(Debug)]
pub struct TopCandidates {
    heap: BinaryHeap<CandidatePosition>,
    capacity: usize,
}

impl TopCandidates {
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// The worst retained candidate, if any.
    pub fn peek(&self) -> Option<&CandidatePosition> {
        self.heap.peek()
    }

    pub fn pop(&mut self) -> Option<CandidatePosition> {
        self.heap.pop()
    }

    pub fn push(&mut self, candidate: CandidatePosition) {
        if self.heap.len() < self.capacity {
            self.heap.push(candidate);
        } else if let Some(worst) = self.heap.peek() {
            if candidate.mismatch < worst.mismatch {
                self.heap.pop();
                self.heap.push(candidate);
            }
        }
    }

    /// Drain into a vector ordered best (fewest mismatches) first.
    pub fn into_sorted_vec(self) -> Vec<CandidatePosition> {
        self.heap.into_sorted_vec()
    }
}

/// Collect every candidate position of one read with at most
/// `max_mismatches` mismatches against the loaded strand index.
///
/// Unlike the single-end search this explores all seed shifts even after a
/// mismatch-free hit, so the pairing layer sees the full tied set; the same
/// locus reached through different shifts may be pushed more than once.
pub fn map_read_candidates(
    org_read: &[u8],
    genome: &Genome,
    table: &HashTable,
    scheme: &SeedScheme,
    strand: char,
    conversion: Conversion,
    max_mismatches: u32,
    candidates: &mut TopCandidates,
) {
    let read_len = org_read.len();
    let hash_span = scheme.hash_span();
    if read_len < hash_span {
        return;
    }
    let seed_len = scheme.seed_length(read_len);
    let read = convert_read(org_read, conversion);

    for shift in 0..SEED_PATTERN_LEN {
        if shift + hash_span > read_len {
            break;
        }

        let window = &read[shift..];
        let h = scheme.hash(window) as usize;
        let (lo, hi) = (table.counter[h], table.counter[h + 1]);
        if lo == hi {
            continue;
        }

        let Some((low, high)) =
            super::single::refine_region(window, genome, table, scheme, seed_len, lo, hi)
        else {
            continue;
        };
        if high - low + 1 > EXTREMAL_BUCKET_CAP {
            continue;
        }

        for j in low..=high {
            let seed_pos = table.index[j as usize];
            let chrom = genome.chrom_id(seed_pos);
            if seed_pos - genome.start_index[chrom] < shift as u32 {
                continue;
            }
            let genome_pos = seed_pos - shift as u32;
            if genome_pos + read_len as u32 > genome.start_index[chrom + 1] {
                continue;
            }

            let mut mismatches = 0u32;
            for p in 0..read_len {
                if genome.sequence[genome_pos as usize + p] != read[p] {
                    mismatches += 1;
                    if mismatches > max_mismatches {
                        break;
                    }
                }
            }
            if mismatches <= max_mismatches {
                candidates.push(CandidatePosition {
                    genome_pos,
                    strand,
                    mismatch: mismatches,
                });
            }
        }
    }
}
