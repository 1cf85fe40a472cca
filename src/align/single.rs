//! Per-read seed-and-extend search against one loaded strand index.

use crate::alphabet::{convert_read, Conversion};
use crate::genome::Genome;
use crate::index::{HashTable, EXTREMAL_BUCKET_CAP};
use crate::seed::{SeedScheme, F2_SEED_POSITIONS, SEED_PATTERN_LEN};

use super::BestMatch;

/// Leftmost entry of the inclusive range `[low, high]` whose genome base at
/// `position + cmp_pos` is `>= target`; `high` when none is.
fn lower_bound(
    mut low: u32,
    mut high: u32,
    target: u8,
    cmp_pos: u32,
    genome: &Genome,
    table: &HashTable,
) -> u32 {
    while low < high {
        let mid = low + (high - low) / 2;
        let base = genome.sequence[(table.index[mid as usize] + cmp_pos) as usize];
        if base >= target {
            high = mid;
        } else {
            low = mid + 1;
        }
    }
    low
}

/// Rightmost entry of the inclusive range `[low, high]` whose genome base at
/// `position + cmp_pos` is `<= target`; `low` when none is.
fn upper_bound(
    mut low: u32,
    mut high: u32,
    target: u8,
    cmp_pos: u32,
    genome: &Genome,
    table: &HashTable,
) -> u32 {
    while low < high {
        let mid = low + (high - low + 1) / 2;
        let base = genome.sequence[(table.index[mid as usize] + cmp_pos) as usize];
        if base <= target {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    low
}

/// Narrow a bucket `[lo, hi)` by each tail care position in turn, returning
/// the surviving inclusive range. The bucket sort guarantees entries agreeing
/// on earlier care positions are ordered by the next one, which is what makes
/// the nested binary searches valid.
pub(crate) fn refine_region(
    window: &[u8],
    genome: &Genome,
    table: &HashTable,
    scheme: &SeedScheme,
    seed_len: usize,
    lo: u32,
    hi: u32,
) -> Option<(u32, u32)> {
    let mut low = lo;
    let mut high = hi - 1;
    for &p in &F2_SEED_POSITIONS[scheme.kmer_width()..seed_len] {
        let target = window[p as usize];
        low = lower_bound(low, high, target, p, genome, table);
        high = upper_bound(low, high, target, p, genome, table);
    }
    if low > high {
        None
    } else {
        Some((low, high))
    }
}

/// Map one read against the loaded `(conversion, strand)` index, improving
/// `best` in place.
///
/// The read is converted, then each seed shift is tried in turn: hash the
/// prefix care positions, narrow the bucket over the remaining care
/// positions, and verify every surviving candidate against the reference,
/// counting mismatches no further than the current floor. Single-end mapping
/// stops shifting once a mismatch-free hit exists.
pub fn map_single_read(
    org_read: &[u8],
    genome: &Genome,
    table: &HashTable,
    scheme: &SeedScheme,
    strand: char,
    conversion: Conversion,
    best: &mut BestMatch,
) {
    let read_len = org_read.len();
    let hash_span = scheme.hash_span();
    if read_len < hash_span {
        return;
    }
    let seed_len = scheme.seed_length(read_len);
    let read = convert_read(org_read, conversion);

    for shift in 0..SEED_PATTERN_LEN {
        if best.mismatch == 0 && shift > 0 {
            break;
        }
        if shift + hash_span > read_len {
            break;
        }

        let window = &read[shift..];
        let h = scheme.hash(window) as usize;
        let (lo, hi) = (table.counter[h], table.counter[h + 1]);
        if lo == hi {
            continue;
        }

        let Some((low, high)) = refine_region(window, genome, table, scheme, seed_len, lo, hi)
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
                    if mismatches > best.mismatch {
                        break;
                    }
                }
            }
            if mismatches > best.mismatch {
                continue;
            }

            if mismatches < best.mismatch || best.times == 0 {
                *best = BestMatch {
                    genome_pos,
                    times: 1,
                    strand,
                    mismatch: mismatches,
                };
            } else if mismatches == best.mismatch && genome_pos != best.genome_pos {
                best.genome_pos = genome_pos;
                best.strand = strand;
                best.times += 1;
            }
        }
    }
}
