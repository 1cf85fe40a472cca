pub mod io;

use std::collections::HashSet;

use crate::alphabet::{c_to_t, g_to_a, Conversion};
use crate::error::Error;
use crate::genome::fasta::identify_chromosome_files;
use crate::genome::Genome;
use crate::params::Parameters;
use crate::seed::{SeedScheme, F2_SEED_POSITIONS};

/// Per-bucket population cap. Buckets counting more positions than this are
/// dropped from the index entirely; the mapper applies the same constant to
/// refined ranges at query time.
pub const EXTREMAL_BUCKET_CAP: u32 = 50_000;

/// The four conversion/orientation variants built per reference, in file
/// order: suffix, conversion, whether the genome is reverse-complemented.
pub const STRAND_VARIANTS: [(&str, Conversion, bool); 4] = [
    ("_CT00", Conversion::CtoT, false),
    ("_CT01", Conversion::CtoT, true),
    ("_GA10", Conversion::GtoA, false),
    ("_GA11", Conversion::GtoA, true),
];

/// Spaced-seed hash table over one converted genome strand.
///
/// `counter` holds `4^K + 1` prefix-sum bucket boundaries into `index`;
/// `index` holds genome positions grouped by prefix hash, each bucket sorted
/// lexicographically by the bases at the tail care positions.
#[derive(Debug)]
pub struct HashTable {
    pub counter: Vec<u32>,
    pub index: Vec<u32>,
}

impl HashTable {
    /// Empty table with buffers sized for reloading strand payloads without
    /// reallocation.
    pub fn with_capacity(scheme: &SeedScheme, max_index_size: usize) -> Self {
        Self {
            counter: vec![0; scheme.counter_len()],
            index: Vec::with_capacity(max_index_size),
        }
    }

    pub fn index_size(&self) -> u32 {
        *self.counter.last().expect("counter is never empty")
    }

    /// Build the table for a post-conversion genome.
    pub fn build(genome: &Genome, scheme: &SeedScheme) -> Self {
        Self::build_with_cap(genome, scheme, EXTREMAL_BUCKET_CAP)
    }

    fn build_with_cap(genome: &Genome, scheme: &SeedScheme, cap: u32) -> Self {
        let counter_len = scheme.counter_len();
        let mut counter = vec![0u32; counter_len];

        // Pass 1: count qualifying positions into counter[h + 1].
        for_each_seed_position(genome, scheme, |pos| {
            let h = scheme.hash(&genome.sequence[pos..]) as usize;
            counter[h + 1] += 1;
        });

        // Drop extremal buckets before the prefix sum so they end up empty.
        let mut extremal_large_bucket: HashSet<u32> = HashSet::new();
        for h in 0..counter_len - 1 {
            if counter[h + 1] > cap {
                extremal_large_bucket.insert(h as u32);
                counter[h + 1] = 0;
            }
        }

        for h in 0..counter_len - 1 {
            counter[h + 1] += counter[h];
        }
        let index_size = counter[counter_len - 1] as usize;
        let mut index = vec![0u32; index_size];

        // Pass 2: scatter, advancing each bucket's write pointer in place.
        for_each_seed_position(genome, scheme, |pos| {
            let h = scheme.hash(&genome.sequence[pos..]);
            if extremal_large_bucket.contains(&h) {
                return;
            }
            index[counter[h as usize] as usize] = pos as u32;
            counter[h as usize] += 1;
        });

        // The scatter advanced counter[h] to the end of bucket h; shifting
        // right restores the start boundaries.
        for h in (1..counter_len).rev() {
            counter[h] = counter[h - 1];
        }
        counter[0] = 0;

        // Sort each bucket by the tail care positions. Probes past a
        // chromosome end read real buffer bytes (sentinel included); the
        // mapper's refinement reads the same bytes, so the ordering holds.
        let tail = &F2_SEED_POSITIONS[scheme.kmer_width()..];
        for h in 0..counter_len - 1 {
            let (lo, hi) = (counter[h] as usize, counter[h + 1] as usize);
            if hi - lo > 1 {
                index[lo..hi].sort_by(|&a, &b| {
                    let key_a = tail.iter().map(|&p| genome.sequence[(a + p) as usize]);
                    let key_b = tail.iter().map(|&p| genome.sequence[(b + p) as usize]);
                    key_a.cmp(key_b)
                });
            }
        }

        HashTable { counter, index }
    }
}

/// Visit every genome position whose hash span fits inside a chromosome.
fn for_each_seed_position<F: FnMut(usize)>(genome: &Genome, scheme: &SeedScheme, mut f: F) {
    let hash_span = scheme.hash_span();
    for c in 0..genome.num_chromosomes() {
        let start = genome.start_index[c] as usize;
        let end = genome.start_index[c + 1] as usize;
        if end - start < hash_span {
            continue;
        }
        for pos in start..=(end - hash_span) {
            f(pos);
        }
    }
}

/// Build and persist the four strand payloads plus the shared header.
pub fn build_index(params: &Parameters) -> Result<(), Error> {
    let scheme = SeedScheme::new(params.kmer)?;
    let chrom = params
        .chrom
        .as_ref()
        .ok_or_else(|| Error::Parameter("--chrom is required for makedb".into()))?;
    let output = params
        .output
        .as_ref()
        .ok_or_else(|| Error::Parameter("--output is required for makedb".into()))?;

    let chrom_files = identify_chromosome_files(chrom)?;
    let base = Genome::from_fasta(&chrom_files)?;
    log::info!(
        "loaded {} chromosomes, {} bases",
        base.num_chromosomes(),
        base.length_of_genome
    );

    let mut max_index_size = 0u32;
    for (suffix, conversion, reverse) in STRAND_VARIANTS {
        log::info!(
            "building {:?} index for the {} strand",
            conversion,
            if reverse { "reverse" } else { "forward" }
        );

        let mut genome = base.clone();
        if reverse {
            genome.reverse_complement();
        }
        match conversion {
            Conversion::CtoT => c_to_t(&mut genome.sequence),
            Conversion::GtoA => g_to_a(&mut genome.sequence),
        }

        let table = HashTable::build(&genome, &scheme);
        log::info!("{} positions indexed", table.index_size());

        io::write_strand_index(&io::strand_path(output, suffix), &genome, &table)?;
        max_index_size = max_index_size.max(table.index_size());
    }

    io::write_header(output, &base, &scheme, max_index_size)?;
    log::info!("index written to {}", output.display());
    Ok(())
}
