pub mod fasta;

use std::path::Path;

use crate::alphabet::complement;
use crate::error::Error;
use crate::seed::SEED_SENTINEL_LEN;

use fasta::parse_fasta_files;

/// Concatenated reference genome with per-chromosome metadata.
///
/// `sequence` holds all chromosomes back to back over `{A,C,G,T,N}`,
/// followed by a sentinel region of `N`s so seed probes reaching past the
/// last chromosome stay inside the buffer. Chromosome `i` occupies
/// `sequence[start_index[i]..start_index[i + 1]]`.
#[derive(Debug, Clone)]
pub struct Genome {
    /// Chromosome identifiers in file order.
    pub names: Vec<String>,

    /// Per-chromosome base counts.
    pub lengths: Vec<u32>,

    /// Prefix-sum offsets, `names.len() + 1` entries; the last entry equals
    /// `length_of_genome`.
    pub start_index: Vec<u32>,

    /// Total base count across all chromosomes (sentinel excluded).
    pub length_of_genome: u32,

    /// `length_of_genome + SEED_SENTINEL_LEN` bytes.
    pub sequence: Vec<u8>,
}

impl Genome {
    /// Build a genome by concatenating FASTA records.
    pub fn from_fasta<P: AsRef<Path>>(paths: &[P]) -> Result<Self, Error> {
        let chromosomes = parse_fasta_files(paths)?;

        let mut names = Vec::with_capacity(chromosomes.len());
        let mut lengths = Vec::with_capacity(chromosomes.len());
        let mut start_index = Vec::with_capacity(chromosomes.len() + 1);
        start_index.push(0u32);

        let mut total: u32 = 0;
        for chrom in &chromosomes {
            if chrom.sequence.is_empty() {
                return Err(Error::Fasta(format!(
                    "chromosome '{}' has zero length",
                    chrom.name
                )));
            }
            names.push(chrom.name.clone());
            lengths.push(chrom.sequence.len() as u32);
            total += chrom.sequence.len() as u32;
            start_index.push(total);
        }

        let mut sequence = Vec::with_capacity(total as usize + SEED_SENTINEL_LEN);
        for chrom in &chromosomes {
            sequence.extend_from_slice(&chrom.sequence);
        }
        sequence.resize(total as usize + SEED_SENTINEL_LEN, b'N');

        Ok(Genome {
            names,
            lengths,
            start_index,
            length_of_genome: total,
            sequence,
        })
    }

    pub fn num_chromosomes(&self) -> usize {
        self.names.len()
    }

    /// Greatest `i` with `start_index[i] <= pos`; callers only pass
    /// positions inside the genome, so the result is the containing
    /// chromosome.
    #[inline]
    pub fn chrom_id(&self, pos: u32) -> usize {
        self.start_index.partition_point(|&s| s <= pos) - 1
    }

    /// Reverse-complement every chromosome within its own region and rebuild
    /// `start_index` from the lengths.
    ///
    /// Reversing per chromosome (rather than the buffer as a whole) keeps
    /// names, lengths, and start offsets identical across all four strand
    /// payloads, which the mapping driver relies on when it emits
    /// forward-strand records after the reverse payload has been loaded.
    pub fn reverse_complement(&mut self) {
        for i in 0..self.num_chromosomes() {
            let start = self.start_index[i] as usize;
            let end = start + self.lengths[i] as usize;
            let region = &mut self.sequence[start..end];
            region.reverse();
            for b in region.iter_mut() {
                *b = complement(*b);
            }
        }

        self.start_index[0] = 0;
        for i in 0..self.num_chromosomes() {
            self.start_index[i + 1] = self.start_index[i] + self.lengths[i];
        }
    }
}
