use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::seed::{MAX_KMER_WIDTH, MIN_KMER_WIDTH};

// ---------------------------------------------------------------------------
// Run mode enum
// ---------------------------------------------------------------------------

/// methmap's `--mode` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    MakeDb,
    Map,
}

impl std::str::FromStr for RunMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "makedb" => Ok(Self::MakeDb),
            "map" => Ok(Self::Map),
            _ => Err(format!("unknown mode '{s}'; expected 'makedb' or 'map'")),
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MakeDb => write!(f, "makedb"),
            Self::Map => write!(f, "map"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters struct
// ---------------------------------------------------------------------------

/// methmap command-line parameters.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "methmap",
    about = "Bisulfite-sequencing short-read aligner",
    version
)]
pub struct Parameters {
    /// Run mode: makedb (build a reference index) or map (align reads)
    #[arg(long = "mode", default_value = "map")]
    pub run_mode: RunMode,

    // ── makedb ──────────────────────────────────────────────────────────
    /// Reference FASTA file, or a directory of '.fa' files
    #[arg(long, short = 'c')]
    pub chrom: Option<PathBuf>,

    /// k-mer width of the seed hash prefix
    #[arg(long, short = 'k', default_value_t = 13)]
    pub kmer: u32,

    // ── map ─────────────────────────────────────────────────────────────
    /// Index header written by makedb (the '.dbindex' file)
    #[arg(long, short = 'i')]
    pub index: Option<PathBuf>,

    /// Single-end FASTQ reads, plain or gzip-compressed
    #[arg(long, short = 'r')]
    pub reads: Option<PathBuf>,

    /// Maximum mismatches reported per alignment
    #[arg(long = "max-mismatches", short = 'm', default_value_t = 6)]
    pub max_mismatches: u32,

    /// Number of reads loaded and mapped per batch
    #[arg(long = "batch-size", short = 'N', default_value_t = 1_000_000)]
    pub batch_size: usize,

    /// Also write ambiguously mapped reads to <output>_ambiguous
    #[arg(long, short = 'a')]
    pub ambiguous: bool,

    /// Also write unmapped reads to <output>_unmapped
    #[arg(long, short = 'u')]
    pub unmapped: bool,

    /// Map with the G->A conversion instead of the default C->T
    #[arg(long = "ag-wildcard", short = 'A')]
    pub ag_wildcard: bool,

    // ── shared ──────────────────────────────────────────────────────────
    /// Output path: the index header for makedb (suffix must be
    /// '.dbindex'), the mapped-read file for map
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl Parameters {
    /// Validate parameter combinations that clap alone cannot enforce.
    pub fn validate(&self) -> Result<(), Error> {
        let output = self
            .output
            .as_ref()
            .ok_or_else(|| Error::Parameter("--output is required".into()))?;

        match self.run_mode {
            RunMode::MakeDb => {
                if self.chrom.is_none() {
                    return Err(Error::Parameter(
                        "--chrom is required when --mode makedb".into(),
                    ));
                }
                if output.extension().is_none_or(|ext| ext != "dbindex") {
                    return Err(Error::Parameter(
                        "the suffix of the output file should be '.dbindex'".into(),
                    ));
                }
                if !(MIN_KMER_WIDTH..=MAX_KMER_WIDTH).contains(&self.kmer) {
                    return Err(Error::Parameter(format!(
                        "the k-mer width should be in [{MIN_KMER_WIDTH}, {MAX_KMER_WIDTH}]"
                    )));
                }
            }
            RunMode::Map => {
                if self.index.is_none() {
                    return Err(Error::Parameter(
                        "--index is required when --mode map".into(),
                    ));
                }
                if self.reads.is_none() {
                    return Err(Error::Parameter(
                        "--reads is required when --mode map".into(),
                    ));
                }
                if self.batch_size == 0 {
                    return Err(Error::Parameter("--batch-size must be >= 1".into()));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
