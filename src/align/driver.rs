//! Batched single-end mapping driver.
//!
//! Per batch the two same-conversion strand payloads are loaded in turn into
//! one shared `(genome, counter, index)` allocation, every read is mapped
//! under each, and the accumulated `BestMatch`es are classified into the
//! unique / ambiguous / unmapped sinks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::alphabet::Conversion;
use crate::error::Error;
use crate::index::io::{read_header, read_strand_index, strand_path};
use crate::index::HashTable;
use crate::io::fastq::FastqReader;
use crate::io::output::{write_mapped, write_unmapped};
use crate::params::Parameters;

use super::{map_single_read, BestMatch};

/// Classification counters for one mapping run.
#[derive(Debug, Default, Clone, Copy)]
pub struct MappingStats {
    pub total: u64,
    pub unique: u64,
    pub ambiguous: u64,
    pub unmapped: u64,
}

impl MappingStats {
    pub fn log_summary(&self) {
        let pct = |n: u64| {
            if self.total == 0 {
                0.0
            } else {
                100.0 * n as f64 / self.total as f64
            }
        };
        log::info!("total reads: {}", self.total);
        log::info!("uniquely mapped: {} ({:.2}%)", self.unique, pct(self.unique));
        log::info!(
            "ambiguously mapped: {} ({:.2}%)",
            self.ambiguous,
            pct(self.ambiguous)
        );
        log::info!("unmapped: {} ({:.2}%)", self.unmapped, pct(self.unmapped));
    }
}

fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

fn create_writer(path: &Path) -> Result<BufWriter<File>, Error> {
    Ok(BufWriter::new(
        File::create(path).map_err(|e| Error::io(e, path))?,
    ))
}

/// Map a single-end FASTQ file against a built index.
pub fn map_single_end(params: &Parameters) -> Result<MappingStats, Error> {
    let index_path = params
        .index
        .as_ref()
        .ok_or_else(|| Error::Parameter("--index is required for map".into()))?;
    let reads_path = params
        .reads
        .as_ref()
        .ok_or_else(|| Error::Parameter("--reads is required for map".into()))?;
    let output_path = params
        .output
        .as_ref()
        .ok_or_else(|| Error::Parameter("--output is required for map".into()))?;

    let (scheme, mut genome, max_index_size) = read_header(index_path)?;
    let mut table = HashTable::with_capacity(&scheme, max_index_size as usize);
    log::info!(
        "loaded index header: k = {}, {} chromosomes, up to {} positions per strand",
        scheme.kmer_width(),
        genome.num_chromosomes(),
        max_index_size
    );

    let (conversion, suffixes) = if params.ag_wildcard {
        (Conversion::GtoA, ["_GA10", "_GA11"])
    } else {
        (Conversion::CtoT, ["_CT00", "_CT01"])
    };

    let mut reader = FastqReader::open(reads_path)?;
    let mut out = create_writer(output_path)?;
    let mut ambiguous_out = if params.ambiguous {
        Some(create_writer(&suffixed_path(output_path, "_ambiguous"))?)
    } else {
        None
    };
    let mut unmapped_out = if params.unmapped {
        Some(create_writer(&suffixed_path(output_path, "_unmapped"))?)
    } else {
        None
    };

    log::info!("mapping reads from {}", reads_path.display());
    let mut stats = MappingStats::default();
    let mut results: Vec<BestMatch> = Vec::new();

    loop {
        let batch = reader.read_batch(params.batch_size)?;
        if batch.is_empty() {
            break;
        }

        results.clear();
        results.resize(batch.len(), BestMatch::new(params.max_mismatches));

        for (fi, suffix) in suffixes.iter().enumerate() {
            read_strand_index(&strand_path(index_path, suffix), &mut genome, &mut table)?;
            let strand = if fi == 0 { '+' } else { '-' };
            for (read, best) in batch.iter().zip(results.iter_mut()) {
                map_single_read(&read.seq, &genome, &table, &scheme, strand, conversion, best);
            }
        }

        for (read, best) in batch.iter().zip(&results) {
            if best.is_unmapped() {
                stats.unmapped += 1;
                if let Some(w) = unmapped_out.as_mut() {
                    write_unmapped(w, read).map_err(|e| Error::io(e, output_path))?;
                }
            } else if best.is_unique() {
                stats.unique += 1;
                write_mapped(&mut out, &genome, best, read)
                    .map_err(|e| Error::io(e, output_path))?;
            } else {
                stats.ambiguous += 1;
                if let Some(w) = ambiguous_out.as_mut() {
                    write_mapped(w, &genome, best, read).map_err(|e| Error::io(e, output_path))?;
                }
            }
        }

        stats.total += batch.len() as u64;
        log::info!("processed {} reads", stats.total);

        if batch.len() < params.batch_size {
            break;
        }
    }

    out.flush().map_err(|e| Error::io(e, output_path))?;
    if let Some(mut w) = ambiguous_out {
        w.flush().map_err(|e| Error::io(e, output_path))?;
    }
    if let Some(mut w) = unmapped_out {
        w.flush().map_err(|e| Error::io(e, output_path))?;
    }

    Ok(stats)
}
