//! Tab-separated record writers for mapped and unmapped reads.

use std::io::{self, Write};

use crate::align::BestMatch;
use crate::genome::Genome;
use crate::io::fastq::FastqRecord;

/// Emit one mapped record:
/// `chrom \t start \t end \t name \t mismatches \t strand \t seq \t qual`.
///
/// Coordinates are 0-based, end-exclusive, always on the forward strand of
/// the original reference; reverse-strand hits are flipped within their
/// chromosome.
pub fn write_mapped<W: Write>(
    w: &mut W,
    genome: &Genome,
    best: &BestMatch,
    read: &FastqRecord,
) -> io::Result<()> {
    let chrom = genome.chrom_id(best.genome_pos);
    let mut start = best.genome_pos - genome.start_index[chrom];
    if best.strand == '-' {
        start = genome.lengths[chrom] - start - read.seq.len() as u32;
    }
    let end = start + read.seq.len() as u32;

    writeln!(
        w,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        genome.names[chrom],
        start,
        end,
        read.name,
        best.mismatch,
        best.strand,
        String::from_utf8_lossy(&read.seq),
        String::from_utf8_lossy(&read.qual),
    )
}

/// Emit one unmapped record: `name \t seq \t qual`.
pub fn write_unmapped<W: Write>(w: &mut W, read: &FastqRecord) -> io::Result<()> {
    writeln!(
        w,
        "{}\t{}\t{}",
        read.name,
        String::from_utf8_lossy(&read.seq),
        String::from_utf8_lossy(&read.qual),
    )
}
