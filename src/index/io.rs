//! Binary serialization of the per-strand payloads and the shared header.
//!
//! All integers are little-endian u32. Writer and reader are byte-exact
//! counterparts; the strand reader refills preallocated buffers so the two
//! passes of a mapping batch never reallocate.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Error;
use crate::genome::Genome;
use crate::index::HashTable;
use crate::seed::{SeedScheme, SEED_SENTINEL_LEN};

/// Path of one strand payload: the header path plus a `_CT00`-style suffix.
pub fn strand_path(index: &Path, suffix: &str) -> PathBuf {
    let mut os = index.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

fn write_genome_meta<W: Write>(w: &mut W, genome: &Genome) -> std::io::Result<()> {
    w.write_u32::<LittleEndian>(genome.num_chromosomes() as u32)?;
    for name in &genome.names {
        w.write_u32::<LittleEndian>(name.len() as u32)?;
        w.write_all(name.as_bytes())?;
    }
    for &len in &genome.lengths {
        w.write_u32::<LittleEndian>(len)?;
    }
    for &start in &genome.start_index {
        w.write_u32::<LittleEndian>(start)?;
    }
    w.write_u32::<LittleEndian>(genome.length_of_genome)?;
    Ok(())
}

fn read_genome_meta<R: Read>(r: &mut R, genome: &mut Genome) -> Result<(), Error> {
    let n_chroms = r.read_u32::<LittleEndian>()? as usize;

    genome.names.clear();
    for _ in 0..n_chroms {
        let name_len = r.read_u32::<LittleEndian>()? as usize;
        let mut buf = vec![0u8; name_len];
        r.read_exact(&mut buf)?;
        let name = String::from_utf8(buf)
            .map_err(|_| Error::Index("chromosome name is not valid UTF-8".into()))?;
        genome.names.push(name);
    }

    genome.lengths.resize(n_chroms, 0);
    r.read_u32_into::<LittleEndian>(&mut genome.lengths)?;

    genome.start_index.resize(n_chroms + 1, 0);
    r.read_u32_into::<LittleEndian>(&mut genome.start_index)?;

    genome.length_of_genome = r.read_u32::<LittleEndian>()?;
    Ok(())
}

/// Persist one converted strand: genome metadata, sequence (sentinel
/// included), bucket boundaries, and the position array.
pub fn write_strand_index(path: &Path, genome: &Genome, table: &HashTable) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::io(e, path))?;
    let mut w = BufWriter::new(file);

    let write = |w: &mut BufWriter<File>| -> std::io::Result<()> {
        write_genome_meta(w, genome)?;
        w.write_all(&genome.sequence)?;
        for &c in &table.counter {
            w.write_u32::<LittleEndian>(c)?;
        }
        w.write_u32::<LittleEndian>(table.index_size())?;
        for &pos in &table.index {
            w.write_u32::<LittleEndian>(pos)?;
        }
        w.flush()
    };
    write(&mut w).map_err(|e| Error::io(e, path))
}

/// Reload one strand payload into preallocated buffers.
///
/// `table.counter` must already have `4^K + 1` entries; `genome.sequence`
/// and `table.index` are refilled in place.
pub fn read_strand_index(
    path: &Path,
    genome: &mut Genome,
    table: &mut HashTable,
) -> Result<(), Error> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    let mut r = BufReader::new(file);

    read_genome_meta(&mut r, genome).map_err(|e| match e {
        Error::Io { source, .. } => Error::io(source, path),
        other => other,
    })?;

    genome
        .sequence
        .resize(genome.length_of_genome as usize + SEED_SENTINEL_LEN, 0);
    r.read_exact(&mut genome.sequence)
        .map_err(|e| Error::io(e, path))?;

    r.read_u32_into::<LittleEndian>(&mut table.counter)
        .map_err(|e| Error::io(e, path))?;

    let index_size = r
        .read_u32::<LittleEndian>()
        .map_err(|e| Error::io(e, path))?;
    if index_size != *table.counter.last().expect("counter is never empty") {
        return Err(Error::Index(format!(
            "index size mismatch in {}: payload says {}, counter says {}",
            path.display(),
            index_size,
            table.counter.last().unwrap()
        )));
    }

    table.index.resize(index_size as usize, 0);
    r.read_u32_into::<LittleEndian>(&mut table.index)
        .map_err(|e| Error::io(e, path))?;
    Ok(())
}

/// Persist the shared header: seed width, the unconverted genome metadata,
/// and the largest strand payload size (for buffer preallocation).
pub fn write_header(
    path: &Path,
    genome: &Genome,
    scheme: &SeedScheme,
    max_index_size: u32,
) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::io(e, path))?;
    let mut w = BufWriter::new(file);

    let write = |w: &mut BufWriter<File>| -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(scheme.kmer_width() as u32)?;
        write_genome_meta(w, genome)?;
        w.write_u32::<LittleEndian>(max_index_size)?;
        w.flush()
    };
    write(&mut w).map_err(|e| Error::io(e, path))
}

/// Load the header, returning the seed scheme, a genome whose sequence
/// buffer is preallocated (contents supplied by the strand payloads), and
/// the maximum strand payload size.
pub fn read_header(path: &Path) -> Result<(SeedScheme, Genome, u32), Error> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    let mut r = BufReader::new(file);

    let kmer_width = r.read_u32::<LittleEndian>().map_err(|e| Error::io(e, path))?;
    let scheme = SeedScheme::new(kmer_width)
        .map_err(|_| Error::Index(format!("corrupt header {}: k = {kmer_width}", path.display())))?;

    let mut genome = Genome {
        names: Vec::new(),
        lengths: Vec::new(),
        start_index: Vec::new(),
        length_of_genome: 0,
        sequence: Vec::new(),
    };
    read_genome_meta(&mut r, &mut genome).map_err(|e| match e {
        Error::Io { source, .. } => Error::io(source, path),
        other => other,
    })?;
    genome
        .sequence
        .resize(genome.length_of_genome as usize + SEED_SENTINEL_LEN, b'N');

    let max_index_size = r
        .read_u32::<LittleEndian>()
        .map_err(|e| Error::io(e, path))?;
    Ok((scheme, genome, max_index_size))
}
