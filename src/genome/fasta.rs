use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::Error;

/// A single chromosome from a FASTA file.
#[derive(Debug, Clone)]
pub struct Chromosome {
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Resolve the reference argument into a list of FASTA files.
///
/// A regular file is used as-is; a directory contributes every `*.fa` entry,
/// sorted by name so the chromosome order is deterministic.
pub fn identify_chromosome_files(path: &Path) -> Result<Vec<PathBuf>, Error> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(|e| Error::io(e, path))? {
        let entry = entry.map_err(|e| Error::io(e, path))?;
        let entry_path = entry.path();
        if entry_path.extension().is_some_and(|ext| ext == "fa") {
            files.push(entry_path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::Fasta(format!(
            "no .fa files found in {}",
            path.display()
        )));
    }
    Ok(files)
}

/// Parse FASTA files and extract chromosomes.
///
/// - Bases are uppercased; anything outside {A,C,G,T} becomes `N`
/// - Control characters are skipped
/// - The chromosome name is the first whitespace-delimited header token
pub fn parse_fasta_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Chromosome>, Error> {
    let mut chromosomes = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(e, path))?;
        let reader = BufReader::new(file);

        let mut current_name: Option<String> = None;
        let mut current_seq: Vec<u8> = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(|e| Error::io(e, path))?;

            if line.is_empty() {
                continue;
            }

            if let Some(stripped) = line.strip_prefix('>') {
                if let Some(name) = current_name.take() {
                    chromosomes.push(Chromosome {
                        name,
                        sequence: current_seq,
                    });
                    current_seq = Vec::new();
                }

                let name = stripped
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| {
                        Error::Fasta(format!(
                            "empty chromosome name at {}:{}",
                            path.display(),
                            line_num + 1
                        ))
                    })?
                    .to_string();

                current_name = Some(name);
            } else {
                if current_name.is_none() {
                    return Err(Error::Fasta(format!(
                        "sequence data before first header at {}:{}",
                        path.display(),
                        line_num + 1
                    )));
                }

                for &byte in line.as_bytes() {
                    if byte < 32 {
                        continue;
                    }
                    let base = match byte.to_ascii_uppercase() {
                        b @ (b'A' | b'C' | b'G' | b'T') => b,
                        _ => b'N',
                    };
                    current_seq.push(base);
                }
            }
        }

        if let Some(name) = current_name {
            chromosomes.push(Chromosome {
                name,
                sequence: current_seq,
            });
        }
    }

    if chromosomes.is_empty() {
        return Err(Error::Fasta(
            "no chromosomes found in FASTA files".to_string(),
        ));
    }

    Ok(chromosomes)
}
