/// FASTQ reader with transparent gzip support
use crate::error::Error;
use flate2::read::GzDecoder;
use noodles::fastq;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One read from a FASTQ file.
#[derive(Debug, Clone)]
pub struct FastqRecord {
    /// First whitespace-delimited token of the name line, without the `@`.
    pub name: String,
    /// Uppercased base sequence.
    pub seq: Vec<u8>,
    /// Raw quality string.
    pub qual: Vec<u8>,
}

/// FASTQ reader over plain or gzip-compressed files.
pub struct FastqReader {
    inner: fastq::io::Reader<Box<dyn BufRead>>,
}

impl FastqReader {
    /// Open a FASTQ file; `.gz`/`.gzip` extensions select decompression.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::io(e, path))?;

        let path_str = path.to_string_lossy();
        let reader: Box<dyn BufRead> = if path_str.ends_with(".gz") || path_str.ends_with(".gzip")
        {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self {
            inner: fastq::io::Reader::new(reader),
        })
    }

    /// Next record, or `None` at end of input.
    pub fn next_record(&mut self) -> Result<Option<FastqRecord>, Error> {
        match self.inner.records().next() {
            Some(Ok(record)) => {
                let name = std::str::from_utf8(record.name())
                    .map_err(|e| {
                        Error::from(std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            format!("invalid UTF-8 in read name: {e}"),
                        ))
                    })?
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string();

                let seq = record
                    .sequence()
                    .iter()
                    .map(|b| b.to_ascii_uppercase())
                    .collect();
                let qual = record.quality_scores().to_vec();

                Ok(Some(FastqRecord { name, seq, qual }))
            }
            Some(Err(e)) => Err(Error::from(e)),
            None => Ok(None),
        }
    }

    /// Read up to `batch_size` records; a short batch signals end of input.
    pub fn read_batch(&mut self, batch_size: usize) -> Result<Vec<FastqRecord>, Error> {
        let mut batch = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            match self.next_record()? {
                Some(record) => batch.push(record),
                None => break,
            }
        }
        Ok(batch)
    }
}
