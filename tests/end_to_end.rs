//! End-to-end scenarios: build an index on disk, map reads through the
//! public API, and assert the literal output records.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use methmap::params::Parameters;

/// A 40bp reference with no internal repeats, used wherever the scenario
/// needs an asymmetric sequence.
const REF40: &str = "ACGTTGCAACGGATCGTTACGGATTGACCAGGTTACCAGT";

fn build_index(records: &[(&str, &str)], k: u32) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let fasta = dir.path().join("ref.fa");
    let mut f = fs::File::create(&fasta).unwrap();
    for (name, seq) in records {
        writeln!(f, ">{name}").unwrap();
        writeln!(f, "{seq}").unwrap();
    }
    let index = dir.path().join("ref.dbindex");

    let k_arg = k.to_string();
    let params = Parameters::parse_from([
        "methmap",
        "--mode",
        "makedb",
        "--chrom",
        fasta.to_str().unwrap(),
        "--output",
        index.to_str().unwrap(),
        "--kmer",
        k_arg.as_str(),
    ]);
    methmap::run(&params).unwrap();
    (dir, index)
}

/// Map reads and return the (mapped, ambiguous, unmapped) file contents.
fn map_reads(
    dir: &Path,
    index: &Path,
    reads: &[(&str, &str)],
    max_mismatches: u32,
    extra: &[&str],
) -> (String, String, String) {
    let fastq = dir.join("reads.fq");
    let mut f = fs::File::create(&fastq).unwrap();
    for (name, seq) in reads {
        writeln!(f, "@{name}").unwrap();
        writeln!(f, "{seq}").unwrap();
        writeln!(f, "+").unwrap();
        writeln!(f, "{}", "I".repeat(seq.len())).unwrap();
    }

    let out = dir.join("out.mr");
    let mm = max_mismatches.to_string();
    let mut args = vec![
        "methmap",
        "--mode",
        "map",
        "--index",
        index.to_str().unwrap(),
        "--reads",
        fastq.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
        "--max-mismatches",
        mm.as_str(),
        "--ambiguous",
        "--unmapped",
    ];
    args.extend_from_slice(extra);
    let params = Parameters::parse_from(args);
    methmap::run(&params).unwrap();

    let read_or_empty = |p: PathBuf| fs::read_to_string(p).unwrap_or_default();
    (
        read_or_empty(out.clone()),
        read_or_empty(dir.join("out.mr_ambiguous")),
        read_or_empty(dir.join("out.mr_unmapped")),
    )
}

fn revcomp(seq: &str) -> String {
    seq.bytes()
        .rev()
        .map(|b| match b {
            b'A' => 'T',
            b'C' => 'G',
            b'G' => 'C',
            b'T' => 'A',
            _ => 'N',
        })
        .collect()
}

fn convert(seq: &str, ag_wildcard: bool) -> String {
    if ag_wildcard {
        seq.replace(['G', 'N'], "A")
    } else {
        seq.replace(['C', 'N'], "T")
    }
}

/// Brute-force enumeration of exact post-conversion matches of `read` over
/// both strands of every chromosome: `(chrom, internal offset, strand)`.
fn brute_force_exact(
    records: &[(&str, &str)],
    read: &str,
    ag_wildcard: bool,
) -> Vec<(usize, usize, char)> {
    let converted_read = convert(read, ag_wildcard);
    let mut loci = Vec::new();
    for (c, (_, chrom)) in records.iter().enumerate() {
        for (strand, sequence) in [('+', chrom.to_string()), ('-', revcomp(chrom))] {
            let converted = convert(&sequence, ag_wildcard);
            if converted.len() < converted_read.len() {
                continue;
            }
            for offset in 0..=(converted.len() - converted_read.len()) {
                if converted[offset..offset + converted_read.len()] == converted_read {
                    loci.push((c, offset, strand));
                }
            }
        }
    }
    loci
}

#[test]
fn s1_exact_unique() {
    let reference = "ACGTACGTACGTACGTACGTACGT";
    let (dir, index) = build_index(&[("chr1", reference)], 8);

    let (mapped, ambiguous, unmapped) =
        map_reads(dir.path(), &index, &[("read1", reference)], 6, &[]);

    assert_eq!(
        mapped,
        format!("chr1\t0\t24\tread1\t0\t+\t{reference}\t{}\n", "I".repeat(24))
    );
    assert!(ambiguous.is_empty());
    assert!(unmapped.is_empty());
}

#[test]
fn s2_reverse_strand_coordinates_are_forward() {
    let (dir, index) = build_index(&[("chr1", REF40)], 8);

    let read = revcomp(&REF40[8..32]);
    assert_eq!(
        brute_force_exact(&[("chr1", REF40)], &read, false),
        vec![(0, 8, '-')],
        "scenario premise: exactly one exact locus, on the reverse strand"
    );

    let (mapped, ambiguous, unmapped) =
        map_reads(dir.path(), &index, &[("read1", &read)], 0, &[]);

    assert_eq!(
        mapped,
        format!("chr1\t8\t32\tread1\t0\t-\t{read}\t{}\n", "I".repeat(24))
    );
    assert!(ambiguous.is_empty());
    assert!(unmapped.is_empty());
}

#[test]
fn s3_bisulfite_conversion_is_free() {
    let (dir, index) = build_index(&[("chr1", REF40)], 8);

    // Fully unmethylated copy of the first 24 bases: every C reads as T.
    let read = REF40[..24].replace('C', "T");
    assert_eq!(
        brute_force_exact(&[("chr1", REF40)], &read, false),
        vec![(0, 0, '+')],
        "scenario premise: one exact locus at position 0"
    );

    let (mapped, _, unmapped) = map_reads(dir.path(), &index, &[("read1", &read)], 0, &[]);

    assert_eq!(
        mapped,
        format!("chr1\t0\t24\tread1\t0\t+\t{read}\t{}\n", "I".repeat(24))
    );
    assert!(unmapped.is_empty());
}

#[test]
fn s4_repetitive_read_is_ambiguous() {
    let reference = "A".repeat(64);
    let (dir, index) = build_index(&[("chr1", &reference)], 8);

    let read = "A".repeat(16);
    let (mapped, ambiguous, unmapped) =
        map_reads(dir.path(), &index, &[("read1", &read)], 6, &[]);

    assert!(mapped.is_empty());
    assert!(unmapped.is_empty());
    // Candidates are visited in ascending position order, so the retained
    // representative is the last footprint that fits: 64 - 16 = 48.
    assert_eq!(
        ambiguous,
        format!("chr1\t48\t64\tread1\t0\t+\t{read}\t{}\n", "I".repeat(16))
    );
}

#[test]
fn s5_alien_read_is_unmapped() {
    let (dir, index) = build_index(&[("chr1", REF40)], 8);

    let read = "T".repeat(24);
    let (mapped, ambiguous, unmapped) =
        map_reads(dir.path(), &index, &[("read1", &read)], 2, &[]);

    assert!(mapped.is_empty());
    assert!(ambiguous.is_empty());
    assert_eq!(unmapped, format!("read1\t{read}\t{}\n", "I".repeat(24)));
}

#[test]
fn s6_boundary_straddling_read_is_unmapped() {
    let left = "ACGTTGCAACGGATCGTTAC";
    let right = "GGATTGACCAGGTTACCAGT";
    let (dir, index) = build_index(&[("chrA", left), ("chrB", right)], 8);

    // 16bp read whose only low-mismatch alignment straddles the boundary.
    let read = format!("{}{}", &left[10..], &right[..6]);
    let (mapped, ambiguous, unmapped) =
        map_reads(dir.path(), &index, &[("read1", &read)], 2, &[]);

    assert!(mapped.is_empty());
    assert!(ambiguous.is_empty());
    assert_eq!(unmapped, format!("read1\t{read}\t{}\n", "I".repeat(16)));
}

#[test]
fn ag_wildcard_maps_against_the_ga_indices() {
    let (dir, index) = build_index(&[("chr1", REF40)], 8);

    // A read from the G->A-converted forward strand.
    let read = convert(&REF40[4..28], true);
    assert_eq!(
        brute_force_exact(&[("chr1", REF40)], &read, true),
        vec![(0, 4, '+')],
        "scenario premise: one exact locus under G->A"
    );

    let (mapped, _, unmapped) = map_reads(
        dir.path(),
        &index,
        &[("read1", &read)],
        0,
        &["--ag-wildcard"],
    );

    assert_eq!(
        mapped,
        format!("chr1\t4\t28\tread1\t0\t+\t{read}\t{}\n", "I".repeat(24))
    );
    assert!(unmapped.is_empty());
}

#[test]
fn makedb_writes_four_payloads_and_a_header() {
    let (_dir, index) = build_index(&[("chr1", REF40)], 8);

    assert!(index.exists());
    for suffix in ["_CT00", "_CT01", "_GA10", "_GA11"] {
        let mut os = index.as_os_str().to_os_string();
        os.push(suffix);
        assert!(PathBuf::from(os).exists(), "missing {suffix} payload");
    }
}

#[test]
fn batches_preserve_input_order() {
    let (dir, index) = build_index(&[("chr1", REF40)], 8);

    let reads: Vec<(String, String)> = (0..5)
        .map(|i| (format!("read{i}"), REF40[i..i + 24].to_string()))
        .collect();
    let read_refs: Vec<(&str, &str)> = reads
        .iter()
        .map(|(n, s)| (n.as_str(), s.as_str()))
        .collect();

    let (mapped, _, _) = map_reads(
        dir.path(),
        &index,
        &read_refs,
        0,
        &["--batch-size", "2"],
    );

    let names: Vec<&str> = mapped
        .lines()
        .map(|line| line.split('\t').nth(3).unwrap())
        .collect();
    assert_eq!(names, vec!["read0", "read1", "read2", "read3", "read4"]);
}

#[test]
fn exact_match_trichotomy_agrees_with_brute_force() {
    let records = [("chr1", REF40), ("chr2", "TTGGCAGTACCAGGTAACCGGTAT")];
    let (dir, index) = build_index(&records, 8);

    let reads: Vec<(String, String)> = (0..=16)
        .map(|i| (format!("read{i}"), REF40[i..i + 24].to_string()))
        .collect();
    let read_refs: Vec<(&str, &str)> = reads
        .iter()
        .map(|(n, s)| (n.as_str(), s.as_str()))
        .collect();

    let (mapped, ambiguous, unmapped) = map_reads(dir.path(), &index, &read_refs, 0, &[]);

    let category = |name: &str| -> &'static str {
        let hit = |text: &String, col: usize| {
            text.lines()
                .any(|line| line.split('\t').nth(col) == Some(name))
        };
        if hit(&mapped, 3) {
            "unique"
        } else if hit(&ambiguous, 3) {
            "ambiguous"
        } else if hit(&unmapped, 0) {
            "unmapped"
        } else {
            "missing"
        }
    };

    for (name, seq) in &reads {
        let loci = brute_force_exact(&records, seq, false);

        // Cross-strand hits at one internal position collapse into a single
        // visit count; only the remaining cases have a contractual outcome.
        let mut distinct: Vec<(usize, usize)> = loci.iter().map(|&(c, o, _)| (c, o)).collect();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() != loci.len() {
            continue;
        }

        let expected = match loci.len() {
            0 => "unmapped",
            1 => "unique",
            _ => "ambiguous",
        };
        assert_eq!(
            category(name),
            expected,
            "read {name} ({seq}): brute force found {loci:?}"
        );
    }
}
