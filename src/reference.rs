// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use bio::io::fasta;

use crate::errors::Error;

/// Random access to reference sequence.
pub trait ReferenceSource {
    /// Fetch the region `start..=end` (1-based, inclusive) of the given contig as uppercase
    /// bases. Regions reaching over the contig ends are clamped to the contig.
    fn fetch(&mut self, contig: &str, start: u64, end: u64) -> Result<Vec<u8>>;
}

/// Convert a 1-based inclusive region into a 0-based half-open interval within a contig of the
/// given length. Positions below 1 are raised to 1, the end is capped at the contig length.
pub(crate) fn clamp_region(contig_len: u64, start: u64, end: u64) -> (u64, u64) {
    let start = start.max(1) - 1;
    let end = end.min(contig_len);
    if start >= end {
        (0, 0)
    } else {
        (start, end)
    }
}

/// Indexed FASTA reference (requires a samtools faidx index next to the file).
pub struct Buffer {
    reader: fasta::IndexedReader<fs::File>,
    contig_lens: HashMap<String, u64>,
}

impl Buffer {
    pub fn from_path<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<Self> {
        let reader: fasta::IndexedReader<fs::File> = fasta::IndexedReader::from_file(&path)?;
        let contig_lens = reader
            .index
            .sequences()
            .into_iter()
            .map(|seq| (seq.name, seq.len))
            .collect();
        Ok(Buffer {
            reader,
            contig_lens,
        })
    }

    pub fn contig_len(&self, contig: &str) -> Option<u64> {
        self.contig_lens.get(contig).copied()
    }
}

impl ReferenceSource for Buffer {
    fn fetch(&mut self, contig: &str, start: u64, end: u64) -> Result<Vec<u8>> {
        let contig_len = self
            .contig_len(contig)
            .ok_or_else(|| Error::UnknownContig {
                contig: contig.to_owned(),
            })?;
        let (start, end) = clamp_region(contig_len, start, end);
        let mut seq = Vec::new();
        if start < end {
            self.reader.fetch(contig, start, end)?;
            self.reader.read(&mut seq)?;
        } else {
            debug!(
                "empty reference region {}:{}-{} after clamping to contig bounds",
                contig,
                start + 1,
                end
            );
        }
        seq.make_ascii_uppercase();

        Ok(seq)
    }
}
