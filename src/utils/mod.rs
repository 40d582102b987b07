// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Result;
use bio::alphabets::dna;
use bio::io::fasta;

pub mod flags;

pub use flags::AlignmentFlags;

/// Reverse complement of a nucleotide sequence (A<->T, C<->G, N<->N).
pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    dna::revcomp(seq)
}

/// Open a FASTA writer that appends to the given path, creating the file if necessary.
pub fn appending_fasta_writer(path: impl AsRef<Path>) -> Result<fasta::Writer<fs::File>> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(fasta::Writer::new(file))
}

/// Write a single record with a one-line sequence.
pub fn write_fasta_record<W: io::Write>(
    writer: &mut fasta::Writer<W>,
    name: &str,
    seq: &[u8],
) -> Result<()> {
    writer.write(name, None, seq)?;
    Ok(())
}
