// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Reference and alternative allele sequences around a breakpoint pair.
//!
//! Deletions and tandem duplications that are short enough (both breakpoints on the same
//! contig, at most `split_reference_threshold` apart, opposite directions) are represented by
//! one reference sequence covering both breakpoints. Any other rearrangement gets one
//! reference sequence per breakpoint. In both cases the alternative allele joins the retained
//! flanks of the two breakpoints via the junction sequence.

use std::io;
use std::path::Path;

use anyhow::Result;
use bio::io::fasta;

use crate::breakpoint::{Breakpoint, BreakpointPair, Direction};
use crate::reference::ReferenceSource;
use crate::utils::{self, write_fasta_record};

pub const DEFAULT_SPLIT_REFERENCE_THRESHOLD: u64 = 1000;
pub const DEFAULT_VALIDATE_SEQUENCE_LENGTH: u64 = 200;

/// Placeholder for an empty junction sequence.
pub const EMPTY_JUNCTION: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisParams {
    /// Maximum breakpoint distance for representing a deletion or tandem duplication with a
    /// single reference sequence.
    pub split_reference_threshold: u64,
    /// Number of bases taken from each side of a breakpoint.
    pub validate_sequence_length: u64,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        SynthesisParams {
            split_reference_threshold: DEFAULT_SPLIT_REFERENCE_THRESHOLD,
            validate_sequence_length: DEFAULT_VALIDATE_SEQUENCE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AlleleRole {
    #[strum(serialize = "ref")]
    Ref,
    #[strum(serialize = "alt")]
    Alt,
    #[strum(serialize = "ref1")]
    Ref1,
    #[strum(serialize = "ref2")]
    Ref2,
}

#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct AlleleSequence {
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    role: AlleleRole,
    #[getset(get = "pub")]
    seq: Vec<u8>,
}

impl AlleleSequence {
    fn new(bnds: &BreakpointPair, role: AlleleRole, seq: Vec<u8>) -> Self {
        AlleleSequence {
            name: format!("{}_{}", bnds.label(), role),
            role,
            seq,
        }
    }
}

/// Junction sequence as given on the command line. After trimming, the placeholder `---`
/// denotes no inserted bases.
pub fn parse_junction(junction: &str) -> Vec<u8> {
    let junction = junction.trim();
    if junction == EMPTY_JUNCTION {
        Vec::new()
    } else {
        junction.to_ascii_uppercase().into_bytes()
    }
}

struct Flanks<'a, R: ReferenceSource> {
    reference: &'a mut R,
    len: u64,
}

impl<'a, R: ReferenceSource> Flanks<'a, R> {
    /// `pos - len..=pos`
    fn upstream(&mut self, bnd: &Breakpoint) -> Result<Vec<u8>> {
        self.reference.fetch(
            bnd.contig(),
            bnd.pos().saturating_sub(self.len),
            bnd.pos(),
        )
    }

    /// `pos..=pos + len`
    fn downstream(&mut self, bnd: &Breakpoint) -> Result<Vec<u8>> {
        self.reference
            .fetch(bnd.contig(), bnd.pos(), bnd.pos() + self.len)
    }

    /// `pos - len..=pos + len`
    fn around(&mut self, bnd: &Breakpoint) -> Result<Vec<u8>> {
        self.reference.fetch(
            bnd.contig(),
            bnd.pos().saturating_sub(self.len),
            bnd.pos() + self.len,
        )
    }

    /// Retained sequence of the first breakpoint, read towards the junction.
    fn left_part(&mut self, bnd: &Breakpoint) -> Result<Vec<u8>> {
        Ok(match bnd.direction() {
            Direction::Forward => self.upstream(bnd)?,
            Direction::Reverse => utils::revcomp(&self.downstream(bnd)?),
        })
    }

    /// Retained sequence of the second breakpoint, read away from the junction.
    fn right_part(&mut self, bnd: &Breakpoint) -> Result<Vec<u8>> {
        Ok(match bnd.direction() {
            Direction::Reverse => self.downstream(bnd)?,
            Direction::Forward => utils::revcomp(&self.upstream(bnd)?),
        })
    }
}

fn join(left: Vec<u8>, junction: &[u8], right: Vec<u8>) -> Vec<u8> {
    let mut seq = left;
    seq.extend_from_slice(junction);
    seq.extend(right);
    seq
}

/// Synthesize reference and alternative allele sequences for the given breakpoint pair.
///
/// Short deletions and tandem duplications yield `ref` and `alt`, all other rearrangements
/// `ref1`, `ref2` and `alt`.
pub fn synthesize_alleles<R: ReferenceSource>(
    reference: &mut R,
    params: &SynthesisParams,
    bnds: &BreakpointPair,
    junction: &[u8],
) -> Result<Vec<AlleleSequence>> {
    let (first, second) = (bnds.first(), bnds.second());
    let mut flanks = Flanks {
        reference,
        len: params.validate_sequence_length,
    };

    if bnds.is_short_intra_contig(params.split_reference_threshold) {
        let ref_seq = flanks.reference.fetch(
            first.contig(),
            first.pos().saturating_sub(flanks.len),
            second.pos() + flanks.len,
        )?;

        let alt_seq = if first.direction() == Direction::Forward
            && second.direction() == Direction::Reverse
        {
            // deletion
            join(flanks.upstream(first)?, junction, flanks.downstream(second)?)
        } else {
            // tandem duplication
            join(flanks.upstream(second)?, junction, flanks.downstream(first)?)
        };

        Ok(vec![
            AlleleSequence::new(bnds, AlleleRole::Ref, ref_seq),
            AlleleSequence::new(bnds, AlleleRole::Alt, alt_seq),
        ])
    } else {
        let ref1 = flanks.around(first)?;
        let ref2 = flanks.around(second)?;
        let alt_seq = join(
            flanks.left_part(first)?,
            junction,
            flanks.right_part(second)?,
        );

        Ok(vec![
            AlleleSequence::new(bnds, AlleleRole::Ref1, ref1),
            AlleleSequence::new(bnds, AlleleRole::Ref2, ref2),
            AlleleSequence::new(bnds, AlleleRole::Alt, alt_seq),
        ])
    }
}

/// Append the given allele sequences to an open FASTA writer.
pub fn write_alleles<W: io::Write>(
    writer: &mut fasta::Writer<W>,
    alleles: &[AlleleSequence],
) -> Result<()> {
    for allele in alleles {
        write_fasta_record(writer, allele.name(), allele.seq())?;
    }
    writer.flush()?;
    Ok(())
}

/// Synthesize allele sequences and append them to the FASTA file at the given path.
pub fn append_alleles<R: ReferenceSource, P: AsRef<Path>>(
    reference: &mut R,
    output: P,
    params: &SynthesisParams,
    bnds: &BreakpointPair,
    junction: &[u8],
) -> Result<Vec<AlleleSequence>> {
    let alleles = synthesize_alleles(reference, params, bnds, junction)?;
    for allele in &alleles {
        if allele.seq().is_empty() {
            warn!(
                "Empty {} sequence for breakpoints {}; region outside of reference?",
                allele.role(),
                bnds.label()
            );
        }
    }
    let mut writer = utils::appending_fasta_writer(output)?;
    write_alleles(&mut writer, &alleles)?;
    info!(
        "Wrote {} allele sequences for breakpoints {}.",
        alleles.len(),
        bnds.label()
    );

    Ok(alleles)
}
