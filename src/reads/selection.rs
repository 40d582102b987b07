// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Selection of read pairs that may support or contradict a breakpoint pair.
//!
//! A fragment is selected if, around either breakpoint,
//!
//! 1. one of its reads (nearly) overlaps the breakpoint,
//! 2. its reads face each other on the breakpoint contig and enclose the breakpoint, or
//! 3. its mate is placed at the other breakpoint, on the side implied by the breakpoint
//!    directions.
//!
//! Only fragments for which both reads are found within the search windows are reported.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use anyhow::Result;
use bio::io::fasta;

use crate::breakpoint::{Breakpoint, BreakpointPair, Direction};
use crate::errors::Error;
use crate::reads::{AlignedRead, ReadArchive};
use crate::utils::write_fasta_record;

pub const DEFAULT_MAX_DEPTH: u64 = 5000;
pub const DEFAULT_SEARCH_LENGTH: u64 = 1000;
pub const DEFAULT_SEARCH_MARGIN: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionParams {
    /// Breakpoints with this many or more alignments at either locus are skipped.
    pub max_depth: u64,
    /// Radius of the window scanned around each breakpoint.
    pub search_length: u64,
    /// Tolerance when checking whether a read overlaps a breakpoint.
    pub search_margin: u64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        SelectionParams {
            max_depth: DEFAULT_MAX_DEPTH,
            search_length: DEFAULT_SEARCH_LENGTH,
            search_margin: DEFAULT_SEARCH_MARGIN,
        }
    }
}

/// Names of fragments considered relevant for a breakpoint pair.
pub type CandidateReads = HashSet<String>;

fn is_on_retained_side(pos: u64, bnd: &Breakpoint) -> bool {
    match bnd.direction() {
        Direction::Forward => pos <= bnd.pos(),
        Direction::Reverse => pos >= bnd.pos(),
    }
}

/// Whether the given read, found around the first breakpoint of the pair, provides evidence.
fn is_relevant(read: &AlignedRead, bnds: &BreakpointPair, search_margin: u64) -> bool {
    let locus = bnds.first();
    let other = bnds.second();
    let pos = locus.pos();

    // read (with margin) contains the breakpoint
    if read.pos.saturating_sub(search_margin) <= pos
        && pos <= read.end.saturating_sub(1) + search_margin
    {
        return true;
    }

    let mate_contig = match read.mate_contig.as_deref() {
        Some(contig) => contig,
        None => return false,
    };

    // read pair encloses the breakpoint
    if mate_contig == locus.contig()
        && read.pos <= pos
        && pos <= read.mate_pos
        && read.strand() == Direction::Forward
        && read.mate_strand() == Direction::Reverse
    {
        return true;
    }

    // mate is placed at the partner breakpoint
    mate_contig == other.contig()
        && is_on_retained_side(read.pos, locus)
        && is_on_retained_side(read.mate_pos, other)
}

/// Mark fragments with evidence for the first breakpoint of the pair among the reads fetched
/// around it.
pub fn mark_candidates<'a>(
    reads: impl IntoIterator<Item = &'a AlignedRead>,
    bnds: &BreakpointPair,
    params: &SelectionParams,
) -> CandidateReads {
    reads
        .into_iter()
        .filter(|read| read.flags.is_evidence_candidate())
        .filter(|read| is_relevant(read, bnds, params.search_margin))
        .map(|read| read.qname.clone())
        .collect()
}

/// Forward-strand sequences of both reads of each fragment.
#[derive(Debug, Default)]
pub struct MatePairs {
    order: Vec<String>,
    first: HashMap<String, Vec<u8>>,
    second: HashMap<String, Vec<u8>>,
}

impl MatePairs {
    /// Record the sequence of the given read. A later read with the same name and mate number
    /// replaces the sequence but keeps the fragment's position in the output order.
    pub fn insert(&mut self, read: &AlignedRead) {
        let seq = read.forward_seq();
        if read.flags.is_first_in_pair() {
            if self.first.insert(read.qname.clone(), seq).is_none() {
                self.order.push(read.qname.clone());
            }
        } else {
            self.second.insert(read.qname.clone(), seq);
        }
    }

    /// Complete pairs as (name, first read, second read), ordered by first appearance of the
    /// first read.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &[u8], &[u8])> + '_ {
        self.order.iter().filter_map(move |qname| {
            self.second.get(qname).map(|second| {
                (
                    qname.as_str(),
                    self.first[qname].as_slice(),
                    second.as_slice(),
                )
            })
        })
    }

    /// Write complete pairs as `<name>/1` and `<name>/2` records. Returns the number of pairs.
    pub fn write<W: io::Write>(&self, writer: &mut fasta::Writer<W>) -> Result<usize> {
        let mut n = 0;
        for (qname, first, second) in self.pairs() {
            write_fasta_record(writer, &format!("{}/1", qname), first)?;
            write_fasta_record(writer, &format!("{}/2", qname), second)?;
            n += 1;
        }
        writer.flush()?;
        Ok(n)
    }
}

/// Collect the sequences of all reads belonging to candidate fragments.
pub fn collect_sequences<'a>(
    reads: impl IntoIterator<Item = &'a AlignedRead>,
    candidates: &CandidateReads,
) -> MatePairs {
    let mut pairs = MatePairs::default();
    for read in reads {
        if read.flags.is_evidence_candidate() && candidates.contains(&read.qname) {
            pairs.insert(read);
        }
    }
    pairs
}

fn check_depth<A: ReadArchive>(archive: &mut A, bnd: &Breakpoint, max_depth: u64) -> Result<()> {
    let depth = archive.count(bnd.contig(), bnd.pos().saturating_sub(1), bnd.pos() + 1)?;
    debug!("depth at {}:{}: {}", bnd.contig(), bnd.pos(), depth);
    if depth >= max_depth {
        return Err(Error::DepthExceeded {
            contig: bnd.contig().to_owned(),
            pos: bnd.pos(),
            depth,
            max_depth,
        }
        .into());
    }
    Ok(())
}

fn fetch_window<A: ReadArchive>(
    archive: &mut A,
    bnd: &Breakpoint,
    search_length: u64,
) -> Result<Vec<AlignedRead>> {
    archive.fetch(
        bnd.contig(),
        bnd.pos().saturating_sub(search_length),
        bnd.pos() + search_length,
    )
}

/// Select the read pairs around the two breakpoints from the given archive.
///
/// Fails with `Error::DepthExceeded` if either breakpoint is covered by at least
/// `params.max_depth` alignments.
pub fn select<A: ReadArchive>(
    archive: &mut A,
    params: &SelectionParams,
    bnds: &BreakpointPair,
) -> Result<MatePairs> {
    check_depth(archive, bnds.first(), params.max_depth)?;
    check_depth(archive, bnds.second(), params.max_depth)?;

    let first_reads = fetch_window(archive, bnds.first(), params.search_length)?;
    let second_reads = fetch_window(archive, bnds.second(), params.search_length)?;

    let mut candidates = mark_candidates(&first_reads, bnds, params);
    candidates.extend(mark_candidates(&second_reads, &bnds.swapped(), params));
    debug!(
        "{} candidate fragments for breakpoints {}",
        candidates.len(),
        bnds.label()
    );

    Ok(collect_sequences(
        first_reads.iter().chain(second_reads.iter()),
        &candidates,
    ))
}

/// Select read pairs supporting or contradicting the breakpoint pair and write them as FASTA
/// to the output path, replacing any existing file. Returns the number of written pairs.
///
/// If either breakpoint is too deeply covered, `Error::DepthExceeded` is returned and the
/// output path is left untouched.
pub fn select_read_pairs<A: ReadArchive, P: AsRef<Path>>(
    archive: &mut A,
    output: P,
    params: &SelectionParams,
    bnds: &BreakpointPair,
) -> Result<usize> {
    let pairs = select(archive, params, bnds)?;

    let mut writer = fasta::Writer::new(fs::File::create(output)?);
    let n = pairs.write(&mut writer)?;
    info!("Selected {} read pairs for breakpoints {}.", n, bnds.label());

    Ok(n)
}
