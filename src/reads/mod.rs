// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Access to aligned paired-end reads around breakpoints.

use std::path::Path;

use anyhow::Result;
use rust_htslib::bam::{self, FetchDefinition, Read};

use crate::breakpoint::Direction;
use crate::errors::Error;
use crate::utils::{self, AlignmentFlags};

pub mod selection;

pub use selection::{select_read_pairs, MatePairs, SelectionParams};

/// The fields of an alignment record needed for read pair selection.
/// Positions are 1-based, `end` is the last aligned reference position.
#[derive(new, Debug, Clone, PartialEq)]
pub struct AlignedRead {
    pub qname: String,
    pub flags: AlignmentFlags,
    pub contig: String,
    pub pos: u64,
    pub end: u64,
    pub mate_contig: Option<String>,
    pub mate_pos: u64,
    pub seq: Vec<u8>,
}

impl AlignedRead {
    pub fn strand(&self) -> Direction {
        self.flags.strand()
    }

    pub fn mate_strand(&self) -> Direction {
        self.flags.mate_strand()
    }

    /// Read sequence in reference (forward strand) orientation.
    pub fn forward_seq(&self) -> Vec<u8> {
        if self.flags.is_reverse_strand() {
            utils::revcomp(&self.seq)
        } else {
            self.seq.clone()
        }
    }

    fn from_bam(record: &bam::Record, header: &bam::HeaderView) -> Self {
        let contig_name = |tid: i32| {
            if tid < 0 {
                None
            } else {
                Some(String::from_utf8_lossy(header.tid2name(tid as u32)).into_owned())
            }
        };

        AlignedRead {
            qname: String::from_utf8_lossy(record.qname()).into_owned(),
            flags: AlignmentFlags::from(record.flags()),
            contig: contig_name(record.tid()).unwrap_or_default(),
            pos: (record.pos() + 1).max(0) as u64,
            end: record.cigar().end_pos().max(0) as u64,
            mate_contig: contig_name(record.mtid()),
            mate_pos: (record.mpos() + 1).max(0) as u64,
            seq: record.seq().as_bytes(),
        }
    }
}

/// Random access to an indexed archive of aligned reads.
/// Windows are 0-based and half-open.
pub trait ReadArchive {
    /// Number of alignments overlapping the window.
    fn count(&mut self, contig: &str, start: u64, end: u64) -> Result<u64>;

    /// All alignments overlapping the window, in archive order.
    fn fetch(&mut self, contig: &str, start: u64, end: u64) -> Result<Vec<AlignedRead>>;
}

/// Indexed BAM/CRAM file.
pub struct IndexedBamArchive {
    reader: bam::IndexedReader,
}

impl IndexedBamArchive {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(IndexedBamArchive {
            reader: bam::IndexedReader::from_path(path)?,
        })
    }

    fn fetch_region(&mut self, contig: &str, start: u64, end: u64) -> Result<()> {
        let tid = self
            .reader
            .header()
            .tid(contig.as_bytes())
            .ok_or_else(|| Error::UnknownAlignmentContig {
                contig: contig.to_owned(),
            })?;
        self.reader.fetch(FetchDefinition::Region(
            tid as i32,
            start as i64,
            end as i64,
        ))?;
        Ok(())
    }
}

impl ReadArchive for IndexedBamArchive {
    fn count(&mut self, contig: &str, start: u64, end: u64) -> Result<u64> {
        self.fetch_region(contig, start, end)?;
        let mut record = bam::Record::new();
        let mut count = 0;
        while let Some(result) = self.reader.read(&mut record) {
            result?;
            count += 1;
        }
        Ok(count)
    }

    fn fetch(&mut self, contig: &str, start: u64, end: u64) -> Result<Vec<AlignedRead>> {
        self.fetch_region(contig, start, end)?;
        let header = self.reader.header().clone();
        let mut record = bam::Record::new();
        let mut reads = Vec::new();
        while let Some(result) = self.reader.read(&mut record) {
            result?;
            reads.push(AlignedRead::from_bam(&record, &header));
        }
        Ok(reads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_seq() {
        let mut read = AlignedRead::new(
            "r1".to_owned(),
            AlignmentFlags::from(83),
            "chr1".to_owned(),
            100,
            104,
            Some("chr1".to_owned()),
            50,
            b"AACGN".to_vec(),
        );
        assert_eq!(read.strand(), Direction::Reverse);
        assert_eq!(read.mate_strand(), Direction::Forward);
        assert_eq!(read.forward_seq(), b"NCGTT".to_vec());

        read.flags = AlignmentFlags::from(163);
        assert_eq!(read.forward_seq(), b"AACGN".to_vec());
    }
}
