// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! SAM flag bit masks (SAM specification v1.6) and a typed view on them.

use crate::breakpoint::Direction;

pub const PAIRED: u16 = 0x1;
pub const PROPER_PAIR: u16 = 0x2;
pub const UNMAPPED: u16 = 0x4;
pub const MATE_UNMAPPED: u16 = 0x8;
pub const REVERSE: u16 = 0x10;
pub const MATE_REVERSE: u16 = 0x20;
pub const FIRST_IN_PAIR: u16 = 0x40;
pub const SECOND_IN_PAIR: u16 = 0x80;
pub const SECONDARY: u16 = 0x100;
pub const QCFAIL: u16 = 0x200;
pub const DUPLICATE: u16 = 0x400;
pub const SUPPLEMENTARY: u16 = 0x800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentFlags(u16);

impl From<u16> for AlignmentFlags {
    fn from(bits: u16) -> Self {
        AlignmentFlags(bits)
    }
}

impl AlignmentFlags {
    fn is_set(self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    pub fn is_paired(self) -> bool {
        self.is_set(PAIRED)
    }

    pub fn is_proper_pair(self) -> bool {
        self.is_set(PROPER_PAIR)
    }

    pub fn is_unmapped(self) -> bool {
        self.is_set(UNMAPPED)
    }

    pub fn is_mate_unmapped(self) -> bool {
        self.is_set(MATE_UNMAPPED)
    }

    pub fn is_reverse_strand(self) -> bool {
        self.is_set(REVERSE)
    }

    pub fn is_mate_reverse_strand(self) -> bool {
        self.is_set(MATE_REVERSE)
    }

    pub fn is_first_in_pair(self) -> bool {
        self.is_set(FIRST_IN_PAIR)
    }

    pub fn is_second_in_pair(self) -> bool {
        self.is_set(SECOND_IN_PAIR)
    }

    pub fn is_secondary(self) -> bool {
        self.is_set(SECONDARY)
    }

    pub fn is_duplicate(self) -> bool {
        self.is_set(DUPLICATE)
    }

    pub fn is_supplementary(self) -> bool {
        self.is_set(SUPPLEMENTARY)
    }

    /// Whether both mates are mapped and the record is a primary, non-duplicate alignment.
    /// QC-failed records are kept.
    pub fn is_evidence_candidate(self) -> bool {
        self.0 & (UNMAPPED | MATE_UNMAPPED | SECONDARY | DUPLICATE | SUPPLEMENTARY) == 0
    }

    pub fn strand(self) -> Direction {
        if self.is_reverse_strand() {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    pub fn mate_strand(self) -> Direction {
        if self.is_mate_reverse_strand() {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_typical_pair() {
        // first mate, forward strand, mate on reverse strand, proper pair
        let flags = AlignmentFlags::from(99);
        assert!(flags.is_paired());
        assert!(flags.is_proper_pair());
        assert!(flags.is_first_in_pair());
        assert!(!flags.is_second_in_pair());
        assert!(flags.is_mate_reverse_strand());
        assert_eq!(flags.strand(), Direction::Forward);
        assert_eq!(flags.mate_strand(), Direction::Reverse);
        assert!(flags.is_evidence_candidate());

        let flags = AlignmentFlags::from(147);
        assert!(flags.is_second_in_pair());
        assert!(!flags.is_first_in_pair());
        assert_eq!(flags.strand(), Direction::Reverse);
        assert!(flags.is_evidence_candidate());
    }

    #[test]
    fn test_excluded_records() {
        for bits in &[
            UNMAPPED,
            MATE_UNMAPPED,
            SECONDARY,
            DUPLICATE,
            SUPPLEMENTARY,
            99 | SUPPLEMENTARY,
            83 | DUPLICATE,
        ] {
            assert!(!AlignmentFlags::from(*bits).is_evidence_candidate());
        }
        assert!(AlignmentFlags::from(99 | QCFAIL).is_evidence_candidate());
    }
}
