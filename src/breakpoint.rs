// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Breakpoint pairs of structural variant candidates.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use regex::Regex;

use crate::errors::Error;

lazy_static! {
    static ref BREAKPOINT_RE: Regex =
        Regex::new(r"^(?P<contig>.+):(?P<pos>\d+):(?P<dir>[^:]+)$").unwrap();
}

/// Side of the breakpoint that is retained in the rearranged genome.
/// `Forward` (`+`) keeps the segment ending at the breakpoint position,
/// `Reverse` (`-`) keeps the segment starting at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
pub enum Direction {
    #[strum(serialize = "+")]
    Forward,
    #[strum(serialize = "-")]
    Reverse,
}

impl Direction {
    pub fn parse(value: &str) -> Result<Self, Error> {
        Direction::from_str(value).map_err(|_| Error::InvalidDirection {
            value: value.to_owned(),
        })
    }
}

/// One end of a rearrangement, with 1-based position.
#[derive(new, Getters, CopyGetters, Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    #[getset(get = "pub")]
    contig: String,
    #[getset(get_copy = "pub")]
    pos: u64,
    #[getset(get_copy = "pub")]
    direction: Direction,
}

impl FromStr for Breakpoint {
    type Err = Error;

    /// Parse a breakpoint given as `CONTIG:POS:DIR`.
    fn from_str(spec: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidBreakpoint {
            spec: spec.to_owned(),
        };
        let captures = BREAKPOINT_RE.captures(spec).ok_or_else(invalid)?;
        let pos: u64 = captures["pos"].parse().map_err(|_| invalid())?;
        if pos == 0 {
            return Err(invalid());
        }
        let direction = Direction::parse(&captures["dir"])?;

        Ok(Breakpoint::new(captures["contig"].to_owned(), pos, direction))
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.contig, self.pos, self.direction)
    }
}

#[derive(new, Getters, Debug, Clone, PartialEq, Eq)]
#[getset(get = "pub")]
pub struct BreakpointPair {
    first: Breakpoint,
    second: Breakpoint,
}

impl BreakpointPair {
    /// The same pair seen from the second breakpoint.
    pub fn swapped(&self) -> Self {
        BreakpointPair::new(self.second.clone(), self.first.clone())
    }

    /// Record name prefix: `chrom1,pos1,dir1,chrom2,pos2,dir2`.
    pub fn label(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.first.contig,
            self.first.pos,
            self.first.direction,
            self.second.contig,
            self.second.pos,
            self.second.direction
        )
    }

    /// Whether the pair describes a deletion or tandem duplication short enough to be
    /// represented by a single reference context.
    pub fn is_short_intra_contig(&self, split_reference_threshold: u64) -> bool {
        self.first.contig == self.second.contig
            && self.first.pos.max(self.second.pos) - self.first.pos.min(self.second.pos)
                <= split_reference_threshold
            && self.first.direction != self.second.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(first: &str, second: &str) -> BreakpointPair {
        BreakpointPair::new(first.parse().unwrap(), second.parse().unwrap())
    }

    #[test]
    fn test_parse_breakpoint() {
        let bnd: Breakpoint = "chr1:1000:+".parse().unwrap();
        assert_eq!(bnd.contig(), "chr1");
        assert_eq!(bnd.pos(), 1000);
        assert_eq!(bnd.direction(), Direction::Forward);

        let bnd: Breakpoint = "HLA-A*01:01:01:01:42:-".parse().unwrap();
        assert_eq!(bnd.contig(), "HLA-A*01:01:01:01");
        assert_eq!(bnd.pos(), 42);
        assert_eq!(bnd.direction(), Direction::Reverse);
    }

    #[test]
    fn test_parse_invalid_breakpoint() {
        assert!("chr1:1000".parse::<Breakpoint>().is_err());
        assert!("chr1:0:+".parse::<Breakpoint>().is_err());
        assert_eq!(
            "chr1:10:x".parse::<Breakpoint>(),
            Err(Error::InvalidDirection {
                value: "x".to_owned()
            })
        );
    }

    #[test]
    fn test_label() {
        let bnds = pair("chr1:1000:+", "chr2:2000:-");
        assert_eq!(bnds.label(), "chr1,1000,+,chr2,2000,-");
        assert_eq!(bnds.swapped().label(), "chr2,2000,-,chr1,1000,+");
    }

    #[test]
    fn test_is_short_intra_contig() {
        assert!(pair("chr1:1000:+", "chr1:2000:-").is_short_intra_contig(5000));
        assert!(pair("chr1:2000:-", "chr1:1000:+").is_short_intra_contig(1000));
        assert!(!pair("chr1:1000:+", "chr1:2000:-").is_short_intra_contig(999));
        assert!(!pair("chr1:1000:+", "chr1:2000:+").is_short_intra_contig(5000));
        assert!(!pair("chr1:1000:+", "chr2:1000:-").is_short_intra_contig(5000));
    }
}
