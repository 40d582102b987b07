// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

/// Exit status signalling that a breakpoint was skipped because one of its loci is too deeply
/// covered.
pub const DEPTH_EXCEEDED_EXIT_CODE: i32 = 27;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("locus {contig}:{pos} is covered by {depth} alignments, which exceeds the maximum depth of {max_depth}; skipping breakpoint")]
    DepthExceeded {
        contig: String,
        pos: u64,
        depth: u64,
        max_depth: u64,
    },
    #[error("invalid breakpoint {spec}: use CONTIG:POS:DIR syntax with 1-based POS and DIR being '+' or '-'")]
    InvalidBreakpoint { spec: String },
    #[error("invalid breakpoint direction '{value}', must be '+' or '-'")]
    InvalidDirection { value: String },
    #[error("contig {contig} not found in reference")]
    UnknownContig { contig: String },
    #[error("contig {contig} not found in alignment header")]
    UnknownAlignmentContig { contig: String },
}

impl Error {
    /// Whether this error denotes a breakpoint that was skipped rather than a failure.
    pub fn is_skip(&self) -> bool {
        matches!(self, Error::DepthExceeded { .. })
    }
}

/// Map an error chain to the process exit status.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(e) if e.is_skip() => DEPTH_EXCEEDED_EXIT_CODE,
        _ => 1,
    }
}
