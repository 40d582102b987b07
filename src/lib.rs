// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Preparation of structural variant breakpoint validation by realignment.
//!
//! For a candidate breakpoint pair, [`reads`] extracts the read pairs that may support or
//! contradict it from an indexed alignment file, and [`alleles`] synthesizes the reference
//! and alternative allele sequences the reads can be realigned against.

#[macro_use]
extern crate log;
#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate getset;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate strum_macros;

pub mod alleles;
pub mod breakpoint;
pub mod cli;
pub mod errors;
pub mod reads;
pub mod reference;
pub mod utils;

pub use crate::alleles::{append_alleles, synthesize_alleles, SynthesisParams};
pub use crate::breakpoint::{Breakpoint, BreakpointPair, Direction};
pub use crate::reads::{select_read_pairs, SelectionParams};
