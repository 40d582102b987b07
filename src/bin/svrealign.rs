// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate log;

use std::process;

use anyhow::Result;
use log::LevelFilter;
use structopt::StructOpt;

use svrealign::cli::{self, SvRealign};
use svrealign::errors;

fn init_logging(verbose: bool) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, _| out.finish(format_args!("{}", message)))
        .level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn run() -> Result<()> {
    let opt = SvRealign::from_args();
    init_logging(opt.verbose())?;
    cli::run(opt)
}

pub fn main() {
    if let Err(e) = run() {
        let code = errors::exit_code(&e);
        if code == errors::DEPTH_EXCEEDED_EXIT_CODE {
            warn!("{}", e);
        } else {
            error!("{:#}", e);
        }
        process::exit(code);
    }
}
