// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use structopt::StructOpt;

use crate::alleles::{self, SynthesisParams};
use crate::breakpoint::{Breakpoint, BreakpointPair};
use crate::reads::{self, IndexedBamArchive, SelectionParams};
use crate::reference;

#[derive(Debug, StructOpt, Clone)]
#[structopt(
    name = "svrealign",
    about = "Prepare the realignment validation of structural variant breakpoints."
)]
#[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
pub enum SvRealign {
    #[structopt(
        name = "extract-read-pairs",
        about = "Extract read pairs that may support or contradict the given breakpoint pair. \
                 Exits with status 27 (without writing any output) if either breakpoint is too \
                 deeply covered."
    )]
    #[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
    ExtractReadPairs {
        #[structopt(parse(from_os_str), help = "Indexed BAM/CRAM file with paired-end reads.")]
        bam: PathBuf,
        #[structopt(parse(from_os_str), help = "FASTA file to write the read pairs to.")]
        output: PathBuf,
        #[structopt(help = "First breakpoint, given as CONTIG:POS:DIR (POS 1-based, DIR + or -).")]
        breakpoint1: Breakpoint,
        #[structopt(help = "Second breakpoint, given as CONTIG:POS:DIR.")]
        breakpoint2: Breakpoint,
        #[structopt(
            long,
            parse(from_os_str),
            help = "YAML file with parameters. Command line options take precedence."
        )]
        params: Option<PathBuf>,
        #[structopt(
            long = "max-depth",
            help = "Skip breakpoints covered by at least this many alignments [default: 5000]."
        )]
        max_depth: Option<u64>,
        #[structopt(
            long = "search-length",
            help = "Scan alignments within this distance of each breakpoint [default: 1000]."
        )]
        search_length: Option<u64>,
        #[structopt(
            long = "search-margin",
            help = "Tolerance when testing whether a read overlaps a breakpoint [default: 5]."
        )]
        search_margin: Option<u64>,
        #[structopt(long, short, help = "Print debug information.")]
        verbose: bool,
    },
    #[structopt(
        name = "synthesize-alleles",
        about = "Append reference and alternative allele sequences of the given breakpoint pair \
                 to a FASTA file."
    )]
    #[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
    SynthesizeAlleles {
        #[structopt(
            parse(from_os_str),
            help = "FASTA file with reference genome. Has to be indexed with samtools faidx."
        )]
        reference: PathBuf,
        #[structopt(parse(from_os_str), help = "FASTA file to append the sequences to.")]
        output: PathBuf,
        #[structopt(help = "First breakpoint, given as CONTIG:POS:DIR (POS 1-based, DIR + or -).")]
        breakpoint1: Breakpoint,
        #[structopt(help = "Second breakpoint, given as CONTIG:POS:DIR.")]
        breakpoint2: Breakpoint,
        #[structopt(
            long = "junction-seq",
            default_value = "---",
            help = "Bases inserted at the junction ('---' for none)."
        )]
        junction_seq: String,
        #[structopt(
            long,
            parse(from_os_str),
            help = "YAML file with parameters. Command line options take precedence."
        )]
        params: Option<PathBuf>,
        #[structopt(
            long = "split-reference-threshold",
            help = "Maximum distance of breakpoints on the same contig to be represented with \
                    a single reference sequence [default: 1000]."
        )]
        split_reference_threshold: Option<u64>,
        #[structopt(
            long = "validate-sequence-length",
            help = "Number of bases to take from each side of a breakpoint [default: 200]."
        )]
        validate_sequence_length: Option<u64>,
        #[structopt(long, short, help = "Print debug information.")]
        verbose: bool,
    },
}

impl SvRealign {
    pub fn verbose(&self) -> bool {
        match self {
            SvRealign::ExtractReadPairs { verbose, .. }
            | SvRealign::SynthesizeAlleles { verbose, .. } => *verbose,
        }
    }
}

/// Parameters that can be given in a YAML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub max_depth: Option<u64>,
    pub search_length: Option<u64>,
    pub search_margin: Option<u64>,
    #[serde(alias = "split_refernece_thres")]
    pub split_reference_threshold: Option<u64>,
    pub validate_sequence_length: Option<u64>,
}

impl Params {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(serde_yaml::from_reader(File::open(path)?)?)
    }

    fn load(path: &Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Params::from_path(path),
            None => Ok(Params::default()),
        }
    }

    /// Fill unset values from the given parameters.
    pub fn or(self, other: Params) -> Params {
        Params {
            max_depth: self.max_depth.or(other.max_depth),
            search_length: self.search_length.or(other.search_length),
            search_margin: self.search_margin.or(other.search_margin),
            split_reference_threshold: self
                .split_reference_threshold
                .or(other.split_reference_threshold),
            validate_sequence_length: self
                .validate_sequence_length
                .or(other.validate_sequence_length),
        }
    }

    pub fn selection_params(&self) -> SelectionParams {
        let defaults = SelectionParams::default();
        SelectionParams {
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            search_length: self.search_length.unwrap_or(defaults.search_length),
            search_margin: self.search_margin.unwrap_or(defaults.search_margin),
        }
    }

    pub fn synthesis_params(&self) -> SynthesisParams {
        let defaults = SynthesisParams::default();
        SynthesisParams {
            split_reference_threshold: self
                .split_reference_threshold
                .unwrap_or(defaults.split_reference_threshold),
            validate_sequence_length: self
                .validate_sequence_length
                .unwrap_or(defaults.validate_sequence_length),
        }
    }
}

pub fn run(opt: SvRealign) -> Result<()> {
    match opt {
        SvRealign::ExtractReadPairs {
            ref bam,
            ref output,
            ref breakpoint1,
            ref breakpoint2,
            ref params,
            max_depth,
            search_length,
            search_margin,
            ..
        } => {
            let params = Params {
                max_depth,
                search_length,
                search_margin,
                ..Params::default()
            }
            .or(Params::load(params)?)
            .selection_params();
            debug!("{:?}", params);

            let bnds = BreakpointPair::new(breakpoint1.clone(), breakpoint2.clone());
            let mut archive = IndexedBamArchive::from_path(bam)?;
            reads::select_read_pairs(&mut archive, output, &params, &bnds)?;
        }
        SvRealign::SynthesizeAlleles {
            ref reference,
            ref output,
            ref breakpoint1,
            ref breakpoint2,
            ref junction_seq,
            ref params,
            split_reference_threshold,
            validate_sequence_length,
            ..
        } => {
            let params = Params {
                split_reference_threshold,
                validate_sequence_length,
                ..Params::default()
            }
            .or(Params::load(params)?)
            .synthesis_params();
            debug!("{:?}", params);

            let bnds = BreakpointPair::new(breakpoint1.clone(), breakpoint2.clone());
            let mut reference = reference::Buffer::from_path(reference)?;
            alleles::append_alleles(
                &mut reference,
                output,
                &params,
                &bnds,
                &alleles::parse_junction(junction_seq),
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_args() {
        let opt = SvRealign::from_iter(vec![
            "svrealign",
            "extract-read-pairs",
            "sample.bam",
            "out.fa",
            "chr1:1000:+",
            "chr2:2000:-",
            "--max-depth",
            "100",
            "-v",
        ]);
        assert!(opt.verbose());
        match opt {
            SvRealign::ExtractReadPairs {
                breakpoint2,
                max_depth,
                search_length,
                ..
            } => {
                assert_eq!(breakpoint2, "chr2:2000:-".parse::<Breakpoint>().unwrap());
                assert_eq!(max_depth, Some(100));
                assert_eq!(search_length, None);
            }
            _ => panic!("unexpected subcommand"),
        }
    }

    #[test]
    fn test_reject_invalid_breakpoint() {
        let res = SvRealign::from_iter_safe(vec![
            "svrealign",
            "synthesize-alleles",
            "ref.fa",
            "out.fa",
            "chr1:1000:x",
            "chr2:2000:-",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_params_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.yaml");
        fs::write(
            &path,
            "max_depth: 300\nsearch_length: 800\nsplit_refernece_thres: 2000\n",
        )
        .unwrap();

        let file = Params::from_path(&path).unwrap();
        assert_eq!(file.split_reference_threshold, Some(2000));

        let params = Params {
            max_depth: Some(50),
            ..Params::default()
        }
        .or(file);
        let selection = params.selection_params();
        assert_eq!(selection.max_depth, 50);
        assert_eq!(selection.search_length, 800);
        assert_eq!(selection.search_margin, reads::selection::DEFAULT_SEARCH_MARGIN);

        let synthesis = params.synthesis_params();
        assert_eq!(synthesis.split_reference_threshold, 2000);
        assert_eq!(
            synthesis.validate_sequence_length,
            alleles::DEFAULT_VALIDATE_SEQUENCE_LENGTH
        );
    }
}
