//! CHROMCAT - Chromatin Accessibility Cellular Assessment Toolkit
//!
//! CHROMCAT processes single-cell chromatin accessibility (scATAC-seq)
//! data: it extracts per-cell accessibility fragments from paired-end
//! alignments and aggregates peak-annotated fragments into a sparse
//! cell-by-peak count matrix.
//!
//! # Tools
//!
//! CHROMCAT provides two subcommands:
//!
//! - `fragments`: Extract Tn5-corrected fragments from a BAM file
//! - `frag2mtx`: Build a cell-by-peak matrix from peak-annotated fragments
//!
//! # Usage
//!
//! ```bash
//! # Extract fragments with barcodes stored in the CB tag
//! chromcat fragments --bam input.bam --barcode-tag CB --output fragments.tsv.gz
//!
//! # Aggregate peak-annotated fragments into an .h5ad matrix
//! chromcat frag2mtx --fragments annotated.tsv --output matrix.h5ad
//! ```
//!
//! For more detailed usage information, see the documentation for each
//! subcommand.

extern crate chromcat_lib;
pub mod commands;
use anyhow::Result;
use chromcat_lib::core::prelude::is_broken_pipe;
use env_logger::Env;
use log::*;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case", author, about)]
/// Commands for single-cell chromatin accessibility processing with CHROMCAT
struct Args {
    #[structopt(subcommand)]
    subcommand: Subcommand,
}

#[derive(StructOpt)]
enum Subcommand {
    /// Extract per-cell fragments from a paired-end BAM
    Fragments(commands::FragmentsArgs),
    /// Aggregate peak-annotated fragments into a sparse cell-by-peak matrix
    Frag2mtx(commands::Frag2MtxArgs),
}

impl Subcommand {
    fn run(self) -> Result<()> {
        match self {
            Subcommand::Fragments(args) => commands::run_fragments(args)?,
            Subcommand::Frag2mtx(args) => commands::run_frag2mtx(args)?,
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = Args::from_args().subcommand.run() {
        if is_broken_pipe(&err) {
            std::process::exit(0);
        }
        error!("{}", err);
        std::process::exit(1);
    }
    Ok(())
}
