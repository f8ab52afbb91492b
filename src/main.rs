//! # thorstack
//!
//! Command-line converter from Thorlabs multi-file TIFF acquisitions to
//! standardized OME-TIFF stacks.
//!
//! ## Usage
//!
//! ```bash
//! # Convert an acquisition directory
//! thorstack convert --tiff-dir ./run1 --xml ./run1/Experiment.xml
//!
//! # Inspect a descriptor and the grouping it implies
//! thorstack info --xml ./run1/Experiment.xml --tiff-dir ./run1
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
