use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod convert;
mod info;

/// thorstack - Thorlabs TIFF acquisition to OME-TIFF converter
#[derive(Parser)]
#[command(name = "thorstack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Thorlabs acquisition directory to OME-TIFF stacks
    Convert {
        /// Directory containing the acquisition TIFF files
        #[arg(long, value_name = "DIR")]
        tiff_dir: PathBuf,

        /// Path to Experiment.xml
        #[arg(long, value_name = "FILE")]
        xml: PathBuf,

        /// Output directory (defaults to a sibling of the TIFF directory
        /// named output_<dataset>)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Also save a plain multi-page TIFF twin per stack
        #[arg(long)]
        save_raw: bool,
    },

    /// Display experiment metadata and the grouping it implies
    Info {
        /// Path to Experiment.xml
        #[arg(long, value_name = "FILE")]
        xml: PathBuf,

        /// Directory containing the acquisition TIFF files (optional; adds
        /// the grouping table and integrity verdict)
        #[arg(long, value_name = "DIR")]
        tiff_dir: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            tiff_dir,
            xml,
            output_dir,
            save_raw,
        } => convert::run(tiff_dir, xml, output_dir, save_raw),
        Commands::Info { xml, tiff_dir } => info::run(xml, tiff_dir),
    }
}
