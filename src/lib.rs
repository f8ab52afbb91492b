//! # thorstack - Thorlabs TIFF acquisitions to OME-TIFF
//!
//! `thorstack` converts microscope acquisitions written by Thorlabs software
//! — one TIFF file per channel, stage position, z-plane and timepoint, plus
//! an `Experiment.xml` descriptor — into standardized OME-TIFF volumetric
//! stacks.
//!
//! ## How it works
//!
//! - **Parse**: acquisition coordinates are extracted from each file name
//!   (`ChanA_001_001_004_001.tif` → channel, stage X/Y, z, t). Names that do
//!   not match are set aside with a warning, never silently dropped.
//!
//! - **Group**: records sharing a (channel, stage X, stage Y, timepoint)
//!   key form one acquisition group, its members ordered by ascending z —
//!   one output volume per group.
//!
//! - **Validate**: observed z-plane counts, timepoint counts and channel
//!   names are cross-checked against what the descriptor declares before
//!   anything is written.
//!
//! - **Assemble & write**: each group's planes are concatenated into a
//!   (Z, Y, X) volume and written as an OME-TIFF carrying channel and
//!   physical pixel-size metadata, with an optional plain TIFF twin.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use thorstack::converter::{ConversionConfig, StackConverter};
//!
//! let converter = StackConverter::with_config(ConversionConfig { save_raw: false });
//! let stats = converter.convert(
//!     Path::new("run1/"),
//!     Path::new("run1/Experiment.xml"),
//!     Path::new("output_run1/"),
//! )?;
//! println!("wrote {} file(s)", stats.outputs.len());
//! # Ok::<(), thorstack::converter::ConvertError>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`pattern`]: filename pattern parsing into per-file records
//! - [`experiment`]: `Experiment.xml` descriptor parsing
//! - [`table`]: metadata table, acquisition grouping, integrity validation
//! - [`stack`]: TIFF decoding and per-group volume assembly
//! - [`output`]: output naming and OME-TIFF / plain TIFF writing
//! - [`converter`]: the pipeline tying the above together

pub mod converter;
pub mod experiment;
pub mod output;
pub mod pattern;
pub mod stack;
pub mod table;

pub use converter::{ConversionConfig, ConversionStats, ConvertError, StackConverter};
pub use experiment::{ExperimentMetadata, ExperimentXmlError};
pub use output::{StackMetadata, WriterError};
pub use pattern::{FileRecord, FilenamePattern};
pub use stack::StackError;
pub use table::{CastError, GroupKey, MetadataTable, ValidationError};
