//! Conversion pipeline
//!
//! Ties the components together for one run: discover TIFF files, parse the
//! experiment descriptor, build and validate the metadata table, then
//! process each acquisition group start-to-finish — read, assemble, write —
//! before moving to the next. Single-threaded and synchronous; validation
//! failures abort before anything is written, and the first group failure
//! aborts the run. There are no retries.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::experiment::{ExperimentMetadata, ExperimentXmlError};
use crate::output::{self, StackMetadata, WriterError};
use crate::stack::{assemble_stack, StackError};
use crate::table::{CastError, MetadataTable, ValidationError};

/// Errors that can occur during a conversion run
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The input directory does not exist
    #[error("input directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// No acquisition TIFF files to convert
    #[error("no TIFF files with recognizable channel names found in {0}")]
    NoInputFiles(PathBuf),

    /// Error reading the experiment descriptor
    #[error(transparent)]
    Experiment(#[from] ExperimentXmlError),

    /// Declared-vs-observed integrity check failed
    #[error("integrity validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A group key could not be turned into an output name
    #[error("output naming failed: {0}")]
    Naming(#[from] CastError),

    /// Error reading or assembling a group's image data
    #[error(transparent)]
    Stack(#[from] StackError),

    /// Error writing an output stack
    #[error(transparent)]
    Writer(#[from] WriterError),

    /// I/O error during file discovery
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConversionConfig {
    /// Also write a plain multi-page TIFF twin next to each OME-TIFF,
    /// sharing its base name
    pub save_raw: bool,
}

/// Statistics for one completed conversion run
#[derive(Debug, Clone, Default)]
pub struct ConversionStats {
    /// Candidate files handed to the metadata table
    pub files_seen: usize,

    /// Files excluded because their names did not match the pattern
    pub files_skipped: usize,

    /// Acquisition groups written out
    pub groups_written: usize,

    /// Every output path written, in write order
    pub outputs: Vec<PathBuf>,
}

/// Converter from Thorlabs per-file acquisitions to OME-TIFF stacks.
pub struct StackConverter {
    config: ConversionConfig,
}

impl StackConverter {
    pub fn new() -> Self {
        Self::with_config(ConversionConfig::default())
    }

    pub fn with_config(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Scan `tiff_dir` for acquisition TIFFs and convert them.
    ///
    /// Non-acquisition TIFFs (assembled `Stack.tif` files, previews) are set
    /// aside before parsing, matching the channel marker in their names.
    pub fn convert(
        &self,
        tiff_dir: &Path,
        xml_path: &Path,
        output_dir: &Path,
    ) -> Result<ConversionStats, ConvertError> {
        if !tiff_dir.is_dir() {
            return Err(ConvertError::MissingDirectory(tiff_dir.to_path_buf()));
        }

        let all_tiffs = find_tiff_files(tiff_dir)?;
        info!(
            "found {} TIFF file(s) in {}",
            all_tiffs.len(),
            tiff_dir.display()
        );

        let candidates: Vec<PathBuf> = all_tiffs
            .iter()
            .filter(|p| has_channel_marker(p))
            .cloned()
            .collect();
        let set_aside = all_tiffs.len() - candidates.len();
        if set_aside > 0 {
            warn!("set aside {set_aside} non-acquisition TIFF file(s)");
        }
        if candidates.is_empty() {
            return Err(ConvertError::NoInputFiles(tiff_dir.to_path_buf()));
        }

        self.convert_files(&candidates, xml_path, output_dir)
    }

    /// Convert an externally resolved file list (sorted, deduplicated).
    ///
    /// Returns the statistics of the run, including every written output
    /// path for the caller's reporting layer.
    pub fn convert_files(
        &self,
        files: &[PathBuf],
        xml_path: &Path,
        output_dir: &Path,
    ) -> Result<ConversionStats, ConvertError> {
        let metadata = ExperimentMetadata::from_xml_path(xml_path)?;
        let table = MetadataTable::build(metadata, files);

        table.validate_integrity()?;
        info!(
            "integrity check passed: {} group(s) from {} record(s)",
            table.group_count(),
            table.records().len()
        );

        let mut stats = ConversionStats {
            files_seen: files.len(),
            files_skipped: table.skipped().len(),
            ..Default::default()
        };

        for (key, group) in table.groups() {
            if key.channel.is_none() {
                warn!("skipping group with unrecognized naming: {key}");
                continue;
            }

            let stack = assemble_stack(&group)?;
            let base = output::build_output_name(key, &group)?;
            let stack_metadata = StackMetadata::for_group(key, table.metadata());

            let ome_path = output_dir.join(format!("{base}.ome.tif"));
            output::write_ome_tiff(&ome_path, &stack, &stack_metadata)?;
            stats.outputs.push(ome_path);

            if self.config.save_raw {
                let raw_path = output_dir.join(format!("{base}.tif"));
                output::write_plain_tiff(&raw_path, &stack)?;
                stats.outputs.push(raw_path);
            }

            stats.groups_written += 1;
        }

        Ok(stats)
    }
}

impl Default for StackConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// List the `.tif`/`.tiff` files directly inside a directory, sorted and
/// deduplicated.
pub fn find_tiff_files(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_tiff = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"))
            .unwrap_or(false);
        if is_tiff {
            files.push(path);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_channel_marker(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.contains("Chan") || n.contains("CH"))
        .unwrap_or(false)
}
