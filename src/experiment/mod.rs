//! Experiment descriptor parsing
//!
//! Thorlabs acquisitions ship an `Experiment.xml` next to the TIFF files
//! describing what was acquired: expected Z-plane and timepoint counts,
//! channel names and physical pixel sizes. Every field is optional — the
//! parser extracts what it finds and leaves the rest absent, so downstream
//! integrity checks only run against dimensions the descriptor actually
//! declares.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

mod error;
mod parser;

#[cfg(test)]
mod tests;

pub use error::ExperimentXmlError;

/// Metadata declared by `Experiment.xml`, parsed once and read-only
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    /// Declared number of Z-planes per acquisition group (`<SizeZ>`)
    pub size_z: Option<u32>,

    /// Declared number of timepoints (`<SizeT>`)
    pub size_t: Option<u32>,

    /// Declared channel names (`<Channels><Channel><Name>`); `None` when the
    /// descriptor declares no channels
    pub channel_names: Option<Vec<String>>,

    /// Physical pixel size along X in micrometers (`<PixelSize><X>`)
    pub pixel_size_x_um: Option<f64>,

    /// Physical pixel size along Y in micrometers (`<PixelSize><Y>`)
    pub pixel_size_y_um: Option<f64>,

    /// Z-step between planes in micrometers (`<StepSizeZ>`)
    pub step_size_z_um: Option<f64>,
}

impl ExperimentMetadata {
    /// Parse an experiment descriptor from a file path.
    ///
    /// The descriptor is required: a missing file is
    /// [`ExperimentXmlError::MissingFile`], malformed XML is
    /// [`ExperimentXmlError::Xml`].
    pub fn from_xml_path<P: AsRef<Path>>(path: P) -> Result<Self, ExperimentXmlError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ExperimentXmlError::MissingFile(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse an experiment descriptor from a `BufRead` source.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ExperimentXmlError> {
        parser::parse_experiment_xml(reader)
    }
}
