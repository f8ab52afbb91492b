//! Filename pattern parser for Thorlabs acquisitions
//!
//! Thorlabs acquisition software writes one TIFF file per channel, stage
//! position, z-plane and timepoint, encoding all coordinates in the file
//! name:
//!
//! ```text
//! ChanA_001_001_004_001.tif
//! ^     ^   ^   ^   ^
//! chan  X   Y   z   t
//! ```
//!
//! Parsing never fails: a name that does not match the pattern produces a
//! placeholder [`FileRecord`] with every coordinate field absent, so the
//! caller can decide to skip it with a warning rather than abort.

use std::path::{Path, PathBuf};

use regex::Regex;

/// One parsed input file.
///
/// `None` in any coordinate field means the file name did not match the
/// expected pattern. Matching is all-or-nothing: either all five fields are
/// populated or none of them are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// File name (last path component)
    pub filename: String,

    /// Full path as given by the caller
    pub path: PathBuf,

    /// Channel token, e.g. "ChanA"
    pub channel: Option<String>,

    /// Stage tiling position along X
    pub stage_x: Option<u32>,

    /// Stage tiling position along Y
    pub stage_y: Option<u32>,

    /// Z-plane index
    pub z: Option<u32>,

    /// Timepoint index
    pub t: Option<u32>,
}

impl FileRecord {
    /// Whether the file name matched the acquisition pattern
    pub fn is_matched(&self) -> bool {
        self.channel.is_some()
    }
}

/// Accept 'ChanA' or 'Chan-2' etc. Keep flexible.
const FILENAME_PATTERN: &str = concat!(
    r"^(Chan[A-Za-z0-9-]+)", // channel prefix
    r"_(\d+)",               // stage X
    r"_(\d+)",               // stage Y
    r"_(\d+)",               // z index
    r"_(\d+)",               // t index
    r"(?:\.[^.]+)?$",        // extension optional
);

/// Compiled acquisition filename pattern.
pub struct FilenamePattern {
    re: Regex,
}

impl FilenamePattern {
    pub fn new() -> Self {
        Self {
            // Hard-coded pattern, cannot fail to compile.
            re: Regex::new(FILENAME_PATTERN).expect("filename pattern must compile"),
        }
    }

    /// Parse a path into a [`FileRecord`], never failing.
    ///
    /// Only the file name (last component) is matched. A non-matching name,
    /// or a coordinate too large to represent, yields a placeholder record
    /// with absent fields.
    pub fn parse(&self, path: &Path) -> FileRecord {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut record = FileRecord {
            filename: filename.clone(),
            path: path.to_path_buf(),
            channel: None,
            stage_x: None,
            stage_y: None,
            z: None,
            t: None,
        };

        let Some(caps) = self.re.captures(&filename) else {
            return record;
        };

        // Captures are digit-only, so parsing can only fail on overflow;
        // that is absorbed into the placeholder like any other non-match.
        let coords: Option<Vec<u32>> = (2..=5)
            .map(|i| caps[i].parse::<u32>().ok())
            .collect();
        if let Some(coords) = coords {
            record.channel = Some(caps[1].to_string());
            record.stage_x = Some(coords[0]);
            record.stage_y = Some(coords[1]);
            record.z = Some(coords[2]);
            record.t = Some(coords[3]);
        }

        record
    }
}

impl Default for FilenamePattern {
    fn default() -> Self {
        Self::new()
    }
}

/// Format acquisition coordinates back into a canonical file name (without
/// extension). Inverse of [`FilenamePattern::parse`] for matching names.
pub fn format_name(channel: &str, stage_x: u32, stage_y: u32, z: u32, t: u32) -> String {
    format!("{channel}_{stage_x:03}_{stage_y:03}_{z:03}_{t:03}")
}
