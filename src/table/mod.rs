//! Metadata table and acquisition grouping
//!
//! The table is the central record of one conversion run: every input file
//! parsed into a [`FileRecord`], split into records that matched the
//! acquisition pattern and records that did not (kept for diagnostics, never
//! silently dropped), and grouped by acquisition coordinates. Each group —
//! one (channel, stage X, stage Y, timepoint) combination — becomes one
//! output volume, its members ordered by ascending z.
//!
//! [`MetadataTable::validate_integrity`] cross-checks the observed table
//! against the dimensions the experiment descriptor declares before anything
//! is written.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use log::warn;

use crate::experiment::ExperimentMetadata;
use crate::pattern::{FileRecord, FilenamePattern};

mod cast;
mod error;


pub use cast::{validate_and_cast, CoordValue};
pub use error::{CastError, ValidationError};

/// Acquisition coordinates identifying one output volume.
///
/// Equality is exact on all four fields; an absent field is its own equality
/// class, so records that failed to yield a coordinate still bucket together
/// instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub channel: Option<String>,
    pub stage_x: Option<u32>,
    pub stage_y: Option<u32>,
    pub t: Option<u32>,
}

impl GroupKey {
    fn of(record: &FileRecord) -> Self {
        Self {
            channel: record.channel.clone(),
            stage_x: record.stage_x,
            stage_y: record.stage_y,
            t: record.t,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn coord(v: Option<u32>) -> String {
            v.map_or_else(|| "-".to_string(), |n| format!("{n:03}"))
        }
        write!(
            f,
            "{}_{}_{}_t{}",
            self.channel.as_deref().unwrap_or("-"),
            coord(self.stage_x),
            coord(self.stage_y),
            coord(self.t),
        )
    }
}

/// Per-file record table for one conversion run.
pub struct MetadataTable {
    metadata: ExperimentMetadata,
    records: Vec<FileRecord>,
    skipped: Vec<FileRecord>,
    groups: BTreeMap<GroupKey, Vec<usize>>,
}

impl MetadataTable {
    /// Parse every path and build the grouped table.
    ///
    /// Files whose names do not match the acquisition pattern are warned
    /// about, retained in [`MetadataTable::skipped`] and excluded from
    /// grouping.
    pub fn build<P: AsRef<Path>>(metadata: ExperimentMetadata, paths: &[P]) -> Self {
        let pattern = FilenamePattern::new();
        let records = paths.iter().map(|p| pattern.parse(p.as_ref())).collect();
        Self::from_records(metadata, records)
    }

    /// Build the table from already-parsed records.
    pub fn from_records(metadata: ExperimentMetadata, parsed: Vec<FileRecord>) -> Self {
        let mut records = Vec::with_capacity(parsed.len());
        let mut skipped = Vec::new();
        for record in parsed {
            if record.is_matched() {
                records.push(record);
            } else {
                skipped.push(record);
            }
        }

        if !skipped.is_empty() {
            let names: Vec<&str> = skipped.iter().map(|r| r.filename.as_str()).collect();
            warn!(
                "skipping {} file(s) that do not match expected pattern: {:?}",
                skipped.len(),
                names
            );
        }

        let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            groups.entry(GroupKey::of(record)).or_default().push(index);
        }
        // Members sorted by ascending z, absent z after all present values.
        for members in groups.values_mut() {
            members.sort_by_key(|&i| (records[i].z.is_none(), records[i].z));
        }

        Self {
            metadata,
            records,
            skipped,
            groups,
        }
    }

    /// Descriptor metadata this table validates against
    pub fn metadata(&self) -> &ExperimentMetadata {
        &self.metadata
    }

    /// Records that matched the acquisition pattern
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Records excluded from grouping because their names did not match
    pub fn skipped(&self) -> &[FileRecord] {
        &self.skipped
    }

    /// Number of acquisition groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Iterate the acquisition groups in key order.
    ///
    /// Finite and restartable: repeated calls over an unchanged table yield
    /// identical keys and member order.
    pub fn groups(&self) -> impl Iterator<Item = (&GroupKey, Vec<&FileRecord>)> {
        self.groups.iter().map(move |(key, members)| {
            let group: Vec<&FileRecord> = members.iter().map(|&i| &self.records[i]).collect();
            (key, group)
        })
    }

    /// Cross-check the observed table against declared dimensions.
    ///
    /// Three independent checks, each failing with a descriptive error and
    /// never silently corrected:
    ///
    /// 1. every group holding z values must have exactly `SizeZ` distinct
    ///    ones (groups without z info are single-slice acquisitions, exempt);
    /// 2. the distinct t values across the table must number exactly
    ///    `SizeT`, unless none were observed;
    /// 3. every parsed channel must match a declared channel name,
    ///    case-insensitively, substring in either direction.
    pub fn validate_integrity(&self) -> Result<(), ValidationError> {
        if let Some(declared) = self.metadata.size_z {
            let mut mismatches = Vec::new();
            for (key, members) in self.groups() {
                let distinct: BTreeSet<u32> = members.iter().filter_map(|r| r.z).collect();
                if distinct.is_empty() {
                    // no z info, single-slice acquisition
                    continue;
                }
                if distinct.len() != declared as usize {
                    mismatches.push((key.to_string(), distinct.len()));
                }
            }
            if !mismatches.is_empty() {
                return Err(ValidationError::ZPlaneCount {
                    declared,
                    mismatches,
                });
            }
        }

        if let Some(declared) = self.metadata.size_t {
            let observed: BTreeSet<u32> = self.records.iter().filter_map(|r| r.t).collect();
            if !observed.is_empty() && observed.len() != declared as usize {
                return Err(ValidationError::TimepointCount {
                    declared,
                    observed: observed.into_iter().collect(),
                });
            }
        }

        if let Some(declared) = &self.metadata.channel_names {
            let declared_norm: Vec<String> = declared.iter().map(|c| c.to_lowercase()).collect();
            let parsed: BTreeSet<String> = self
                .records
                .iter()
                .filter_map(|r| r.channel.as_ref().map(|c| c.to_lowercase()))
                .collect();
            for channel in parsed {
                let matched = declared_norm
                    .iter()
                    .any(|cx| cx.contains(&channel) || channel.contains(cx));
                if !matched {
                    return Err(ValidationError::UnmatchedChannel {
                        parsed: channel,
                        declared: declared.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
