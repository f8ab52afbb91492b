//! Output naming and standardized stack writing
//!
//! Each acquisition group becomes one output file. The base name is derived
//! deterministically from the group key and the z range its members cover,
//! so distinct groups can never collide:
//!
//! ```text
//! Output_ChanA_001_002_Z003_000              single z-plane
//! Output_ChanA_001_002_merged_003To005_000   z range
//! Output_ChanA_001_002_Zsingle_000           no z information
//! ```
//!
//! The writers persist a (Z, Y, X) volume either as an OME-TIFF (one Gray16
//! page per plane, OME-XML in the first IFD) or as a plain multi-page TIFF
//! twin when raw output is requested.

use std::collections::BTreeSet;

use crate::experiment::ExperimentMetadata;
use crate::pattern::FileRecord;
use crate::table::{CastError, GroupKey};

mod error;
mod writer;

#[cfg(test)]
mod tests;

pub use error::WriterError;
pub use writer::{write_ome_tiff, write_plain_tiff};

/// Metadata forwarded into one output stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackMetadata {
    pub channel: Option<String>,
    pub pixel_size_x_um: Option<f64>,
    pub pixel_size_y_um: Option<f64>,
    pub step_size_z_um: Option<f64>,
}

impl StackMetadata {
    /// Combine a group's channel with the experiment-wide pixel sizes.
    pub fn for_group(key: &GroupKey, experiment: &ExperimentMetadata) -> Self {
        Self {
            channel: key.channel.clone(),
            pixel_size_x_um: experiment.pixel_size_x_um,
            pixel_size_y_um: experiment.pixel_size_y_um,
            step_size_z_um: experiment.step_size_z_um,
        }
    }
}

/// Derive the output base name for one acquisition group.
///
/// Deterministic and injective across distinct group keys. A key missing a
/// coordinate cannot be named and fails with [`CastError::Missing`].
pub fn build_output_name(key: &GroupKey, group: &[&FileRecord]) -> Result<String, CastError> {
    let channel = key
        .channel
        .as_deref()
        .ok_or_else(|| missing("Channel"))?;
    let stage_x = key.stage_x.ok_or_else(|| missing("StageX"))?;
    let stage_y = key.stage_y.ok_or_else(|| missing("StageY"))?;
    let t = key.t.ok_or_else(|| missing("T"))?;

    let z_values: BTreeSet<u32> = group.iter().filter_map(|r| r.z).collect();
    let z_part = match (z_values.first().copied(), z_values.last().copied()) {
        (Some(min), Some(max)) if min == max => format!("Z{min:03}"),
        (Some(min), Some(max)) => format!("merged_{min:03}To{max:03}"),
        _ => "Zsingle".to_string(),
    };

    Ok(format!(
        "Output_{channel}_{stage_x:03}_{stage_y:03}_{z_part}_{t:03}"
    ))
}

fn missing(field: &str) -> CastError {
    CastError::Missing {
        field: field.to_string(),
    }
}
