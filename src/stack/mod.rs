//! Stack assembly
//!
//! Reads the member files of one acquisition group and concatenates their
//! planes along the leading Z axis, in the group's established order, into a
//! single (Z, Y, X) volume. Single-plane files are promoted to one-slice
//! volumes; nothing is merged across groups.

use ndarray::{concatenate, Array3, Axis};

use crate::pattern::FileRecord;

mod error;
mod reader;

#[cfg(test)]
mod tests;

pub use error::StackError;
pub use reader::read_volume;

/// Assemble one acquisition group into a (Z, Y, X) volume.
///
/// Every member file is read exactly once, in order. All planes must share
/// the same (Y, X) size; a file that differs fails with
/// [`StackError::ShapeMismatch`].
pub fn assemble_stack(records: &[&FileRecord]) -> Result<Array3<u16>, StackError> {
    if records.is_empty() {
        return Err(StackError::EmptyGroup);
    }

    let mut volumes = Vec::with_capacity(records.len());
    let mut expected: Option<(usize, usize)> = None;
    for record in records {
        let volume = read_volume(&record.path)?;
        let (_, height, width) = volume.dim();
        match expected {
            None => expected = Some((height, width)),
            Some(plane) if plane != (height, width) => {
                return Err(StackError::ShapeMismatch {
                    path: record.path.clone(),
                    expected: plane,
                    found: (height, width),
                });
            }
            Some(_) => {}
        }
        volumes.push(volume);
    }

    let views: Vec<_> = volumes.iter().map(|v| v.view()).collect();
    Ok(concatenate(Axis(0), &views)?)
}
