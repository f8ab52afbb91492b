//! TIFF file decoding into volumes.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::Array3;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;

use super::StackError;

/// Decode one TIFF file into a (Z, Y, X) volume.
///
/// Every grayscale page is one (Y, X) plane; a single-page file becomes a
/// one-slice volume. All pages must share the first page's size. 8-bit
/// pages widen losslessly to u16.
pub fn read_volume(path: &Path) -> Result<Array3<u16>, StackError> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let (width, height) = decoder.dimensions()?;
    let plane = (height as usize, width as usize);

    let mut samples: Vec<u16> = Vec::new();
    let mut planes = 0usize;

    loop {
        let (width, height) = decoder.dimensions()?;
        let found = (height as usize, width as usize);
        if found != plane {
            return Err(StackError::ShapeMismatch {
                path: path.to_path_buf(),
                expected: plane,
                found,
            });
        }

        match decoder.colortype()? {
            ColorType::Gray(8) | ColorType::Gray(16) => {}
            other => {
                return Err(StackError::UnsupportedColorType {
                    path: path.to_path_buf(),
                    found: format!("{other:?}"),
                });
            }
        }

        match decoder.read_image()? {
            DecodingResult::U16(data) => samples.extend(data),
            DecodingResult::U8(data) => samples.extend(data.into_iter().map(u16::from)),
            _ => {
                return Err(StackError::UnsupportedColorType {
                    path: path.to_path_buf(),
                    found: "non 8/16-bit sample type".to_string(),
                });
            }
        }
        planes += 1;

        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    Ok(Array3::from_shape_vec((planes, plane.0, plane.1), samples)?)
}
