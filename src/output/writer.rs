//! TIFF writers for assembled volumes.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use log::info;
use ndarray::{Array3, Axis};
use quick_xml::escape::escape;
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

use super::{StackMetadata, WriterError};

const OME_XMLNS: &str = "http://www.openmicroscopy.org/Schemas/OME/2016-06";

/// Write a (Z, Y, X) volume as an OME-TIFF.
///
/// One Gray16 page per z-plane; the first IFD carries an OME-XML document
/// describing the (1, 1, Z, Y, X) image with its channel name and physical
/// pixel sizes, so shape and pixel-size metadata round-trip losslessly for
/// the populated dimensions.
pub fn write_ome_tiff(
    path: &Path,
    stack: &Array3<u16>,
    metadata: &StackMetadata,
) -> Result<(), WriterError> {
    let (size_z, size_y, size_x) = stack.dim();
    if size_z == 0 || size_y == 0 || size_x == 0 {
        return Err(WriterError::EmptyStack(path.to_path_buf()));
    }
    ensure_parent(path)?;

    let description = ome_xml(size_x, size_y, size_z, metadata);

    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
    for (index, plane) in stack.axis_iter(Axis(0)).enumerate() {
        let samples: Vec<u16> = plane.iter().copied().collect();
        if index == 0 {
            let mut image = encoder.new_image::<colortype::Gray16>(size_x as u32, size_y as u32)?;
            image
                .encoder()
                .write_tag(Tag::ImageDescription, description.as_str())?;
            image.write_data(&samples)?;
        } else {
            encoder.write_image::<colortype::Gray16>(size_x as u32, size_y as u32, &samples)?;
        }
    }

    info!("saved OME-TIFF -> {}", path.display());
    Ok(())
}

/// Write a (Z, Y, X) volume as a plain multi-page TIFF, one page per plane.
pub fn write_plain_tiff(path: &Path, stack: &Array3<u16>) -> Result<(), WriterError> {
    let (size_z, size_y, size_x) = stack.dim();
    if size_z == 0 || size_y == 0 || size_x == 0 {
        return Err(WriterError::EmptyStack(path.to_path_buf()));
    }
    ensure_parent(path)?;

    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
    for plane in stack.axis_iter(Axis(0)) {
        let samples: Vec<u16> = plane.iter().copied().collect();
        encoder.write_image::<colortype::Gray16>(size_x as u32, size_y as u32, &samples)?;
    }

    info!("saved plain TIFF -> {}", path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), WriterError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Minimal OME-XML for a single-channel, single-timepoint z-stack.
///
/// Physical size attributes are emitted only when known; the OME default
/// unit (micrometers) applies.
fn ome_xml(size_x: usize, size_y: usize, size_z: usize, metadata: &StackMetadata) -> String {
    let mut physical = String::new();
    if let Some(v) = metadata.pixel_size_x_um {
        physical.push_str(&format!(r#" PhysicalSizeX="{v}""#));
    }
    if let Some(v) = metadata.pixel_size_y_um {
        physical.push_str(&format!(r#" PhysicalSizeY="{v}""#));
    }
    if let Some(v) = metadata.step_size_z_um {
        physical.push_str(&format!(r#" PhysicalSizeZ="{v}""#));
    }

    let channel = match &metadata.channel {
        Some(name) => format!(
            r#"<Channel ID="Channel:0:0" Name="{}" SamplesPerPixel="1"/>"#,
            escape(name.as_str())
        ),
        None => r#"<Channel ID="Channel:0:0" SamplesPerPixel="1"/>"#.to_string(),
    };

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<OME xmlns="{xmlns}">"#,
            r#"<Image ID="Image:0">"#,
            r#"<Pixels ID="Pixels:0" DimensionOrder="XYZCT" Type="uint16" "#,
            r#"SizeX="{x}" SizeY="{y}" SizeZ="{z}" SizeC="1" SizeT="1"{physical}>"#,
            "{channel}",
            r#"<TiffData IFD="0" PlaneCount="{z}"/>"#,
            r#"</Pixels></Image></OME>"#,
        ),
        xmlns = OME_XMLNS,
        x = size_x,
        y = size_y,
        z = size_z,
        physical = physical,
        channel = channel,
    )
}
