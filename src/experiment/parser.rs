//! Pull-based descriptor parser built on quick-xml.
//!
//! Elements are matched by local name against the current element path, so
//! the parser is indifferent to where in the document the declared fields
//! appear and to any surrounding vendor elements it does not recognize.

use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{ExperimentMetadata, ExperimentXmlError};
use crate::table::{validate_and_cast, CoordValue};

pub(super) fn parse_experiment_xml<R: BufRead>(
    reader: R,
) -> Result<ExperimentMetadata, ExperimentXmlError> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.config_mut().trim_text(true);

    let mut meta = ExperimentMetadata::default();
    let mut channels: Vec<String> = Vec::new();

    let mut path: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(ref t) => {
                let text = t.unescape()?;
                let text = text.trim();
                if !text.is_empty() {
                    apply_field(&mut meta, &mut channels, &path, text)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    // No channels declared at all collapses to absent.
    if !channels.is_empty() {
        meta.channel_names = Some(channels);
    }

    Ok(meta)
}

fn apply_field(
    meta: &mut ExperimentMetadata,
    channels: &mut Vec<String>,
    path: &[String],
    text: &str,
) -> Result<(), ExperimentXmlError> {
    match path.last().map(String::as_str) {
        Some("SizeZ") => meta.size_z = Some(declared_count("SizeZ", text)?),
        Some("SizeT") => meta.size_t = Some(declared_count("SizeT", text)?),
        Some("StepSizeZ") => meta.step_size_z_um = Some(micron_value("StepSizeZ", text)?),
        Some("X") if ends_with(path, &["PixelSize", "X"]) => {
            meta.pixel_size_x_um = Some(micron_value("X", text)?);
        }
        Some("Y") if ends_with(path, &["PixelSize", "Y"]) => {
            meta.pixel_size_y_um = Some(micron_value("Y", text)?);
        }
        Some("Name") if ends_with(path, &["Channels", "Channel", "Name"]) => {
            channels.push(text.to_string());
        }
        _ => {}
    }
    Ok(())
}

fn ends_with(path: &[String], suffix: &[&str]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(a, b)| a == b)
}

/// Declared counts tolerate float-typed text ("3.0") per the coordinate
/// coercion policy.
fn declared_count(element: &str, text: &str) -> Result<u32, ExperimentXmlError> {
    validate_and_cast(element, CoordValue::Text(text.to_string())).map_err(|source| {
        ExperimentXmlError::InvalidValue {
            element: element.to_string(),
            source,
        }
    })
}

fn micron_value(element: &str, text: &str) -> Result<f64, ExperimentXmlError> {
    text.parse::<f64>()
        .map_err(|_| ExperimentXmlError::InvalidNumber {
            element: element.to_string(),
            value: text.to_string(),
        })
}
