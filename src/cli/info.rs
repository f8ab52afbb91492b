use anyhow::Result;
use std::path::PathBuf;

use thorstack::converter::find_tiff_files;
use thorstack::experiment::ExperimentMetadata;
use thorstack::table::MetadataTable;

/// Display experiment metadata and, when a TIFF directory is given, the
/// grouping it implies
pub fn run(xml: PathBuf, tiff_dir: Option<PathBuf>) -> Result<()> {
    let metadata = ExperimentMetadata::from_xml_path(&xml)?;

    println!("Experiment Descriptor");
    println!("=====================");
    println!("File: {}", xml.display());
    println!();
    println!("Declared dimensions:");
    println!("  SizeZ    : {}", count(metadata.size_z));
    println!("  SizeT    : {}", count(metadata.size_t));
    println!(
        "  Channels : {}",
        metadata
            .channel_names
            .as_ref()
            .map(|cs| cs.join(", "))
            .unwrap_or_else(|| "(not declared)".to_string())
    );
    println!();
    println!("Pixel sizes (um):");
    println!("  X : {}", micron(metadata.pixel_size_x_um));
    println!("  Y : {}", micron(metadata.pixel_size_y_um));
    println!("  Z : {}", micron(metadata.step_size_z_um));

    let Some(dir) = tiff_dir else {
        return Ok(());
    };

    let files = find_tiff_files(&dir)?;
    let table = MetadataTable::build(metadata, &files);

    println!();
    println!("Acquisition groups in {}:", dir.display());
    for (key, members) in table.groups() {
        println!("  {key}  ({} file(s))", members.len());
    }
    if !table.skipped().is_empty() {
        println!(
            "  {} file(s) with unrecognized names excluded",
            table.skipped().len()
        );
    }

    println!();
    match table.validate_integrity() {
        Ok(()) => println!("Integrity: OK"),
        Err(err) => println!("Integrity: FAILED - {err}"),
    }

    Ok(())
}

fn count(value: Option<u32>) -> String {
    value.map_or_else(|| "(not declared)".to_string(), |v| v.to_string())
}

fn micron(value: Option<f64>) -> String {
    value.map_or_else(|| "(not declared)".to_string(), |v| v.to_string())
}
