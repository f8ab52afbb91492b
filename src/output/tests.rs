use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use ndarray::Array3;
use tempfile::tempdir;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use super::*;

fn key(channel: Option<&str>, x: Option<u32>, y: Option<u32>, t: Option<u32>) -> GroupKey {
    GroupKey {
        channel: channel.map(str::to_string),
        stage_x: x,
        stage_y: y,
        t,
    }
}

fn member(z: Option<u32>) -> FileRecord {
    FileRecord {
        filename: String::new(),
        path: PathBuf::new(),
        channel: Some("ChanA".to_string()),
        stage_x: Some(1),
        stage_y: Some(2),
        z,
        t: Some(0),
    }
}

#[test]
fn name_for_single_z() {
    let members = [member(Some(3))];
    let refs: Vec<&FileRecord> = members.iter().collect();
    let name = build_output_name(&key(Some("ChanA"), Some(1), Some(2), Some(0)), &refs).unwrap();
    assert_eq!(name, "Output_ChanA_001_002_Z003_000");
}

#[test]
fn name_for_z_range() {
    let members = [member(Some(3)), member(Some(4)), member(Some(5))];
    let refs: Vec<&FileRecord> = members.iter().collect();
    let name = build_output_name(&key(Some("ChanA"), Some(1), Some(2), Some(0)), &refs).unwrap();
    assert_eq!(name, "Output_ChanA_001_002_merged_003To005_000");
}

#[test]
fn name_for_non_contiguous_range_uses_bounds() {
    let members = [member(Some(7)), member(Some(2))];
    let refs: Vec<&FileRecord> = members.iter().collect();
    let name = build_output_name(&key(Some("ChanA"), Some(1), Some(2), Some(0)), &refs).unwrap();
    assert_eq!(name, "Output_ChanA_001_002_merged_002To007_000");
}

#[test]
fn name_without_z_information() {
    let members = [member(None)];
    let refs: Vec<&FileRecord> = members.iter().collect();
    let name = build_output_name(&key(Some("ChanA"), Some(1), Some(2), Some(0)), &refs).unwrap();
    assert_eq!(name, "Output_ChanA_001_002_Zsingle_000");
}

#[test]
fn name_fails_on_missing_coordinate() {
    let members = [member(Some(0))];
    let refs: Vec<&FileRecord> = members.iter().collect();
    let err = build_output_name(&key(Some("ChanA"), None, Some(2), Some(0)), &refs).unwrap_err();
    assert!(matches!(err, CastError::Missing { .. }));
}

#[test]
fn ome_tiff_roundtrips_planes_and_description() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.ome.tif");

    let stack =
        Array3::from_shape_vec((2, 3, 4), (0u16..24).collect::<Vec<u16>>()).unwrap();
    let metadata = StackMetadata {
        channel: Some("ChanA".to_string()),
        pixel_size_x_um: Some(0.103),
        pixel_size_y_um: Some(0.103),
        step_size_z_um: Some(0.5),
    };

    write_ome_tiff(&path, &stack, &metadata).unwrap();

    let mut decoder = Decoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
    let description = decoder.get_tag_ascii_string(Tag::ImageDescription).unwrap();
    assert!(description.contains("<OME"));
    assert!(description.contains(r#"SizeX="4" SizeY="3" SizeZ="2""#));
    assert!(description.contains(r#"PhysicalSizeX="0.103""#));
    assert!(description.contains(r#"PhysicalSizeZ="0.5""#));
    assert!(description.contains(r#"Name="ChanA""#));

    assert_eq!(decoder.dimensions().unwrap(), (4, 3));
    let first = match decoder.read_image().unwrap() {
        DecodingResult::U16(data) => data,
        other => panic!("unexpected sample type: {other:?}"),
    };
    assert_eq!(first, (0u16..12).collect::<Vec<u16>>());

    assert!(decoder.more_images());
    decoder.next_image().unwrap();
    let second = match decoder.read_image().unwrap() {
        DecodingResult::U16(data) => data,
        other => panic!("unexpected sample type: {other:?}"),
    };
    assert_eq!(second, (12u16..24).collect::<Vec<u16>>());
    assert!(!decoder.more_images());
}

#[test]
fn plain_tiff_writes_one_page_per_plane() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("raw.tif");

    let stack = Array3::from_shape_vec((3, 2, 2), vec![5u16; 12]).unwrap();
    write_plain_tiff(&path, &stack).unwrap();

    let mut decoder = Decoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
    let mut pages = 1;
    while decoder.more_images() {
        decoder.next_image().unwrap();
        pages += 1;
    }
    assert_eq!(pages, 3);
}

#[test]
fn empty_stack_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.ome.tif");
    let stack = Array3::<u16>::zeros((0, 4, 4));
    assert!(matches!(
        write_ome_tiff(&path, &stack, &StackMetadata::default()),
        Err(WriterError::EmptyStack(_))
    ));
}

#[test]
fn parent_directories_are_created() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/deeper/out.ome.tif");
    let stack = Array3::from_shape_vec((1, 2, 2), vec![1u16; 4]).unwrap();
    write_ome_tiff(&path, &stack, &StackMetadata::default()).unwrap();
    assert!(path.exists());
}
