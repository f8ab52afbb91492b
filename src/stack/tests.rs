use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::tempdir;
use tiff::encoder::{colortype, TiffEncoder};

use super::*;

fn write_gray16(path: &Path, width: u32, height: u32, pages: &[Vec<u16>]) {
    let mut encoder = TiffEncoder::new(File::create(path).unwrap()).unwrap();
    for page in pages {
        encoder
            .write_image::<colortype::Gray16>(width, height, page)
            .unwrap();
    }
}

fn record_for(path: &Path) -> FileRecord {
    FileRecord {
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        channel: Some("ChanA".to_string()),
        stage_x: Some(1),
        stage_y: Some(1),
        z: Some(0),
        t: Some(0),
    }
}

#[test]
fn single_page_promoted_to_one_slice() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plane.tif");
    let page: Vec<u16> = (0..12).collect();
    write_gray16(&path, 4, 3, &[page.clone()]);

    let volume = read_volume(&path).unwrap();
    assert_eq!(volume.dim(), (1, 3, 4));
    assert_eq!(volume.iter().copied().collect::<Vec<u16>>(), page);
}

#[test]
fn multi_page_file_becomes_volume() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("volume.tif");
    let pages: Vec<Vec<u16>> = (0..3).map(|p| vec![p as u16; 6]).collect();
    write_gray16(&path, 3, 2, &pages);

    let volume = read_volume(&path).unwrap();
    assert_eq!(volume.dim(), (3, 2, 3));
    assert_eq!(volume[[0, 0, 0]], 0);
    assert_eq!(volume[[2, 1, 2]], 2);
}

#[test]
fn eight_bit_pages_widen_losslessly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gray8.tif");
    let page: Vec<u8> = vec![0, 1, 127, 255];
    let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
    encoder
        .write_image::<colortype::Gray8>(2, 2, &page)
        .unwrap();

    let volume = read_volume(&path).unwrap();
    assert_eq!(
        volume.iter().copied().collect::<Vec<u16>>(),
        vec![0, 1, 127, 255]
    );
}

#[test]
fn color_pages_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rgb.tif");
    let page: Vec<u8> = vec![0; 2 * 2 * 3];
    let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
    encoder.write_image::<colortype::RGB8>(2, 2, &page).unwrap();

    assert!(matches!(
        read_volume(&path),
        Err(StackError::UnsupportedColorType { .. })
    ));
}

#[test]
fn mismatched_pages_within_file_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ragged.tif");
    let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
    encoder
        .write_image::<colortype::Gray16>(2, 2, &[0u16; 4])
        .unwrap();
    encoder
        .write_image::<colortype::Gray16>(3, 2, &[0u16; 6])
        .unwrap();

    assert!(matches!(
        read_volume(&path),
        Err(StackError::ShapeMismatch { .. })
    ));
}

#[test]
fn assemble_concatenates_in_group_order() {
    let dir = tempdir().unwrap();
    let paths: Vec<PathBuf> = (0..3)
        .map(|z| {
            let path = dir.path().join(format!("ChanA_001_001_{z:03}_000.tif"));
            write_gray16(&path, 2, 2, &[vec![z as u16 * 10; 4]]);
            path
        })
        .collect();
    let records: Vec<FileRecord> = paths.iter().map(|p| record_for(p)).collect();
    let refs: Vec<&FileRecord> = records.iter().collect();

    let stack = assemble_stack(&refs).unwrap();
    assert_eq!(stack.dim(), (3, 2, 2));
    assert_eq!(stack[[0, 0, 0]], 0);
    assert_eq!(stack[[1, 0, 0]], 10);
    assert_eq!(stack[[2, 0, 0]], 20);
}

#[test]
fn assemble_rejects_cross_file_shape_mismatch() {
    let dir = tempdir().unwrap();
    let small = dir.path().join("small.tif");
    let large = dir.path().join("large.tif");
    write_gray16(&small, 2, 2, &[vec![0u16; 4]]);
    write_gray16(&large, 3, 2, &[vec![0u16; 6]]);

    let records = [record_for(&small), record_for(&large)];
    let refs: Vec<&FileRecord> = records.iter().collect();
    assert!(matches!(
        assemble_stack(&refs),
        Err(StackError::ShapeMismatch { .. })
    ));
}

#[test]
fn assemble_rejects_empty_group() {
    assert!(matches!(assemble_stack(&[]), Err(StackError::EmptyGroup)));
}
