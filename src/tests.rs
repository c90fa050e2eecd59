//! End-to-end tests over in-memory disc images

use std::io::Cursor;

use crate::license::text::{JAPAN_TEXT, US_TEXT};
use crate::license::{LICENSE_AREA_SIZE, TEXT_SECTOR};
use crate::sector::SECTOR_SIZE;
use crate::{BlobExtraction, LicenseArea, LicensePatch, Region};

/// A fake BIN image: a blank license area followed by a few sectors of "filesystem"
fn disc_image() -> Vec<u8> {
    let mut image = LicenseArea::blank().to_bytes();

    image.extend((0..SECTOR_SIZE * 4).map(|i| (i % 200) as u8));

    image
}

#[test]
fn us_default_text_on_zeroed_area() {
    let mut area = LicenseArea::from_bytes(&vec![0; LICENSE_AREA_SIZE]).unwrap();

    area.set_text(Region::Us.default_text(), false);

    assert_eq!(&area.text(), US_TEXT);
    assert_eq!(area.region(), Some(Region::Us));
}

#[test]
fn patch_and_dump() {
    let original = disc_image();
    let mut image = Cursor::new(original.clone());

    let tmd: Vec<u8> = (0..13079).map(|i| (i % 13) as u8 + 0x10).collect();

    let mut area = LicenseArea::read_from(&mut image).unwrap();

    let patch = LicensePatch {
        region: Some(Region::Japan),
        text: None,
        blob: Some(tmd.clone()),
    };

    let report = patch.apply(&mut area).unwrap();

    assert!(!report.text_truncated);
    assert_eq!(report.blob_over_assumed_limit, None);

    area.write_to(&mut image).unwrap();

    let patched = image.into_inner();

    assert_eq!(patched.len(), original.len());
    // Only the license area is modified
    assert_eq!(&patched[LICENSE_AREA_SIZE..], &original[LICENSE_AREA_SIZE..]);

    // Sectors 0 to 3 are untouched
    assert_eq!(
        &patched[..SECTOR_SIZE * TEXT_SECTOR],
        &original[..SECTOR_SIZE * TEXT_SECTOR]
    );

    // Reload from scratch and dump
    let area = LicenseArea::read_from(&mut Cursor::new(&patched)).unwrap();

    assert_eq!(area.region(), Some(Region::Japan));
    assert_eq!(area.text_export(), &JAPAN_TEXT[..]);
    assert_eq!(area.blob(BlobExtraction::Logical), tmd);

    // Japanese padding overruns into the EDC
    let edc_offset = SECTOR_SIZE * TEXT_SECTOR + 2072;
    assert_eq!(patched[edc_offset], 0x30);
    assert_eq!(patched[edc_offset - 1], 0x30);
}

#[test]
fn reapply_is_stable() {
    let mut area = LicenseArea::from_bytes(&disc_image()).unwrap();

    let patch = LicensePatch {
        region: Some(Region::Europe),
        text: None,
        blob: Some(vec![0x42; 3000]),
    };

    patch.apply(&mut area).unwrap();
    let once = area.to_bytes();

    patch.apply(&mut area).unwrap();

    assert_eq!(area.to_bytes(), once);
}

#[test]
fn empty_patch_is_identity() {
    let raw = disc_image();
    let mut area = LicenseArea::from_bytes(&raw).unwrap();

    LicensePatch::default().apply(&mut area).unwrap();

    assert_eq!(&area.to_bytes()[..], &raw[..LICENSE_AREA_SIZE]);
}
