//! Image parsing and injection tests.

use std::io::Write;
use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

use cosim_core::common::HarnessError;
use cosim_core::config::ImageFormat;
use cosim_core::sim::loader;

use crate::common::{write_bin, write_h32};

const WORDS: [u32; 4] = [0xdead_beef, 0x0000_0001, 0xcafe_f00d, 0x8000_0000];

fn collect(path: &Path, format: ImageFormat, capacity: u32) -> Result<Vec<(u32, u32)>, HarnessError> {
    let mut injected = Vec::new();
    loader::load_image(path, format, capacity, |index, value| {
        injected.push((index, value));
    })?;
    Ok(injected)
}

#[rstest]
#[case::h32(ImageFormat::H32)]
#[case::bin(ImageFormat::Bin)]
fn injects_words_in_ascending_order(#[case] format: ImageFormat) {
    let file = match format {
        ImageFormat::H32 => write_h32(&WORDS),
        ImageFormat::Bin => write_bin(&WORDS),
    };
    let injected = collect(file.path(), format, 16).unwrap();

    let expected: Vec<(u32, u32)> = WORDS
        .iter()
        .enumerate()
        .map(|(index, &value)| (index as u32, value))
        .collect();
    assert_eq!(injected, expected);
}

#[test]
fn h32_skips_blank_lines() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "00000001\n\n00000002").unwrap();
    file.flush().unwrap();

    let injected = collect(file.path(), ImageFormat::H32, 16).unwrap();
    assert_eq!(injected, vec![(0, 1), (1, 2)]);
}

#[test]
fn h32_rejects_non_hex_line() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "00000001").unwrap();
    writeln!(file, "notahexx").unwrap();
    file.flush().unwrap();

    let err = collect(file.path(), ImageFormat::H32, 16).unwrap_err();
    assert!(matches!(err, HarnessError::ImageParse { line: 2, .. }));
}

#[test]
fn h32_rejects_overlong_line() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "123456789").unwrap();
    file.flush().unwrap();

    let err = collect(file.path(), ImageFormat::H32, 16).unwrap_err();
    assert!(matches!(err, HarnessError::ImageParse { line: 1, .. }));
}

#[test]
fn rejects_image_larger_than_memory() {
    let file = write_h32(&[0, 1, 2, 3, 4]);
    let err = collect(file.path(), ImageFormat::H32, 4).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::ImageOverflow {
            words: 5,
            capacity: 4,
            ..
        }
    ));
}

#[test]
fn missing_file_is_fatal() {
    let err = collect(Path::new("/no/such/image.hex"), ImageFormat::H32, 16).unwrap_err();
    assert!(matches!(err, HarnessError::Image { .. }));
}

#[test]
fn bin_rejects_partial_trailing_word() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]).unwrap();
    file.flush().unwrap();

    let err = collect(file.path(), ImageFormat::Bin, 16).unwrap_err();
    assert!(matches!(err, HarnessError::ImageTruncated { len: 6, .. }));
}

#[test]
fn bin_words_are_little_endian() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0x78, 0x56, 0x34, 0x12]).unwrap();
    file.flush().unwrap();

    let injected = collect(file.path(), ImageFormat::Bin, 16).unwrap();
    assert_eq!(injected, vec![(0, 0x1234_5678)]);
}

#[test]
fn nothing_is_injected_on_parse_failure() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "00000001").unwrap();
    writeln!(file, "oops").unwrap();
    file.flush().unwrap();

    let mut writes = 0;
    let result = loader::load_image(file.path(), ImageFormat::H32, 16, |_, _| {
        writes += 1;
    });
    assert!(result.is_err());
    assert_eq!(writes, 0);
}
