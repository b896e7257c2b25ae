//! Program image parsing and injection.
//!
//! The loader parses the entire image before touching model memory, then
//! injects words in ascending index order through a write callback. Either
//! the whole image lands in memory or nothing does: any parse or I/O failure
//! aborts before the first write.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::{HarnessError, Result};
use crate::config::ImageFormat;

/// Parses `path` in the given `format` and injects each word via `write`.
///
/// `words` is the model memory capacity in words; images larger than that are
/// rejected. Returns the number of words injected.
///
/// # Errors
///
/// [`HarnessError::Image`] when the file cannot be read,
/// [`HarnessError::ImageParse`] / [`HarnessError::ImageTruncated`] on
/// malformed content, and [`HarnessError::ImageOverflow`] when the image does
/// not fit.
pub fn load_image(
    path: &Path,
    format: ImageFormat,
    words: u32,
    mut write: impl FnMut(u32, u32),
) -> Result<u32> {
    let image = match format {
        ImageFormat::H32 => parse_h32(path, words)?,
        ImageFormat::Bin => parse_bin(path, words)?,
    };

    for (index, &value) in image.iter().enumerate() {
        write(index as u32, value);
    }

    info!(
        path = %path.display(),
        words = image.len(),
        format = ?format,
        "program image loaded"
    );
    Ok(image.len() as u32)
}

/// Parses an h32 image: one 8-hex-digit 32-bit word per line.
fn parse_h32(path: &Path, words: u32) -> Result<Vec<u32>> {
    let text = fs::read_to_string(path).map_err(|source| HarnessError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    let mut image = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.len() > 8 {
            return Err(parse_error(path, index, line));
        }
        let value =
            u32::from_str_radix(line, 16).map_err(|_| parse_error(path, index, line))?;
        image.push(value);
    }

    check_capacity(path, image.len() as u32, words)?;
    Ok(image)
}

/// Parses a raw binary image: consecutive little-endian 32-bit words.
fn parse_bin(path: &Path, words: u32) -> Result<Vec<u32>> {
    let bytes = fs::read(path).map_err(|source| HarnessError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.len() % 4 != 0 {
        return Err(HarnessError::ImageTruncated {
            path: path.to_path_buf(),
            len: bytes.len() as u64,
        });
    }

    let image: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    check_capacity(path, image.len() as u32, words)?;
    Ok(image)
}

fn parse_error(path: &Path, line_index: usize, line: &str) -> HarnessError {
    HarnessError::ImageParse {
        path: path.to_path_buf(),
        line: line_index + 1,
        text: line.to_string(),
    }
}

fn check_capacity(path: &Path, words: u32, capacity: u32) -> Result<()> {
    if words > capacity {
        return Err(HarnessError::ImageOverflow {
            path: path.to_path_buf(),
            words,
            capacity,
        });
    }
    Ok(())
}
