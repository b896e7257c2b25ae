//! Signature region extraction and dumping.
//!
//! Test programs leave the byte addresses of their result region in two
//! fixed memory words. On completion the harness reads those pointers and
//! serializes the region for external pass/fail comparison, one 8-hex-digit
//! word per line in ascending address order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::common::{HarnessError, Result};
use crate::config::defaults;
use crate::model::Dut;

/// Reads the signature byte range `[start, stop)` from the pointer words.
pub fn region<D: Dut + ?Sized>(dut: &D) -> (u32, u32) {
    (
        dut.mem_word(defaults::SIGNATURE_START_WORD),
        dut.mem_word(defaults::SIGNATURE_STOP_WORD),
    )
}

/// Dumps the signature region to `path` in h32 format.
///
/// A region smaller than one word is skipped with a warning; an unwritable
/// dump path is fatal.
///
/// # Errors
///
/// [`HarnessError::Signature`] when the dump file cannot be created or
/// written.
pub fn dump_signature<D: Dut + ?Sized>(dut: &D, path: &Path) -> Result<()> {
    let (start, stop) = region(dut);
    let size = stop.saturating_sub(start);
    info!(start = %format_args!("{start:#x}"), size, "signature region");

    if size < 4 {
        warn!("signature region smaller than one word, skipping dump");
        return Ok(());
    }

    let err = |source| HarnessError::Signature {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(err)?;
    let mut out = BufWriter::new(file);
    for word in (start / 4)..(stop / 4) {
        writeln!(out, "{:08x}", dut.mem_word(word)).map_err(err)?;
    }
    out.flush().map_err(err)?;

    info!(path = %path.display(), words = size / 4, "signature dumped");
    Ok(())
}
