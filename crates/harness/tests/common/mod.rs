//! Shared fixtures for the harness test suite.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use cosim_core::config::RunConfig;

/// Writes an h32 image file: one 8-hex-digit word per line.
pub fn write_h32(words: &[u32]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for word in words {
        writeln!(file, "{word:08x}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// Writes a raw binary image file: consecutive little-endian words.
pub fn write_bin(words: &[u32]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for word in words {
        file.write_all(&word.to_le_bytes()).unwrap();
    }
    file.flush().unwrap();
    file
}

/// A run configuration pointing at `image`, everything else default.
pub fn base_config(image: &Path) -> RunConfig {
    RunConfig {
        image: Some(image.to_path_buf()),
        ..RunConfig::default()
    }
}

/// Console sink that records everything written to it.
#[derive(Debug, Clone, Default)]
pub struct CaptureConsole(Arc<Mutex<Vec<u8>>>);

impl CaptureConsole {
    /// A fresh capture buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl Write for CaptureConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
