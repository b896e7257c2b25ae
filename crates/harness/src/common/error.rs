//! Error taxonomy for the co-simulation harness.
//!
//! Only resource and configuration failures are errors. Protocol conditions
//! (completion write, cycle limit, interrupt) are expected termination paths
//! and are represented by [`crate::sim::runner::ExitReason`] instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal harness failures.
///
/// Every variant carries enough context to report the failing path; the CLI
/// maps any of these to a nonzero exit status. None of them are retried.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A run was requested without a program image.
    #[error("no program image configured; supply an image path")]
    MissingImage,

    /// The image file could not be read.
    #[error("could not read image '{path}': {source}")]
    Image {
        /// Path of the image file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// An h32 image line failed to parse as a 32-bit hexadecimal word.
    #[error("malformed image '{path}' at line {line}: '{text}'")]
    ImageParse {
        /// Path of the image file.
        path: PathBuf,
        /// One-based line number of the offending line.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// The image holds more words than the model memory can take.
    #[error("image '{path}' holds {words} words but memory fits {capacity}")]
    ImageOverflow {
        /// Path of the image file.
        path: PathBuf,
        /// Word count found in the image.
        words: u32,
        /// Word capacity of the model memory.
        capacity: u32,
    },

    /// A raw binary image was cut off mid-word.
    #[error("truncated binary image '{path}': {len} bytes is not a whole number of words")]
    ImageTruncated {
        /// Path of the image file.
        path: PathBuf,
        /// Byte length of the file.
        len: u64,
    },

    /// The waveform trace file could not be opened or written.
    #[error("could not write trace '{path}': {source}")]
    Trace {
        /// Path of the trace file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The signature dump file could not be opened or written.
    #[error("could not write signature dump '{path}': {source}")]
    Signature {
        /// Path of the dump file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Result alias used throughout the harness.
pub type Result<T> = std::result::Result<T, HarnessError>;
