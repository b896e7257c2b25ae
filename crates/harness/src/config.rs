//! Run configuration for the co-simulation harness.
//!
//! This module defines the immutable per-run configuration. It provides:
//! 1. **Defaults:** Baseline timing and address constants for the model.
//! 2. **Structures:** The [`RunConfig`] record built once at startup.
//! 3. **Enums:** The program image format selector.
//!
//! Configuration is built from CLI flags or deserialized from JSON; it is
//! read-only once the harness starts stepping the model.

use serde::Deserialize;
use std::path::PathBuf;

/// Default configuration constants for the harness.
///
/// These values define the baseline behavior when not explicitly overridden
/// on the command line or in a JSON configuration file.
pub mod defaults {
    /// Bus address whose write signals program completion.
    ///
    /// Firmware writes the value 1 to this address when the test program
    /// has finished executing.
    pub const FINISH_ADDR: u32 = 0x0000_1000;

    /// Bus address of the UART transmit data register.
    pub const UART_DATA_ADDR: u32 = 0x8000_0000;

    /// Number of clock edges reset stays asserted before release.
    ///
    /// Ten edges is five full clock cycles, enough for every synchronous
    /// reset chain in the model to settle.
    pub const RESET_HOLD_EDGES: u32 = 10;

    /// Simulated-time advance per clock edge while reset is held.
    pub const RESET_QUANTUM: u64 = 10;

    /// Simulated-time advance per clock edge in the run loop.
    pub const RUN_QUANTUM: u64 = 20;

    /// Extra simulated-time advance before each trace sample in the run loop.
    pub const DUMP_QUANTUM: u64 = 10;

    /// Simulated-time cost of one UART frame (start + 8 data + stop bits).
    ///
    /// Derived from the model clock and a 115200 baud line; used instead of
    /// [`RUN_QUANTUM`] when a character leaves the transmitter so the traced
    /// timeline matches real transmission timing.
    pub const UART_FRAME_TIME: u64 = 20 * 5208;

    /// Memory size of the behavioral stand-in model (64 KiB).
    pub const TCM_SIZE_BYTES: u32 = 64 * 1024;

    /// Memory word index holding the signature start byte address.
    pub const SIGNATURE_START_WORD: u32 = 1;

    /// Memory word index holding the signature stop byte address.
    pub const SIGNATURE_STOP_WORD: u32 = 2;
}

/// Program image encodings accepted by the loader.
///
/// Exactly one format is active per run; the enum makes that structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// ASCII text, one 8-hex-digit zero-padded 32-bit word per line.
    #[default]
    H32,
    /// Raw little-endian 32-bit words, no header.
    Bin,
}

/// Immutable per-run configuration.
///
/// Built once at startup and read-only thereafter. Optional paths disable
/// the corresponding feature when absent (no trace, no signature dump, no
/// host-out detection, no cycle limit).
///
/// # Examples
///
/// Deserializing from JSON:
///
/// ```
/// use cosim_core::config::RunConfig;
///
/// let json = r#"{
///     "image": "firmware.hex",
///     "format": "h32",
///     "max_cycles": 100000,
///     "finish_addr": 4096
/// }"#;
///
/// let config: RunConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.max_cycles, Some(100000));
/// assert_eq!(config.finish_addr, 0x1000);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Program image to load into model memory.
    #[serde(default)]
    pub image: Option<PathBuf>,

    /// Encoding of the program image.
    #[serde(default)]
    pub format: ImageFormat,

    /// VCD trace output path; `None` disables tracing.
    #[serde(default)]
    pub trace: Option<PathBuf>,

    /// Stop after this many clock cycles; `None` disables the limit.
    #[serde(default)]
    pub max_cycles: Option<u64>,

    /// Bus address watched for the completion write.
    #[serde(default = "RunConfig::default_finish_addr")]
    pub finish_addr: u32,

    /// Bus address watched for host-out bytes; `None` disables detection.
    #[serde(default)]
    pub host_out_addr: Option<u32>,

    /// Signature dump output path; `None` disables extraction.
    #[serde(default)]
    pub signature: Option<PathBuf>,

    /// Clock edges to hold reset asserted before release.
    #[serde(default = "RunConfig::default_reset_hold_edges")]
    pub reset_hold_edges: u32,

    /// Bus address of the UART transmit data register.
    #[serde(default = "RunConfig::default_uart_addr")]
    pub uart_addr: u32,
}

impl RunConfig {
    /// Returns the default completion-detection address.
    fn default_finish_addr() -> u32 {
        defaults::FINISH_ADDR
    }

    /// Returns the default reset hold duration in edges.
    fn default_reset_hold_edges() -> u32 {
        defaults::RESET_HOLD_EDGES
    }

    /// Returns the default UART transmit data register address.
    fn default_uart_addr() -> u32 {
        defaults::UART_DATA_ADDR
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            image: None,
            format: ImageFormat::H32,
            trace: None,
            max_cycles: None,
            finish_addr: defaults::FINISH_ADDR,
            host_out_addr: None,
            signature: None,
            reset_hold_edges: defaults::RESET_HOLD_EDGES,
            uart_addr: defaults::UART_DATA_ADDR,
        }
    }
}
