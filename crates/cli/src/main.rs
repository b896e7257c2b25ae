//! Co-simulation harness CLI.
//!
//! This binary wires the harness library to the outside world. It performs:
//! 1. **Configuration:** Flat flags (optionally seeded from a JSON file) are
//!    folded into a `RunConfig`.
//! 2. **Logging:** `tracing` diagnostics go to stderr so they never
//!    interleave with emulated peripheral output on stdout.
//! 3. **Signals:** SIGINT only sets the shutdown flag; the run loop performs
//!    cleanup from ordinary control flow.
//! 4. **Exit codes:** 0 for any simulation outcome (completion, cycle limit,
//!    interrupt), 1 for any fatal resource or configuration error.

use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use cosim_core::Harness;
use cosim_core::config::{ImageFormat, RunConfig, defaults};
use cosim_core::model::TcmDut;
use cosim_core::sim::interrupt;

#[derive(Parser, Debug)]
#[command(
    name = "cosim",
    version,
    about = "Cycle-stepping co-simulation harness",
    long_about = "Drive a clock/reset sequenced hardware model: load a program image, \
watch the bus for completion and host-out bytes, and extract a signature dump and a \
VCD trace.\n\nExamples:\n  cosim --image firmware.hex --trace out.vcd\n  cosim --image \
compliance.bin --format bin --signature sig.out --max-cycles 2000000"
)]
struct Cli {
    /// Program image to load into model memory.
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Image format.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// VCD trace output path (omit to disable tracing).
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Stop after this many clock cycles.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Completion-detection bus address (hex or decimal).
    #[arg(long, value_parser = parse_addr)]
    finish_addr: Option<u32>,

    /// Host-out detection bus address (hex or decimal).
    #[arg(long, value_parser = parse_addr)]
    host_out: Option<u32>,

    /// Signature dump output path.
    #[arg(long)]
    signature: Option<PathBuf>,

    /// Clock edges to hold reset asserted.
    #[arg(long)]
    reset_hold: Option<u32>,

    /// JSON run configuration; individual flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model memory size in bytes (behavioral model).
    #[arg(long, default_value_t = defaults::TCM_SIZE_BYTES)]
    mem_size: u32,
}

/// Image format selector mirrored for clap.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// One 8-hex-digit word per line.
    H32,
    /// Raw little-endian 32-bit words.
    Bin,
}

impl From<FormatArg> for ImageFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::H32 => ImageFormat::H32,
            FormatArg::Bin => ImageFormat::Bin,
        }
    }
}

/// Parses a bus address, accepting `0x`-prefixed hex or plain decimal.
fn parse_addr(text: &str) -> Result<u32, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|_| format!("'{text}' is not a valid address"))
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    install_sigint();

    let config = build_config(&cli);
    if config.image.is_none() {
        tracing::error!("no program image: pass --image <path>");
        process::exit(1);
    }

    let dut = TcmDut::new(cli.mem_size);
    let mut harness = match Harness::new(dut, config) {
        Ok(harness) => harness,
        Err(e) => {
            tracing::error!("{e}");
            process::exit(1);
        }
    };

    match harness.run() {
        Ok(reason) => {
            tracing::info!(%reason, cycles = harness.clock().cycles(), "simulation finished");
            process::exit(0);
        }
        Err(e) => {
            tracing::error!("{e}");
            process::exit(1);
        }
    }
}

/// Folds the JSON config file (if any) and the CLI flags into a `RunConfig`.
fn build_config(cli: &Cli) -> RunConfig {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                tracing::error!("could not read config '{}': {e}", path.display());
                process::exit(1);
            });
            serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::error!("invalid config '{}': {e}", path.display());
                process::exit(1);
            })
        }
        None => RunConfig::default(),
    };

    if let Some(image) = &cli.image {
        config.image = Some(image.clone());
    }
    if let Some(format) = cli.format {
        config.format = format.into();
    }
    if let Some(trace) = &cli.trace {
        config.trace = Some(trace.clone());
    }
    if let Some(max_cycles) = cli.max_cycles {
        config.max_cycles = Some(max_cycles);
    }
    if let Some(finish_addr) = cli.finish_addr {
        config.finish_addr = finish_addr;
    }
    if let Some(host_out) = cli.host_out {
        config.host_out_addr = Some(host_out);
    }
    if let Some(signature) = &cli.signature {
        config.signature = Some(signature.clone());
    }
    if let Some(reset_hold) = cli.reset_hold {
        config.reset_hold_edges = reset_hold;
    }
    config
}

extern "C" fn on_sigint(_signal: libc::c_int) {
    interrupt::request();
}

/// Installs the SIGINT handler.
fn install_sigint() {
    // SAFETY: the handler only performs an atomic store, which is
    // async-signal-safe; no allocation, locking, or I/O happens in it.
    unsafe {
        let _ = libc::signal(libc::SIGINT, on_sigint as usize);
    }
}
