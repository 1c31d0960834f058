//! Lockstep harness CLI.
//!
//! This binary wires the bundled interpreter into the harness and hands
//! control to the simple debugger. It performs:
//! 1. **Setup:** Parse flags, read the optional JSON config, construct the
//!    device under test and (unless disabled) the in-process reference model.
//! 2. **Image load:** Load the guest binary at the RAM base, or fall back to
//!    the built-in smoke image when no path is given.
//! 3. **Drive:** Interactive command loop by default; `--batch` issues a
//!    single unbounded continue and exits with the guest's exit code.

use std::io;
use std::path::PathBuf;
use std::{fs, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lockstep_core::difftest::Oracle;
use lockstep_core::interp::Interpreter;
use lockstep_core::sdb::Debugger;
use lockstep_core::sim::executor::Executor;
use lockstep_core::sim::loader;
use lockstep_core::{Config, SimStatus, StatusHandle};

#[derive(Parser, Debug)]
#[command(
    name = "lockstep",
    author,
    version,
    about = "Differential-testing harness for an RV32E core",
    long_about = "Runs a guest binary on the bundled RV32E interpreter while a \
reference model executes the same instruction stream in lockstep. The run \
stops at the first architectural divergence.\n\nExamples:\n  \
lockstep firmware.bin\n  lockstep -b firmware.bin\n  \
lockstep --config harness.json firmware.bin"
)]
struct Cli {
    /// Guest binary loaded at the RAM base (built-in smoke image if omitted).
    image: Option<PathBuf>,

    /// Batch mode: one unbounded continue, no command prompt.
    #[arg(short, long)]
    batch: bool,

    /// Disable the lockstep oracle (run the device under test alone).
    #[arg(long)]
    no_difftest: bool,

    /// JSON configuration file (defaults apply for any omitted field).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let image = loader::load_image(cli.image.as_deref()).unwrap_or_else(|e| {
        eprintln!("lockstep: cannot read image: {e}");
        process::exit(1);
    });

    let status = StatusHandle::new();
    let mut dut = Interpreter::new(&config, status.clone());
    dut.load_image(&image);

    let oracle = if cli.no_difftest || !config.debug.difftest {
        None
    } else {
        Some(Oracle::new(Box::new(Interpreter::reference(&config))))
    };

    tracing::debug!(batch = cli.batch, difftest = oracle.is_some(), "harness configured");

    let exec = Executor::new(
        Box::new(dut),
        status.clone(),
        oracle,
        config.debug.watchpoint_capacity,
    );

    let mut debugger = Debugger::new(exec);
    debugger.run(io::stdin().lock(), cli.batch);

    process::exit(exit_code(status.get()));
}

/// Reads the JSON config, or returns the defaults when no path is given.
fn load_config(path: Option<&std::path::Path>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("lockstep: cannot read config {}: {e}", path.display());
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("lockstep: invalid config {}: {e}", path.display());
        process::exit(1);
    })
}

/// Maps the final simulation status to a process exit code.
fn exit_code(status: SimStatus) -> i32 {
    match status {
        SimStatus::Ended { code } => code as i32,
        SimStatus::Aborted => 1,
        _ => 0,
    }
}
