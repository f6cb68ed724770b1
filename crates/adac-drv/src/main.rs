//! `adac` - compiles one Ada 83 compilation unit to LLVM IR, or writes
//! the bundled C runtime out to a file (spec.md §6.1).

use std::path::PathBuf;

use adac_drv::{init_logging, Config, DriverError, DriverOutput, Session};
use anyhow::Context;
use clap::Parser;

/// Ada 83 to LLVM IR compiler.
#[derive(Parser, Debug)]
#[command(name = "adac")]
#[command(author, version, about = "Ada 83 to LLVM IR compiler", long_about = None)]
struct Cli {
    /// Source file to compile; its LLVM IR is written to stdout.
    source: Option<PathBuf>,

    /// Write the bundled C runtime to PATH instead of compiling.
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "adac_runtime.c")]
    emit_runtime: Option<PathBuf>,

    /// Enable verbose tracing on stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Target triple to emit IR for; defaults to the host triple.
    #[arg(long)]
    target: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}

/// Validates the CLI surface and runs the pipeline, returning the
/// process exit code to use. Diagnostics and IR are already written to
/// stderr/stdout by the time this returns; the `anyhow::Error` path is
/// reserved for usage and I/O failures the driver layer doesn't already
/// render itself.
fn run(cli: Cli) -> anyhow::Result<i32> {
    if cli.source.is_some() == cli.emit_runtime.is_some() {
        anyhow::bail!("exactly one of a source file or --emit-runtime is required");
    }

    let config = Config {
        input_file: cli.source,
        emit_runtime: cli.emit_runtime,
        verbose: cli.verbose,
        target_triple: cli.target,
    };

    let mut session = Session::new(config);
    match session.run() {
        Ok(DriverOutput::Ir(ir)) => {
            println!("{ir}");
            Ok(0)
        }
        Ok(DriverOutput::RuntimeWritten(path)) => {
            eprintln!("wrote runtime to {}", path.display());
            Ok(0)
        }
        Err(DriverError::CompilationFailed(_)) => Ok(1),
        Err(e @ DriverError::Usage(_)) => Err(e).context("usage error"),
        Err(e) => Err(e).context("adac failed"),
    }
}
