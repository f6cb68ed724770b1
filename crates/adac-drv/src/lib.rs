//! Driver for `adac`: wires the lexer, parser, resolver and LLVM
//! emitter into one pipeline over a single compilation unit, and the
//! `--emit-runtime` path that writes out the bundled C runtime.
//!
//! `Session::run` is the whole pipeline; `main`'s job is argument
//! parsing and turning a [`DriverError`] into an exit code.

use std::path::{Path, PathBuf};

use adac_util::diagnostic::{Handler, Level};
use inkwell::context::Context;
use inkwell::OptimizationLevel;
use thiserror::Error;

/// One invocation's configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The `.adb`/`.ads` file to compile, when emitting IR.
    pub input_file: Option<PathBuf>,
    /// Where to write the bundled runtime, when `--emit-runtime` is given.
    pub emit_runtime: Option<PathBuf>,
    /// Enables `tracing` logs on stderr.
    pub verbose: bool,
    /// Target triple; defaults to the host triple when unset.
    pub target_triple: Option<String>,
}

impl Config {
    pub fn target_triple(&self) -> String {
        self.target_triple.clone().unwrap_or_else(default_target_triple)
    }
}

fn default_target_triple() -> String {
    if cfg!(target_os = "macos") {
        "x86_64-apple-darwin".to_string()
    } else if cfg!(target_os = "windows") {
        "x86_64-pc-windows-msvc".to_string()
    } else {
        "x86_64-unknown-linux-gnu".to_string()
    }
}

/// Errors the driver can report; everything below this layer is
/// collected into the [`Handler`] and rendered by [`render_diagnostics`]
/// instead, since diagnostics need the source text to format a snippet.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("compilation failed with {0} error(s)")]
    CompilationFailed(usize),

    #[error(transparent)]
    CodeGen(#[from] adac_gen::CodeGenError),
}

pub type Result<T> = std::result::Result<T, DriverError>;

/// Renders every diagnostic in `handler` to stderr as
/// `file:line:col: message` (spec.md §6.1/§7).
pub fn render_diagnostics(handler: &Handler, source_path: &Path) {
    for diag in handler.diagnostics() {
        let level = match diag.level {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
            Level::Help => "help",
        };
        eprintln!(
            "{}:{}:{}: {}: {}",
            source_path.display(),
            diag.span.line,
            diag.span.column,
            level,
            diag.message
        );
        for note in &diag.notes {
            eprintln!("  note: {note}");
        }
        for help in &diag.helps {
            eprintln!("  help: {help}");
        }
    }
}

/// One compiler invocation's state: the parsed config plus the
/// diagnostic handler every pipeline stage reports into.
pub struct Session {
    pub config: Config,
    pub handler: Handler,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config, handler: Handler::new() }
    }

    /// Runs the whole pipeline and returns the emitted LLVM IR text, or
    /// `--emit-runtime`'s target path when that mode was chosen instead.
    pub fn run(&mut self) -> Result<DriverOutput> {
        if let Some(path) = &self.config.emit_runtime {
            adac_runtime::write_to(path)
                .map_err(|source| DriverError::Io { path: path.clone(), source })?;
            tracing::info!(path = %path.display(), "wrote bundled runtime");
            return Ok(DriverOutput::RuntimeWritten(path.clone()));
        }

        let input = self
            .config
            .input_file
            .clone()
            .ok_or_else(|| DriverError::Usage("no source file given".to_string()))?;

        let source = std::fs::read_to_string(&input)
            .map_err(|source| DriverError::Io { path: input.clone(), source })?;

        tracing::debug!(file = %input.display(), "parsing");
        let mut parser = adac_par::Parser::new(&source, &mut self.handler);
        let unit = match parser.parse_compilation_unit() {
            Ok(unit) => unit,
            Err(e) => {
                self.handler.emit_diagnostic(adac_util::ToDiagnostic::to_diagnostic(&e));
                render_diagnostics(&self.handler, &input);
                return Err(DriverError::CompilationFailed(self.handler.error_count()));
            }
        };

        if self.handler.has_errors() {
            render_diagnostics(&self.handler, &input);
            return Err(DriverError::CompilationFailed(self.handler.error_count()));
        }

        tracing::debug!("resolving and type checking");
        let (symtab, types, results) = adac_sem::analyze_compilation_unit(&unit, &mut self.handler);

        if self.handler.has_errors() {
            render_diagnostics(&self.handler, &input);
            return Err(DriverError::CompilationFailed(self.handler.error_count()));
        }

        tracing::debug!("emitting LLVM IR");
        let module_name = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("adac_module")
            .to_string();

        let context = Context::create();
        let mut backend = adac_gen::LlvmBackend::new(
            &context,
            &module_name,
            self.config.target_triple(),
            OptimizationLevel::Default,
        );
        backend.compile_unit(&unit, &symtab, &types, &results)?;

        Ok(DriverOutput::Ir(backend.emit_llvm_ir()))
    }
}

/// What a successful [`Session::run`] produced.
pub enum DriverOutput {
    Ir(String),
    RuntimeWritten(PathBuf),
}

/// Installs a `tracing` subscriber that logs to stderr, at `debug` when
/// `verbose` or `warn` otherwise.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
