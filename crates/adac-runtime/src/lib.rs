//! Bundled C runtime for `adac`-emitted IR.
//!
//! The compiler itself never compiles this file; it only carries the
//! text and writes it out verbatim on `--emit-runtime` so the caller can
//! compile and link it with whatever toolchain targets their platform.

/// Source text of the bundled runtime, embedded at compile time.
pub const RUNTIME_SOURCE: &str = include_str!("runtime.c");

/// The symbols an emitted module's preamble declares as external. Kept
/// in sync with `runtime.c` by hand; `tests::every_symbol_is_defined`
/// checks the pairing.
pub const REQUIRED_SYMBOLS: &[&str] = &[
    "__ada_ss_init",
    "__ada_ss_allocate",
    "__ada_ss_mark",
    "__ada_ss_release",
    "__ada_raise",
    "__ada_push_handler",
    "__ada_pop_handler",
    "__ada_setjmp",
    "__ada_check_range",
    "__ada_powi",
    "__ada_image_int",
    "__ada_image_enum",
    "__ada_value_int",
    "REPORT__TEST",
    "REPORT__FAILED",
    "REPORT__RESULT",
    "REPORT__IDENT_INT",
    "REPORT__COMMENT",
    "REPORT__NOT_APPLICABLE",
];

/// Writes the bundled runtime source to `path`.
pub fn write_to(path: &std::path::Path) -> std::io::Result<()> {
    std::fs::write(path, RUNTIME_SOURCE)
}
