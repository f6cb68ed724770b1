//! Edge cases for the driver's `Config`/`Session` surface, exercised
//! directly against the library rather than through the `adac` binary.

use adac_drv::{Config, DriverError, DriverOutput, Session};

fn config(input: Option<&str>, emit_runtime: Option<&str>) -> Config {
    Config {
        input_file: input.map(Into::into),
        emit_runtime: emit_runtime.map(Into::into),
        verbose: false,
        target_triple: None,
    }
}

#[test]
fn target_triple_defaults_to_a_host_triple_when_unset() {
    let cfg = config(None, None);
    assert!(!cfg.target_triple().is_empty());
}

#[test]
fn explicit_target_triple_is_kept_verbatim() {
    let mut cfg = config(None, None);
    cfg.target_triple = Some("aarch64-unknown-linux-gnu".to_string());
    assert_eq!(cfg.target_triple(), "aarch64-unknown-linux-gnu");
}

#[test]
fn running_with_neither_source_nor_emit_runtime_is_a_usage_error() {
    let mut session = Session::new(config(None, None));
    match session.run() {
        Err(DriverError::Usage(_)) => {}
        other => panic!("expected a usage error, got ok={}", other.is_ok()),
    }
}

#[test]
fn running_against_a_missing_file_is_an_io_error() {
    let mut session = Session::new(config(Some("/nonexistent/does_not_exist.adb"), None));
    match session.run() {
        Err(DriverError::Io { .. }) => {}
        other => panic!("expected an io error, got ok={}", other.is_ok()),
    }
}

#[test]
fn emit_runtime_takes_precedence_and_writes_the_runtime_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("runtime.c");

    let mut session = Session::new(config(None, Some(out.to_str().unwrap())));
    match session.run() {
        Ok(DriverOutput::RuntimeWritten(path)) => assert_eq!(path, out),
        other => panic!("expected the runtime to be written, got {:?}", other.is_ok()),
    }
    assert!(out.exists());
}

#[test]
fn a_compiling_unit_produces_llvm_ir_text_on_success() {
    let dir = tempfile::TempDir::new().unwrap();
    let source_path = dir.path().join("empty.adb");
    std::fs::write(&source_path, "procedure P is begin null; end P;").unwrap();

    let mut session = Session::new(config(Some(source_path.to_str().unwrap()), None));
    match session.run() {
        Ok(DriverOutput::Ir(ir)) => assert!(ir.contains("define")),
        other => panic!("expected IR output, got {:?}", other.is_ok()),
    }
}

#[test]
fn a_syntax_error_is_collected_in_the_handler_and_reported_as_compilation_failed() {
    let dir = tempfile::TempDir::new().unwrap();
    let source_path = dir.path().join("broken.adb");
    std::fs::write(&source_path, "procedure P is begin X := ; end P;").unwrap();

    let mut session = Session::new(config(Some(source_path.to_str().unwrap()), None));
    match session.run() {
        Err(DriverError::CompilationFailed(count)) => assert!(count > 0),
        other => panic!("expected a compilation failure, got {:?}", other.is_ok()),
    }
    assert!(session.handler.has_errors());
}

#[test]
fn an_unresolved_name_is_caught_by_the_resolver_not_the_parser() {
    let dir = tempfile::TempDir::new().unwrap();
    let source_path = dir.path().join("unresolved.adb");
    std::fs::write(&source_path, "procedure P is begin Y := 1; end P;").unwrap();

    let mut session = Session::new(config(Some(source_path.to_str().unwrap()), None));
    match session.run() {
        Err(DriverError::CompilationFailed(count)) => assert!(count > 0),
        other => panic!("expected a compilation failure, got {:?}", other.is_ok()),
    }
}
