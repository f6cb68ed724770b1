//! End-to-end tests: each case writes an Ada source file to a temp
//! directory and runs the `adac` binary against it, checking the
//! process exit code and the emitted IR or diagnostics.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn adac_bin() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_adac"))
}

fn write_source(dir: &TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).expect("failed to write fixture source");
    path
}

#[test]
fn range_constrained_derived_type_compiles_with_a_range_check() {
    let dir = TempDir::new().unwrap();
    let source = "procedure T is\n\
                  type Small is range 1..10;\n\
                  type Tiny is new Small;\n\
                  X : Tiny := 15;\n\
                  begin null; end T;";
    let path = write_source(&dir, "range_check.adb", source);

    Command::new(adac_bin())
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("__ada_check_range"));
}

/// Aggregate size mismatch is not caught at compile time yet; the
/// resolver walks an aggregate's components without counting them
/// against the target array's length.
#[test]
#[ignore = "aggregate size checking is not yet implemented in the resolver"]
fn aggregate_size_mismatch_is_rejected_at_compile_time() {
    let dir = TempDir::new().unwrap();
    let source = "procedure T is\n\
                  type A5 is array(1..5) of Integer;\n\
                  A : A5 := (1,2,3,4,5,6);\n\
                  begin null; end T;";
    let path = write_source(&dir, "aggregate_size.adb", source);

    Command::new(adac_bin())
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("aggregate size 6").and(predicate::str::contains("5")));
}

#[test]
fn division_emits_a_zero_check_before_the_divide() {
    let dir = TempDir::new().unwrap();
    let source = "procedure T is X,Y:Integer; begin X:=1; Y:=0; X := X/Y; end T;";
    let path = write_source(&dir, "division.adb", source);

    Command::new(adac_bin())
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("icmp eq i64").and(predicate::str::contains("sdiv")));
}

#[test]
fn dereferencing_an_access_value_emits_a_null_check() {
    let dir = TempDir::new().unwrap();
    let source = "procedure T is\n\
                  type R is record F:Integer; end record;\n\
                  type P is access R;\n\
                  Ptr : P;\n\
                  begin Ptr.F := 1; end T;";
    let path = write_source(&dir, "null_deref.adb", source);

    Command::new(adac_bin())
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is_null").and(predicate::str::contains("deref.null")));
}

#[test]
fn identifiers_differing_only_in_case_bind_to_the_same_object() {
    let dir = TempDir::new().unwrap();
    let source = "procedure T is X:Integer; begin x := 1; X := X + 1; end T;";
    let path = write_source(&dir, "case_insensitive.adb", source);

    Command::new(adac_bin()).arg(&path).assert().success();
}

/// Generic instantiation resolves (the formal is fully substituted)
/// but codegen treats the instantiation declaration as a no-op, so the
/// emitted IR has no instance procedure to assert on yet.
#[test]
fn generic_instantiation_resolves_without_diagnostics() {
    let dir = TempDir::new().unwrap();
    let source = "generic type Item is private; procedure Swap(A,B:in out Item);\n\
                  procedure Swap(A,B:in out Item) is T:Item; begin T:=A; A:=B; B:=T; end;\n\
                  procedure T is procedure SI is new Swap(Integer); X,Y:Integer;\n\
                  begin X:=1; Y:=2; SI(X,Y); end T;";
    let path = write_source(&dir, "generic_instantiation.adb", source);

    Command::new(adac_bin()).arg(&path).assert().success();
}

#[test]
fn missing_source_file_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does_not_exist.adb");

    Command::new(adac_bin()).arg(&path).assert().code(2);
}

#[test]
fn source_and_emit_runtime_together_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "either.adb", "procedure P is begin null; end P;");

    Command::new(adac_bin())
        .arg(&path)
        .arg("--emit-runtime")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exactly one of"));
}

#[test]
fn neither_source_nor_emit_runtime_is_a_usage_error() {
    Command::new(adac_bin()).assert().code(2);
}

#[test]
fn emit_runtime_writes_the_bundled_c_runtime() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("adac_runtime.c");

    Command::new(adac_bin())
        .arg("--emit-runtime")
        .arg(&out)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("__ada_raise"));
    assert!(written.contains("__ada_check_range"));
}

#[test]
fn a_parse_error_is_reported_as_file_line_col_and_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "syntax_error.adb", "procedure T is begin X := ; end T;");

    Command::new(adac_bin())
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::is_match(r"syntax_error\.adb:\d+:\d+:").unwrap());
}
