//! End-to-end edge cases: small Ada units driven through
//! lex -> parse -> resolve -> codegen, asserting on the emitted IR text.

use adac_par::Parser;
use adac_util::Handler;
use inkwell::context::Context;
use inkwell::OptimizationLevel;

use crate::LlvmBackend;

fn compile(source: &str) -> String {
    let mut handler = Handler::new();
    let mut parser = Parser::new(source, &mut handler);
    let unit = parser.parse_compilation_unit().expect("parse failed");
    assert!(!handler.has_errors(), "parser reported errors for: {source}");

    let (symtab, types, results) = adac_sem::analyze_compilation_unit(&unit, &mut handler);
    assert!(!handler.has_errors(), "resolver reported errors for: {source}");

    let context = Context::create();
    let mut backend =
        LlvmBackend::new(&context, "edge_case", "x86_64-unknown-linux-gnu".to_string(), OptimizationLevel::None);
    backend.compile_unit(&unit, &symtab, &types, &results).expect("codegen failed");
    backend.emit_llvm_ir()
}

#[test]
fn empty_procedure_mangles_and_returns() {
    let ir = compile("procedure Empty is begin null; end Empty;");
    assert!(ir.contains("define"));
    assert!(ir.contains("ada_empty.0"));
    assert!(ir.contains("ret void"));
}

#[test]
fn integer_division_guards_against_zero() {
    let ir = compile(
        "procedure Div is
           X, Y, Z : Integer;
         begin
           Z := X / Y;
         end Div;",
    );
    assert!(ir.contains(".ex.CONSTRAINT_ERROR"));
    assert!(ir.contains("sdiv"));
}

#[test]
fn if_statement_produces_branches_and_merge() {
    let ir = compile(
        "procedure Cond is
           X : Integer;
         begin
           if X > 0 then
             X := 1;
           else
             X := -1;
           end if;
         end Cond;",
    );
    assert!(ir.contains("icmp sgt"));
    assert!(ir.contains("br i1"));
}

#[test]
fn while_loop_with_exit_uses_loop_blocks() {
    let ir = compile(
        "procedure Loopy is
           X : Integer;
         begin
           while X < 10 loop
             X := X + 1;
             exit when X = 5;
           end loop;
         end Loopy;",
    );
    assert!(ir.contains("br label"));
    assert!(ir.contains("icmp eq"));
}

#[test]
fn nested_procedure_takes_static_link_parameter() {
    let ir = compile(
        "procedure Outer is
           X : Integer;
           procedure Inner is
           begin
             X := X + 1;
           end Inner;
         begin
           Inner;
         end Outer;",
    );
    assert!(ir.contains("ada_outer_inner.0"));
    assert!(ir.contains("ada_outer.0"));
}

#[test]
fn raise_statement_calls_runtime_raise() {
    let ir = compile(
        "procedure Oops is
         begin
           raise Constraint_Error;
         end Oops;",
    );
    assert!(ir.contains("call void @__ada_raise"));
    assert!(ir.contains("unreachable"));
}

#[test]
fn case_statement_lowers_to_switch() {
    let ir = compile(
        "procedure Pick is
           X : Integer;
         begin
           case X is
             when 1 => X := 10;
             when 2 => X := 20;
             when others => X := 0;
           end case;
         end Pick;",
    );
    assert!(ir.contains("switch i64"));
}

#[test]
fn write_ir_to_file_round_trips_for_real_unit() {
    let mut handler = Handler::new();
    let mut parser = Parser::new("procedure P is begin null; end P;", &mut handler);
    let unit = parser.parse_compilation_unit().expect("parse failed");
    let (symtab, types, results) = adac_sem::analyze_compilation_unit(&unit, &mut handler);

    let context = Context::create();
    let mut backend =
        LlvmBackend::new(&context, "p", "x86_64-unknown-linux-gnu".to_string(), OptimizationLevel::None);
    backend.compile_unit(&unit, &symtab, &types, &results).expect("codegen failed");

    let path = std::env::temp_dir().join("adac_gen_edge_case_output.ll");
    backend.write_ir_to_file(&path).unwrap();
    assert!(path.exists());
    let _ = std::fs::remove_file(&path);
}
