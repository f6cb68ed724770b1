//! Unit tests for the LLVM backend and its type mapping.

use adac_sem::{Component, TypeDesc, TypeKind, TypeTable};
use adac_util::DefId;
use inkwell::context::Context;
use inkwell::OptimizationLevel;

use crate::{LlvmBackend, TypeMapper};

fn table_with(kinds: &[TypeKind]) -> TypeTable {
    let mut table = TypeTable::new();
    for (i, kind) in kinds.iter().enumerate() {
        let id = DefId(i as u32);
        table.insert(id, TypeDesc::new(kind.clone(), id));
    }
    table
}

#[test]
fn backend_creation_sets_triple_and_opt_level() {
    let context = Context::create();
    let backend = LlvmBackend::new(
        &context,
        "test_module",
        "x86_64-unknown-linux-gnu".to_string(),
        OptimizationLevel::None,
    );

    assert_eq!(backend.target_triple, "x86_64-unknown-linux-gnu");
    assert_eq!(backend.opt_level, OptimizationLevel::None);
}

#[test]
fn empty_module_still_carries_runtime_preamble() {
    let context = Context::create();
    let backend = LlvmBackend::new(
        &context,
        "test",
        "x86_64-unknown-linux-gnu".to_string(),
        OptimizationLevel::None,
    );

    let ir = backend.emit_llvm_ir();
    assert!(ir.contains("target triple"));
    assert!(ir.contains("__ada_check_range"));
    assert!(ir.contains("__ada_raise"));
    assert!(ir.contains(".ex.CONSTRAINT_ERROR"));
}

#[test]
fn integer_and_enumeration_map_to_i64() {
    let context = Context::create();
    let mapper = TypeMapper::new(&context);
    let table = table_with(&[
        TypeKind::Integer { low: -100, high: 100 },
        TypeKind::Enumeration { literals: vec![] },
        TypeKind::UniversalInteger,
    ]);

    for i in 0..3 {
        let ty = mapper.map_to_basic(&table, DefId(i)).unwrap();
        assert_eq!(ty.into_int_type().get_bit_width(), 64);
    }
}

#[test]
fn boolean_maps_to_i1_and_character_to_i8() {
    let context = Context::create();
    let mapper = TypeMapper::new(&context);
    let table = table_with(&[TypeKind::Boolean, TypeKind::Character]);

    let boolean = mapper.map_to_basic(&table, DefId(0)).unwrap();
    assert_eq!(boolean.into_int_type().get_bit_width(), 1);

    let character = mapper.map_to_basic(&table, DefId(1)).unwrap();
    assert_eq!(character.into_int_type().get_bit_width(), 8);
}

#[test]
fn float_maps_to_double() {
    let context = Context::create();
    let mapper = TypeMapper::new(&context);
    let table = table_with(&[TypeKind::Float { digits: 6, low: -1.0, high: 1.0 }]);

    let ty = mapper.map_to_basic(&table, DefId(0)).unwrap();
    assert!(ty.is_float_type());
}

#[test]
fn unconstrained_array_maps_to_fat_pointer() {
    let context = Context::create();
    let mapper = TypeMapper::new(&context);
    let table = table_with(&[
        TypeKind::Integer { low: 0, high: 100 },
        TypeKind::Array { index_types: vec![DefId(0)], element: DefId(0), constrained: false },
    ]);

    let ty = mapper.map_to_basic(&table, DefId(1)).unwrap();
    assert!(ty.is_struct_type());
    assert_eq!(ty.into_struct_type().count_fields(), 3);
}

#[test]
fn constrained_array_and_record_map_to_ptr() {
    let context = Context::create();
    let mapper = TypeMapper::new(&context);
    let table = table_with(&[
        TypeKind::Integer { low: 0, high: 9 },
        TypeKind::Array { index_types: vec![DefId(0)], element: DefId(0), constrained: true },
        TypeKind::Record {
            components: vec![Component { name: adac_util::Symbol::intern("x"), ty: DefId(0), has_default: false }],
        },
    ]);

    assert!(mapper.map_to_basic(&table, DefId(1)).unwrap().is_pointer_type());
    assert!(mapper.map_to_basic(&table, DefId(2)).unwrap().is_pointer_type());
}

#[test]
fn derived_type_lowers_through_its_parent() {
    let context = Context::create();
    let mapper = TypeMapper::new(&context);
    let table = table_with(&[
        TypeKind::Float { digits: 6, low: 0.0, high: 1.0 },
        TypeKind::Derived { parent: DefId(0) },
    ]);

    let ty = mapper.map_to_basic(&table, DefId(1)).unwrap();
    assert!(ty.is_float_type());
}

#[test]
fn static_array_len_counts_inclusive_bounds() {
    let context = Context::create();
    let mapper = TypeMapper::new(&context);
    let table = table_with(&[TypeKind::Integer { low: 1, high: 10 }]);

    assert_eq!(mapper.static_array_len(&table, DefId(0)), Some(10));
}

#[test]
fn write_ir_to_file_round_trips() {
    let context = Context::create();
    let backend = LlvmBackend::new(
        &context,
        "test",
        "x86_64-unknown-linux-gnu".to_string(),
        OptimizationLevel::None,
    );

    let dir = std::env::temp_dir();
    let path = dir.join("adac_gen_test_output.ll");
    backend.write_ir_to_file(&path).unwrap();
    assert!(path.exists());
    let _ = std::fs::remove_file(&path);
}
