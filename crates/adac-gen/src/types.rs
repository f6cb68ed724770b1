//! Type mapping from resolved Ada types to LLVM IR types (spec.md §4.5).
//!
//! Every `TypeKind` lowers to one of four shapes: an LLVM integer (for
//! the discrete kinds and fixed point, which this core treats as a
//! scaled integer), an LLVM float, an opaque `ptr` (access values and
//! record/array element storage), or the `{ptr, i64, i64}` fat-pointer
//! struct an unconstrained array is passed and returned as.

use adac_sem::{TypeDesc, TypeKind, TypeTable};
use adac_util::DefId;
use inkwell::context::Context;
use inkwell::types::{BasicTypeEnum, StructType};
use inkwell::AddressSpace;

use crate::error::{CodeGenError, Result};

/// The coarse shape a lowered value has, independent of its exact LLVM
/// type - what `llvm.rs`'s statement/expression lowering dispatches on
/// when picking `build_int_*` vs `build_float_*` vs a GEP (spec.md
/// §4.5 "Value representation").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
    Pointer,
    FatPointer,
}

pub struct TypeMapper<'ctx> {
    pub context: &'ctx Context,
}

impl<'ctx> TypeMapper<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }

    /// The opaque pointer type every access value, fat-pointer data
    /// field, and record/array storage cell uses (spec.md §4.5: LLVM
    /// 15+'s opaque pointers mean one `ptr` type serves all of these).
    pub fn ptr_type(&self) -> inkwell::types::PointerType<'ctx> {
        self.context.ptr_type(AddressSpace::default())
    }

    /// `{ data: ptr, low: i64, high: i64 }`, repeated once per array
    /// dimension's bounds. A one-dimensional unconstrained array is
    /// therefore `{ptr, i64, i64}`; this core doesn't lower multi-
    /// dimensional unconstrained arrays (spec.md §1 non-goals lean on
    /// "best effort" for awkward corners, and Ada 83 programs rarely
    /// pass multi-dimensional arrays unconstrained).
    pub fn fat_pointer_type(&self) -> StructType<'ctx> {
        let i64_ty = self.context.i64_type();
        self.context.struct_type(&[self.ptr_type().into(), i64_ty.into(), i64_ty.into()], false)
    }

    /// A frame struct's fixed leading field: the static link to the
    /// enclosing subprogram's own frame (spec.md §4.5 "Frames").
    pub fn static_link_type(&self) -> inkwell::types::PointerType<'ctx> {
        self.ptr_type()
    }

    pub fn value_kind_of(&self, types: &TypeTable, ty: DefId) -> ValueKind {
        match self.kind_of(types, ty) {
            Some(TypeKind::Float { .. }) | Some(TypeKind::UniversalFloat) => ValueKind::Float,
            Some(TypeKind::Access { .. }) => ValueKind::Pointer,
            Some(TypeKind::FatPointer { .. }) | Some(TypeKind::StringType) => ValueKind::FatPointer,
            Some(TypeKind::Array { constrained: false, .. }) => ValueKind::FatPointer,
            Some(TypeKind::Record { .. }) | Some(TypeKind::Array { constrained: true, .. }) => {
                ValueKind::Pointer
            }
            _ => ValueKind::Integer,
        }
    }

    fn kind_of<'t>(&self, types: &'t TypeTable, ty: DefId) -> Option<&'t TypeKind> {
        types.get(ty).map(|desc: &TypeDesc| &desc.kind)
    }

    /// Maps a resolved type to the LLVM type its values are stored and
    /// passed as.
    pub fn map_to_basic(&self, types: &TypeTable, ty: DefId) -> Result<BasicTypeEnum<'ctx>> {
        let desc = types
            .get(ty)
            .ok_or_else(|| CodeGenError::TypeMappingError(format!("no type descriptor for {ty:?}")))?;
        Ok(match &desc.kind {
            TypeKind::Boolean => self.context.bool_type().into(),
            TypeKind::Character => self.context.i8_type().into(),
            TypeKind::Integer { .. }
            | TypeKind::UnsignedInteger { .. }
            | TypeKind::UniversalInteger
            | TypeKind::Enumeration { .. } => self.context.i64_type().into(),
            TypeKind::Derived { parent } => return self.map_to_basic(types, *parent),
            TypeKind::Float { .. } | TypeKind::UniversalFloat => self.context.f64_type().into(),
            TypeKind::FixedPoint { .. } => self.context.i64_type().into(),
            TypeKind::Access { .. } => self.ptr_type().into(),
            TypeKind::FatPointer { .. } | TypeKind::StringType => self.fat_pointer_type().into(),
            TypeKind::Array { constrained: false, .. } => self.fat_pointer_type().into(),
            TypeKind::Array { constrained: true, .. } => self.ptr_type().into(),
            TypeKind::Record { .. } => self.ptr_type().into(),
            TypeKind::Task | TypeKind::Package => self.ptr_type().into(),
            TypeKind::Procedure { .. } | TypeKind::Function { .. } => self.ptr_type().into(),
            TypeKind::Error => self.context.i64_type().into(),
        })
    }

    /// Static element count of a constrained array dimension, where
    /// both bounds are compile-time literals - used to size an `alloca`
    /// for a constrained array object without a runtime length
    /// computation.
    pub fn static_array_len(&self, types: &TypeTable, index_ty: DefId) -> Option<u64> {
        let (low, high) = types.get(index_ty)?.static_bounds()?;
        if high < low {
            Some(0)
        } else {
            Some((high - low + 1) as u64)
        }
    }
}
