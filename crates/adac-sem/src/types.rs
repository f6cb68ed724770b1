//! Type descriptors (spec.md §3 "Type descriptor").
//!
//! Every declared type - predefined (`Standard.Integer`), derived, or
//! user-written - gets one [`DefId`] and one [`TypeDesc`] keyed by it in
//! a [`TypeTable`]. Types reference other types by `DefId` rather than
//! by owning a nested `Box<TypeDesc>`: record components, array
//! elements, and access designated types can all be recursive (a
//! record containing an access to itself), and `DefId` indirection
//! through the table is how that recursion is represented without a
//! cyclic owned structure.

use adac_par::ast::ParamMode;
use adac_util::{DefId, Symbol};

/// Suppressible checks (LRM 11.7), stored as a bitset on every
/// [`TypeDesc`] so a `pragma Suppress` can turn individual checks off
/// without the resolver threading a separate flag set through every
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuppressFlags(u16);

impl SuppressFlags {
    pub const OVERFLOW: SuppressFlags = SuppressFlags(1 << 0);
    pub const RANGE: SuppressFlags = SuppressFlags(1 << 1);
    pub const INDEX: SuppressFlags = SuppressFlags(1 << 2);
    pub const DISCRIMINANT: SuppressFlags = SuppressFlags(1 << 3);
    pub const LENGTH: SuppressFlags = SuppressFlags(1 << 4);
    pub const DIVISION: SuppressFlags = SuppressFlags(1 << 5);
    pub const ELABORATION: SuppressFlags = SuppressFlags(1 << 6);
    pub const ACCESS: SuppressFlags = SuppressFlags(1 << 7);
    pub const STORAGE: SuppressFlags = SuppressFlags(1 << 8);

    pub const NONE: SuppressFlags = SuppressFlags(0);

    pub fn contains(self, flag: SuppressFlags) -> bool {
        self.0 & flag.0 != 0
    }

    pub fn insert(&mut self, flag: SuppressFlags) {
        self.0 |= flag.0;
    }

    /// Looks up the flag named by a `pragma Suppress(Name)` argument;
    /// `None` for a name that isn't one of the LRM 11.7 check names.
    pub fn from_pragma_name(name: Symbol) -> Option<SuppressFlags> {
        match name.as_str().to_ascii_lowercase().as_str() {
            "overflow_check" => Some(Self::OVERFLOW),
            "range_check" => Some(Self::RANGE),
            "index_check" => Some(Self::INDEX),
            "discriminant_check" => Some(Self::DISCRIMINANT),
            "length_check" => Some(Self::LENGTH),
            "division_check" => Some(Self::DIVISION),
            "elaboration_check" => Some(Self::ELABORATION),
            "access_check" => Some(Self::ACCESS),
            "storage_check" => Some(Self::STORAGE),
            _ => None,
        }
    }
}

/// A record or variant-part component.
#[derive(Debug, Clone)]
pub struct Component {
    pub name: Symbol,
    pub ty: DefId,
    pub has_default: bool,
}

/// One formal parameter of a `Procedure`/`Function` type.
#[derive(Debug, Clone)]
pub struct FormalParam {
    pub name: Symbol,
    pub mode: ParamMode,
    pub ty: DefId,
    pub has_default: bool,
}

/// The kind-specific payload of a type descriptor (spec.md §3's closed
/// kind set: Boolean, Character, Integer, UnsignedInteger, Enumeration,
/// Derived, Float, UniversalFloat, FixedPoint, Access, FatPointer,
/// String, Array, Record, Task, Package, Procedure, Function).
#[derive(Debug, Clone)]
pub enum TypeKind {
    Boolean,
    Character,
    Integer { low: i64, high: i64 },
    UnsignedInteger { low: i64, high: i64 },
    /// The type of an integer literal before it's driven to a concrete
    /// type by context; never appears as a declared type's own kind.
    UniversalInteger,
    Enumeration { literals: Vec<Symbol> },
    /// A `type T is new Parent [constraint];` - `base` on the
    /// [`TypeDesc`] already points at `Parent`'s own base, so `Derived`
    /// only needs to remember the immediate parent for diagnostics and
    /// attribute inheritance.
    Derived { parent: DefId },
    Float { digits: u32, low: f64, high: f64 },
    UniversalFloat,
    FixedPoint { delta: f64, digits: Option<u32>, low: f64, high: f64 },
    Access { designated: DefId },
    /// Unconstrained array representation (data pointer + per-dimension
    /// bounds), per spec.md §3's "unconstrained arrays are represented
    /// uniformly as fat pointers".
    FatPointer { element: DefId },
    StringType,
    Array { index_types: Vec<DefId>, element: DefId, constrained: bool },
    Record { components: Vec<Component> },
    Task,
    Package,
    Procedure { formals: Vec<FormalParam> },
    Function { formals: Vec<FormalParam>, return_type: DefId },
    /// Placeholder used during error recovery so resolution of the rest
    /// of the unit can continue with a type that silently covers
    /// anything (see [`TypeTable::covers`]).
    Error,
}

/// A declared type: its shape plus bookkeeping shared by every kind.
#[derive(Debug, Clone)]
pub struct TypeDesc {
    pub kind: TypeKind,
    /// The root type this type's subtype/derivation chain eventually
    /// reaches. For a root type (e.g. `Standard.Integer` itself) this
    /// is the type's own `DefId` (spec.md §3 invariant: "a subtype's
    /// base field transitively reaches a root type in finite steps").
    pub base: DefId,
    /// `None` for a root type; `Some(parent)` for a subtype or derived
    /// type, naming the type it was declared `is`/`new` from.
    pub parent: Option<DefId>,
    pub suppress: SuppressFlags,
    /// Set once the type is used somewhere that needs its layout
    /// (spec.md §4.3's declaration freezing state machine). No further
    /// representation clause may touch a frozen type.
    pub frozen: bool,
}

impl TypeDesc {
    pub fn new(kind: TypeKind, base: DefId) -> Self {
        TypeDesc { kind, base, parent: None, suppress: SuppressFlags::NONE, frozen: false }
    }

    pub fn derived_from(kind: TypeKind, base: DefId, parent: DefId) -> Self {
        TypeDesc { kind, base, parent: Some(parent), suppress: SuppressFlags::NONE, frozen: false }
    }

    pub fn is_discrete(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Integer { .. }
                | TypeKind::UnsignedInteger { .. }
                | TypeKind::UniversalInteger
                | TypeKind::Enumeration { .. }
                | TypeKind::Boolean
                | TypeKind::Character
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_discrete()
            || matches!(
                self.kind,
                TypeKind::Float { .. } | TypeKind::UniversalFloat | TypeKind::FixedPoint { .. }
            )
    }

    /// Static low/high bounds, where the kind carries them directly
    /// (`Enumeration` bounds are positions 0..len-1).
    pub fn static_bounds(&self) -> Option<(i64, i64)> {
        match &self.kind {
            TypeKind::Integer { low, high } | TypeKind::UnsignedInteger { low, high } => {
                Some((*low, *high))
            }
            TypeKind::Enumeration { literals } => Some((0, literals.len() as i64 - 1)),
            TypeKind::Boolean => Some((0, 1)),
            _ => None,
        }
    }
}

/// The well of every declared type, keyed by the [`DefId`] the symbol
/// table assigned its declaration.
#[derive(Debug, Default)]
pub struct TypeTable {
    descs: std::collections::HashMap<DefId, TypeDesc>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: DefId, desc: TypeDesc) {
        self.descs.insert(id, desc);
    }

    pub fn get(&self, id: DefId) -> Option<&TypeDesc> {
        self.descs.get(&id)
    }

    pub fn get_mut(&mut self, id: DefId) -> Option<&mut TypeDesc> {
        self.descs.get_mut(&id)
    }

    pub fn freeze(&mut self, id: DefId) {
        if let Some(desc) = self.descs.get_mut(&id) {
            desc.frozen = true;
        }
    }

    /// Follows `base` until it reaches a fixed point (a root type,
    /// whose `base` names itself).
    pub fn root_of(&self, id: DefId) -> DefId {
        match self.get(id) {
            Some(desc) if desc.base != id => self.root_of(desc.base),
            _ => id,
        }
    }

    /// `covers` (spec.md §4.3): identical types; parent/child in a
    /// derivation chain; shared base type; `Integer`/`UnsignedInteger`
    /// inter-convertible; `Float`/`UniversalFloat` inter-convertible;
    /// access types whose designated types cover.
    pub fn covers(&self, expected: DefId, actual: DefId) -> bool {
        if expected == actual {
            return true;
        }
        let (Some(e), Some(a)) = (self.get(expected), self.get(actual)) else {
            // An error-recovery type on either side covers anything,
            // so one bad declaration doesn't cascade into a wall of
            // "type mismatch" noise downstream.
            return true;
        };
        if matches!(e.kind, TypeKind::Error) || matches!(a.kind, TypeKind::Error) {
            return true;
        }
        if self.root_of(expected) == self.root_of(actual) {
            return true;
        }
        match (&e.kind, &a.kind) {
            (TypeKind::Integer { .. }, TypeKind::UniversalInteger)
            | (TypeKind::UnsignedInteger { .. }, TypeKind::UniversalInteger)
            | (TypeKind::UniversalInteger, TypeKind::Integer { .. })
            | (TypeKind::UniversalInteger, TypeKind::UnsignedInteger { .. })
            | (TypeKind::Integer { .. }, TypeKind::UnsignedInteger { .. })
            | (TypeKind::UnsignedInteger { .. }, TypeKind::Integer { .. }) => true,
            (TypeKind::Float { .. }, TypeKind::UniversalFloat)
            | (TypeKind::UniversalFloat, TypeKind::Float { .. }) => true,
            (TypeKind::Access { designated: d1 }, TypeKind::Access { designated: d2 }) => {
                self.covers(*d1, *d2)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> DefId {
        DefId(n)
    }

    #[test]
    fn root_of_follows_subtype_chain() {
        let mut table = TypeTable::new();
        table.insert(id(0), TypeDesc::new(TypeKind::Integer { low: i64::MIN, high: i64::MAX }, id(0)));
        table.insert(id(1), TypeDesc::derived_from(TypeKind::Integer { low: 0, high: 100 }, id(0), id(0)));
        table.insert(id(2), TypeDesc::derived_from(TypeKind::Integer { low: 0, high: 10 }, id(0), id(1)));

        assert_eq!(table.root_of(id(2)), id(0));
    }

    #[test]
    fn covers_allows_universal_integer_against_any_integer_type() {
        let mut table = TypeTable::new();
        table.insert(id(0), TypeDesc::new(TypeKind::Integer { low: i64::MIN, high: i64::MAX }, id(0)));
        table.insert(id(1), TypeDesc::new(TypeKind::UniversalInteger, id(1)));

        assert!(table.covers(id(0), id(1)));
        assert!(table.covers(id(1), id(0)));
    }

    #[test]
    fn covers_rejects_unrelated_record_types() {
        let mut table = TypeTable::new();
        table.insert(id(0), TypeDesc::new(TypeKind::Record { components: vec![] }, id(0)));
        table.insert(id(1), TypeDesc::new(TypeKind::Record { components: vec![] }, id(1)));

        assert!(!table.covers(id(0), id(1)));
    }

    #[test]
    fn covers_follows_access_designated_types() {
        let mut table = TypeTable::new();
        table.insert(id(0), TypeDesc::new(TypeKind::Integer { low: 0, high: 10 }, id(0)));
        table.insert(id(1), TypeDesc::new(TypeKind::Access { designated: id(0) }, id(1)));
        table.insert(id(2), TypeDesc::new(TypeKind::Access { designated: id(0) }, id(2)));

        assert!(table.covers(id(1), id(2)));
    }

    #[test]
    fn suppress_flags_round_trip_pragma_names() {
        assert_eq!(SuppressFlags::from_pragma_name(Symbol::intern_ada("Range_Check")), Some(SuppressFlags::RANGE));
        assert_eq!(SuppressFlags::from_pragma_name(Symbol::intern_ada("Bogus")), None);

        let mut flags = SuppressFlags::NONE;
        assert!(!flags.contains(SuppressFlags::RANGE));
        flags.insert(SuppressFlags::RANGE);
        assert!(flags.contains(SuppressFlags::RANGE));
    }
}
