//! adac-sem - symbol table, resolver and generic instantiation engine
//! (spec.md §4.3/§4.4).
//!
//! Resolution happens over the tree `adac-par` hands back, not a
//! separate HIR: [`checks::TypeckResults`] keys resolved types,
//! resolved definitions and inserted runtime checks by the `NodeId`
//! every [`adac_par::ast::Expr`] already carries, the side-table
//! design `ast.rs`'s own module doc commits to (see that file for the
//! dependency-cycle rationale). [`types::TypeTable`] holds one
//! [`types::TypeDesc`] per declared type, [`symtab::SymbolTable`] one
//! [`symtab::SymbolInfo`] per declaration, and [`scope::ScopeTree`]
//! the rib chain both are looked up through.
//!
//! [`generics::GenericTable`] stores generic templates as parsed;
//! [`resolver::Resolver`] clones and substitutes them at each
//! instantiation (spec.md §4.4).
//!
//! The entry point is [`analyze`]: given a parsed [`CompilationUnit`]
//! and a [`Handler`] to report into, it returns the three tables the
//! rest of the pipeline (`adac-gen`) reads from.

pub mod checks;
pub mod generics;
pub mod resolver;
pub mod scope;
pub mod symtab;
pub mod types;

#[cfg(test)]
mod edge_cases;

use adac_par::ast::CompilationUnit;
use adac_util::Handler;

pub use checks::{Check, TypeckResults};
pub use generics::{GenericTable, GenericTemplate};
pub use resolver::{Resolver, StandardTypes};
pub use scope::{RibKind, ScopeTree};
pub use symtab::{SymbolInfo, SymbolKind, SymbolTable};
pub use types::{Component, FormalParam, TypeDesc, TypeKind, TypeTable};

/// Runs name resolution and type checking over one compilation unit,
/// seeding a `Standard`-equivalent scope first (spec.md §4.3).
pub fn analyze_compilation_unit(
    unit: &CompilationUnit,
    handler: &mut Handler,
) -> (SymbolTable, TypeTable, TypeckResults) {
    let mut resolver = Resolver::new(handler);
    resolver.analyze(unit);
    (resolver.symtab, resolver.types, resolver.results)
}
