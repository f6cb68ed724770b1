//! Symbol table (spec.md §3 "Symbol").
//!
//! One [`SymbolInfo`] per declaration, keyed by a fresh [`DefId`].
//! Types get a `SymbolInfo` the same as objects and subprograms do -
//! their [`DefId`] doubles as the key into [`crate::types::TypeTable`] -
//! which is what lets a `type`, a `constant`, and a `procedure` share
//! one lookup path through [`crate::scope::ScopeTree`].

use adac_par::ast::NodeId;
use adac_util::{DefId, DefIdGenerator, Span, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Parameter,
    Type,
    Subprogram,
    Package,
    GenericTemplate,
    Label,
    Exception,
    EnumLiteral,
}

/// name, kind, declaring scope, type, optional default value
/// expression, optional mangled IR name, optional link to the defining
/// AST node (spec.md §3).
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub name: Symbol,
    pub kind: SymbolKind,
    /// `DefId::DUMMY` for symbols with no type of their own (packages,
    /// labels, generic templates).
    pub ty: DefId,
    pub default: Option<NodeId>,
    pub mangled: Option<String>,
    pub decl: Option<NodeId>,
    pub span: Span,
}

/// All declarations seen so far, addressed by [`DefId`].
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<SymbolInfo>,
    gen: DefIdGenerator,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { symbols: Vec::new(), gen: DefIdGenerator::new() }
    }

    pub fn declare(&mut self, info: SymbolInfo) -> DefId {
        let id = self.gen.next();
        debug_assert_eq!(id.index(), self.symbols.len(), "DefIdGenerator and symbol storage diverged");
        self.symbols.push(info);
        id
    }

    pub fn get(&self, id: DefId) -> Option<&SymbolInfo> {
        self.symbols.get(id.index())
    }

    pub fn get_mut(&mut self, id: DefId) -> Option<&mut SymbolInfo> {
        self.symbols.get_mut(id.index())
    }

    pub fn set_mangled(&mut self, id: DefId, mangled: String) {
        if let Some(sym) = self.get_mut(id) {
            sym.mangled = Some(mangled);
        }
    }
}
