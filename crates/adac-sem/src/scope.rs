//! Scope tree for name resolution (spec.md §3 "Scope").
//!
//! A rib-chain scope stack, where each binding maps a name to a
//! `Vec<DefId>` rather than a single `DefId`: Ada allows overloading
//! (two subprograms, or a subprogram and a variable, sharing a name
//! but differing in profile), which a one-`DefId`-per-name rib can't
//! represent.

use adac_util::{define_idx, DefId, IndexVec, Symbol};
use std::collections::HashMap;

define_idx!(RibId);

#[derive(Debug, Clone, Copy)]
pub enum RibKind {
    Package,
    Subprogram,
    Block,
    Loop(Option<Symbol>),
}

/// A single scope level; `bindings` holds every overload sharing a name
/// in this rib, most-recently-declared last.
#[derive(Debug)]
pub struct Rib {
    bindings: HashMap<Symbol, Vec<DefId>>,
    parent: Option<RibId>,
    pub kind: RibKind,
}

pub struct ScopeTree {
    ribs: IndexVec<RibId, Rib>,
    current: RibId,
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut ribs = IndexVec::new();
        let root = ribs.push(Rib { bindings: HashMap::new(), parent: None, kind: RibKind::Package });
        Self { ribs, current: root }
    }

    pub fn current_rib(&self) -> RibId {
        self.current
    }

    pub fn current_kind(&self) -> RibKind {
        self.ribs[self.current].kind
    }

    pub fn enter_scope(&mut self, kind: RibKind) -> RibId {
        let new_rib = self.ribs.push(Rib { bindings: HashMap::new(), parent: Some(self.current), kind });
        self.current = new_rib;
        new_rib
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.ribs[self.current].parent {
            self.current = parent;
        }
    }

    /// Adds `def_id` to `name`'s overload set in the current rib. Does
    /// not check for conflicts; callers that need "already declared in
    /// this scope with an identical profile" diagnostics do that lookup
    /// themselves (the profile isn't known at this layer).
    pub fn add_binding(&mut self, name: Symbol, def_id: DefId) {
        self.ribs[self.current].bindings.entry(name).or_default().push(def_id);
    }

    /// Every overload of `name` visible from the current rib outward,
    /// stopping at the first (innermost) rib that declares it at all -
    /// an inner declaration hides outer overloads of the same name
    /// rather than joining their overload set (LRM 8.3 direct
    /// visibility / hiding).
    pub fn resolve(&self, name: Symbol) -> &[DefId] {
        let mut rib_id = self.current;
        loop {
            let rib = &self.ribs[rib_id];
            if let Some(ids) = rib.bindings.get(&name) {
                return ids;
            }
            match rib.parent {
                Some(parent) => rib_id = parent,
                None => return &[],
            }
        }
    }

    /// Bindings declared directly in the current rib, ignoring outer
    /// scopes - used to detect "already declared in this declarative
    /// part" without walking past a package/subprogram boundary.
    pub fn resolve_local(&self, name: Symbol) -> &[DefId] {
        self.ribs[self.current].bindings.get(&name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if `rib_id` is `self.current` or one of its ancestors -
    /// used by loop-label resolution (`exit Label`) to check a label
    /// names an enclosing loop, not a sibling one.
    pub fn is_enclosing(&self, rib_id: RibId) -> bool {
        let mut cur = Some(self.current);
        while let Some(id) = cur {
            if id == rib_id {
                return true;
            }
            cur = self.ribs[id].parent;
        }
        false
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
