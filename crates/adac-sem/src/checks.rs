//! Resolution output: the side tables `adac-par`'s `ast.rs` anticipates
//! (`NodeId` -> resolved type / resolved symbol) plus the runtime
//! checks the resolver inserts (spec.md §4.3 "constraint-check
//! insertion"). `adac-gen` reads all three when lowering an `Expr`.

use adac_par::ast::NodeId;
use adac_util::{DefId, Symbol};
use std::collections::HashMap;

/// A runtime check the emitter must lower at a given expression node
/// (spec.md §4.3/§4.5). Rather than an in-tree `CHECK` wrapper node,
/// these live in a side table keyed by the `NodeId` of the expression
/// they guard, for the same reason resolved types do (see
/// `adac_par::ast`'s module doc): the parser's `Expr` can't name a
/// `adac-sem` type without creating a dependency cycle.
#[derive(Debug, Clone)]
pub enum Check {
    /// Bracket the node's value between `low` and `high` (both static,
    /// or themselves `DefId`s of the bounding type when dynamic bounds
    /// apply); violating either raises `CONSTRAINT_ERROR`.
    Range { low: i64, high: i64 },
    /// Check the node's value (an index) against the array object
    /// named by `array_ty`'s stored or static bounds.
    Index { array_ty: DefId, dimension: usize },
    /// Non-zero-divisor check ahead of `/`, `mod`, `rem`.
    DivisionByZero,
    /// Null-pointer check ahead of a dereference.
    NotNull,
}

/// Per-compilation-unit resolution results.
#[derive(Debug, Default)]
pub struct TypeckResults {
    node_types: HashMap<NodeId, DefId>,
    node_defs: HashMap<NodeId, DefId>,
    checks: HashMap<NodeId, Vec<Check>>,
    /// Attribute designator recorded per `ExprKind::Attribute` node, so
    /// the emitter doesn't need to re-parse the symbol's spelling.
    attr_kinds: HashMap<NodeId, Symbol>,
}

impl TypeckResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, node: NodeId, ty: DefId) {
        self.node_types.insert(node, ty);
    }

    pub fn type_of(&self, node: NodeId) -> Option<DefId> {
        self.node_types.get(&node).copied()
    }

    pub fn set_def(&mut self, node: NodeId, def: DefId) {
        self.node_defs.insert(node, def);
    }

    pub fn def_of(&self, node: NodeId) -> Option<DefId> {
        self.node_defs.get(&node).copied()
    }

    pub fn add_check(&mut self, node: NodeId, check: Check) {
        self.checks.entry(node).or_default().push(check);
    }

    pub fn checks_of(&self, node: NodeId) -> &[Check] {
        self.checks.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_attr_kind(&mut self, node: NodeId, attr: Symbol) {
        self.attr_kinds.insert(node, attr);
    }

    /// Every node carrying at least one resolved type - the invariant
    /// spec.md §3 states ("every resolved expression node carries a
    /// non-null type") is checkable against this count without walking
    /// the AST again.
    pub fn typed_node_count(&self) -> usize {
        self.node_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checks_accumulate_per_node() {
        let mut results = TypeckResults::new();
        let node = NodeId(0);
        results.add_check(node, Check::Range { low: 0, high: 10 });
        results.add_check(node, Check::DivisionByZero);

        assert_eq!(results.checks_of(node).len(), 2);
        assert!(results.checks_of(NodeId(1)).is_empty());
    }

    #[test]
    fn type_of_and_def_of_round_trip() {
        let mut results = TypeckResults::new();
        let node = NodeId(5);
        results.set_type(node, DefId(2));
        results.set_def(node, DefId(7));

        assert_eq!(results.type_of(node), Some(DefId(2)));
        assert_eq!(results.def_of(node), Some(DefId(7)));
        assert_eq!(results.type_of(NodeId(6)), None);
    }
}
