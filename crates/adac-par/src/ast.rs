//! adac-par - AST node definitions (Ada 83 subset, spec.md §3/§4.2).
//!
//! Nodes are plain owned trees (`Box` children), not arena-allocated:
//! Ada syntax trees are never cyclic (cycles only appear later, in the
//! symbol table, for recursive type definitions), so a bump arena buys
//! nothing here that `Box` doesn't already give for free.
//!
//! Every [`Expr`] carries a [`NodeId`]. `adac-sem` keys a side table
//! from `NodeId` to its resolved `Type` rather than storing the type
//! inline on the node: `adac-par` has no dependency on `adac-sem` (see
//! the workspace `Cargo.toml` graph), so a `RefCell<Option<Type>>`
//! field naming `adac-sem`'s type would be a dependency cycle. The
//! side-table keeps the "every resolved expression has a non-null
//! type" invariant checkable without one.

use adac_util::{Span, Symbol};
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies one `Expr` node for the resolver's type/symbol side tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}

/// Generator for unique [`NodeId`]s, one per parse session.
pub struct NodeIdGenerator {
    counter: AtomicU32,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self { counter: AtomicU32::new(0) }
    }

    pub fn next(&self) -> NodeId {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        if id == u32::MAX {
            panic!("NodeId overflow: too many expression nodes in one compilation");
        }
        NodeId(id)
    }
}

impl Default for NodeIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// COMPILATION UNIT
// ============================================================================

/// The root of a parsed source file (single translation unit; no
/// separate compilation, per spec.md §1 non-goals).
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub context: Vec<ContextItem>,
    pub unit: Unit,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ContextItem {
    With { names: Vec<Path>, span: Span },
    Use { names: Vec<Path>, span: Span },
}

#[derive(Debug, Clone)]
pub enum Unit {
    Subprogram(SubprogramBody),
    PackageSpec(PackageSpec),
    PackageBody(PackageBody),
    /// `separate (Parent) ...` - parsed for syntactic completeness; the
    /// resolver treats a subunit as if inlined at its stub (best effort,
    /// per spec.md §4.4's "best-effort" stance on awkward corners).
    Subunit { parent: Path, body: Box<SubprogramBody>, span: Span },
}

// ============================================================================
// NAMES
// ============================================================================

/// A dotted name (`Ada.Text_IO`, `X`, `Outer.Inner.Field`). Whether a
/// given `Path` denotes a package, a variable, or a selected record
/// component is a resolver question, not a parser one.
#[derive(Debug, Clone)]
pub struct Path {
    pub segments: Vec<Symbol>,
    pub span: Span,
}

impl Path {
    pub fn single(name: Symbol, span: Span) -> Self {
        Path { segments: vec![name], span }
    }
}

/// A name together with an optional constraint, as it appears wherever
/// a type is referenced (`Integer`, `Positive range 1 .. N`).
#[derive(Debug, Clone)]
pub struct TypeMark {
    pub name: Path,
    pub constraint: Option<Constraint>,
    pub span: Span,
}

// ============================================================================
// DECLARATIONS
// ============================================================================

#[derive(Debug, Clone)]
pub enum Decl {
    Object(ObjectDecl),
    Type(TypeDecl),
    Subtype(SubtypeDecl),
    Subprogram(SubprogramDecl),
    Package(PackageDecl),
    Generic(GenericDecl),
    Instantiation(InstantiationDecl),
    Renaming(RenamingDecl),
    Exception(ExceptionDecl),
    Representation(RepresentationClause),
    Pragma(Pragma),
    Use(ContextItem),
}

/// `X, Y : Integer := 0;` or `Pi : constant Float := 3.14159;`
#[derive(Debug, Clone)]
pub struct ObjectDecl {
    pub names: Vec<Symbol>,
    pub constant: bool,
    pub ty: TypeMark,
    pub init: Option<Expr>,
    pub span: Span,
}

/// `type Name is <def>;`
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: Symbol,
    pub discriminants: Vec<DiscriminantSpec>,
    pub def: TypeDef,
    pub span: Span,
}

/// `subtype Name is Base [constraint];`
#[derive(Debug, Clone)]
pub struct SubtypeDecl {
    pub name: Symbol,
    pub base: TypeMark,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeDef {
    /// `(Red, Green, Blue)`
    Enumeration(Vec<Symbol>),
    /// `range Low .. High` on a brand new integer type.
    Integer { low: Expr, high: Expr },
    /// `digits D [range Low .. High]`
    Float { digits: Expr, range: Option<(Expr, Expr)> },
    /// `delta D [digits Dg] [range Low .. High]` - parsed; real
    /// scaled-integer lowering is out of scope (spec.md §1 non-goals).
    Fixed { delta: Expr, digits: Option<Expr>, range: Option<(Expr, Expr)> },
    /// `array (index_ranges) of Component`
    Array { indices: Vec<DiscreteRange>, component: TypeMark },
    /// `array (Index range <>) of Component` - unconstrained, fat-pointer
    /// representation at codegen time (spec.md §4.5).
    UnconstrainedArray { index_types: Vec<TypeMark>, component: TypeMark },
    Record(Vec<ComponentDecl>),
    /// `access Designated`
    Access { designated: TypeMark },
    /// `new Parent [constraint]`
    Derived { parent: TypeMark },
    /// Generic formal `type Item is private;` / `type Item(<>) is private;`
    Private,
    /// `task [Name] is entry ... end [Name];` - parsed; rendezvous
    /// codegen is a stub (spec.md §1 non-goals).
    Task(Vec<EntrySpec>),
}

#[derive(Debug, Clone)]
pub struct ComponentDecl {
    pub names: Vec<Symbol>,
    pub ty: TypeMark,
    pub default: Option<Expr>,
    /// `case Discriminant is when Choice => ... end case;` - variant
    /// part. Flagged at parse time; checked (not necessarily rejected)
    /// by the resolver per spec.md §9's note on discriminant checking.
    pub variant: Option<VariantPart>,
}

#[derive(Debug, Clone)]
pub struct VariantPart {
    pub discriminant: Symbol,
    pub variants: Vec<(Vec<Choice>, Vec<ComponentDecl>)>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DiscriminantSpec {
    pub names: Vec<Symbol>,
    pub ty: TypeMark,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct EntrySpec {
    pub name: Symbol,
    pub index: Option<DiscreteRange>,
    pub params: Vec<ParamSpec>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Constraint {
    Range(Expr, Expr),
    Index(Vec<DiscreteRange>),
    Digits(Expr, Option<(Expr, Expr)>),
    Delta(Expr, Option<(Expr, Expr)>),
}

#[derive(Debug, Clone)]
pub enum DiscreteRange {
    Range(Expr, Expr),
    Subtype(TypeMark),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubprogramKind {
    Procedure,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    In,
    Out,
    InOut,
}

#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub names: Vec<Symbol>,
    pub mode: ParamMode,
    pub ty: TypeMark,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SubprogramSpec {
    pub kind: SubprogramKind,
    pub name: Symbol,
    pub params: Vec<ParamSpec>,
    pub return_type: Option<TypeMark>,
    pub span: Span,
}

/// Either a bare spec (forward declaration) or a full body.
#[derive(Debug, Clone)]
pub enum SubprogramDecl {
    Spec(SubprogramSpec),
    Body(SubprogramBody),
}

#[derive(Debug, Clone)]
pub struct SubprogramBody {
    pub spec: SubprogramSpec,
    pub decls: Vec<Decl>,
    pub stmts: Vec<Stmt>,
    pub handlers: Vec<ExceptionHandler>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct PackageSpec {
    pub name: Symbol,
    pub visible_decls: Vec<Decl>,
    pub private_decls: Vec<Decl>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct PackageBody {
    pub name: Symbol,
    pub decls: Vec<Decl>,
    pub stmts: Vec<Stmt>,
    pub handlers: Vec<ExceptionHandler>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum PackageDecl {
    Spec(PackageSpec),
    Body(PackageBody),
}

#[derive(Debug, Clone)]
pub enum GenericFormal {
    /// `type Item is private;` (the only form this core requires).
    Type(Symbol),
    Object { name: Symbol, ty: TypeMark, mode: ParamMode, default: Option<Expr> },
    Subprogram { spec: SubprogramSpec, default: Option<Path> },
}

#[derive(Debug, Clone)]
pub struct GenericDecl {
    pub formals: Vec<GenericFormal>,
    /// The generic subprogram spec (or package spec) that follows the
    /// formal-part; bodies are parsed as ordinary subsequent decls and
    /// matched up by name in `adac-sem`.
    pub spec: Box<Decl>,
    pub span: Span,
}

/// `procedure SI is new Swap(Integer);`
#[derive(Debug, Clone)]
pub struct InstantiationDecl {
    pub kind: SubprogramKind,
    pub name: Symbol,
    pub generic_name: Path,
    pub actuals: Vec<Expr>,
    pub span: Span,
}

/// Object or subprogram renaming (`X : Integer renames Y;`,
/// `procedure P renames Q;`).
#[derive(Debug, Clone)]
pub struct RenamingDecl {
    pub name: Symbol,
    pub ty: Option<TypeMark>,
    pub renamed: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExceptionDecl {
    pub names: Vec<Symbol>,
    pub span: Span,
}

/// Representation clauses are parsed but not deeply interpreted beyond
/// feeding static values to the resolver's layout computation where
/// practical (spec.md treats `Size`/`Address` clauses as part of the
/// declaration grammar, not as a required codegen feature).
#[derive(Debug, Clone)]
pub enum RepresentationClause {
    Attribute { entity: Path, attribute: Symbol, value: Expr, span: Span },
    Record { entity: Path, components: Vec<(Symbol, Expr, Expr)>, span: Span },
}

#[derive(Debug, Clone)]
pub struct Pragma {
    pub name: Symbol,
    pub args: Vec<Expr>,
    pub span: Span,
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone)]
pub enum Stmt {
    Null(Span),
    Label(Symbol, Span),
    Assign { target: Expr, value: Expr, span: Span },
    Call(CallStmt),
    If(IfStmt),
    Case(CaseStmt),
    Loop(LoopStmt),
    Exit { label: Option<Symbol>, condition: Option<Expr>, span: Span },
    Return { value: Option<Expr>, span: Span },
    Goto { label: Symbol, span: Span },
    Block(BlockStmt),
    Raise { exception: Option<Path>, span: Span },
    Delay { expr: Expr, span: Span },
    Abort { names: Vec<Path>, span: Span },
    Accept(AcceptStmt),
    Select(SelectStmt),
}

#[derive(Debug, Clone)]
pub struct Argument {
    pub name: Option<Symbol>,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct CallStmt {
    pub name: Path,
    pub args: Vec<Argument>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_stmts: Vec<Stmt>,
    pub elsifs: Vec<(Expr, Vec<Stmt>)>,
    pub else_stmts: Option<Vec<Stmt>>,
    pub span: Span,
}

/// A single choice in a `case` alternative, an exception handler's
/// exception list, or an aggregate's named association.
#[derive(Debug, Clone)]
pub enum Choice {
    Expr(Expr),
    Range(Expr, Expr),
    Others,
}

#[derive(Debug, Clone)]
pub struct CaseAlt {
    pub choices: Vec<Choice>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct CaseStmt {
    pub selector: Expr,
    pub alternatives: Vec<CaseAlt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum IterationScheme {
    While(Expr),
    For { var: Symbol, reverse: bool, range: DiscreteRange },
}

#[derive(Debug, Clone)]
pub struct LoopStmt {
    pub label: Option<Symbol>,
    pub scheme: Option<IterationScheme>,
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub label: Option<Symbol>,
    pub decls: Vec<Decl>,
    pub stmts: Vec<Stmt>,
    pub handlers: Vec<ExceptionHandler>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExceptionHandler {
    pub choices: Vec<Choice>,
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `accept Name [(index)] [(params)] [do ... end];` - parsed fully;
/// rendezvous codegen is a stub (spec.md §1 non-goals).
#[derive(Debug, Clone)]
pub struct AcceptStmt {
    pub entry: Symbol,
    pub index: Option<Expr>,
    pub params: Vec<ParamSpec>,
    pub stmts: Option<Vec<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SelectArm {
    pub guard: Option<Expr>,
    pub accept: AcceptStmt,
    pub stmts: Vec<Stmt>,
}

/// `select ... or ... else ... end select;` - parsed; limited codegen
/// (spec.md §4.2 grammar surface note).
#[derive(Debug, Clone)]
pub struct SelectStmt {
    pub arms: Vec<SelectArm>,
    pub else_stmts: Option<Vec<Stmt>>,
    pub span: Span,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub id: NodeId,
}

#[derive(Debug, Clone)]
pub enum Literal {
    Int(i64),
    Real(f64),
    Based(i64, u32),
    Str(Symbol),
    Char(Symbol),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Concat,
    Mul,
    Div,
    Mod,
    Rem,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Xor,
    AndThen,
    OrElse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Neg,
    Not,
    Abs,
}

#[derive(Debug, Clone)]
pub enum Aggregate {
    Positional(Vec<Expr>),
    Named(Vec<(Choice, Expr)>),
    Mixed { positional: Vec<Expr>, named: Vec<(Choice, Expr)> },
}

#[derive(Debug, Clone)]
pub enum MembershipRange {
    Range(Box<Expr>, Box<Expr>),
    TypeMark(TypeMark),
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    Name(Path),
    Binary { op: BinOp, left: Box<Expr>, right: Box<Expr> },
    Unary { op: UnOp, operand: Box<Expr> },
    /// A parenthesized actual list applied to a prefix. Covers both
    /// subprogram calls and indexed/sliced components syntactically;
    /// the resolver disambiguates by what the prefix names (spec.md
    /// §4.2: "the parser distinguishes them... solely by context" -
    /// for indexing vs. calls, that context is the symbol table).
    Call { callee: Box<Expr>, args: Vec<Argument> },
    /// `Prefix.Selector` - record field or package-qualified name.
    Selector { prefix: Box<Expr>, selector: Symbol },
    /// `Prefix'Attr[(args)]`
    Attribute { prefix: Box<Expr>, attr: Symbol, args: Vec<Expr> },
    /// `Type_Mark'(Expr)`
    Qualified { type_mark: TypeMark, expr: Box<Expr> },
    /// `new Type_Mark['(Expr)]`
    Allocator { type_mark: TypeMark, init: Option<Box<Expr>> },
    Aggregate(Aggregate),
    /// `Low .. High` used where an expression is syntactically legal
    /// (the parser admits it everywhere and the resolver rejects it
    /// outside a range-accepting context, per spec.md §4.2's note that
    /// ranges are told apart from ordinary expressions "solely by
    /// context").
    Range(Box<Expr>, Box<Expr>),
    Membership { expr: Box<Expr>, not: bool, range: MembershipRange },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span, id: NodeId) -> Self {
        Expr { kind, span, id }
    }
}
