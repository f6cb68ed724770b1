//! String interning for Ada identifiers, reserved words, and attribute
//! designators.
//!
//! [`Symbol`] is a 4-byte handle into a global, process-lifetime string
//! table ([`interner::STRING_TABLE`]). Ada is case-insensitive for
//! identifier matching, so [`Symbol::intern_ada`] folds ASCII case
//! before interning — `X`, `x`, and `X` all yield the same `Symbol`.
//! The lexer keeps the original-case source slice on the `Token`
//! separately for diagnostics; only the case-folded form is ever used
//! as a symbol-table key.
//!
//! A fixed range of indices (`0..RESERVED_SYMBOLS_END`) is reserved for
//! Ada 83 keywords, predefined attribute designators, predefined type
//! names, and predefined exception names, interned eagerly at process
//! start. Looking one of these up is a plain index comparison, not a
//! hash lookup.

mod interner;

pub use interner::STRING_TABLE;

/// Interner statistics, useful for profiling large compilations.
#[derive(Clone, Copy, Debug, Default)]
pub struct InternerStats {
    pub count: usize,
    pub capacity: usize,
    pub collisions: usize,
    pub hits: usize,
    pub misses: usize,
}

impl InternerStats {
    pub const fn new(count: usize, capacity: usize, collisions: usize, hits: usize, misses: usize) -> Self {
        Self { count, capacity, collisions, hits, misses }
    }

    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.count as f64 / self.capacity as f64
        }
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn total_operations(&self) -> usize {
        self.hits + self.misses
    }
}

/// A compact, interned identifier or reserved-word handle.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    index: u32,
}

/// End of the reserved (eagerly interned) symbol range.
pub const RESERVED_SYMBOLS_END: u32 = 512;

// ============================================================================
// Ada 83 reserved words (LRM 2.9)
// ============================================================================

pub const KW_ABORT: Symbol = Symbol { index: 0 };
pub const KW_ABS: Symbol = Symbol { index: 1 };
pub const KW_ACCEPT: Symbol = Symbol { index: 2 };
pub const KW_ACCESS: Symbol = Symbol { index: 3 };
pub const KW_ALL: Symbol = Symbol { index: 4 };
pub const KW_AND: Symbol = Symbol { index: 5 };
pub const KW_ARRAY: Symbol = Symbol { index: 6 };
pub const KW_AT: Symbol = Symbol { index: 7 };
pub const KW_BEGIN: Symbol = Symbol { index: 8 };
pub const KW_BODY: Symbol = Symbol { index: 9 };
pub const KW_CASE: Symbol = Symbol { index: 10 };
pub const KW_CONSTANT: Symbol = Symbol { index: 11 };
pub const KW_DECLARE: Symbol = Symbol { index: 12 };
pub const KW_DELAY: Symbol = Symbol { index: 13 };
pub const KW_DELTA: Symbol = Symbol { index: 14 };
pub const KW_DIGITS: Symbol = Symbol { index: 15 };
pub const KW_DO: Symbol = Symbol { index: 16 };
pub const KW_ELSE: Symbol = Symbol { index: 17 };
pub const KW_ELSIF: Symbol = Symbol { index: 18 };
pub const KW_END: Symbol = Symbol { index: 19 };
pub const KW_ENTRY: Symbol = Symbol { index: 20 };
pub const KW_EXCEPTION: Symbol = Symbol { index: 21 };
pub const KW_EXIT: Symbol = Symbol { index: 22 };
pub const KW_FOR: Symbol = Symbol { index: 23 };
pub const KW_FUNCTION: Symbol = Symbol { index: 24 };
pub const KW_GENERIC: Symbol = Symbol { index: 25 };
pub const KW_GOTO: Symbol = Symbol { index: 26 };
pub const KW_IF: Symbol = Symbol { index: 27 };
pub const KW_IN: Symbol = Symbol { index: 28 };
pub const KW_IS: Symbol = Symbol { index: 29 };
pub const KW_LIMITED: Symbol = Symbol { index: 30 };
pub const KW_LOOP: Symbol = Symbol { index: 31 };
pub const KW_MOD: Symbol = Symbol { index: 32 };
pub const KW_NEW: Symbol = Symbol { index: 33 };
pub const KW_NOT: Symbol = Symbol { index: 34 };
pub const KW_NULL: Symbol = Symbol { index: 35 };
pub const KW_OF: Symbol = Symbol { index: 36 };
pub const KW_OR: Symbol = Symbol { index: 37 };
pub const KW_OTHERS: Symbol = Symbol { index: 38 };
pub const KW_OUT: Symbol = Symbol { index: 39 };
pub const KW_PACKAGE: Symbol = Symbol { index: 40 };
pub const KW_PRAGMA: Symbol = Symbol { index: 41 };
pub const KW_PRIVATE: Symbol = Symbol { index: 42 };
pub const KW_PROCEDURE: Symbol = Symbol { index: 43 };
pub const KW_RAISE: Symbol = Symbol { index: 44 };
pub const KW_RANGE: Symbol = Symbol { index: 45 };
pub const KW_RECORD: Symbol = Symbol { index: 46 };
pub const KW_REM: Symbol = Symbol { index: 47 };
pub const KW_RENAMES: Symbol = Symbol { index: 48 };
pub const KW_RETURN: Symbol = Symbol { index: 49 };
pub const KW_REVERSE: Symbol = Symbol { index: 50 };
pub const KW_SELECT: Symbol = Symbol { index: 51 };
pub const KW_SEPARATE: Symbol = Symbol { index: 52 };
pub const KW_SUBTYPE: Symbol = Symbol { index: 53 };
pub const KW_TASK: Symbol = Symbol { index: 54 };
pub const KW_TERMINATE: Symbol = Symbol { index: 55 };
pub const KW_THEN: Symbol = Symbol { index: 56 };
pub const KW_TYPE: Symbol = Symbol { index: 57 };
pub const KW_USE: Symbol = Symbol { index: 58 };
pub const KW_WHEN: Symbol = Symbol { index: 59 };
pub const KW_WHILE: Symbol = Symbol { index: 60 };
pub const KW_WITH: Symbol = Symbol { index: 61 };
pub const KW_XOR: Symbol = Symbol { index: 62 };

// ============================================================================
// Predefined attribute designators (LRM Annex A), used after a tick: X'FIRST
// ============================================================================

pub const ATTR_FIRST: Symbol = Symbol { index: 70 };
pub const ATTR_LAST: Symbol = Symbol { index: 71 };
pub const ATTR_LENGTH: Symbol = Symbol { index: 72 };
/// `'RANGE` reuses the `range` reserved-word spelling, so it is lexically
/// the same symbol as [`KW_RANGE`], not a separate interned string.
pub const ATTR_RANGE: Symbol = KW_RANGE;
pub const ATTR_SIZE: Symbol = Symbol { index: 74 };
pub const ATTR_POS: Symbol = Symbol { index: 75 };
pub const ATTR_VAL: Symbol = Symbol { index: 76 };
pub const ATTR_SUCC: Symbol = Symbol { index: 77 };
pub const ATTR_PRED: Symbol = Symbol { index: 78 };
pub const ATTR_IMAGE: Symbol = Symbol { index: 79 };
pub const ATTR_VALUE: Symbol = Symbol { index: 80 };
/// Same spelling as the `digits` reserved word; see [`ATTR_RANGE`].
pub const ATTR_DIGITS: Symbol = KW_DIGITS;
/// Same spelling as the `delta` reserved word; see [`ATTR_RANGE`].
pub const ATTR_DELTA: Symbol = KW_DELTA;
pub const ATTR_EPSILON: Symbol = Symbol { index: 83 };
pub const ATTR_SMALL: Symbol = Symbol { index: 84 };
pub const ATTR_LARGE: Symbol = Symbol { index: 85 };
pub const ATTR_MACHINE_RADIX: Symbol = Symbol { index: 86 };
pub const ATTR_MACHINE_EMAX: Symbol = Symbol { index: 87 };
pub const ATTR_MACHINE_EMIN: Symbol = Symbol { index: 88 };
pub const ATTR_MACHINE_OVERFLOWS: Symbol = Symbol { index: 89 };
pub const ATTR_MACHINE_ROUNDS: Symbol = Symbol { index: 90 };
pub const ATTR_CALLABLE: Symbol = Symbol { index: 91 };
pub const ATTR_TERMINATED: Symbol = Symbol { index: 92 };
pub const ATTR_CONSTRAINED: Symbol = Symbol { index: 93 };
pub const ATTR_COUNT: Symbol = Symbol { index: 94 };
pub const ATTR_ADDRESS: Symbol = Symbol { index: 95 };

// ============================================================================
// Predefined type and exception identifiers (LRM Annex C)
// ============================================================================

pub const TY_INTEGER: Symbol = Symbol { index: 110 };
pub const TY_FLOAT: Symbol = Symbol { index: 111 };
pub const TY_BOOLEAN: Symbol = Symbol { index: 112 };
pub const TY_CHARACTER: Symbol = Symbol { index: 113 };
pub const TY_STRING: Symbol = Symbol { index: 114 };
pub const TY_DURATION: Symbol = Symbol { index: 115 };
pub const TY_NATURAL: Symbol = Symbol { index: 116 };
pub const TY_POSITIVE: Symbol = Symbol { index: 117 };

pub const EXC_CONSTRAINT_ERROR: Symbol = Symbol { index: 130 };
pub const EXC_PROGRAM_ERROR: Symbol = Symbol { index: 131 };
pub const EXC_STORAGE_ERROR: Symbol = Symbol { index: 132 };
pub const EXC_NUMERIC_ERROR: Symbol = Symbol { index: 133 };
pub const EXC_TASKING_ERROR: Symbol = Symbol { index: 134 };

pub const ID_TRUE: Symbol = Symbol { index: 140 };
pub const ID_FALSE: Symbol = Symbol { index: 141 };
pub const ID_STANDARD: Symbol = Symbol { index: 142 };

impl Symbol {
    pub const MAX_INDEX: u32 = u32::MAX;

    /// Interns `string` verbatim (no case folding). Used for raw string
    /// literal contents and anything not an Ada identifier.
    #[inline]
    pub fn intern(string: &str) -> Self {
        STRING_TABLE.intern(string)
    }

    /// Interns an Ada identifier or reserved word, folding ASCII case
    /// first so `Foo`, `foo`, and `FOO` intern to the same `Symbol`.
    #[inline]
    pub fn intern_ada(string: &str) -> Self {
        if string.bytes().any(|b| b.is_ascii_uppercase()) {
            Self::intern_known_lower(&string.to_ascii_lowercase())
        } else {
            Self::intern_known_lower(string)
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.get(*self).unwrap_or("")
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    #[inline]
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_str() == other
    }

    /// True for symbols interned at process start (keywords, attributes,
    /// predefined types/exceptions) — index comparison, no lookup.
    #[inline]
    pub fn is_known(&self) -> bool {
        self.index < RESERVED_SYMBOLS_END
    }

    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.index
    }

    /// # Safety
    /// `index` must name a live entry in the global string table.
    #[inline]
    pub unsafe fn from_u32_unchecked(index: u32) -> Self {
        Self { index }
    }

    #[inline]
    pub fn stats_struct() -> InternerStats {
        STRING_TABLE.stats()
    }

    /// Interns an already-lowercased string, matching against the fixed
    /// keyword/attribute/predefined-identifier table before falling
    /// back to a dynamic intern.
    fn intern_known_lower(lower: &str) -> Self {
        match lower {
            "abort" => KW_ABORT,
            "abs" => KW_ABS,
            "accept" => KW_ACCEPT,
            "access" => KW_ACCESS,
            "all" => KW_ALL,
            "and" => KW_AND,
            "array" => KW_ARRAY,
            "at" => KW_AT,
            "begin" => KW_BEGIN,
            "body" => KW_BODY,
            "case" => KW_CASE,
            "constant" => KW_CONSTANT,
            "declare" => KW_DECLARE,
            "delay" => KW_DELAY,
            "delta" => KW_DELTA,
            "digits" => KW_DIGITS,
            "do" => KW_DO,
            "else" => KW_ELSE,
            "elsif" => KW_ELSIF,
            "end" => KW_END,
            "entry" => KW_ENTRY,
            "exception" => KW_EXCEPTION,
            "exit" => KW_EXIT,
            "for" => KW_FOR,
            "function" => KW_FUNCTION,
            "generic" => KW_GENERIC,
            "goto" => KW_GOTO,
            "if" => KW_IF,
            "in" => KW_IN,
            "is" => KW_IS,
            "limited" => KW_LIMITED,
            "loop" => KW_LOOP,
            "mod" => KW_MOD,
            "new" => KW_NEW,
            "not" => KW_NOT,
            "null" => KW_NULL,
            "of" => KW_OF,
            "or" => KW_OR,
            "others" => KW_OTHERS,
            "out" => KW_OUT,
            "package" => KW_PACKAGE,
            "pragma" => KW_PRAGMA,
            "private" => KW_PRIVATE,
            "procedure" => KW_PROCEDURE,
            "raise" => KW_RAISE,
            "range" => KW_RANGE,
            "record" => KW_RECORD,
            "rem" => KW_REM,
            "renames" => KW_RENAMES,
            "return" => KW_RETURN,
            "reverse" => KW_REVERSE,
            "select" => KW_SELECT,
            "separate" => KW_SEPARATE,
            "subtype" => KW_SUBTYPE,
            "task" => KW_TASK,
            "terminate" => KW_TERMINATE,
            "then" => KW_THEN,
            "type" => KW_TYPE,
            "use" => KW_USE,
            "when" => KW_WHEN,
            "while" => KW_WHILE,
            "with" => KW_WITH,
            "xor" => KW_XOR,
            "integer" => TY_INTEGER,
            "float" => TY_FLOAT,
            "boolean" => TY_BOOLEAN,
            "character" => TY_CHARACTER,
            "string" => TY_STRING,
            "duration" => TY_DURATION,
            "natural" => TY_NATURAL,
            "positive" => TY_POSITIVE,
            "constraint_error" => EXC_CONSTRAINT_ERROR,
            "program_error" => EXC_PROGRAM_ERROR,
            "storage_error" => EXC_STORAGE_ERROR,
            "numeric_error" => EXC_NUMERIC_ERROR,
            "tasking_error" => EXC_TASKING_ERROR,
            "true" => ID_TRUE,
            "false" => ID_FALSE,
            "standard" => ID_STANDARD,
            _ => Self::intern(lower),
        }
    }

    /// Looks up a tick-attribute designator (already case-folded by the
    /// caller); returns `None` if it is not one of the recognized
    /// attributes, in which case the parser reports an unknown attribute.
    pub fn as_attribute(self) -> Option<Symbol> {
        if (ATTR_FIRST.index..=ATTR_ADDRESS.index).contains(&self.index)
            || self == KW_RANGE
            || self == KW_DIGITS
            || self == KW_DELTA
        {
            Some(self)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pretty-prints a symbol with quotes, to distinguish it from plain text
/// in diagnostic messages.
pub trait SymbolPretty {
    fn pretty(&self) -> SymbolPrettyDisplay;
}

impl SymbolPretty for Symbol {
    fn pretty(&self) -> SymbolPrettyDisplay {
        SymbolPrettyDisplay(*self)
    }
}

pub struct SymbolPrettyDisplay(Symbol);

impl std::fmt::Display for SymbolPrettyDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.0.as_str())
    }
}

static_assertions::assert_impl_all!(Symbol: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_same_string_to_same_symbol() {
        assert_eq!(Symbol::intern("foo"), Symbol::intern("foo"));
        assert_ne!(Symbol::intern("foo"), Symbol::intern("bar"));
    }

    #[test]
    fn case_insensitive_identifiers_share_a_symbol() {
        assert_eq!(Symbol::intern_ada("Hello"), Symbol::intern_ada("HELLO"));
        assert_eq!(Symbol::intern_ada("hello"), Symbol::intern_ada("hElLo"));
    }

    #[test]
    fn known_keywords_are_stable_constants() {
        assert_eq!(Symbol::intern_ada("BEGIN"), KW_BEGIN);
        assert_eq!(Symbol::intern_ada("Begin"), KW_BEGIN);
        assert!(KW_BEGIN.is_known());
        assert_eq!(KW_BEGIN.as_str(), "begin");
    }

    #[test]
    fn predefined_exceptions_resolve_through_the_known_table() {
        assert_eq!(Symbol::intern_ada("Constraint_Error"), EXC_CONSTRAINT_ERROR);
        assert_eq!(EXC_CONSTRAINT_ERROR.as_str(), "constraint_error");
    }

    #[test]
    fn unknown_identifiers_are_not_known_symbols() {
        let sym = Symbol::intern_ada("My_Variable_123");
        assert!(!sym.is_known());
        assert_eq!(sym.as_str(), "my_variable_123");
    }

    #[test]
    fn display_and_debug_show_the_resolved_string() {
        let sym = Symbol::intern("hello");
        assert_eq!(format!("{}", sym), "hello");
        assert_eq!(format!("{:?}", sym), "Symbol(hello)");
    }

    #[test]
    fn pretty_wraps_in_quotes() {
        let sym = Symbol::intern("hello");
        assert_eq!(format!("{}", sym.pretty()), "\"hello\"");
    }

    #[test]
    fn attributes_are_recognized_only_in_their_reserved_range() {
        assert!(ATTR_FIRST.as_attribute().is_some());
        assert!(Symbol::intern("not_an_attribute").as_attribute().is_none());
    }
}
