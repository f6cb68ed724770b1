//! Error types for LLVM code generation (spec.md §4.5).

use thiserror::Error;

/// Error type for LLVM code generation.
#[derive(Debug, Error)]
pub enum CodeGenError {
    /// An inkwell builder call returned its own internal error.
    #[error("LLVM operation failed: {0}")]
    LlvmOperationFailed(String),

    /// A mangled function name has no corresponding `FunctionValue` in
    /// the module (called before it was declared, or never declared).
    #[error("function '{0}' not found in module")]
    FunctionNotFound(String),

    /// A `TypeKind` with no lowering to an LLVM type reached the mapper.
    #[error("type mapping error: {0}")]
    TypeMappingError(String),

    /// A name reference has no entry in the emitter's declaration index
    /// (the span-keyed lookup described in `llvm.rs`'s module doc).
    #[error("unresolved reference to {0}")]
    UnresolvedReference(String),

    /// A parsed construct with no lowering yet (spec.md §1 non-goals,
    /// or an awkward corner deferred per spec.md §4.4's "best effort"
    /// stance).
    #[error("unsupported construct: {0}")]
    Unsupported(String),

    /// Internal error - indicates a bug in the emitter itself.
    #[error("internal code generation error: {0}")]
    Internal(String),
}

/// Result type alias for code generation operations.
pub type Result<T> = std::result::Result<T, CodeGenError>;
