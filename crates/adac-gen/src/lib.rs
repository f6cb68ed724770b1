//! LLVM IR code generation for the Ada 83 core (spec.md §4.5, §4.6).
//!
//! Lowers a resolved, type-checked compilation unit (the AST from
//! `adac-par` plus the side tables from `adac-sem`) to LLVM IR text via
//! `inkwell`. See `llvm` for the emitter and `types` for the type
//! mapping it lowers through.

pub mod error;
pub mod llvm;
pub mod types;
#[cfg(test)]
mod tests;
#[cfg(test)]
mod edge_cases;

pub use error::{CodeGenError, Result};
pub use llvm::LlvmBackend;
pub use types::{TypeMapper, ValueKind};
