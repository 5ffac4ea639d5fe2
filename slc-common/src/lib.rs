//! Stel Language Compiler - Common Types and Utilities
//!
//! This crate contains shared types, error definitions, and the AST
//! contract used across all components of the Stel compiler.

pub mod ast;
pub mod error;
pub mod source_loc;

pub use ast::{BinOp, Expr, Program};
pub use error::CompilerError;
pub use source_loc::SourceLocation;

/// Temporary variable identifier for IR
pub type TempId = u32;
