//! Intermediate representation for Stel
//!
//! ## Architecture
//!
//! The module is structured as follows:
//! - `types` - Type system (IrType)
//! - `values` - Value representations
//! - `ops` - Binary and unary operations
//! - `instructions` - IR instructions
//! - `blocks` - Basic block management
//! - `function` - Function definitions and verification
//! - `module` - Module, string constants, symbol lookups
//! - `builder` - Insertion-point instruction builder
//! - `error` - IR construction and verification errors

// Public exports - clean API surface
pub use self::blocks::BasicBlock;
pub use self::builder::IrBuilder;
pub use self::error::IrError;
pub use self::function::{Function, Linkage};
pub use self::instructions::Instruction;
pub use self::module::{Module, StringConstant};
pub use self::ops::{IrBinaryOp, IrUnaryOp};
pub use self::types::IrType;
pub use self::values::{TypedValue, Value};

// Internal modules
mod blocks;
mod builder;
mod error;
mod function;
mod instructions;
mod module;
mod ops;
mod types;
mod values;

#[cfg(test)]
mod tests;
