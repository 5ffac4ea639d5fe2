//! Stel Language Compiler - Intermediate Representation
//!
//! This crate defines the IR built between the Stel frontend and any
//! backend: modules containing functions containing ordered basic blocks
//! of instructions, plus the insertion-point builder used to construct
//! them incrementally. A module handed out by this crate is verified;
//! malformed IR is rejected during construction, never repaired.

pub mod ir;

pub use ir::{
    BasicBlock, Function, Instruction, IrBinaryOp, IrBuilder, IrError, IrType, IrUnaryOp, Linkage,
    Module, StringConstant, TypedValue, Value,
};
pub use slc_common::TempId;
