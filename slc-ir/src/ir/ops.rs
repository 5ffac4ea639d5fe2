//! Binary and unary operations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operations in IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrBinaryOp {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
}

impl fmt::Display for IrBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            IrBinaryOp::Add => "add",
            IrBinaryOp::Sub => "sub",
            IrBinaryOp::Mul => "mul",
            IrBinaryOp::SDiv => "sdiv",
            IrBinaryOp::SRem => "srem",
        };
        write!(f, "{op_str}")
    }
}

/// Unary operations in IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrUnaryOp {
    /// Arithmetic negation
    Neg,
    /// Bitwise NOT
    Not,
    /// Zero extend
    ZExt,
    /// Sign extend
    SExt,
    /// Truncate
    Trunc,
}

impl IrUnaryOp {
    /// Whether this op changes the operand's width
    pub fn is_cast(&self) -> bool {
        matches!(self, IrUnaryOp::ZExt | IrUnaryOp::SExt | IrUnaryOp::Trunc)
    }
}

impl fmt::Display for IrUnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            IrUnaryOp::Neg => "neg",
            IrUnaryOp::Not => "not",
            IrUnaryOp::ZExt => "zext",
            IrUnaryOp::SExt => "sext",
            IrUnaryOp::Trunc => "trunc",
        };
        write!(f, "{op_str}")
    }
}
