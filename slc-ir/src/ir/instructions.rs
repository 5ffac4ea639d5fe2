//! IR instructions

use crate::ir::{IrBinaryOp, IrType, IrUnaryOp, Value};
use serde::{Deserialize, Serialize};
use slc_common::TempId;
use std::fmt;

/// IR Instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Binary operation: result = op lhs, rhs
    Binary {
        result: TempId,
        op: IrBinaryOp,
        lhs: Value,
        rhs: Value,
        result_type: IrType,
    },

    /// Unary operation or width cast: result = op operand
    Unary {
        result: TempId,
        op: IrUnaryOp,
        operand: Value,
        result_type: IrType,
    },

    /// Function call: result = call func(args...)
    Call {
        result: Option<TempId>,
        function: Value,
        args: Vec<Value>,
        result_type: IrType,
    },

    /// Return: ret value or ret void
    Return(Option<Value>),

    /// Unconditional branch: br label
    Branch(String),
}

impl Instruction {
    /// Whether this instruction ends a basic block's control flow
    pub fn is_terminator(&self) -> bool {
        matches!(self, Instruction::Return(_) | Instruction::Branch(_))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Binary {
                result,
                op,
                lhs,
                rhs,
                result_type,
            } => {
                write!(f, "%{result} = {op} {result_type} {lhs}, {rhs}")
            }
            Instruction::Unary {
                result,
                op,
                operand,
                result_type,
            } => {
                if op.is_cast() {
                    write!(f, "%{result} = {op} {operand} to {result_type}")
                } else {
                    write!(f, "%{result} = {op} {result_type} {operand}")
                }
            }
            Instruction::Call {
                result,
                function,
                args,
                result_type,
            } => {
                if let Some(result) = result {
                    write!(f, "%{result} = ")?;
                }
                write!(f, "call {result_type} {function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Instruction::Return(Some(value)) => write!(f, "ret {value}"),
            Instruction::Return(None) => write!(f, "ret void"),
            Instruction::Branch(label) => write!(f, "br label %{label}"),
        }
    }
}
