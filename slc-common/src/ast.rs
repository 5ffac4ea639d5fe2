//! Abstract syntax tree handed to the code generator
//!
//! The parser lives outside this workspace; these types are the traversal
//! contract it must satisfy. Each node exposes its kind and children and
//! nothing else.

use serde::{Deserialize, Serialize};

/// Binary operators of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    IntLit(i64),

    /// String literal
    StrLit(String),

    /// Variable reference (not lowered by this core)
    Ident(String),

    /// Binary arithmetic
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// Call to a named function
    Call { callee: String, args: Vec<Expr> },
}

impl Expr {
    /// Human-readable node kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::IntLit(_) => "integer literal",
            Expr::StrLit(_) => "string literal",
            Expr::Ident(_) => "identifier",
            Expr::Binary { .. } => "binary expression",
            Expr::Call { .. } => "call expression",
        }
    }
}

/// A parsed program: a single top-level expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Expr,
}

impl Program {
    pub fn new(body: Expr) -> Self {
        Self { body }
    }
}
