//! IR value representations
//!
//! Defines values that can be used as operands in IR instructions, and
//! the typed handle the builder consumes and produces.

use crate::ir::IrType;
use serde::{Deserialize, Serialize};
use slc_common::TempId;
use std::fmt;

/// IR Value - represents operands in IR instructions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Temporary variable
    Temp(TempId),

    /// Constant integer
    Constant(i64),

    /// Global symbol reference
    Global(String),

    /// Function reference
    Function(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Temp(id) => write!(f, "%{id}"),
            Value::Constant(val) => write!(f, "{val}"),
            Value::Global(name) => write!(f, "@{name}"),
            Value::Function(name) => write!(f, "@{name}"),
        }
    }
}

/// A value paired with its type.
///
/// Every builder operation consumes and produces these; the type is fixed
/// when the value is created and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    pub value: Value,
    pub ty: IrType,
}

impl TypedValue {
    pub fn new(value: Value, ty: IrType) -> Self {
        Self { value, ty }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.value)
    }
}
