//! Module and string constants
//!
//! Defines the top-level module structure: the insertion-ordered function
//! table and the deduplicated string constant pool.

use crate::ir::{Function, IrError, IrType, TypedValue, Value};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A read-only string constant owned by the module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringConstant {
    pub name: String,
    pub data: String,
}

impl fmt::Display for StringConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{} = private constant c\"{}\"",
            self.name,
            self.data.escape_default()
        )
    }
}

/// IR Module - represents a complete compilation unit.
///
/// The module is the root owner of all functions and string constants.
/// Function names are unique; the table keeps insertion order, which is
/// also the printing order. There is no removal operation - functions
/// live for the module's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
    pub strings: Vec<StringConstant>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug!("creating module '{name}'");
        Self {
            name,
            functions: Vec::new(),
            strings: Vec::new(),
        }
    }

    /// Get-or-create a function declaration.
    ///
    /// Returns the existing function when one of that name exists with a
    /// structurally equal signature; a mismatched signature is a
    /// structural error rather than a silent reuse.
    pub fn declare_function(&mut self, name: &str, ty: &IrType) -> Result<&Function, IrError> {
        if !ty.is_function() {
            return Err(IrError::structural(
                name,
                format!("'{ty}' is not a function type"),
            ));
        }
        if let Some(pos) = self.functions.iter().position(|f| f.name == name) {
            let existing = &self.functions[pos];
            if existing.ty != *ty {
                return Err(IrError::structural(
                    name,
                    format!(
                        "redeclared with signature '{ty}', previously '{}'",
                        existing.ty
                    ),
                ));
            }
            return Ok(existing);
        }
        debug!("declaring function '{name}': {ty}");
        self.functions.push(Function::declaration(name, ty.clone()));
        Ok(self.functions.last().unwrap())
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Install a finished definition, verifying it first.
    ///
    /// Replaces the body of an existing declaration or prior definition
    /// of the same name in place, keeping the table's insertion order
    /// stable; re-running codegen resets a function instead of
    /// duplicating it.
    pub fn define_function(&mut self, function: Function) -> Result<(), IrError> {
        if function.is_declaration() {
            return Err(IrError::structural(
                &function.name,
                "cannot install a declaration as a definition",
            ));
        }
        function.verify()?;
        if let Some(pos) = self.functions.iter().position(|f| f.name == function.name) {
            if self.functions[pos].ty != function.ty {
                return Err(IrError::structural(
                    &function.name,
                    format!(
                        "defined with signature '{}', declared as '{}'",
                        function.ty, self.functions[pos].ty
                    ),
                ));
            }
            debug!("replacing body of function '{}'", function.name);
            self.functions[pos] = function;
        } else {
            debug!("defining function '{}'", function.name);
            self.functions.push(function);
        }
        Ok(())
    }

    /// Intern a string constant, reusing an existing one with the same
    /// content. The returned value is a pointer to the string data.
    pub fn intern_string(&mut self, text: &str) -> TypedValue {
        let name = match self.strings.iter().find(|s| s.data == text) {
            Some(existing) => existing.name.clone(),
            None => {
                let name = format!("str_{}", self.strings.len());
                self.strings.push(StringConstant {
                    name: name.clone(),
                    data: text.to_string(),
                });
                name
            }
        };
        TypedValue::new(Value::Global(name), IrType::ptr(IrType::I8))
    }

    /// Verify every function and the module-level uniqueness invariant
    pub fn verify(&self) -> Result<(), IrError> {
        for (i, function) in self.functions.iter().enumerate() {
            if self.functions[..i].iter().any(|f| f.name == function.name) {
                return Err(IrError::structural(
                    &function.name,
                    "duplicate function name in module",
                ));
            }
            function.verify()?;
        }
        Ok(())
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; module '{}'", self.name)?;
        for string in &self.strings {
            writeln!(f, "{string}")?;
        }
        for function in &self.functions {
            writeln!(f)?;
            writeln!(f, "{function}")?;
        }
        Ok(())
    }
}
