//! IR construction and verification errors

use thiserror::Error;

/// Errors raised while constructing or verifying IR.
///
/// Every variant is fatal to the compilation unit being built: malformed
/// IR is never silently repaired, and partially built functions are never
/// exposed outside the builder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    /// Malformed IR: missing terminator, duplicate name, type mismatch
    #[error("structural error in '{function}': {message}")]
    Structural { function: String, message: String },

    /// Reference to a function the module has never seen
    #[error("call to undeclared function '{name}'")]
    UndeclaredFunction { name: String },

    /// Misuse of the insertion cursor; indicates a driver bug
    #[error("builder misuse in '{function}': {message}")]
    BuilderState { function: String, message: String },
}

impl IrError {
    pub fn structural(function: impl Into<String>, message: impl Into<String>) -> Self {
        IrError::Structural {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn builder_state(function: impl Into<String>, message: impl Into<String>) -> Self {
        IrError::BuilderState {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn undeclared(name: impl Into<String>) -> Self {
        IrError::UndeclaredFunction { name: name.into() }
    }
}
