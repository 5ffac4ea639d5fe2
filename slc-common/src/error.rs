//! Error handling for the Stel compiler
//!
//! This module defines the error type shared by the code generation
//! pipeline. Every error is fatal to the compilation unit being built:
//! either a fully verified module is produced or compilation fails.

use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main compiler error type for the code generation pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Code generation error at {location}: {message}")]
    CodegenError {
        location: SourceLocation,
        message: String,
    },

    #[error("Unsupported construct: {0}")]
    Unsupported(String),

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a codegen error
    pub fn codegen_error(message: String, location: SourceLocation) -> Self {
        CompilerError::CodegenError { location, message }
    }

    /// Create an unsupported-construct error
    pub fn unsupported(construct: impl Into<String>) -> Self {
        CompilerError::Unsupported(construct.into())
    }
}

/// Convert from String (for simple error cases)
impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}
