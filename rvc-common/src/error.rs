//! Error handling for the rvc compiler backend
//!
//! This module defines the error type shared by code generation and the
//! driver. Structural contract violations surface here; silent
//! degradations (zero-divisor fold fallback, unresolved identifiers
//! treated as globals) intentionally do not.

use thiserror::Error;

/// Errors that can occur while generating assembly
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("'break' outside of a loop")]
    BreakOutsideLoop,

    #[error("'continue' outside of a loop")]
    ContinueOutsideLoop,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal codegen error: {0}")]
    Internal(String),
}

impl CodegenError {
    /// Create an internal error from any displayable message
    pub fn internal(message: impl Into<String>) -> Self {
        CodegenError::Internal(message.into())
    }
}
