//! Fatal errors for GLB decoding.
//!
//! Only structural corruption of the container aborts a decode. Everything
//! else (missing fields, dangling indices, cycles) is recorded as a
//! [`Diagnostic`](crate::diagnostics::Diagnostic) and decoding continues.

use std::io;

use thiserror::Error;

/// Errors that abort a GLB decode.
#[derive(Error, Debug)]
pub enum GlbError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed container: {0}")]
    MalformedContainer(String),
}

impl GlbError {
    /// Creates a malformed container error.
    pub fn malformed(message: impl Into<String>) -> Self {
        GlbError::MalformedContainer(message.into())
    }

    /// Returns true if this error describes a structurally broken container.
    pub fn is_malformed(&self) -> bool {
        matches!(self, GlbError::MalformedContainer(_))
    }
}

pub type Result<T> = std::result::Result<T, GlbError>;
