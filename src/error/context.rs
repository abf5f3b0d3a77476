//! Error context utilities for depq
//!
//! Adds a description of the failed step to errors raised outside the
//! dependency builder (configuration, output).

use crate::error::{DepqError, Result};

/// Extension trait for Result to add context to errors
pub trait ResultExt<T> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| DepqError::Context {
            message: format!("{}: {}", context(), err),
        })
    }
}
