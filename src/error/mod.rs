//! Error handling for depq
//!
//! This module provides the error handling system for depq, including error
//! types, result aliases, and error context utilities.

pub mod context;
#[cfg(test)]
mod tests;
pub mod types;

pub use context::ResultExt;
pub use types::{DepqError, ErrorSeverity, Result};
