//! Error types and definitions for depq
//!
//! This module provides the error handling system for depq, including the
//! error enum, result alias, and severity classification used by the binary
//! to pick an exit code.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for depq operations
#[derive(Debug, Error)]
pub enum DepqError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// An import path could not be turned into package metadata
    #[error("unable to resolve {import_path:?} from {base_dir}: {message}")]
    Resolution {
        import_path: String,
        base_dir: String,
        message: String,
    },

    /// An ignore/include pattern failed to compile
    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlParse {
        #[source]
        source: toml::de::Error,
    },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// Output directory not found
    #[error("Output directory not found: {path}")]
    OutputDirectoryNotFound { path: PathBuf },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// An error wrapped with a description of what was being attempted
    #[error("{message}")]
    Context { message: String },
}

impl DepqError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical errors - process should terminate
            DepqError::Config { .. } => ErrorSeverity::Critical,
            DepqError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            DepqError::ConfigRead { .. } => ErrorSeverity::Critical,
            DepqError::ConfigParse { .. } => ErrorSeverity::Critical,
            DepqError::InvalidPattern { .. } => ErrorSeverity::Critical,
            DepqError::StdoutWrite { .. } => ErrorSeverity::Critical,
            DepqError::OutputDirectoryNotFound { .. } => ErrorSeverity::Critical,

            // Regular errors - the build failed but the process is healthy
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Whether the metadata provider failed to resolve an import path
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, DepqError::Resolution { .. })
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            DepqError::Resolution {
                import_path,
                base_dir,
                message,
            } => {
                format!(
                    "Cannot resolve package '{}' (relative to '{}'): {}.",
                    import_path, base_dir, message
                )
            }
            DepqError::InvalidPattern { pattern, message } => {
                format!("Pattern '{}' is not valid: {}", pattern, message)
            }
            DepqError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            DepqError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Please provide a valid directory path.", path.display())
            }
            DepqError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create a config file or use command line options.", path.display())
            }
            DepqError::OutputDirectoryNotFound { path } => {
                format!("Output directory '{}' does not exist. Please create the directory or specify a different output path.", path.display())
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Get a suggestion for fixing the error, if one applies
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            DepqError::Resolution { .. } => {
                Some("Check that GOROOT/GOPATH point at the right trees, or exclude the package with --ignore")
            }
            DepqError::InvalidPattern { .. } => {
                Some("Patterns are regular expressions unless --glob is given")
            }
            DepqError::ConfigNotFound { .. } => {
                Some("Create a .depq.toml file with --init or specify a config file with --config")
            }
            DepqError::OutputDirectoryNotFound { .. } => {
                Some("Create the output directory first or specify a different path")
            }
            _ => None,
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        DepqError::Io { source }
    }

    /// Create a resolution error for an import path
    pub fn resolution_error(
        import_path: impl Into<String>,
        base_dir: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        DepqError::Resolution {
            import_path: import_path.into(),
            base_dir: base_dir.into(),
            message: message.into(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl fmt::Display) -> Self {
        DepqError::InvalidPattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        DepqError::Config {
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for DepqError {
    fn from(err: std::io::Error) -> Self {
        DepqError::io_error(err)
    }
}

impl From<toml::de::Error> for DepqError {
    fn from(err: toml::de::Error) -> Self {
        DepqError::TomlParse { source: err }
    }
}

impl From<serde_json::Error> for DepqError {
    fn from(err: serde_json::Error) -> Self {
        DepqError::JsonSerialize { source: err }
    }
}

/// Result type alias for depq operations
pub type Result<T> = std::result::Result<T, DepqError>;
