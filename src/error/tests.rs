//! Tests for error handling system

use super::*;
use std::io;
use std::path::PathBuf;

#[test]
fn test_error_severity() {
    // Configuration problems stop the process
    assert_eq!(
        DepqError::config_error("Invalid config").severity(),
        ErrorSeverity::Critical
    );
    assert_eq!(
        DepqError::invalid_pattern("(", "unclosed group").severity(),
        ErrorSeverity::Critical
    );

    // A failed build is a regular error
    assert_eq!(
        DepqError::resolution_error("example.com/missing", "/src", "not found").severity(),
        ErrorSeverity::Error
    );
    assert_eq!(
        DepqError::io_error(io::Error::new(io::ErrorKind::NotFound, "not found")).severity(),
        ErrorSeverity::Error
    );
}

#[test]
fn test_is_critical() {
    assert!(DepqError::config_error("Invalid config").is_critical());
    let not_found = io::Error::new(io::ErrorKind::NotFound, "not found");
    assert!(!DepqError::io_error(not_found).is_critical());
}

#[test]
fn test_resolution_failure_is_distinguished() {
    let err = DepqError::resolution_error("example.com/missing", "/src", "cannot find package");
    assert!(err.is_resolution_failure());
    assert!(!DepqError::config_error("x").is_resolution_failure());
    assert!(!DepqError::InvalidPath {
        path: PathBuf::from("/nowhere")
    }
    .is_resolution_failure());
}

#[test]
fn test_display_messages() {
    let err = DepqError::resolution_error("example.com/missing", "/src", "cannot find package");
    assert_eq!(
        err.to_string(),
        "unable to resolve \"example.com/missing\" from /src: cannot find package"
    );

    let err = DepqError::ConfigNotFound {
        path: PathBuf::from("/test/.depq.toml"),
    };
    assert_eq!(err.to_string(), "Configuration file not found at /test/.depq.toml");
}

#[test]
fn test_user_message() {
    let err = DepqError::resolution_error("example.com/missing", "/src", "cannot find package");
    let msg = err.user_message();
    assert!(msg.contains("example.com/missing"));
    assert!(msg.contains("/src"));

    let err = DepqError::InvalidPath {
        path: PathBuf::from("/test/path"),
    };
    assert!(err.user_message().contains("/test/path"));

    // Variants without a custom message fall back to Display
    let err = DepqError::config_error("bad value");
    assert_eq!(err.user_message(), err.to_string());
}

#[test]
fn test_suggestions() {
    assert!(DepqError::resolution_error("a", "b", "c").suggestion().is_some());
    assert!(DepqError::config_error("x").suggestion().is_none());
}

#[test]
fn test_from_conversions() {
    let err: DepqError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
    assert!(matches!(err, DepqError::Io { .. }));

    let toml_err = toml::from_str::<toml::Table>("= broken").unwrap_err();
    let err: DepqError = toml_err.into();
    assert!(matches!(err, DepqError::TomlParse { .. }));

    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: DepqError = json_err.into();
    assert!(matches!(err, DepqError::JsonSerialize { .. }));
}

#[test]
fn test_severity_display() {
    assert_eq!(ErrorSeverity::Warning.to_string(), "WARNING");
    assert_eq!(ErrorSeverity::Error.to_string(), "ERROR");
    assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
}
