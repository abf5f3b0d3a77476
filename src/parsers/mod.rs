//! Parsing functionality for Go source files
//!
//! Only build constraints, package clauses and import declarations are read;
//! nothing past the file header is parsed.

pub mod build_constraint;
pub mod go_source;

pub use build_constraint::{file_constraint, Constraint, ConstraintError};
pub use go_source::{
    parse_header, scan_package_dir, GoFileHeader, GoTarget, ScanError, ScannedPackage,
};
