//! Core functionality for building package dependency graphs

pub mod builder;
pub mod diagnostics;
pub mod filter;
pub mod lines;
pub mod metadata;
pub mod termination;

pub use builder::{resolve_package, DependencyBuilder};
pub use diagnostics::{Diagnostics, NullDiagnostics, RecordingDiagnostics, StderrDiagnostics};
pub use filter::{compile_patterns, PackageFilter, PackagePattern, Verdict};
pub use metadata::{GoMetadataProvider, MetadataProvider, PackageMetadata, StaticMetadataProvider};
pub use termination::Condition;
