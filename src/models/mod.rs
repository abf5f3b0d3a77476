//! Data models and structures for depq

pub mod config;
pub mod dependencies;
pub mod package;

pub use config::{OutputFormat, PatternSyntax, Settings};
pub use dependencies::{Dependencies, DependencyInfo, Graph, PackageSet};
pub use package::{canonicalize, strip_vendor, Package};
