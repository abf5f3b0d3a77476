//! depq - Go package dependency graphs
//!
//! Resolves Go import paths to packages, follows their imports recursively
//! and records the resulting graph with per-package line counts. Vendored
//! copies of a package collapse into a single node.
//!
//! ```no_run
//! use depq::core::{DependencyBuilder, GoMetadataProvider, PackageFilter};
//! use depq::utils::PathResolver;
//!
//! let provider = GoMetadataProvider::new(PathResolver::from_env());
//! let deps = DependencyBuilder::new(&provider)
//!     .with_roots(["example.com/app"])
//!     .with_filter(PackageFilter::new())
//!     .build()?;
//! println!("{} packages", deps.node_count());
//! # Ok::<(), depq::DepqError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    Condition, DependencyBuilder, Diagnostics, GoMetadataProvider, MetadataProvider, PackageFilter,
    PackageMetadata, StaticMetadataProvider,
};
pub use error::{DepqError, ErrorSeverity, Result, ResultExt};
pub use models::{canonicalize, Dependencies, DependencyInfo, Graph, Package, PackageSet, Settings};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
