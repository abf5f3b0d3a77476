//! Package metadata providers
//!
//! The builder only sees [`MetadataProvider`]. [`GoMetadataProvider`] reads a
//! GOROOT/GOPATH tree from disk; [`StaticMetadataProvider`] serves metadata
//! registered in memory.

use crate::error::{DepqError, Result};
use crate::parsers::go_source::{scan_package_dir, GoTarget, ScannedPackage};
use crate::utils::path_resolver::PathResolver;
use lru::LruCache;
use std::cell::RefCell;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const DEFAULT_CACHE_CAPACITY: usize = 256;

/// What the builder needs to know about one import path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Full import path as resolved, before vendor stripping
    pub import_path: String,
    /// Directory holding the package sources
    pub dir: PathBuf,
    /// Part of the language's standard library
    pub is_system_library: bool,
    /// Imports of the non-test sources
    pub imports: Vec<String>,
    /// Imports of the in-package test sources
    pub test_imports: Vec<String>,
    /// Imports of the external test package
    pub external_test_imports: Vec<String>,
    /// Non-test sources, cgo files included
    pub source_files: Vec<PathBuf>,
    pub test_source_files: Vec<PathBuf>,
    pub external_test_source_files: Vec<PathBuf>,
}

impl PackageMetadata {
    pub fn new(import_path: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            ..Default::default()
        }
    }

    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_test_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_external_test_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external_test_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.source_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_test_source_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.test_source_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_external_test_source_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.external_test_source_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn system_library(mut self, is_system_library: bool) -> Self {
        self.is_system_library = is_system_library;
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }
}

/// Resolves an import path, relative to a base directory, to package metadata
pub trait MetadataProvider {
    fn resolve(&self, import_path: &str, base_dir: &str) -> Result<PackageMetadata>;
}

impl<T: MetadataProvider + ?Sized> MetadataProvider for &T {
    fn resolve(&self, import_path: &str, base_dir: &str) -> Result<PackageMetadata> {
        (**self).resolve(import_path, base_dir)
    }
}

/// Metadata registered up front, keyed by import path. The base directory is
/// not consulted.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataProvider {
    packages: HashMap<String, PackageMetadata>,
}

impl StaticMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata under its own import path
    pub fn insert(&mut self, metadata: PackageMetadata) {
        self.packages.insert(metadata.import_path.clone(), metadata);
    }

    /// Register metadata under an import path other than its own, as a vendored
    /// import resolves to `.../vendor/<path>`
    pub fn insert_alias(&mut self, import_path: impl Into<String>, metadata: PackageMetadata) {
        self.packages.insert(import_path.into(), metadata);
    }

    pub fn with_package(mut self, metadata: PackageMetadata) -> Self {
        self.insert(metadata);
        self
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl MetadataProvider for StaticMetadataProvider {
    fn resolve(&self, import_path: &str, base_dir: &str) -> Result<PackageMetadata> {
        self.packages
            .get(import_path)
            .cloned()
            .ok_or_else(|| {
                DepqError::resolution_error(import_path, base_dir, "cannot find package")
            })
    }
}

/// Reads package metadata from Go sources in a GOROOT/GOPATH layout
pub struct GoMetadataProvider {
    resolver: PathResolver,
    target: GoTarget,
    scanned: RefCell<LruCache<PathBuf, Rc<ScannedPackage>>>,
}

impl GoMetadataProvider {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            target: GoTarget::host(),
            scanned: RefCell::new(LruCache::new(cache_capacity(DEFAULT_CACHE_CAPACITY))),
        }
    }

    /// Check file name suffixes against another GOOS/GOARCH
    pub fn with_target(mut self, target: GoTarget) -> Self {
        self.target = target;
        self
    }

    /// Number of scanned directories kept in memory
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.scanned = RefCell::new(LruCache::new(cache_capacity(capacity)));
        self
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    fn scan(&self, import_path: &str, base_dir: &str, dir: &Path) -> Result<Rc<ScannedPackage>> {
        if let Some(cached) = self.scanned.borrow_mut().get(dir) {
            return Ok(Rc::clone(cached));
        }

        tracing::debug!(dir = %dir.display(), "scanning package directory");
        let scanned = scan_package_dir(dir, &self.target)
            .map_err(|err| DepqError::resolution_error(import_path, base_dir, err.to_string()))?;
        if scanned.is_empty() {
            return Err(DepqError::resolution_error(
                import_path,
                base_dir,
                format!("no buildable Go source files in {}", dir.display()),
            ));
        }

        let scanned = Rc::new(scanned);
        self.scanned
            .borrow_mut()
            .put(dir.to_path_buf(), Rc::clone(&scanned));
        Ok(scanned)
    }
}

impl MetadataProvider for GoMetadataProvider {
    fn resolve(&self, import_path: &str, base_dir: &str) -> Result<PackageMetadata> {
        let resolved = self.resolver.resolve(import_path, Path::new(base_dir))?;
        let scanned = self.scan(import_path, base_dir, &resolved.dir)?;

        let in_dir = |files: &[String]| -> Vec<PathBuf> {
            files.iter().map(|file| resolved.dir.join(file)).collect()
        };

        let mut source_files = in_dir(&scanned.go_files);
        source_files.extend(in_dir(&scanned.cgo_files));

        Ok(PackageMetadata {
            import_path: resolved.import_path.clone(),
            dir: resolved.dir.clone(),
            is_system_library: resolved.is_goroot,
            imports: scanned.imports.clone(),
            test_imports: scanned.test_imports.clone(),
            external_test_imports: scanned.xtest_imports.clone(),
            source_files,
            test_source_files: in_dir(&scanned.test_go_files),
            external_test_source_files: in_dir(&scanned.xtest_go_files),
        })
    }
}

impl std::fmt::Debug for GoMetadataProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoMetadataProvider")
            .field("resolver", &self.resolver)
            .field("target", &self.target)
            .finish()
    }
}

fn cache_capacity(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}
