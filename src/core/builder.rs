//! Recursive dependency graph construction
//!
//! Starting from the root import paths, every accepted package is resolved
//! once, measured once, and linked to the accepted packages it imports.

use super::diagnostics::{Diagnostics, NullDiagnostics};
use super::filter::PackageFilter;
use super::lines::lines_of_code;
use super::metadata::{MetadataProvider, PackageMetadata};
use super::termination::Condition;
use crate::error::{DepqError, Result};
use crate::models::package::CGO_PSEUDO_PACKAGE;
use crate::models::{canonicalize, Dependencies, DependencyInfo, Package};
use std::collections::HashSet;
use std::path::Path;

static NULL_DIAGNOSTICS: NullDiagnostics = NullDiagnostics;

/// Why a walk stopped before finishing
enum Halt {
    /// A termination condition fired; the partial result is kept
    Terminated,
    /// Resolution failed; the whole build fails
    Failed(DepqError),
}

impl From<DepqError> for Halt {
    fn from(err: DepqError) -> Self {
        Halt::Failed(err)
    }
}

/// Builds a [`Dependencies`] graph from root import paths
pub struct DependencyBuilder<'a> {
    provider: &'a dyn MetadataProvider,
    diagnostics: &'a dyn Diagnostics,
    base_dir: String,
    roots: Vec<String>,
    filter: PackageFilter,
    conditions: Vec<Condition>,
    include_tests: bool,
}

impl<'a> DependencyBuilder<'a> {
    /// Create a builder resolving through `provider` from the current directory
    pub fn new(provider: &'a dyn MetadataProvider) -> Self {
        Self {
            provider,
            diagnostics: &NULL_DIAGNOSTICS,
            base_dir: ".".to_string(),
            roots: Vec::new(),
            filter: PackageFilter::default(),
            conditions: Vec::new(),
            include_tests: false,
        }
    }

    /// Directory every import path is resolved against
    pub fn with_base_dir(mut self, base_dir: impl Into<String>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Import paths to start from, visited in order
    pub fn with_roots<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roots = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, filter: PackageFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Add a condition that stops the build once it holds
    pub fn with_termination_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_termination_conditions<I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        self.conditions.extend(conditions);
        self
    }

    /// Follow test imports and count test sources
    pub fn with_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    /// Where root warnings and unreadable-file errors are reported
    pub fn with_diagnostics(mut self, diagnostics: &'a dyn Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Walk every root and return the graph.
    ///
    /// A termination condition ends the walk early with the packages gathered
    /// so far. A resolution failure anywhere fails the whole build.
    pub fn build(&self) -> Result<Dependencies> {
        let mut deps = Dependencies::new();

        match self.add_roots(&mut deps) {
            Ok(()) => {
                tracing::debug!(
                    packages = deps.node_count(),
                    ignored = deps.ignored.len(),
                    "dependency walk complete"
                );
                Ok(deps)
            }
            Err(Halt::Terminated) => {
                tracing::debug!(packages = deps.node_count(), "termination condition met");
                Ok(deps)
            }
            Err(Halt::Failed(err)) => Err(err),
        }
    }

    fn add_roots(&self, deps: &mut Dependencies) -> std::result::Result<(), Halt> {
        for root in &self.roots {
            if self.add_package(root, deps)?.is_none() {
                self.diagnostics.root_ignored(root);
            }
        }
        Ok(())
    }

    /// Add `import_path` and everything it reaches.
    ///
    /// Returns the canonical package when it is part of the graph, or `None`
    /// when it was rejected.
    fn add_package(
        &self,
        import_path: &str,
        deps: &mut Dependencies,
    ) -> std::result::Result<Option<Package>, Halt> {
        if import_path == CGO_PSEUDO_PACKAGE {
            return Ok(None);
        }

        let metadata = self.provider.resolve(import_path, &self.base_dir)?;
        let pkg = canonicalize(&metadata.import_path);

        let verdict = self.filter.verdict(&pkg, metadata.is_system_library);
        if !verdict.is_accepted() {
            tracing::debug!(package = %pkg, ?verdict, "package rejected");
            deps.ignored.insert(pkg);
            return Ok(None);
        }

        if deps.forward.has_node(pkg.as_str()) {
            return Ok(Some(pkg));
        }

        tracing::debug!(package = %pkg, import_path, "visiting package");
        deps.forward.node_mut(pkg.clone());

        let info = DependencyInfo {
            lines_of_code: lines_of_code(self.source_files(&metadata), self.diagnostics),
        };
        deps.info.insert(pkg.clone(), info);
        self.diagnostics.package_visited(&pkg, &info);

        if self.conditions.iter().any(|condition| condition(&*deps)) {
            return Err(Halt::Terminated);
        }

        for child in self.child_imports(&metadata) {
            if let Some(child) = self.add_package(child, deps)? {
                deps.forward.node_mut(pkg.clone()).insert(child);
            }
        }

        Ok(Some(pkg))
    }

    fn source_files<'m>(&self, metadata: &'m PackageMetadata) -> impl Iterator<Item = &'m Path> {
        let tests = if self.include_tests {
            Some(
                metadata
                    .test_source_files
                    .iter()
                    .chain(&metadata.external_test_source_files),
            )
        } else {
            None
        };

        metadata
            .source_files
            .iter()
            .chain(tests.into_iter().flatten())
            .map(|path| path.as_path())
    }

    /// Imports to follow, first occurrence first, without the package itself
    fn child_imports<'m>(&self, metadata: &'m PackageMetadata) -> Vec<&'m str> {
        let mut imports: Vec<&str> = metadata.imports.iter().map(String::as_str).collect();
        if self.include_tests {
            imports.extend(metadata.test_imports.iter().map(String::as_str));
            imports.extend(metadata.external_test_imports.iter().map(String::as_str));
        }

        let mut seen = HashSet::new();
        imports.retain(|import| *import != metadata.import_path && seen.insert(*import));
        imports
    }
}

/// Resolve an import path to its canonical package without walking anything
pub fn resolve_package(
    provider: &dyn MetadataProvider,
    import_path: &str,
    base_dir: &str,
) -> Result<Package> {
    let metadata = provider.resolve(import_path, base_dir)?;
    Ok(canonicalize(&metadata.import_path))
}
