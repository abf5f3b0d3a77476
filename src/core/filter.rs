//! Package filtering by ignore/include patterns and origin

use crate::error::{DepqError, Result};
use crate::models::{Package, PatternSyntax};
use regex::Regex;

/// Anything that can decide whether an import path matches
pub trait PackagePattern {
    /// Whether the canonical import path matches
    fn matches(&self, candidate: &str) -> bool;

    /// The source text of the pattern, for messages
    fn as_str(&self) -> &str;
}

impl PackagePattern for Regex {
    fn matches(&self, candidate: &str) -> bool {
        self.is_match(candidate)
    }

    fn as_str(&self) -> &str {
        Regex::as_str(self)
    }
}

impl PackagePattern for glob::Pattern {
    fn matches(&self, candidate: &str) -> bool {
        glob::Pattern::matches(self, candidate)
    }

    fn as_str(&self) -> &str {
        glob::Pattern::as_str(self)
    }
}

impl std::fmt::Debug for dyn PackagePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

/// Ordered list of patterns
pub type PatternSet = Vec<Box<dyn PackagePattern>>;

/// Compile pattern strings with the given syntax
pub fn compile_patterns<S: AsRef<str>>(
    patterns: &[S],
    syntax: PatternSyntax,
) -> Result<PatternSet> {
    patterns
        .iter()
        .map(|pattern| compile_pattern(pattern.as_ref(), syntax))
        .collect()
}

fn compile_pattern(pattern: &str, syntax: PatternSyntax) -> Result<Box<dyn PackagePattern>> {
    match syntax {
        PatternSyntax::Regex => Regex::new(pattern)
            .map(|regex| Box::new(regex) as Box<dyn PackagePattern>)
            .map_err(|err| DepqError::invalid_pattern(pattern, err)),
        PatternSyntax::Glob => glob::Pattern::new(pattern)
            .map(|glob| Box::new(glob) as Box<dyn PackagePattern>)
            .map_err(|err| DepqError::invalid_pattern(pattern, err)),
    }
}

/// Why a package was accepted or rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// Matched an ignore pattern
    Ignored,
    /// Standard library package while those are excluded
    SystemLibrary,
    /// Include patterns are set and none matched
    NotIncluded,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

/// Decides which packages make it into the graph
#[derive(Default)]
pub struct PackageFilter {
    ignored: PatternSet,
    included: PatternSet,
    include_system_library: bool,
}

impl PackageFilter {
    /// A filter that accepts everything except system libraries
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject packages matching any of these patterns
    pub fn with_ignored(mut self, patterns: PatternSet) -> Self {
        self.ignored = patterns;
        self
    }

    /// Accept only packages matching one of these patterns
    pub fn with_included(mut self, patterns: PatternSet) -> Self {
        self.included = patterns;
        self
    }

    /// Whether standard library packages may be accepted
    pub fn with_system_library(mut self, include: bool) -> Self {
        self.include_system_library = include;
        self
    }

    /// Build a filter from pattern strings
    pub fn from_patterns<S: AsRef<str>>(
        ignored: &[S],
        included: &[S],
        syntax: PatternSyntax,
        include_system_library: bool,
    ) -> Result<Self> {
        Ok(Self::new()
            .with_ignored(compile_patterns(ignored, syntax)?)
            .with_included(compile_patterns(included, syntax)?)
            .with_system_library(include_system_library))
    }

    /// Classify a canonical package. Ignore patterns take precedence.
    pub fn verdict(&self, pkg: &Package, is_system_library: bool) -> Verdict {
        let name = pkg.as_str();
        if self.ignored.iter().any(|pattern| pattern.matches(name)) {
            return Verdict::Ignored;
        }
        if is_system_library && !self.include_system_library {
            return Verdict::SystemLibrary;
        }
        if self.included.is_empty() || self.included.iter().any(|pattern| pattern.matches(name)) {
            Verdict::Accepted
        } else {
            Verdict::NotIncluded
        }
    }

    pub fn accepts(&self, pkg: &Package, is_system_library: bool) -> bool {
        self.verdict(pkg, is_system_library).is_accepted()
    }

    pub fn ignored_patterns(&self) -> impl Iterator<Item = &str> {
        self.ignored.iter().map(|pattern| pattern.as_str())
    }

    pub fn included_patterns(&self) -> impl Iterator<Item = &str> {
        self.included.iter().map(|pattern| pattern.as_str())
    }
}

impl std::fmt::Debug for PackageFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageFilter")
            .field("ignored", &self.ignored_patterns().collect::<Vec<_>>())
            .field("included", &self.included_patterns().collect::<Vec<_>>())
            .field("include_system_library", &self.include_system_library)
            .finish()
    }
}
