//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for depq
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory that relative imports and vendor lookups start from
    pub base_dir: PathBuf,

    /// Root import paths to start the traversal from
    pub roots: Vec<String>,

    /// Packages matching any of these patterns are ignored
    pub ignore_patterns: Vec<String>,

    /// Only packages matching one of these patterns are included (all if empty)
    pub include_patterns: Vec<String>,

    /// How ignore/include patterns are interpreted
    pub pattern_syntax: PatternSyntax,

    /// Whether to follow imports of test files
    pub include_tests: bool,

    /// Whether to include standard library packages
    pub include_stdlib: bool,

    /// Go root; detected from the environment when unset
    pub goroot: Option<PathBuf>,

    /// GOPATH entries; taken from the environment when empty
    pub gopath: Vec<PathBuf>,

    /// Stop building as soon as any of these packages is reached
    pub stop_at: Vec<String>,

    /// Stop building once this many packages are in the graph
    pub max_packages: Option<usize>,

    /// Output format (text, json)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show a progress spinner while building
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            roots: Vec::new(),
            ignore_patterns: Vec::new(),
            include_patterns: Vec::new(),
            pattern_syntax: PatternSyntax::Regex,
            include_tests: false,
            include_stdlib: false,
            goroot: None,
            gopath: Vec::new(),
            stop_at: Vec::new(),
            max_packages: None,
            output_format: OutputFormat::Text,
            output_file: None,
            quiet: false,
            verbose: false,
            use_colors: true,
            show_progress: true,
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Syntax of ignore/include patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSyntax {
    /// Regular expressions, matched anywhere in the import path
    Regex,
    /// Shell-style globs, matched against the whole import path
    Glob,
}

impl std::str::FromStr for PatternSyntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regex" => Ok(PatternSyntax::Regex),
            "glob" => Ok(PatternSyntax::Glob),
            _ => Err(format!("Invalid pattern syntax: {}", s)),
        }
    }
}

impl std::fmt::Display for PatternSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternSyntax::Regex => write!(f, "regex"),
            PatternSyntax::Glob => write!(f, "glob"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSettings {
    pub base_dir: Option<PathBuf>,
    pub roots: Option<Vec<String>>,
    pub ignore_patterns: Option<Vec<String>>,
    pub include_patterns: Option<Vec<String>>,
    pub pattern_syntax: Option<PatternSyntax>,
    pub include_tests: Option<bool>,
    pub include_stdlib: Option<bool>,
    pub goroot: Option<PathBuf>,
    pub gopath: Option<Vec<PathBuf>>,
    pub stop_at: Option<Vec<String>>,
    pub max_packages: Option<usize>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.base_dir.is_some() {
            self.base_dir = other.base_dir;
        }
        if other.roots.is_some() {
            self.roots = other.roots;
        }
        if other.ignore_patterns.is_some() {
            self.ignore_patterns = other.ignore_patterns;
        }
        if other.include_patterns.is_some() {
            self.include_patterns = other.include_patterns;
        }
        if other.pattern_syntax.is_some() {
            self.pattern_syntax = other.pattern_syntax;
        }
        if other.include_tests.is_some() {
            self.include_tests = other.include_tests;
        }
        if other.include_stdlib.is_some() {
            self.include_stdlib = other.include_stdlib;
        }
        if other.goroot.is_some() {
            self.goroot = other.goroot;
        }
        if other.gopath.is_some() {
            self.gopath = other.gopath;
        }
        if other.stop_at.is_some() {
            self.stop_at = other.stop_at;
        }
        if other.max_packages.is_some() {
            self.max_packages = other.max_packages;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.show_progress.is_some() {
            self.show_progress = other.show_progress;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(base_dir) = &self.base_dir {
            settings.base_dir = base_dir.clone();
        }
        if let Some(roots) = &self.roots {
            settings.roots = roots.clone();
        }
        if let Some(ignore_patterns) = &self.ignore_patterns {
            settings.ignore_patterns = ignore_patterns.clone();
        }
        if let Some(include_patterns) = &self.include_patterns {
            settings.include_patterns = include_patterns.clone();
        }
        if let Some(pattern_syntax) = self.pattern_syntax {
            settings.pattern_syntax = pattern_syntax;
        }
        if let Some(include_tests) = self.include_tests {
            settings.include_tests = include_tests;
        }
        if let Some(include_stdlib) = self.include_stdlib {
            settings.include_stdlib = include_stdlib;
        }
        if let Some(goroot) = &self.goroot {
            settings.goroot = Some(goroot.clone());
        }
        if let Some(gopath) = &self.gopath {
            settings.gopath = gopath.clone();
        }
        if let Some(stop_at) = &self.stop_at {
            settings.stop_at = stop_at.clone();
        }
        if let Some(max_packages) = self.max_packages {
            settings.max_packages = Some(max_packages);
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }

        settings
    }
}
