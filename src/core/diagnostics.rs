//! Diagnostics sink for advisory events raised while building
//!
//! The builder never writes to stdout/stderr itself. Callers pass a
//! [`Diagnostics`] implementation and decide where warnings go.

use crate::models::{DependencyInfo, Package};
use ansi_term::Colour::{Red, Yellow};
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

/// Receiver of advisory events. None of these events affect the result.
pub trait Diagnostics {
    /// A root package was rejected by the filter
    fn root_ignored(&self, root: &str);

    /// A source file could not be read while counting lines
    fn unreadable_source(&self, path: &Path, error: &io::Error);

    /// A package became a node in the graph
    fn package_visited(&self, _pkg: &Package, _info: &DependencyInfo) {}
}

/// Writes warnings and errors to stderr
#[derive(Debug, Clone, Copy)]
pub struct StderrDiagnostics {
    use_colors: bool,
}

impl StderrDiagnostics {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

impl Default for StderrDiagnostics {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Diagnostics for StderrDiagnostics {
    fn root_ignored(&self, root: &str) {
        eprintln!("{}", format_root_ignored(root, self.use_colors));
    }

    fn unreadable_source(&self, path: &Path, error: &io::Error) {
        eprintln!("{}", format_unreadable_source(path, error, self.use_colors));
    }
}

/// Format the warning for a root package rejected by the filter
pub fn format_root_ignored(root: &str, use_colors: bool) -> String {
    let label = if use_colors {
        Yellow.bold().paint("Warning:").to_string()
    } else {
        "Warning:".to_string()
    };
    format!("{} ignoring root package {:?}", label, root)
}

/// Format the log line for a source file that could not be read
pub fn format_unreadable_source(path: &Path, error: &io::Error, use_colors: bool) -> String {
    let label = if use_colors {
        Red.bold().paint("ERROR:").to_string()
    } else {
        "ERROR:".to_string()
    };
    format!("{} {}: {}", label, path.display(), error)
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn root_ignored(&self, _root: &str) {}

    fn unreadable_source(&self, _path: &Path, _error: &io::Error) {}
}

/// A recorded diagnostic event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    RootIgnored(String),
    UnreadableSource { path: PathBuf, message: String },
    PackageVisited(Package),
}

/// Keeps every event in memory, in the order received
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: RefCell<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.borrow().clone()
    }

    /// Roots reported as ignored, in order
    pub fn ignored_roots(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Diagnostic::RootIgnored(root) => Some(root.clone()),
                _ => None,
            })
            .collect()
    }

    /// Source files reported as unreadable, in order
    pub fn unreadable_sources(&self) -> Vec<PathBuf> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Diagnostic::UnreadableSource { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn root_ignored(&self, root: &str) {
        self.events
            .borrow_mut()
            .push(Diagnostic::RootIgnored(root.to_string()));
    }

    fn unreadable_source(&self, path: &Path, error: &io::Error) {
        self.events.borrow_mut().push(Diagnostic::UnreadableSource {
            path: path.to_path_buf(),
            message: error.to_string(),
        });
    }

    fn package_visited(&self, pkg: &Package, _info: &DependencyInfo) {
        self.events
            .borrow_mut()
            .push(Diagnostic::PackageVisited(pkg.clone()));
    }
}
