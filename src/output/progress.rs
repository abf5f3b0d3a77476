//! Progress reporting functionality
//!
//! A spinner that follows the dependency walk. It doubles as the
//! [`Diagnostics`] sink for the CLI so warnings do not tear the spinner line.

use crate::core::diagnostics::{format_root_ignored, format_unreadable_source, Diagnostics};
use crate::models::{DependencyInfo, Package};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::Cell;
use std::io;
use std::path::Path;
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed}] {msg}";

/// Progress reporter for the dependency walk
pub struct ProgressReporter {
    verbose: bool,
    use_colors: bool,
    spinner: Option<ProgressBar>,
    visited: Cell<usize>,
}

impl ProgressReporter {
    /// Create a new progress reporter. No spinner is drawn in quiet mode or
    /// when `show_progress` is off.
    pub fn new(quiet: bool, verbose: bool, use_colors: bool, show_progress: bool) -> Self {
        let spinner = (!quiet && show_progress).then(|| {
            let spinner = ProgressBar::new_spinner();
            let style = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE);
            if let Ok(style) = style {
                spinner.set_style(style);
            }
            spinner
        });

        Self {
            verbose,
            use_colors,
            spinner,
            visited: Cell::new(0),
        }
    }

    /// Start spinning with a message
    pub fn start(&self, operation: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(operation.to_string());
            spinner.enable_steady_tick(Duration::from_millis(100));
        }
    }

    /// Stop the spinner and clear its line
    pub fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }

    /// Number of packages visited so far
    pub fn visited(&self) -> usize {
        self.visited.get()
    }

    /// Print a verbose message (only in verbose mode)
    pub fn print_verbose(&self, message: &str) {
        if self.verbose {
            self.suspend(|| eprintln!("{}", message));
        }
    }

    fn suspend<F: FnOnce()>(&self, f: F) {
        match &self.spinner {
            Some(spinner) => spinner.suspend(f),
            None => f(),
        }
    }
}

impl Diagnostics for ProgressReporter {
    // Warnings and errors are printed even in quiet mode
    fn root_ignored(&self, root: &str) {
        let message = format_root_ignored(root, self.use_colors);
        self.suspend(|| eprintln!("{}", message));
    }

    fn unreadable_source(&self, path: &Path, error: &io::Error) {
        let message = format_unreadable_source(path, error, self.use_colors);
        self.suspend(|| eprintln!("{}", message));
    }

    fn package_visited(&self, pkg: &Package, _info: &DependencyInfo) {
        let visited = self.visited.get() + 1;
        self.visited.set(visited);
        if let Some(spinner) = &self.spinner {
            spinner.set_message(format!("{} packages, at {}", visited, pkg));
        }
    }
}
