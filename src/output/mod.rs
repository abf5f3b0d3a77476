//! Output formatting and writing functionality

mod formatters;
mod progress;
mod writers;

pub use self::formatters::format_count;
pub use self::progress::ProgressReporter;
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::config::OutputFormat;
use crate::models::Dependencies;

/// Trait for different output formatters
pub trait Formatter {
    /// Format a build result into a string
    fn format(&self, deps: &Dependencies) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, deps: &Dependencies) -> Result<String> {
        if self.quiet {
            return Ok(formatters::format_quiet_text(deps));
        }

        let mut output = String::new();

        for (pkg, imports) in deps.forward.iter() {
            output.push_str(&formatters::format_package_text(
                pkg,
                imports,
                deps.info.get(pkg),
                self.use_colors,
            ));
        }

        let ignored = formatters::format_ignored_text(deps, self.use_colors);
        if !ignored.is_empty() {
            output.push('\n');
            output.push_str(&ignored);
        }

        output.push('\n');
        output.push_str(&formatters::format_summary_text(
            deps,
            self.use_colors,
            self.verbose,
        ));

        Ok(output)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, deps: &Dependencies) -> Result<String> {
        formatters::format_dependencies_json(deps, self.pretty)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(
    format: OutputFormat,
    use_colors: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
