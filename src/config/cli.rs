//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, OutputFormat as CliOutputFormat};
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings, PatternSyntax};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Command-line arguments that feed into settings
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub roots: Vec<String>,
    pub base_dir: Option<PathBuf>,
    pub ignore: Vec<String>,
    pub include: Vec<String>,
    pub glob: bool,
    pub tests: bool,
    pub stdlib: bool,
    pub stop_at: Vec<String>,
    pub max_packages: Option<usize>,
    pub goroot: Option<PathBuf>,
    pub gopath: Vec<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
    pub no_colors: bool,
    pub no_progress: bool,
    pub config: Option<PathBuf>,
}

impl CliConfig {
    /// Create a new CLI configuration source
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from parsed clap arguments
    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        CliArgs {
            roots: args.roots.clone(),
            base_dir: args.base_dir.clone(),
            ignore: args.ignore.clone(),
            include: args.include.clone(),
            glob: args.glob,
            tests: args.tests,
            stdlib: args.stdlib,
            stop_at: args.stop_at.clone(),
            max_packages: args.max_packages,
            goroot: args.goroot.clone(),
            gopath: args.gopath.clone(),
            output_format: args.output.map(|format| match format {
                CliOutputFormat::Text => OutputFormat::Text,
                CliOutputFormat::Json => OutputFormat::Json,
            }),
            output_file: args.output_file.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            config: args.config.clone(),
        }
    }
}

fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    (!values.is_empty()).then(|| values.to_vec())
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let args = &self.args;
        let mut settings = PartialSettings {
            roots: non_empty(&args.roots),
            base_dir: args.base_dir.clone(),
            ignore_patterns: non_empty(&args.ignore),
            include_patterns: non_empty(&args.include),
            stop_at: non_empty(&args.stop_at),
            max_packages: args.max_packages,
            goroot: args.goroot.clone(),
            gopath: non_empty(&args.gopath),
            output_format: args.output_format,
            output_file: args.output_file.clone(),
            ..Default::default()
        };

        // Flags only ever switch a setting away from its default
        if args.glob {
            settings.pattern_syntax = Some(PatternSyntax::Glob);
        }
        if args.tests {
            settings.include_tests = Some(true);
        }
        if args.stdlib {
            settings.include_stdlib = Some(true);
        }
        if args.quiet {
            settings.quiet = Some(true);
        }
        if args.verbose {
            settings.verbose = Some(true);
        }
        if args.no_colors {
            settings.use_colors = Some(false);
        }
        if args.no_progress {
            settings.show_progress = Some(false);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
