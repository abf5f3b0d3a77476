//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// depq - Go package dependency graph builder
#[derive(Parser, Debug)]
#[command(name = "depq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build the import graph of Go packages")]
#[command(long_about = "depq resolves Go import paths against GOROOT and GOPATH, follows their imports \
recursively and reports the resulting dependency graph, with line counts per package. Vendored copies \
of a package are folded into a single node.")]
#[command(after_help = "EXAMPLES:

    # Graph the package in the current directory
    depq

    # Graph two commands, skipping anything under internal/
    depq example.com/app/cmd/server example.com/app/cmd/worker --ignore /internal/

    # Only keep packages from one host, using glob patterns
    depq example.com/app --glob --include 'example.com/*'

    # Follow test imports and include the standard library
    depq example.com/app --tests --stdlib

    # Stop as soon as a package is reached
    depq example.com/app --stop-at example.com/app/legacy

    # Machine-readable output
    depq example.com/app --output json --output-file deps.json

    # Create a default configuration file
    depq --init
")]
pub struct Args {
    /// Import paths to start from
    #[arg(value_name = "PACKAGE", help = "Import paths to start from (defaults to the package in the base directory)")]
    pub roots: Vec<String>,

    /// Directory imports are resolved from
    #[arg(short = 'd', long, value_name = "DIR", help = "Directory that relative imports and vendor lookups start from (defaults to the current directory)")]
    pub base_dir: Option<PathBuf>,

    /// Ignore packages matching these patterns
    #[arg(short, long, value_name = "PATTERN", help = "Leave out packages matching this pattern (can be specified multiple times)")]
    pub ignore: Vec<String>,

    /// Only keep packages matching these patterns
    #[arg(long, value_name = "PATTERN", help = "Keep only packages matching one of these patterns (can be specified multiple times)")]
    pub include: Vec<String>,

    /// Read patterns as globs
    #[arg(long, help = "Read --ignore/--include patterns as shell globs matched against the whole import path instead of regular expressions")]
    pub glob: bool,

    /// Follow test imports
    #[arg(short, long, help = "Follow imports of _test.go files and count their lines")]
    pub tests: bool,

    /// Keep standard library packages
    #[arg(long, help = "Keep standard library packages in the graph")]
    pub stdlib: bool,

    /// Stop once any of these packages is reached
    #[arg(long, value_name = "PACKAGE", help = "Stop building as soon as this package is added (can be specified multiple times)")]
    pub stop_at: Vec<String>,

    /// Stop once the graph holds this many packages
    #[arg(long, value_name = "COUNT", help = "Stop building once the graph holds this many packages")]
    pub max_packages: Option<usize>,

    /// Go installation root
    #[arg(long, value_name = "DIR", help = "Go installation root (defaults to $GOROOT or `go env GOROOT`)")]
    pub goroot: Option<PathBuf>,

    /// Go workspace
    #[arg(long, value_name = "DIR", help = "Go workspace to search (can be specified multiple times, defaults to $GOPATH)")]
    pub gopath: Vec<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, value_enum, help = "Output format: 'text' for a readable listing, 'json' for machine processing (default: text)")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write output to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, help = "Suppress non-essential output (only show results)")]
    pub quiet: bool,

    /// Show debug information
    #[arg(short, long, help = "Show debug logging and the effective settings")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    /// Disable progress spinner
    #[arg(long, help = "Disable the progress spinner (useful for CI or when redirecting output)")]
    pub no_progress: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .depq.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.depq.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["depq"]);
        assert!(args.roots.is_empty());
        assert!(args.output.is_none());
        assert!(!args.tests);
        assert!(!args.init);
    }

    #[test]
    fn test_repeated_options() {
        let args = Args::parse_from([
            "depq", "a", "-i", "x", "--ignore", "y", "--stop-at", "s1", "--stop-at", "s2", "-o", "json",
        ]);
        assert_eq!(args.roots, vec!["a"]);
        assert_eq!(args.ignore, vec!["x", "y"]);
        assert_eq!(args.stop_at, vec!["s1", "s2"]);
        assert_eq!(args.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Args::try_parse_from(["depq", "--output", "csv"]).is_err());
    }
}
