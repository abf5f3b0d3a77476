//! Command implementations

use std::path::PathBuf;

use super::Args;
use crate::config::{self, file::DEFAULT_CONFIG_FILE, CliArgs};
use crate::core::{termination, DependencyBuilder, GoMetadataProvider, PackageFilter};
use crate::error::{ErrorSeverity, Result};
use crate::models::{Dependencies, Settings};
use crate::output::{create_formatter, create_writer, ProgressReporter};
use crate::utils::path_resolver::{detect_gopath, detect_goroot, PathResolver};
use tracing_subscriber::EnvFilter;

/// Root used when none is configured: the package in the base directory
const DEFAULT_ROOT: &str = ".";

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Build and print the dependency graph
    Build(Args),
    /// Initialize a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }
        Command::Build(args)
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Build(args) => {
                // Installed first so configuration loading is logged too
                init_logging(args.verbose);
                let settings = config::load_config(CliArgs::from(args))?;
                tracing::debug!(?settings, "effective settings");

                let deps = build_dependencies(&settings)?;
                write_output(&settings, &deps)
            }
            Command::Init => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);

                if config_path.exists() {
                    println!("Configuration file already exists at: {}", config_path.display());
                    println!("To overwrite it, delete the file first and run this command again.");
                    return Ok(());
                }

                config::create_default_config(&config_path)?;

                println!("Created default configuration file at: {}", config_path.display());
                println!("\nEvery setting in it is commented out. Uncomment and edit the ones you need:");
                println!("  - roots: import paths to start from");
                println!("  - ignore_patterns / include_patterns: which packages to keep");
                println!("  - include_tests / include_stdlib: follow test imports, keep the standard library");
                println!("  - stop_at / max_packages: stop the build early");

                Ok(())
            }
        }
    }

    /// Run the command and handle errors, returning the process exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                if let Some(suggestion) = err.suggestion() {
                    eprintln!("Suggestion: {}", suggestion);
                }

                match err.severity() {
                    ErrorSeverity::Warning => 0,
                    ErrorSeverity::Error => 1,
                    ErrorSeverity::Critical => 2,
                }
            }
        }
    }
}

/// Walk the configured roots through the Go toolchain layout
pub fn build_dependencies(settings: &Settings) -> Result<Dependencies> {
    let goroot = settings.goroot.clone().or_else(detect_goroot);
    let gopath = if settings.gopath.is_empty() {
        detect_gopath()
    } else {
        settings.gopath.clone()
    };
    if goroot.is_none() {
        tracing::warn!("GOROOT not found; standard library imports will not resolve");
    }
    let provider = GoMetadataProvider::new(PathResolver::new(goroot, gopath));

    let filter = PackageFilter::from_patterns(
        &settings.ignore_patterns,
        &settings.include_patterns,
        settings.pattern_syntax,
        settings.include_stdlib,
    )?;

    let roots = if settings.roots.is_empty() {
        vec![DEFAULT_ROOT.to_string()]
    } else {
        settings.roots.clone()
    };

    let reporter = ProgressReporter::new(
        settings.quiet,
        settings.verbose,
        settings.use_colors,
        settings.show_progress,
    );

    let builder = DependencyBuilder::new(&provider)
        .with_base_dir(settings.base_dir.to_string_lossy())
        .with_roots(roots)
        .with_filter(filter)
        .with_tests(settings.include_tests)
        .with_termination_conditions(termination::from_settings(settings))
        .with_diagnostics(&reporter);

    reporter.start("Resolving packages");
    let result = builder.build();
    reporter.finish();

    let deps = result?;
    reporter.print_verbose(&format!(
        "Visited {} packages, ignored {}",
        reporter.visited(),
        deps.ignored.len()
    ));
    Ok(deps)
}

fn write_output(settings: &Settings, deps: &Dependencies) -> Result<()> {
    // Colors only make sense on a terminal
    let use_colors = settings.use_colors && settings.output_file.is_none();
    let formatter = create_formatter(
        settings.output_format,
        use_colors,
        settings.verbose,
        settings.quiet,
    );
    let output = formatter.format(deps)?;

    create_writer(settings.output_file.as_ref()).write(&output)?;

    if let Some(path) = &settings.output_file {
        if !settings.quiet {
            eprintln!("Wrote {} packages to {}", deps.node_count(), path.display());
        }
    }
    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "depq=debug" } else { "depq=warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init();
}
