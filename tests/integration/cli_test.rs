use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::Parser;
use depq::cli::args::{Args, OutputFormat as CliOutputFormat};
use depq::cli::commands::build_dependencies;
use depq::cli::Command;
use depq::config::{load_config_with_env_prefix, CliArgs};
use depq::models::{OutputFormat, Settings};
use depq::output::create_formatter;
use depq::Dependencies;
use tempfile::{tempdir, TempDir};

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// GOROOT with `fmt`; GOPATH with `example.com/tool` importing its own
/// `internal/run` package and `fmt`
fn go_tree() -> (TempDir, TempDir) {
    let goroot = tempdir().unwrap();
    let gopath = tempdir().unwrap();

    write(&goroot.path().join("src/fmt/print.go"), "package fmt\n");
    let tool = gopath.path().join("src/example.com/tool");
    write(
        &tool.join("main.go"),
        "package main\n\nimport (\n\t\"fmt\"\n\t\"example.com/tool/internal/run\"\n)\n",
    );
    write(&tool.join("internal/run/run.go"), "package run\n\nimport \"fmt\"\n");

    (goroot, gopath)
}

fn settings_for(goroot: &TempDir, gopath: &TempDir) -> Settings {
    Settings {
        base_dir: gopath.path().join("src/example.com/tool"),
        goroot: Some(goroot.path().to_path_buf()),
        gopath: vec![gopath.path().to_path_buf()],
        quiet: true,
        show_progress: false,
        use_colors: false,
        ..Settings::default()
    }
}

fn node_names(deps: &Dependencies) -> Vec<String> {
    deps.forward.packages().map(ToString::to_string).collect()
}

#[test]
fn test_cli_args_parsing() {
    let args = Args::parse_from(["depq"]);
    assert!(args.roots.is_empty());
    assert!(args.ignore.is_empty());
    assert_eq!(args.max_packages, None);
    assert_eq!(args.output, None);
    assert!(!args.glob);

    let args = Args::parse_from([
        "depq",
        "example.com/tool",
        "example.com/other",
        "--base-dir",
        "/work",
        "--ignore",
        "^golang.org/",
        "-i",
        "/testdata/",
        "--stop-at",
        "example.com/lib",
        "--max-packages",
        "50",
        "--gopath",
        "/go",
        "--gopath",
        "/go2",
        "--output",
        "json",
        "--output-file",
        "graph.json",
        "--tests",
        "--stdlib",
    ]);

    assert_eq!(args.roots, vec!["example.com/tool", "example.com/other"]);
    assert_eq!(args.base_dir, Some(PathBuf::from("/work")));
    assert_eq!(args.ignore, vec!["^golang.org/", "/testdata/"]);
    assert_eq!(args.stop_at, vec!["example.com/lib"]);
    assert_eq!(args.max_packages, Some(50));
    assert_eq!(args.gopath, vec![PathBuf::from("/go"), PathBuf::from("/go2")]);
    assert_eq!(args.output, Some(CliOutputFormat::Json));
    assert_eq!(args.output_file, Some(PathBuf::from("graph.json")));
    assert!(args.tests);
    assert!(args.stdlib);
}

#[test]
fn test_init_flag_selects_init_command() {
    let args = Args::parse_from(["depq", "--init"]);
    assert!(matches!(Command::from_args(args), Command::Init));

    let args = Args::parse_from(["depq", "example.com/tool"]);
    assert!(matches!(Command::from_args(args), Command::Build(_)));
}

#[test]
fn test_build_defaults_to_base_dir_package() {
    let (goroot, gopath) = go_tree();
    let settings = settings_for(&goroot, &gopath);

    let deps = build_dependencies(&settings).unwrap();

    assert_eq!(node_names(&deps), vec!["example.com/tool", "example.com/tool/internal/run"]);
    assert!(deps.ignored.contains("fmt"));
}

#[test]
fn test_build_with_stdlib_and_limit() {
    let (goroot, gopath) = go_tree();
    let settings = Settings {
        roots: vec!["example.com/tool".to_string()],
        include_stdlib: true,
        max_packages: Some(2),
        ..settings_for(&goroot, &gopath)
    };

    let deps = build_dependencies(&settings).unwrap();

    // Imports are visited in sorted order, so fmt is never reached
    assert_eq!(node_names(&deps), vec!["example.com/tool", "example.com/tool/internal/run"]);
    assert!(!deps.ignored.contains("fmt"));
}

#[test]
fn test_build_stop_at() {
    let (goroot, gopath) = go_tree();
    let settings = Settings {
        stop_at: vec!["example.com/tool/internal/run".to_string()],
        ..settings_for(&goroot, &gopath)
    };

    let deps = build_dependencies(&settings).unwrap();
    assert!(deps.contains("example.com/tool/internal/run"));
    // Stopped before the edge from the root was recorded
    assert!(deps.forward.edges("example.com/tool").unwrap().is_empty());
}

#[test]
fn test_build_unknown_root_fails() {
    let (goroot, gopath) = go_tree();
    let settings = Settings {
        roots: vec!["example.com/missing".to_string()],
        ..settings_for(&goroot, &gopath)
    };

    let err = build_dependencies(&settings).unwrap_err();
    assert!(err.is_resolution_failure());
}

#[test]
fn test_args_through_config_to_json() {
    let (goroot, gopath) = go_tree();
    let base_dir = gopath.path().join("src/example.com/tool");
    let args = Args::parse_from([
        "depq".to_string(),
        "--base-dir".to_string(),
        base_dir.display().to_string(),
        "--goroot".to_string(),
        goroot.path().display().to_string(),
        "--gopath".to_string(),
        gopath.path().display().to_string(),
        "--ignore".to_string(),
        "internal".to_string(),
        "--output".to_string(),
        "json".to_string(),
        "--quiet".to_string(),
        "--no-progress".to_string(),
    ]);

    let settings = load_config_with_env_prefix(CliArgs::from(&args), "DEPQ_CLI_TEST").unwrap();
    assert_eq!(settings.output_format, OutputFormat::Json);
    assert_eq!(settings.ignore_patterns, vec!["internal"]);

    let deps = build_dependencies(&settings).unwrap();
    let output = create_formatter(settings.output_format, false, false, true)
        .format(&deps)
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json["forward"]["example.com/tool"], serde_json::json!([]));
    assert_eq!(
        json["ignored"],
        serde_json::json!(["example.com/tool/internal/run", "fmt"])
    );
    assert_eq!(json["info"]["example.com/tool"]["lines_of_code"], 6);
}

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_config_loading_is_logged() {
    let (goroot, gopath) = go_tree();
    let args = Args::parse_from([
        "depq".to_string(),
        "--goroot".to_string(),
        goroot.path().display().to_string(),
        "--gopath".to_string(),
        gopath.path().display().to_string(),
        "--verbose".to_string(),
    ]);

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_env_filter("depq=debug")
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        load_config_with_env_prefix(CliArgs::from(&args), "DEPQ_LOG_TEST").unwrap();
    });

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("loading configuration"), "{}", output);
    assert!(output.contains("command-line arguments"), "{}", output);
}
