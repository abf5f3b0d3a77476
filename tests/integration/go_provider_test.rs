use std::fs;
use std::path::Path;

use depq::core::diagnostics::RecordingDiagnostics;
use depq::core::{DependencyBuilder, GoMetadataProvider, MetadataProvider, PackageFilter};
use depq::models::PatternSyntax;
use depq::parsers::GoTarget;
use depq::utils::PathResolver;
use depq::{Dependencies, Package};
use tempfile::{tempdir, TempDir};

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A GOROOT with `fmt` and `errors`, and a GOPATH holding a project with a
/// vendored library, a cgo package and tests
struct Workspace {
    goroot: TempDir,
    gopath: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let goroot = tempdir().unwrap();
        let gopath = tempdir().unwrap();

        let std = goroot.path().join("src");
        write(&std.join("fmt/print.go"), "package fmt\n\nimport \"errors\"\n\nfunc Println() {}\n");
        write(&std.join("errors/errors.go"), "package errors\n\nfunc New() {}\n");
        write(&std.join("testing/testing.go"), "package testing\n");

        let app = gopath.path().join("src/example.com/app");
        write(
            &app.join("main.go"),
            "package main\n\nimport (\n\t\"fmt\"\n\n\t\"example.com/app/store\"\n\t\"lib/x\"\n)\n\nfunc main() {\n\tfmt.Println()\n}\n",
        );
        write(
            &app.join("main_test.go"),
            "package main\n\nimport (\n\t\"testing\"\n\t\"example.com/testutil\"\n)\n",
        );
        write(
            &app.join("store/store.go"),
            "package store\n\n// #include <sqlite3.h>\nimport \"C\"\n\nimport \"lib/x\"\n",
        );
        write(
            &app.join("store/store_windows.go"),
            "package store\n\nimport \"example.com/winonly\"\n",
        );
        write(
            &app.join("store/sys.go"),
            "//go:build windows\n\npackage store\n\nimport \"example.com/winsys\"\n",
        );
        write(
            &app.join("store/notlinux.go"),
            "// +build !linux\n\npackage store\n\nimport \"example.com/elsewhere\"\n",
        );
        write(&app.join("vendor/lib/x/x.go"), "package x\n\nconst X = 1\n");
        write(
            &gopath.path().join("src/example.com/testutil/util.go"),
            "package testutil\n",
        );

        Self { goroot, gopath }
    }

    fn app_dir(&self) -> std::path::PathBuf {
        self.gopath.path().join("src/example.com/app")
    }

    fn provider(&self) -> GoMetadataProvider {
        GoMetadataProvider::new(PathResolver::new(
            Some(self.goroot.path().to_path_buf()),
            vec![self.gopath.path().to_path_buf()],
        ))
        .with_target(GoTarget::new("linux", "amd64"))
    }

    fn base_dir(&self) -> String {
        self.app_dir().to_string_lossy().to_string()
    }
}

fn edges(deps: &Dependencies, pkg: &str) -> Vec<String> {
    deps.forward
        .edges(pkg)
        .map(|set| set.iter().map(Package::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn test_project_graph_without_stdlib() {
    let workspace = Workspace::new();
    let provider = workspace.provider();

    let deps = DependencyBuilder::new(&provider)
        .with_base_dir(workspace.base_dir())
        .with_roots(["example.com/app"])
        .build()
        .unwrap();

    assert_eq!(
        deps.forward.packages().map(Package::as_str).collect::<Vec<_>>(),
        vec!["example.com/app", "example.com/app/store", "lib/x"]
    );
    assert_eq!(edges(&deps, "example.com/app"), vec!["example.com/app/store", "lib/x"]);
    assert_eq!(edges(&deps, "example.com/app/store"), vec!["lib/x"]);
    assert!(deps.ignored.contains("fmt"));
    assert!(!deps.contains("example.com/winonly"));

    // main.go has 12 lines; the test file is not counted
    assert_eq!(deps.info["example.com/app"].lines_of_code, 12);
    assert_eq!(deps.info["lib/x"].lines_of_code, 3);
}

#[test]
fn test_stdlib_and_tests_included() {
    let workspace = Workspace::new();
    let provider = workspace.provider();

    let deps = DependencyBuilder::new(&provider)
        .with_base_dir(workspace.base_dir())
        .with_roots(["example.com/app"])
        .with_filter(PackageFilter::new().with_system_library(true))
        .with_tests(true)
        .build()
        .unwrap();

    assert_eq!(
        edges(&deps, "example.com/app"),
        vec![
            "example.com/app/store",
            "fmt",
            "lib/x",
            "example.com/testutil",
            "testing"
        ]
    );
    assert_eq!(edges(&deps, "fmt"), vec!["errors"]);
    assert!(deps.contains("errors"));
    // main.go plus main_test.go
    assert_eq!(deps.info["example.com/app"].lines_of_code, 12 + 6);
}

#[test]
fn test_platform_gated_files_are_not_followed() {
    let workspace = Workspace::new();
    let provider = workspace.provider();

    let deps = DependencyBuilder::new(&provider)
        .with_base_dir(workspace.base_dir())
        .with_roots(["example.com/app/store"])
        .build()
        .unwrap();

    assert_eq!(edges(&deps, "example.com/app/store"), vec!["lib/x"]);

    // The same files are followed for a windows target, and their imports
    // do not exist in this tree
    let windows = GoMetadataProvider::new(PathResolver::new(
        Some(workspace.goroot.path().to_path_buf()),
        vec![workspace.gopath.path().to_path_buf()],
    ))
    .with_target(GoTarget::new("windows", "amd64"));
    let err = DependencyBuilder::new(&windows)
        .with_base_dir(workspace.base_dir())
        .with_roots(["example.com/app/store"])
        .build()
        .unwrap_err();
    assert!(err.is_resolution_failure());
}

#[test]
fn test_local_root_resolves_against_base_dir() {
    let workspace = Workspace::new();
    let provider = workspace.provider();

    let deps = DependencyBuilder::new(&provider)
        .with_base_dir(workspace.base_dir())
        .with_roots([".", "./store"])
        .build()
        .unwrap();

    assert!(deps.contains("example.com/app"));
    assert!(deps.contains("example.com/app/store"));
    assert_eq!(deps.node_count(), 3);
}

#[test]
fn test_glob_include_filter() {
    let workspace = Workspace::new();
    let provider = workspace.provider();
    let filter =
        PackageFilter::from_patterns(&[] as &[&str], &["example.com/*"], PatternSyntax::Glob, false)
            .unwrap();

    let deps = DependencyBuilder::new(&provider)
        .with_base_dir(workspace.base_dir())
        .with_roots(["example.com/app"])
        .with_filter(filter)
        .build()
        .unwrap();

    assert_eq!(edges(&deps, "example.com/app"), vec!["example.com/app/store"]);
    assert!(deps.ignored.contains("lib/x"));
}

#[test]
fn test_missing_package_is_fatal() {
    let workspace = Workspace::new();
    write(
        &workspace.app_dir().join("broken/broken.go"),
        "package broken\n\nimport \"example.com/nowhere\"\n",
    );
    let provider = workspace.provider();

    let err = DependencyBuilder::new(&provider)
        .with_base_dir(workspace.base_dir())
        .with_roots(["example.com/app/broken"])
        .build()
        .unwrap_err();

    assert!(err.is_resolution_failure());
    assert!(err.to_string().contains("example.com/nowhere"));
}

#[test]
fn test_unreadable_sources_are_reported() {
    let workspace = Workspace::new();
    let provider = workspace.provider();

    // Metadata is resolved first; the file disappears before lines are counted
    let mut metadata = provider
        .resolve("example.com/testutil", &workspace.base_dir())
        .unwrap();
    let missing = metadata.dir.join("gone.go");
    metadata.source_files.push(missing.clone());

    let recorder = RecordingDiagnostics::new();
    let static_provider = depq::StaticMetadataProvider::new().with_package(metadata);
    let deps = DependencyBuilder::new(&static_provider)
        .with_roots(["example.com/testutil"])
        .with_diagnostics(&recorder)
        .build()
        .unwrap();

    assert_eq!(recorder.unreadable_sources(), vec![missing]);
    assert_eq!(deps.info["example.com/testutil"].lines_of_code, 1);
}
