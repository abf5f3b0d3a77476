use std::cell::RefCell;
use std::collections::HashMap;

use depq::core::diagnostics::{Diagnostic, RecordingDiagnostics};
use depq::core::termination::{node_count_at_least, package_reached};
use depq::core::{
    DependencyBuilder, MetadataProvider, PackageFilter, PackageMetadata, StaticMetadataProvider,
};
use depq::models::PatternSyntax;
use depq::{Dependencies, Package, Result};

/// Counts how often each import path is resolved
struct CountingProvider {
    inner: StaticMetadataProvider,
    calls: RefCell<HashMap<String, usize>>,
}

impl CountingProvider {
    fn new(inner: StaticMetadataProvider) -> Self {
        Self {
            inner,
            calls: RefCell::new(HashMap::new()),
        }
    }

    fn calls(&self, import_path: &str) -> usize {
        self.calls.borrow().get(import_path).copied().unwrap_or(0)
    }
}

impl MetadataProvider for CountingProvider {
    fn resolve(&self, import_path: &str, base_dir: &str) -> Result<PackageMetadata> {
        *self.calls.borrow_mut().entry(import_path.to_string()).or_default() += 1;
        self.inner.resolve(import_path, base_dir)
    }
}

fn graph(packages: &[(&str, &[&str])]) -> StaticMetadataProvider {
    let mut provider = StaticMetadataProvider::new();
    for (name, imports) in packages {
        provider.insert(PackageMetadata::new(*name).with_imports(imports.iter().copied()));
    }
    provider
}

fn edges(deps: &Dependencies, pkg: &str) -> Vec<String> {
    deps.forward
        .edges(pkg)
        .map(|set| set.iter().map(Package::to_string).collect())
        .unwrap_or_default()
}

fn nodes(deps: &Dependencies) -> Vec<&str> {
    deps.forward.packages().map(Package::as_str).collect()
}

#[test]
fn test_mutual_imports_resolve_each_package_once() {
    let provider = CountingProvider::new(graph(&[("A", &["B"]), ("B", &["A"])]));

    let deps = DependencyBuilder::new(&provider)
        .with_roots(["A"])
        .build()
        .unwrap();

    assert_eq!(nodes(&deps), vec!["A", "B"]);
    assert_eq!(edges(&deps, "A"), vec!["B"]);
    assert_eq!(edges(&deps, "B"), vec!["A"]);
    // A is resolved again when B imports it, but measured only once
    assert_eq!(provider.calls("B"), 1);
    assert_eq!(deps.info.len(), 2);
}

#[test]
fn test_diamond_shares_nodes() {
    let provider = CountingProvider::new(graph(&[
        ("app", &["left", "right"]),
        ("left", &["base"]),
        ("right", &["base"]),
        ("base", &[]),
    ]));
    let recorder = RecordingDiagnostics::new();

    let deps = DependencyBuilder::new(&provider)
        .with_roots(["app"])
        .with_diagnostics(&recorder)
        .build()
        .unwrap();

    assert_eq!(nodes(&deps), vec!["app", "left", "base", "right"]);
    assert_eq!(edges(&deps, "right"), vec!["base"]);

    let visited: Vec<Diagnostic> = recorder.events();
    assert_eq!(
        visited,
        ["app", "left", "base", "right"]
            .iter()
            .map(|name| Diagnostic::PackageVisited(Package::from(*name)))
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_repeated_roots_are_visited_once() {
    let provider = graph(&[("a", &["b"]), ("b", &[])]);
    let recorder = RecordingDiagnostics::new();

    let deps = DependencyBuilder::new(&provider)
        .with_roots(["a", "b", "a"])
        .with_diagnostics(&recorder)
        .build()
        .unwrap();

    assert_eq!(nodes(&deps), vec!["a", "b"]);
    assert!(recorder.ignored_roots().is_empty());
}

#[test]
fn test_self_import_is_dropped() {
    let provider = graph(&[("A", &["A"])]);
    let deps = DependencyBuilder::new(&provider)
        .with_roots(["A"])
        .build()
        .unwrap();

    assert_eq!(nodes(&deps), vec!["A"]);
    assert!(edges(&deps, "A").is_empty());
    assert!(deps.forward.cycles().is_empty());
}

#[test]
fn test_cgo_pseudo_import_is_never_resolved() {
    let provider = CountingProvider::new(graph(&[("A", &["C"])]));
    let deps = DependencyBuilder::new(&provider)
        .with_roots(["A"])
        .build()
        .unwrap();

    assert_eq!(provider.calls("C"), 0);
    assert!(edges(&deps, "A").is_empty());
    assert!(deps.ignored.is_empty());
}

#[test]
fn test_node_count_termination_on_chain() {
    let provider = CountingProvider::new(graph(&[
        ("root", &["A"]),
        ("A", &["B"]),
        ("B", &["C"]),
        ("C", &[]),
    ]));

    let deps = DependencyBuilder::new(&provider)
        .with_roots(["root"])
        .with_termination_condition(node_count_at_least(2))
        .build()
        .unwrap();

    assert_eq!(nodes(&deps), vec!["root", "A"]);
    assert_eq!(provider.calls("B"), 0);
    assert_eq!(provider.calls("C"), 0);
}

#[test]
fn test_termination_stops_remaining_roots() {
    let provider = CountingProvider::new(graph(&[("one", &[]), ("two", &[])]));

    let deps = DependencyBuilder::new(&provider)
        .with_roots(["one", "two"])
        .with_termination_condition(package_reached("one"))
        .build()
        .unwrap();

    assert_eq!(nodes(&deps), vec!["one"]);
    assert_eq!(provider.calls("two"), 0);
}

#[test]
fn test_ignored_root_warns_and_continues() {
    let provider = graph(&[("example.com/skip", &[]), ("example.com/keep", &[])]);
    let filter = PackageFilter::from_patterns(&["skip"], &[], PatternSyntax::Regex, false).unwrap();
    let recorder = RecordingDiagnostics::new();

    let deps = DependencyBuilder::new(&provider)
        .with_roots(["example.com/skip", "example.com/keep"])
        .with_filter(filter)
        .with_diagnostics(&recorder)
        .build()
        .unwrap();

    assert_eq!(recorder.ignored_roots(), vec!["example.com/skip"]);
    assert_eq!(nodes(&deps), vec!["example.com/keep"]);
    assert!(deps.ignored.contains("example.com/skip"));
}

#[test]
fn test_ignore_pattern_wins_over_include() {
    let provider = graph(&[
        ("example.com/app", &["example.com/app/internal/db", "example.com/app/api"]),
        ("example.com/app/internal/db", &[]),
        ("example.com/app/api", &[]),
    ]);
    let filter = PackageFilter::from_patterns(
        &["/internal/"],
        &["^example\\.com/"],
        PatternSyntax::Regex,
        false,
    )
    .unwrap();

    let deps = DependencyBuilder::new(&provider)
        .with_roots(["example.com/app"])
        .with_filter(filter)
        .build()
        .unwrap();

    assert_eq!(edges(&deps, "example.com/app"), vec!["example.com/app/api"]);
    assert!(deps.ignored.contains("example.com/app/internal/db"));
    assert!(!deps.contains("example.com/app/internal/db"));
}

#[test]
fn test_edges_only_point_at_nodes() {
    let provider = graph(&[
        ("app", &["lib", "skip/me", "C"]),
        ("lib", &["skip/too"]),
        ("skip/me", &[]),
        ("skip/too", &[]),
    ]);
    let filter =
        PackageFilter::from_patterns(&["^skip/"], &[], PatternSyntax::Regex, false).unwrap();

    let deps = DependencyBuilder::new(&provider)
        .with_roots(["app"])
        .with_filter(filter)
        .build()
        .unwrap();

    for (_, targets) in deps.forward.iter() {
        for target in targets {
            assert!(deps.contains(target.as_str()), "dangling edge to {}", target);
            assert!(!deps.ignored.contains(target.as_str()));
        }
    }
    assert_eq!(deps.ignored.len(), 2);
}

#[test]
fn test_resolution_failure_fails_whole_build() {
    let provider = graph(&[("app", &["lib", "missing"]), ("lib", &[])]);

    let err = DependencyBuilder::new(&provider)
        .with_roots(["app"])
        .with_base_dir("/work")
        .build()
        .unwrap_err();

    assert!(err.is_resolution_failure());
    assert!(err.to_string().contains("\"missing\""));
    assert!(err.to_string().contains("/work"));
}

#[test]
fn test_resolution_failure_of_rejected_package_is_still_fatal() {
    // Filtering needs metadata, so an unresolvable import fails even if it
    // would have been ignored
    let provider = graph(&[("app", &["ignored/missing"])]);
    let filter =
        PackageFilter::from_patterns(&["^ignored/"], &[], PatternSyntax::Regex, false).unwrap();

    let err = DependencyBuilder::new(&provider)
        .with_roots(["app"])
        .with_filter(filter)
        .build()
        .unwrap_err();
    assert!(err.is_resolution_failure());
}

#[test]
fn test_vendored_copies_collapse() {
    let mut provider = StaticMetadataProvider::new()
        .with_package(PackageMetadata::new("proj/a").with_imports(["lib/x"]))
        .with_package(PackageMetadata::new("proj/b").with_imports(["lib/x"]));
    provider.insert_alias("lib/x", PackageMetadata::new("proj/vendor/lib/x"));

    let deps = DependencyBuilder::new(&provider)
        .with_roots(["proj/a", "proj/b"])
        .build()
        .unwrap();

    assert_eq!(nodes(&deps), vec!["proj/a", "lib/x", "proj/b"]);
    assert_eq!(edges(&deps, "proj/a"), vec!["lib/x"]);
    assert_eq!(edges(&deps, "proj/b"), vec!["lib/x"]);
}
