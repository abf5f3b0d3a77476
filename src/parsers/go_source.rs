//! Go source file scanning
//!
//! Reads the package clause and import declarations of every buildable `.go`
//! file in a directory. Only the file header is examined; bodies are never
//! parsed.

use super::build_constraint::{file_constraint, Constraint, ConstraintError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

static PACKAGE_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*package\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

static TOP_LEVEL_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:func|type|var|const)\b").unwrap());

static IMPORT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s*(?:\(([^)]*)\)|(?:[A-Za-z_][A-Za-z0-9_]*\s*|\.\s*)?("[^"\n]*"|`[^`]*`))"#)
        .unwrap()
});

static IMPORT_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"\n]*)"|`([^`]*)`"#).unwrap());

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Operating systems that satisfy the `unix` build tag
const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

/// Operating system and architecture that file name suffixes are checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoTarget {
    pub goos: String,
    pub goarch: String,
    /// Whether the `cgo` tag holds and `import "C"` files are built
    pub cgo: bool,
}

impl GoTarget {
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
            cgo: true,
        }
    }

    pub fn with_cgo(mut self, cgo: bool) -> Self {
        self.cgo = cgo;
        self
    }

    /// The target matching the machine depq runs on
    pub fn host() -> Self {
        let goos = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        let goarch = match std::env::consts::ARCH {
            "x86_64" => "amd64",
            "x86" => "386",
            "aarch64" => "arm64",
            "powerpc64" => "ppc64",
            "wasm32" => "wasm",
            "loongarch64" => "loong64",
            other => other,
        };
        Self::new(goos, goarch)
    }

    fn matches_os(&self, goos: &str) -> bool {
        self.goos == goos
            || (goos == "linux" && self.goos == "android")
            || (goos == "solaris" && self.goos == "illumos")
            || (goos == "darwin" && self.goos == "ios")
    }

    /// Whether a build tag holds: the OS (and the OS it implies), the
    /// architecture, `unix`, `cgo` when enabled, `gc`, and any `go1.N`
    /// release tag. Everything else, `ignore` included, is unset.
    pub fn has_tag(&self, tag: &str) -> bool {
        if self.matches_os(tag) || self.goarch == tag || tag == "gc" {
            return true;
        }
        match tag {
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            "cgo" => self.cgo,
            _ => tag.strip_prefix("go1.").is_some_and(|minor| {
                !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit())
            }),
        }
    }

    /// Whether a file's build constraint, if any, allows it
    pub fn satisfies(&self, constraint: Option<&Constraint>) -> bool {
        constraint.map_or(true, |constraint| constraint.eval(&|tag: &str| self.has_tag(tag)))
    }

    /// Whether a file name's `_GOOS`, `_GOARCH` or `_GOOS_GOARCH` suffix allows it
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.strip_suffix(".go").unwrap_or(file_name);
        let stem = stem.strip_suffix("_test").unwrap_or(stem);
        let Some(underscore) = stem.find('_') else {
            return true;
        };

        let parts: Vec<&str> = stem[underscore..].split('_').collect();
        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.matches_os(parts[n - 2]) && self.goarch == parts[n - 1];
        }
        let last = parts[n - 1];
        if KNOWN_OS.contains(&last) {
            return self.matches_os(last);
        }
        if KNOWN_ARCH.contains(&last) {
            return self.goarch == last;
        }
        true
    }
}

impl Default for GoTarget {
    fn default() -> Self {
        Self::host()
    }
}

/// Header information of one Go source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoFileHeader {
    pub package_name: String,
    pub imports: Vec<String>,
}

impl GoFileHeader {
    pub fn is_cgo(&self) -> bool {
        self.imports.iter().any(|import| import == "C")
    }
}

/// Parse the package clause and imports of a Go source file.
///
/// Returns `None` when the file has no package clause.
pub fn parse_header(source: &str) -> Option<GoFileHeader> {
    let code = strip_comments(source);

    let clause = PACKAGE_CLAUSE.captures(&code)?;
    let package_name = clause[1].to_string();
    let after_clause = clause.get(0).map_or(0, |m| m.end());

    let rest = &code[after_clause..];
    let header_end = TOP_LEVEL_DECL.find(rest).map_or(rest.len(), |m| m.start());
    let header = &rest[..header_end];

    let mut imports = Vec::new();
    for decl in IMPORT_DECL.captures_iter(header) {
        if let Some(group) = decl.get(1) {
            imports.extend(import_paths(group.as_str()));
        } else if let Some(single) = decl.get(2) {
            imports.extend(import_paths(single.as_str()));
        }
    }

    Some(GoFileHeader {
        package_name,
        imports,
    })
}

fn import_paths(text: &str) -> impl Iterator<Item = String> + '_ {
    IMPORT_PATH.captures_iter(text).filter_map(|literal| {
        literal
            .get(1)
            .or_else(|| literal.get(2))
            .map(|path| path.as_str().to_string())
    })
}

/// Replace comments with whitespace, leaving string and rune literals intact.
/// Newlines are kept so line-anchored patterns still work.
fn strip_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Interpreted,
        Raw,
        Rune,
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                }
                '"' => {
                    out.push(c);
                    state = State::Interpreted;
                }
                '`' => {
                    out.push(c);
                    state = State::Raw;
                }
                '\'' => {
                    out.push(c);
                    state = State::Rune;
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::Interpreted | State::Rune => {
                out.push(c);
                let closing = if state == State::Interpreted { '"' } else { '\'' };
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == closing || c == '\n' {
                    state = State::Code;
                }
            }
            State::Raw => {
                out.push(c);
                if c == '`' {
                    state = State::Code;
                }
            }
        }
    }

    out
}

/// Buildable Go files of one directory, grouped the way `go build` sees them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedPackage {
    pub name: String,
    pub dir: PathBuf,
    /// Non-test files without `import "C"`
    pub go_files: Vec<String>,
    /// Non-test files importing "C"
    pub cgo_files: Vec<String>,
    /// `_test.go` files in the package itself
    pub test_go_files: Vec<String>,
    /// `_test.go` files in the external `<name>_test` package
    pub xtest_go_files: Vec<String>,
    pub imports: Vec<String>,
    pub test_imports: Vec<String>,
    pub xtest_imports: Vec<String>,
}

impl ScannedPackage {
    pub fn is_empty(&self) -> bool {
        self.go_files.is_empty()
            && self.cgo_files.is_empty()
            && self.test_go_files.is_empty()
            && self.xtest_go_files.is_empty()
    }
}

/// Error raised while scanning a package directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Non-test files disagree on the package name
    #[error("found packages {} ({}) and {} ({})", first.0, first.1, second.0, second.1)]
    MultiplePackages {
        first: (String, String),
        second: (String, String),
    },

    /// A file has no package clause
    #[error("{file}: expected 'package' clause")]
    MissingPackageClause { file: String },

    /// A `//go:build` or `// +build` line does not parse
    #[error("{file}: {source}")]
    InvalidConstraint {
        file: String,
        #[source]
        source: ConstraintError,
    },
}

/// Scan the `.go` files directly inside `dir`
pub fn scan_package_dir(dir: &Path, target: &GoTarget) -> Result<ScannedPackage, ScanError> {
    let mut scanned = ScannedPackage {
        dir: dir.to_path_buf(),
        ..Default::default()
    };
    let mut name_source: Option<String> = None;
    let mut imports = BTreeSet::new();
    let mut test_imports = BTreeSet::new();
    let mut xtest_imports = BTreeSet::new();

    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = entry.map_err(|err| ScanError::Io {
            path: dir.to_path_buf(),
            source: err.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !is_go_source_name(&file_name) || !target.matches_file_name(&file_name) {
            continue;
        }

        let bytes = fs::read(entry.path()).map_err(|source| ScanError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        let source = String::from_utf8_lossy(&bytes);
        let constraint = file_constraint(&source).map_err(|source| ScanError::InvalidConstraint {
            file: file_name.clone(),
            source,
        })?;
        if !target.satisfies(constraint.as_ref()) {
            continue;
        }
        let header = parse_header(&source).ok_or_else(|| ScanError::MissingPackageClause {
            file: file_name.clone(),
        })?;
        if header.is_cgo() && !target.cgo {
            continue;
        }

        let is_test = file_name.ends_with("_test.go");
        let is_xtest = is_test && header.package_name.ends_with("_test");

        if !is_xtest {
            match &name_source {
                None => {
                    scanned.name = header.package_name.clone();
                    name_source = Some(file_name.clone());
                }
                Some(first_file) if scanned.name != header.package_name => {
                    return Err(ScanError::MultiplePackages {
                        first: (scanned.name.clone(), first_file.clone()),
                        second: (header.package_name.clone(), file_name),
                    });
                }
                Some(_) => {}
            }
        }

        if is_xtest {
            xtest_imports.extend(header.imports.iter().cloned());
            scanned.xtest_go_files.push(file_name);
        } else if is_test {
            test_imports.extend(header.imports.iter().cloned());
            scanned.test_go_files.push(file_name);
        } else {
            imports.extend(header.imports.iter().cloned());
            if header.is_cgo() {
                scanned.cgo_files.push(file_name);
            } else {
                scanned.go_files.push(file_name);
            }
        }
    }

    scanned.imports = imports.into_iter().collect();
    scanned.test_imports = test_imports.into_iter().collect();
    scanned.xtest_imports = xtest_imports.into_iter().collect();
    Ok(scanned)
}

/// Whether a directory holds at least one `.go` file
pub fn has_go_files(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|entries| {
            entries.flatten().any(|entry| {
                entry.file_type().map(|t| t.is_file()).unwrap_or(false)
                    && is_go_source_name(&entry.file_name().to_string_lossy())
            })
        })
        .unwrap_or(false)
}

fn is_go_source_name(file_name: &str) -> bool {
    file_name.ends_with(".go") && !file_name.starts_with('_') && !file_name.starts_with('.')
}
