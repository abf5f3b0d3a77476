//! Go import path resolution utilities
//!
//! Maps an import path to a package directory the way the GOPATH-mode Go
//! toolchain does: local `./` imports, then `vendor/` directories from the
//! importing directory upwards, then `$GOROOT/src`, then each `$GOPATH/src`.

use crate::error::{DepqError, Result};
use crate::parsers::go_source::has_go_files;
use path_clean::PathClean;
use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

/// Where an import path was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    /// Directory holding the package sources
    pub dir: PathBuf,
    /// Full import path, including any `vendor/` segment
    pub import_path: String,
    /// Found under `$GOROOT/src`
    pub is_goroot: bool,
}

/// A `src` tree searched for packages
#[derive(Debug, Clone)]
struct SrcRoot {
    /// The GOROOT or GOPATH entry itself
    root: PathBuf,
    is_goroot: bool,
}

impl SrcRoot {
    fn src(&self) -> PathBuf {
        self.root.join("src")
    }
}

/// Path resolver for GOROOT/GOPATH layouts
pub struct PathResolver {
    goroot: Option<PathBuf>,
    gopath: Vec<PathBuf>,
    dir_exists_cache: RefCell<HashMap<PathBuf, bool>>,
}

impl PathResolver {
    /// Create a resolver over explicit roots
    pub fn new(goroot: Option<PathBuf>, gopath: Vec<PathBuf>) -> Self {
        Self {
            goroot: goroot.map(|path| absolute(&path)),
            gopath: gopath.iter().map(|path| absolute(path)).collect(),
            dir_exists_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Create a resolver from `GOROOT`/`GOPATH`, falling back to
    /// `go env GOROOT` and `~/go`
    pub fn from_env() -> Self {
        Self::new(detect_goroot(), detect_gopath())
    }

    pub fn goroot(&self) -> Option<&Path> {
        self.goroot.as_deref()
    }

    pub fn gopath(&self) -> &[PathBuf] {
        &self.gopath
    }

    fn roots(&self) -> Vec<SrcRoot> {
        let goroot = self.goroot.iter().map(|root| SrcRoot {
            root: root.clone(),
            is_goroot: true,
        });
        let gopath = self.gopath.iter().map(|root| SrcRoot {
            root: root.clone(),
            is_goroot: false,
        });
        goroot.chain(gopath).collect()
    }

    /// Resolve `import_path` as imported from code in `src_dir`
    pub fn resolve(&self, import_path: &str, src_dir: &Path) -> Result<ResolvedImport> {
        let fail = |message: String| {
            DepqError::resolution_error(import_path, src_dir.display().to_string(), message)
        };

        if import_path.is_empty() {
            return Err(fail("import path is empty".to_string()));
        }
        if import_path.starts_with('/') || Path::new(import_path).is_absolute() {
            return Err(fail("import path cannot be absolute".to_string()));
        }

        let src_dir = absolute(src_dir);

        if is_local_import(import_path) {
            let dir = src_dir.join(import_path).clean();
            if !self.is_dir(&dir) {
                return Err(fail(format!("cannot find package in {}", dir.display())));
            }
            let (import_path, is_goroot) = self.import_path_for_dir(&dir);
            return Ok(ResolvedImport {
                dir,
                import_path,
                is_goroot,
            });
        }

        if let Some(found) = self.search_vendor(import_path, &src_dir) {
            return Ok(found);
        }

        let mut searched = Vec::new();
        for root in self.roots() {
            let dir = root.src().join(import_path);
            if self.is_dir(&dir) {
                return Ok(ResolvedImport {
                    dir,
                    import_path: import_path.to_string(),
                    is_goroot: root.is_goroot,
                });
            }
            let label = if root.is_goroot { "from $GOROOT" } else { "from $GOPATH" };
            searched.push(format!("\t{} ({})", dir.display(), label));
        }

        if searched.is_empty() {
            return Err(fail("cannot find package: neither GOROOT nor GOPATH is set".to_string()));
        }
        Err(fail(format!(
            "cannot find package in any of:\n{}",
            searched.join("\n")
        )))
    }

    /// Look for `vendor/<import_path>` in `src_dir` and each parent up to the
    /// `src` directory of the tree containing it
    fn search_vendor(&self, import_path: &str, src_dir: &Path) -> Option<ResolvedImport> {
        for root in self.roots() {
            let Ok(sub) = src_dir.strip_prefix(&root.root) else {
                continue;
            };
            let segments: Vec<String> = sub
                .components()
                .filter_map(|component| match component {
                    Component::Normal(segment) => Some(segment.to_string_lossy().to_string()),
                    _ => None,
                })
                .collect();
            // Only code below `src/` sees vendor directories
            if segments.len() < 2 || segments[0] != "src" {
                continue;
            }
            if segments.iter().any(|segment| segment == "testdata") {
                continue;
            }

            for depth in (1..=segments.len()).rev() {
                let parent = &segments[..depth];
                let vendor = parent
                    .iter()
                    .fold(root.root.clone(), |path, segment| path.join(segment))
                    .join("vendor");
                if !self.is_dir(&vendor) {
                    continue;
                }
                let dir = vendor.join(import_path);
                if self.is_dir(&dir) && has_go_files(&dir) {
                    let mut full: Vec<&str> = parent[1..].iter().map(String::as_str).collect();
                    full.push("vendor");
                    full.push(import_path);
                    return Some(ResolvedImport {
                        dir,
                        import_path: full.join("/"),
                        is_goroot: root.is_goroot,
                    });
                }
            }
        }
        None
    }

    /// Import path of a directory: relative to a `src` tree, or `_` plus the
    /// directory when it lies outside all of them
    fn import_path_for_dir(&self, dir: &Path) -> (String, bool) {
        for root in self.roots() {
            if let Ok(rel) = dir.strip_prefix(root.src()) {
                if rel.as_os_str().is_empty() {
                    continue;
                }
                return (slash_path(rel), root.is_goroot);
            }
        }
        (format!("_{}", slash_path(dir)), false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        if let Some(&cached) = self.dir_exists_cache.borrow().get(path) {
            return cached;
        }
        let exists = path.is_dir();
        self.dir_exists_cache
            .borrow_mut()
            .insert(path.to_path_buf(), exists);
        exists
    }
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver")
            .field("goroot", &self.goroot)
            .field("gopath", &self.gopath)
            .finish()
    }
}

/// `.`, `..`, `./x` or `../x`
pub fn is_local_import(import_path: &str) -> bool {
    import_path == "."
        || import_path == ".."
        || import_path.starts_with("./")
        || import_path.starts_with("../")
}

/// `$GOROOT`, else whatever `go env GOROOT` prints
pub fn detect_goroot() -> Option<PathBuf> {
    if let Some(goroot) = env::var_os("GOROOT").filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(goroot));
    }

    let output = Command::new("go").args(["env", "GOROOT"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let goroot = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!goroot.is_empty()).then(|| PathBuf::from(goroot))
}

/// Entries of `$GOPATH`, else `~/go` when it exists
pub fn detect_gopath() -> Vec<PathBuf> {
    if let Some(gopath) = env::var_os("GOPATH").filter(|value| !value.is_empty()) {
        return env::split_paths(&gopath)
            .filter(|path| !path.as_os_str().is_empty())
            .collect();
    }

    dirs::home_dir()
        .map(|home| home.join("go"))
        .filter(|path| path.is_dir())
        .into_iter()
        .collect()
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.clean();
    }
    env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
        .clean()
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().to_string()),
            Component::RootDir => Some(String::new()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
