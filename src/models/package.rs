//! Package identities and their canonical form

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Path segment under which vendored copies of packages live.
pub const VENDOR_SEGMENT: &str = "/vendor/";

/// Import path of the cgo pseudo-package. It has no source of its own.
pub const CGO_PSEUDO_PACKAGE: &str = "C";

/// Canonical identity of one compilation unit.
///
/// Every constructor canonicalizes, so two `Package` values compare equal
/// exactly when their canonical forms do. A package reached through
/// `a/vendor/lib/x` and one imported directly as `lib/x` are the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Package(String);

impl Package {
    /// The canonical import path
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the package and return its canonical import path
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Strip everything up to and including the last vendor segment.
///
/// Applying this twice gives the same result as applying it once: the
/// remainder after the last `/vendor/` cannot contain another one.
pub fn canonicalize(identity: &str) -> Package {
    Package(strip(identity).to_string())
}

/// Canonicalize a package and report whether anything was removed.
pub fn strip_vendor(pkg: &str) -> (Package, bool) {
    let stripped = strip(pkg);
    (Package(stripped.to_string()), stripped.len() != pkg.len())
}

fn strip(identity: &str) -> &str {
    match identity.rfind(VENDOR_SEGMENT) {
        Some(index) => &identity[index + VENDOR_SEGMENT.len()..],
        None => identity,
    }
}

impl From<&str> for Package {
    fn from(identity: &str) -> Self {
        canonicalize(identity)
    }
}

impl From<String> for Package {
    fn from(identity: String) -> Self {
        if identity.contains(VENDOR_SEGMENT) {
            canonicalize(&identity)
        } else {
            Package(identity)
        }
    }
}

impl Borrow<str> for Package {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Package {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Package {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Package {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
