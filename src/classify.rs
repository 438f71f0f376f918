//! Module name classification
//!
//! Decides, for one bare module name, whether it is standard-library,
//! local to the scanned repository, an installed third-party package,
//! or unresolvable in the current environment. The decision is a
//! heuristic over the resolver's answer and path conventions: a package
//! installed in development mode outside any packages directory can be
//! misread as standard or local, and a standard module missing from the
//! scanning environment surfaces as unresolved. The bias is deliberate:
//! over-report candidates rather than silently drop them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::resolve::{ModuleResolver, Resolution};

/// Directory names conventionally used for installed third-party
/// packages; a resolved location containing one of these is external.
pub const PACKAGE_DIR_MARKERS: &[&str] = &["site-packages", "dist-packages"];

/// Where one module reference landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Ships with the interpreter's base distribution.
    Standard,
    /// Defined within the scanned repository, or a sibling module.
    Local,
    /// Installed under a third-party packages directory.
    External,
    /// Not importable in this environment; a candidate dependency.
    Unresolved,
}

impl Classification {
    /// Whether this classification belongs in the scan result.
    pub fn is_candidate(self) -> bool {
        matches!(self, Classification::External | Classification::Unresolved)
    }
}

/// Classifies bare module names against a repository root and an
/// injected resolver.
pub struct Classifier<'a, R: ModuleResolver + ?Sized> {
    resolver: &'a R,
    repo_root: PathBuf,
}

impl<'a, R: ModuleResolver + ?Sized> Classifier<'a, R> {
    pub fn new(resolver: &'a R, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            repo_root: repo_root.into(),
        }
    }

    /// Ordered classification, first match wins:
    ///
    /// 1. names in the caller's local scope (sibling modules) are local,
    ///    without attempting resolution;
    /// 2. names the resolver cannot find are unresolved;
    /// 3. resolved locations under a packages directory are external;
    /// 4. resolved locations under the repository root are local;
    /// 5. everything else (builtins, the bundled standard distribution)
    ///    is standard.
    pub fn classify(&self, name: &str, local_scope: &HashSet<String>) -> Classification {
        if local_scope.contains(name) {
            return Classification::Local;
        }
        match self.resolver.resolve(name) {
            Resolution::NotFound => Classification::Unresolved,
            Resolution::Builtin => Classification::Standard,
            Resolution::FoundAt(location) => {
                if has_package_marker(&location) {
                    Classification::External
                } else if location.starts_with(&self.repo_root) {
                    Classification::Local
                } else {
                    Classification::Standard
                }
            }
        }
    }
}

fn has_package_marker(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| PACKAGE_DIR_MARKERS.contains(&s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeResolver;

    fn no_locals() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn test_unresolved_name_is_candidate() {
        let resolver = FakeResolver::new();
        let classifier = Classifier::new(&resolver, "/repo");
        let got = classifier.classify("numpy", &no_locals());
        assert_eq!(got, Classification::Unresolved);
        assert!(got.is_candidate());
    }

    #[test]
    fn test_site_packages_location_is_external() {
        let resolver = FakeResolver::new()
            .with_module("requests", "/usr/lib/python3/site-packages/requests/__init__.py");
        let classifier = Classifier::new(&resolver, "/repo");
        assert_eq!(
            classifier.classify("requests", &no_locals()),
            Classification::External
        );
    }

    #[test]
    fn test_dist_packages_location_is_external() {
        let resolver = FakeResolver::new()
            .with_module("flask", "/usr/lib/python3/dist-packages/flask/__init__.py");
        let classifier = Classifier::new(&resolver, "/repo");
        assert_eq!(
            classifier.classify("flask", &no_locals()),
            Classification::External
        );
    }

    #[test]
    fn test_location_under_repo_root_is_local() {
        let resolver = FakeResolver::new().with_module("mypkg", "/repo/src/mypkg/__init__.py");
        let classifier = Classifier::new(&resolver, "/repo");
        assert_eq!(
            classifier.classify("mypkg", &no_locals()),
            Classification::Local
        );
    }

    #[test]
    fn test_stdlib_location_is_standard() {
        let resolver = FakeResolver::new().with_module("os", "/usr/lib/python3.12/os.py");
        let classifier = Classifier::new(&resolver, "/repo");
        assert_eq!(
            classifier.classify("os", &no_locals()),
            Classification::Standard
        );
    }

    #[test]
    fn test_builtin_is_standard() {
        let resolver = FakeResolver::new().with_builtin("sys");
        let classifier = Classifier::new(&resolver, "/repo");
        assert_eq!(
            classifier.classify("sys", &no_locals()),
            Classification::Standard
        );
    }

    #[test]
    fn test_local_scope_wins_over_installed_package() {
        // Resolution must not even be attempted for names in scope.
        let resolver = FakeResolver::new()
            .with_module("utils", "/usr/lib/python3/site-packages/utils.py");
        let classifier = Classifier::new(&resolver, "/repo");
        let locals: HashSet<String> = ["utils".to_string()].into();
        assert_eq!(
            classifier.classify("utils", &locals),
            Classification::Local
        );
    }

    #[test]
    fn test_site_packages_marker_outranks_repo_root() {
        // A vendored site-packages inside the repo still reads as external.
        let resolver = FakeResolver::new()
            .with_module("vendored", "/repo/.venv/lib/site-packages/vendored.py");
        let classifier = Classifier::new(&resolver, "/repo");
        assert_eq!(
            classifier.classify("vendored", &no_locals()),
            Classification::External
        );
    }

    #[test]
    fn test_marker_must_be_a_path_component() {
        // "site-packages" as a substring of a longer name is not a marker.
        let resolver = FakeResolver::new()
            .with_module("odd", "/usr/lib/not-site-packages-dir/odd.py");
        let classifier = Classifier::new(&resolver, "/repo");
        assert_eq!(
            classifier.classify("odd", &no_locals()),
            Classification::Standard
        );
    }
}
