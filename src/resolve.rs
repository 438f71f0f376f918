//! Module resolution against the host Python environment
//!
//! Answers "does this bare module name resolve, and to where" the way
//! the interpreter would, without importing anything. The resolver is a
//! trait so the classifier can be exercised in tests with deterministic
//! answers instead of whatever happens to be installed on the machine.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

/// Outcome of resolving a bare module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Not found in any known search path: a candidate external
    /// dependency that is likely not installed in this environment.
    NotFound,
    /// Compiled into the interpreter; no file location to inspect.
    Builtin,
    /// Found on disk at the given location.
    FoundAt(PathBuf),
}

/// Capability for locating modules. Implementations must be shareable
/// across scan workers.
pub trait ModuleResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Resolution;
}

/// One-shot interrogation of the host interpreter for its module
/// search paths and builtin module names.
const INTERPRETER_PROBE: &str = "import sys, json\n\
print(json.dumps({'builtins': list(sys.builtin_module_names), 'path': sys.path}))";

#[derive(Debug, Deserialize)]
struct InterpreterInfo {
    builtins: Vec<String>,
    path: Vec<String>,
}

/// Resolver that mirrors the interpreter's `sys.path` lookup: for each
/// search path, packages (directories) are checked before plain modules,
/// matching import order.
#[derive(Debug, Clone)]
pub struct SysPathResolver {
    search_paths: Vec<PathBuf>,
    builtins: HashSet<String>,
}

impl SysPathResolver {
    pub fn new(
        search_paths: impl IntoIterator<Item = PathBuf>,
        builtins: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            search_paths: search_paths.into_iter().collect(),
            builtins: builtins.into_iter().collect(),
        }
    }

    /// Build a resolver by querying the given interpreter for its
    /// `sys.path` and builtin module names. Returns `None` when the
    /// interpreter cannot be run or its answer cannot be parsed.
    pub fn from_interpreter(python: &str) -> Option<Self> {
        let output = Command::new(python)
            .args(["-c", INTERPRETER_PROBE])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let info: InterpreterInfo = serde_json::from_slice(&output.stdout).ok()?;
        let search_paths = info
            .path
            .into_iter()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect();
        Some(Self {
            search_paths,
            builtins: info.builtins.into_iter().collect(),
        })
    }

    /// Fallback when no interpreter is available: only PYTHONPATH is
    /// searched and no builtins are known, so standard modules surface
    /// as unresolved. That over-reports candidate dependencies rather
    /// than silently dropping them.
    pub fn from_env() -> Self {
        let search_paths = std::env::var_os("PYTHONPATH")
            .map(|raw| std::env::split_paths(&raw).collect())
            .unwrap_or_default();
        Self {
            search_paths,
            builtins: HashSet::new(),
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Locate `name` within one search path entry. Packages win over
    /// plain modules, as in the interpreter's own lookup.
    fn resolve_in(dir: &Path, name: &str) -> Option<PathBuf> {
        let package = dir.join(name);
        if package.is_dir() {
            let init = package.join("__init__.py");
            // A directory without __init__.py is still importable as a
            // namespace package.
            return Some(if init.is_file() { init } else { package });
        }
        for ext in ["py", "so", "pyd"] {
            let module = dir.join(format!("{}.{}", name, ext));
            if module.is_file() {
                return Some(module);
            }
        }
        None
    }
}

impl ModuleResolver for SysPathResolver {
    fn resolve(&self, name: &str) -> Resolution {
        if self.builtins.contains(name) {
            return Resolution::Builtin;
        }
        for dir in &self.search_paths {
            if let Some(location) = Self::resolve_in(dir, name) {
                return Resolution::FoundAt(location);
            }
        }
        Resolution::NotFound
    }
}
