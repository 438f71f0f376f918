//! Test utilities: temporary source trees and a deterministic resolver.
//!
//! This module is only compiled for tests and the `test-utils` feature.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::resolve::{ModuleResolver, Resolution};

/// A temporary directory tree for scanner tests.
///
/// Cleaned up automatically when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create an empty directory, including parents.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolver with canned answers, so classification tests do not depend
/// on what happens to be installed on the test machine.
#[derive(Debug, Clone, Default)]
pub struct FakeResolver {
    modules: HashMap<String, Resolution>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module resolving to the given location.
    pub fn with_module(mut self, name: &str, location: &str) -> Self {
        self.modules
            .insert(name.to_string(), Resolution::FoundAt(PathBuf::from(location)));
        self
    }

    /// Register a builtin module (no file location).
    pub fn with_builtin(mut self, name: &str) -> Self {
        self.modules.insert(name.to_string(), Resolution::Builtin);
        self
    }
}

impl ModuleResolver for FakeResolver {
    fn resolve(&self, name: &str) -> Resolution {
        self.modules
            .get(name)
            .cloned()
            .unwrap_or(Resolution::NotFound)
    }
}
