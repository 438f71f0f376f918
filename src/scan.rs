//! Scan coordination: tree walk, extraction, classification, folding
//!
//! The scanner owns the one piece of cross-file state: the accumulated
//! set of candidate dependency names. Everything else (module references,
//! classifications) is computed per file and discarded after folding.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use glob::Pattern;
use ignore::gitignore::Gitignore;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;

use crate::classify::{Classifier, PACKAGE_DIR_MARKERS};
use crate::error::{Diagnostic, FileError};
use crate::extract::ImportExtractor;
use crate::file_utils::read_source;
use crate::resolve::ModuleResolver;

/// Extension of the source files we scan.
const SOURCE_EXTENSION: &str = "py";

/// Conventional virtual-environment directory names (venv, .venv, env,
/// virtualenv, venv312, ...). Dot-prefixed variants are already caught
/// by the hidden-directory rule.
static VENV_DIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(venv|env|virtualenv)[-_.0-9]*$").expect("VENV_DIR regex is invalid")
});

/// Configuration for a scan invocation.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Honor the root .gitignore when walking.
    pub respect_gitignore: bool,
    /// Extra name patterns to skip (glob syntax, matched against the
    /// entry name).
    pub ignore_patterns: Vec<String>,
    /// Number of parallel workers for per-file extraction.
    /// 0 = auto-detect, 1 = sequential, N = use N workers.
    pub jobs: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            ignore_patterns: Vec::new(),
            jobs: 0,
        }
    }
}

/// Everything one scan produced: the deduplicated candidate set, the
/// per-file breakdown, and the non-fatal diagnostics emitted on the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    /// Deduplicated external + unresolved module names, sorted.
    pub modules: BTreeSet<String>,
    /// Candidate names per scanned file. Files that were scanned but
    /// imported nothing of interest appear with an empty set.
    pub by_file: BTreeMap<PathBuf, BTreeSet<String>>,
    /// Per-file problems that were skipped over, in walk order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// A file queued for extraction, together with the local-module scope
/// of the directory it was found in.
struct FileJob {
    path: PathBuf,
    local_scope: Arc<HashSet<String>>,
}

/// Walks a directory tree and folds per-file classifications into one
/// [`ScanResult`].
pub struct Scanner<R: ModuleResolver> {
    config: ScanConfig,
    resolver: R,
}

impl<R: ModuleResolver> Scanner<R> {
    pub fn new(resolver: R, config: ScanConfig) -> Self {
        Self { config, resolver }
    }

    /// Scan the tree rooted at `root`.
    ///
    /// A missing root is reported as a diagnostic and yields an empty
    /// result; per-file errors never abort the walk.
    pub fn scan(&self, root: &Path) -> ScanResult {
        let mut result = ScanResult::default();

        if !root.exists() {
            result
                .diagnostics
                .push(Diagnostic::new(root, "invalid path; nothing to scan"));
            return result;
        }

        let gitignore = self
            .config
            .respect_gitignore
            .then(|| Gitignore::new(root.join(".gitignore")).0);

        let mut jobs = Vec::new();
        self.collect_files(root, gitignore.as_ref(), &mut jobs, &mut result.diagnostics);

        let classifier = Classifier::new(&self.resolver, root);
        let outcomes = self.process_jobs(jobs, &classifier);

        for (path, outcome) in outcomes {
            match outcome {
                Ok(names) => {
                    result.modules.extend(names.iter().cloned());
                    result.by_file.insert(path, names);
                }
                Err(err) => result.diagnostics.push(Diagnostic::from_error(path, &err)),
            }
        }
        result
    }

    /// Depth-first collection of scannable files. Exclusion is applied
    /// before descent: children of an excluded directory are never
    /// visited. Each directory's sibling modules (subdirectory names
    /// plus `.py` file stems) become the local scope for its files.
    fn collect_files(
        &self,
        dir: &Path,
        gitignore: Option<&Gitignore>,
        jobs: &mut Vec<FileJob>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                diagnostics.push(Diagnostic::new(dir, format!("unable to read directory: {}", err)));
                return;
            }
        };

        let mut subdirs = Vec::new();
        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            } else if path.is_file() {
                files.push(path);
            }
        }
        subdirs.sort();
        files.sort();

        let mut local_scope: HashSet<String> = subdirs
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        local_scope.extend(
            files
                .iter()
                .filter(|p| has_source_extension(p))
                .filter_map(|p| p.file_stem())
                .map(|n| n.to_string_lossy().into_owned()),
        );
        let local_scope = Arc::new(local_scope);

        for file in files {
            if !has_source_extension(&file) {
                continue;
            }
            if self.is_name_ignored(&file) {
                continue;
            }
            if gitignore.is_some_and(|gi| gi.matched(&file, false).is_ignore()) {
                continue;
            }
            jobs.push(FileJob {
                path: file,
                local_scope: Arc::clone(&local_scope),
            });
        }

        for subdir in subdirs {
            // Symlinked directories are skipped to prevent cycles.
            if subdir.is_symlink() {
                continue;
            }
            let name = subdir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if is_excluded_dir(&name) {
                continue;
            }
            if self.is_name_ignored(&subdir) {
                continue;
            }
            if gitignore.is_some_and(|gi| gi.matched(&subdir, true).is_ignore()) {
                continue;
            }
            self.collect_files(&subdir, gitignore, jobs, diagnostics);
        }
    }

    fn is_name_ignored(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.config
            .ignore_patterns
            .iter()
            .any(|pattern| name == *pattern || glob_match(pattern, &name))
    }

    /// Run extraction + classification for the queued files, in the
    /// configured worker mode. Results are set unions, so worker count
    /// and completion order cannot change the outcome.
    fn process_jobs(
        &self,
        jobs: Vec<FileJob>,
        classifier: &Classifier<'_, R>,
    ) -> Vec<(PathBuf, Result<BTreeSet<String>, FileError>)> {
        if self.config.jobs == 1 {
            let mut extractor = ImportExtractor::new();
            return jobs
                .into_iter()
                .map(|job| {
                    let outcome = process_file(&mut extractor, classifier, &job);
                    (job.path, outcome)
                })
                .collect();
        }

        let run = || {
            jobs.par_iter()
                .map_init(ImportExtractor::new, |extractor, job| {
                    let outcome = process_file(extractor, classifier, job);
                    (job.path.clone(), outcome)
                })
                .collect()
        };

        if self.config.jobs == 0 {
            run()
        } else {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .build()
            {
                Ok(pool) => pool.install(run),
                // Fall back to rayon's global pool if custom pool creation fails
                Err(_) => run(),
            }
        }
    }
}

/// Read, extract, classify. Only candidate classifications (external or
/// unresolved) survive into the per-file set.
fn process_file<R: ModuleResolver>(
    extractor: &mut ImportExtractor,
    classifier: &Classifier<'_, R>,
    job: &FileJob,
) -> Result<BTreeSet<String>, FileError> {
    let source = read_source(&job.path)?;
    let references = extractor.extract(&source)?;
    Ok(references
        .into_iter()
        .filter(|name| classifier.classify(name, &job.local_scope).is_candidate())
        .collect())
}

fn has_source_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Directories that are never descended into: hidden directories,
/// virtual environments, installed-package directories, and bytecode
/// caches.
fn is_excluded_dir(name: &str) -> bool {
    name.starts_with('.')
        || name == "__pycache__"
        || PACKAGE_DIR_MARKERS.contains(&name)
        || VENV_DIR.is_match(name)
}

/// Match a glob pattern against a name.
fn glob_match(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}
