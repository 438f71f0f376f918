//! Import extraction from Python source text
//!
//! Parses source with the tree-sitter Python grammar and collects the
//! first dotted segment of every absolute import, wherever it appears
//! in the file (module level, function bodies, conditionals, try blocks).
//! Relative imports (`from . import x`, `from .sub import y`) can only
//! reference local code and are excluded outright: the grammar puts
//! their module path under a `relative_import` node, which the query
//! below never captures.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Parser, Query, QueryCursor};

use crate::error::FileError;

/// Captures the dotted module path of `import a.b` (plain or aliased)
/// and of `from a.b import x`. A from-import with a leading dot carries
/// a `relative_import` in its `module_name` field instead of a
/// `dotted_name`, so relative imports fall out structurally.
const IMPORT_QUERY: &str = r#"
(import_statement
  name: [
    (dotted_name) @module
    (aliased_import
      name: (dotted_name) @module)
  ])

(import_from_statement
  module_name: (dotted_name) @module)
"#;

/// Grammar-based extractor for top-level module references.
///
/// Holds a tree-sitter parser, so it is cheap to reuse across files but
/// not shareable between threads; parallel callers create one per worker.
pub struct ImportExtractor {
    parser: Parser,
    query: Query,
}

impl ImportExtractor {
    pub fn new() -> Self {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .expect("Python grammar version mismatch");
        let query = Query::new(&language, IMPORT_QUERY).expect("IMPORT_QUERY is invalid");
        Self { parser, query }
    }

    /// Extract the bare module name of every absolute import in `source`,
    /// in document order. Duplicates are kept; callers fold into a set.
    ///
    /// Returns `FileError::Parse` when the grammar rejects the source, so
    /// the coordinator can skip the file rather than abort the scan.
    pub fn extract(&mut self, source: &str) -> Result<Vec<String>, FileError> {
        let tree = self.parser.parse(source, None).ok_or(FileError::Parse)?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(FileError::Parse);
        }

        let mut modules = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, root, source.as_bytes());
        while let Some(m) = matches.next() {
            for capture in m.captures {
                let Ok(text) = capture.node.utf8_text(source.as_bytes()) else {
                    continue;
                };
                // First dotted segment only; `import a . b` is legal Python,
                // so trim any whitespace around the segment.
                if let Some(first) = text.split('.').next() {
                    let first = first.trim();
                    if !first.is_empty() {
                        modules.push(first.to_string());
                    }
                }
            }
        }
        Ok(modules)
    }
}

impl Default for ImportExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Vec<String> {
        ImportExtractor::new().extract(source).unwrap()
    }

    #[test]
    fn test_plain_import() {
        assert_eq!(extract("import os\n"), vec!["os"]);
    }

    #[test]
    fn test_dotted_import_yields_first_segment() {
        assert_eq!(extract("import foo.bar.baz\n"), vec!["foo"]);
    }

    #[test]
    fn test_multiple_names_in_one_statement() {
        assert_eq!(extract("import a.b, c.d\n"), vec!["a", "c"]);
    }

    #[test]
    fn test_aliased_import() {
        assert_eq!(extract("import numpy as np\n"), vec!["numpy"]);
        assert_eq!(extract("import os.path as p, sys as s\n"), vec!["os", "sys"]);
    }

    #[test]
    fn test_from_import() {
        assert_eq!(extract("from pathlib import Path\n"), vec!["pathlib"]);
        assert_eq!(extract("from a.b import x, y\n"), vec!["a"]);
    }

    #[test]
    fn test_relative_imports_excluded() {
        let source = "from . import helpers\nfrom .sub import thing\nfrom ..pkg import other\n";
        assert!(extract(source).is_empty());
    }

    #[test]
    fn test_mixed_absolute_and_relative() {
        let source = "import requests\nfrom . import utils\nfrom flask import Flask\n";
        assert_eq!(extract(source), vec!["requests", "flask"]);
    }

    #[test]
    fn test_imports_nested_in_blocks() {
        let source = r#"
def handler():
    import json

class Worker:
    def run(self):
        if True:
            import threading
        for _ in range(2):
            import queue

try:
    import cjson
except ImportError:
    import simplejson
"#;
        assert_eq!(
            extract(source),
            vec!["json", "threading", "queue", "cjson", "simplejson"]
        );
    }

    #[test]
    fn test_import_like_text_in_strings_and_comments() {
        let source = r#"
# import fake_from_comment
s = "import fake_from_string"
doc = """
import fake_from_docstring
"""
import real
"#;
        assert_eq!(extract(source), vec!["real"]);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let mut extractor = ImportExtractor::new();
        let result = extractor.extract("def broken(:\n    pass\n");
        assert_eq!(result, Err(FileError::Parse));
    }

    #[test]
    fn test_empty_source() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_whitespace_around_dots() {
        assert_eq!(extract("import a . b\n"), vec!["a"]);
    }

    #[test]
    fn test_extractor_is_reusable() {
        let mut extractor = ImportExtractor::new();
        assert_eq!(extractor.extract("import one\n").unwrap(), vec!["one"]);
        assert_eq!(extractor.extract("import two\n").unwrap(), vec!["two"]);
    }
}
