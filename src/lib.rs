//! Modscan - rebuild a dependency list from a Python codebase's imports

pub mod classify;
pub mod error;
pub mod extract;
pub mod file_utils;
pub mod report;
pub mod resolve;
pub mod scan;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use classify::{Classification, Classifier};
pub use error::{Diagnostic, FileError};
pub use extract::ImportExtractor;
pub use report::{OutputConfig, print_json, print_report};
pub use resolve::{ModuleResolver, Resolution, SysPathResolver};
pub use scan::{ScanConfig, ScanResult, Scanner};
