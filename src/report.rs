//! Report formatting for scan results
//!
//! Diagnostics print to the same stream as results: a skipped file is
//! worth knowing about, but it is not an execution failure.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::scan::ScanResult;

/// Configuration for report formatting.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Show the per-file breakdown instead of the flat name list.
    pub by_file: bool,
}

/// Print the scan result to stdout with optional color.
pub fn print_report(result: &ScanResult, config: &OutputConfig) -> io::Result<()> {
    let color_choice = if config.use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color_choice);

    let mut dim = ColorSpec::new();
    dim.set_fg(Some(Color::Yellow));
    for diag in &result.diagnostics {
        stdout.set_color(&dim)?;
        writeln!(stdout, "# {}: {}", diag.path.display(), diag.message)?;
        stdout.reset()?;
    }

    if result.is_empty() {
        writeln!(stdout, "No third-party imports discovered")?;
        return Ok(());
    }

    if config.by_file {
        print_by_file(&mut stdout, result)?;
    } else {
        for name in &result.modules {
            writeln!(stdout, "{}", name)?;
        }
    }
    Ok(())
}

/// Per-file breakdown: each scanned file with the candidate names it
/// contributed, "None" when it contributed nothing.
fn print_by_file(stdout: &mut StandardStream, result: &ScanResult) -> io::Result<()> {
    let mut bold = ColorSpec::new();
    bold.set_bold(true);

    for (file, names) in &result.by_file {
        stdout.set_color(&bold)?;
        writeln!(stdout, "File: {}", file.display())?;
        stdout.reset()?;
        if names.is_empty() {
            writeln!(stdout, "\tImported packages: None")?;
        } else {
            writeln!(stdout, "\tImported packages:")?;
            for name in names {
                writeln!(stdout, "\t\t{}", name)?;
            }
        }
    }
    Ok(())
}

/// Print the scan result as pretty-printed JSON to stdout.
pub fn print_json(result: &ScanResult) -> io::Result<()> {
    let json =
        serde_json::to_string_pretty(result).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    println!("{}", json);
    Ok(())
}
