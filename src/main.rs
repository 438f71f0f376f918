//! CLI entry point for modscan

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use modscan::{OutputConfig, ScanConfig, Scanner, SysPathResolver, print_json, print_report};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            // Respect FORCE_COLOR environment variable
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            // Respect TERM=dumb
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            // Check if stdout is a TTY
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "modscan")]
#[command(about = "Scan a Python codebase for third-party imports")]
#[command(version)]
struct Args {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Scan everything (do not honor the root .gitignore)
    #[arg(short, long)]
    all: bool,

    /// Skip entries matching pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<String>,

    /// Show the per-file import breakdown
    #[arg(short = 'f', long = "files")]
    files: bool,

    /// Output in JSON format
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Number of parallel workers for import extraction
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Interpreter queried once for module search paths
    #[arg(long = "python", value_name = "EXE", default_value = "python3")]
    python: String,

    /// Maximum file size for import extraction (default: 1MB)
    /// Files larger than this are skipped. Use suffixes: K, M, G (e.g. 5M for 5MB)
    #[arg(long = "max-file-size", value_name = "SIZE")]
    max_file_size: Option<String>,
}

/// Parse a file size string like "5M", "100K", "1G" into bytes.
/// Supports suffixes: K/KB (1024), M/MB (1024^2), G/GB (1024^3)
/// Without suffix, interprets as bytes.
fn parse_file_size(s: &str) -> Result<u64, String> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    Ok(num * multiplier)
}

fn main() {
    let args = Args::parse();

    if let Some(ref size_str) = args.max_file_size {
        match parse_file_size(size_str) {
            Ok(size) => {
                modscan::file_utils::set_max_file_size(size);
            }
            Err(e) => {
                eprintln!("modscan: invalid --max-file-size '{}': {}", size_str, e);
                process::exit(1);
            }
        }
    }

    // Missing interpreter degrades gracefully: standard modules then
    // surface as unresolved candidates rather than being dropped.
    let resolver = SysPathResolver::from_interpreter(&args.python).unwrap_or_else(|| {
        eprintln!(
            "modscan: warning: cannot query '{}' for search paths; standard modules may be reported as candidates",
            args.python
        );
        SysPathResolver::from_env()
    });

    let root = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(&args.path)
    };
    let root = root.canonicalize().unwrap_or(root);

    let scan_config = ScanConfig {
        respect_gitignore: !args.all,
        ignore_patterns: args.ignore.clone(),
        jobs: args.jobs,
    };

    let scanner = Scanner::new(resolver, scan_config);
    let result = scanner.scan(&root);

    let output = if args.json {
        print_json(&result)
    } else {
        let output_config = OutputConfig {
            use_color: should_use_color(args.color),
            by_file: args.files,
        };
        print_report(&result, &output_config)
    };

    if let Err(e) = output {
        eprintln!("modscan: error writing output: {}", e);
        process::exit(1);
    }
}
