use std::{
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{ArgAction, Parser};
use console::style;
use globset::{Glob, GlobSet, GlobSetBuilder};
use hintguard_core::{Checker, Code, Config, Diagnostic};
use serde::Serialize;
use serde_yaml::Value as YamlValue;
use walkdir::WalkDir;

/// Annotation coverage linter entry point.
#[derive(Debug, Parser)]
#[command(name = "hintguard", about = "Lint Python sources for missing type annotations.")]
struct Args {
    /// Path to config file (YAML). Defaults to hintguard.yml if present.
    #[arg(long, default_value = "hintguard.yml")]
    config: PathBuf,

    /// Emit JSON output for automation usage.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Suppress per-file output; only the summary and exit code remain.
    #[arg(long, action = ArgAction::SetTrue)]
    quiet: bool,

    /// Report only these codes (comma-separated). Example: --select ANN001,ANN201
    #[arg(long, value_delimiter = ',', value_name = "CODE[,CODE]")]
    select: Vec<String>,

    /// Drop these codes from the report (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "CODE[,CODE]")]
    ignore: Vec<String>,

    /// Glob patterns for paths to skip (repeatable).
    #[arg(long, value_name = "GLOB", num_args = 0..)]
    exclude: Vec<String>,

    /// Files or directories to lint.
    #[arg(value_name = "PATH", default_value = ".", num_args = 0..)]
    paths: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FileResult {
    path: String,
    diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
struct FileError {
    path: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct OutputReport {
    files: Vec<FileResult>,
    errors: Vec<FileError>,
    total_diagnostics: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    run_lint(args)
}

fn run_lint(args: Args) -> anyhow::Result<()> {
    let (config, config_root) = load_config(&args.config)?;
    let checker = Checker::new(config);
    let code_filter = build_code_filter(&args.select, &args.ignore)?;
    let exclude_set = build_glob_set(&args.exclude)?;

    let mut files = collect_files(&args.paths, exclude_set.as_ref())?;
    files.sort();

    let mut file_reports = Vec::new();
    let mut errors = Vec::new();
    let mut total_diags = 0usize;

    for path in files {
        let rel_path = pathdiff::diff_paths(&path, &config_root).unwrap_or_else(|| path.clone());
        let rel_display = rel_path.to_string_lossy().replace('\\', "/");

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                errors.push(FileError {
                    path: rel_display,
                    message: format!("failed to read: {err}"),
                });
                continue;
            }
        };

        // One broken file must not take down the rest of the run.
        let mut diagnostics = match checker.check_source(&content) {
            Ok(diagnostics) => diagnostics,
            Err(err) => {
                errors.push(FileError {
                    path: rel_display,
                    message: err.to_string(),
                });
                continue;
            }
        };
        diagnostics.retain(|diag| code_filter.allows(diag.code));
        total_diags += diagnostics.len();

        if !args.quiet && !args.json {
            print_human_report(&rel_display, &diagnostics);
        }

        file_reports.push(FileResult {
            path: rel_display,
            diagnostics,
        });
    }

    let had_errors = !errors.is_empty();
    if !args.json {
        for err in &errors {
            eprintln!("{}: {}", style(&err.path).cyan(), err.message);
        }
    }

    let output = OutputReport {
        files: file_reports,
        errors,
        total_diagnostics: total_diags,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !args.quiet {
        println!(
            "\n{} file(s) checked, {} finding(s)",
            output.files.len(),
            total_diags
        );
    }

    if total_diags > 0 || had_errors {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(path: &PathBuf) -> anyhow::Result<(Config, PathBuf)> {
    if path.exists() {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let value: YamlValue = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse YAML {}", path.display()))?;
        let config: Config = serde_yaml::from_value(value)
            .with_context(|| format!("Invalid config structure in {}", path.display()))?;
        let dir = match path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => env::current_dir()?,
            Some(parent) => parent.to_path_buf(),
            None => env::current_dir()?,
        };
        Ok((config, dir))
    } else {
        Ok((Config::default(), env::current_dir()?))
    }
}

struct CodeFilter {
    select: HashSet<Code>,
    ignore: HashSet<Code>,
}

impl CodeFilter {
    fn allows(&self, code: Code) -> bool {
        if !self.select.is_empty() && !self.select.contains(&code) {
            return false;
        }
        !self.ignore.contains(&code)
    }
}

fn build_code_filter(select: &[String], ignore: &[String]) -> anyhow::Result<CodeFilter> {
    Ok(CodeFilter {
        select: parse_codes(select)?,
        ignore: parse_codes(ignore)?,
    })
}

fn parse_codes(names: &[String]) -> anyhow::Result<HashSet<Code>> {
    let mut codes = HashSet::new();
    for name in names {
        let code =
            Code::parse(name).with_context(|| format!("Unknown diagnostic code `{name}`"))?;
        codes.insert(code);
    }
    Ok(codes)
}

fn build_glob_set(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("invalid glob `{pattern}`"))?);
    }
    Ok(Some(builder.build()?))
}

fn collect_files(paths: &[PathBuf], exclude: Option<&GlobSet>) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut walker = WalkDir::new(path).into_iter();
            while let Some(entry_res) = walker.next() {
                let entry = entry_res?;
                let entry_path = entry.path();
                if let Some(set) = exclude {
                    if set.is_match(entry_path) {
                        if entry.file_type().is_dir() {
                            walker.skip_current_dir();
                        }
                        continue;
                    }
                }
                if entry.file_type().is_file() && is_python(entry_path) {
                    files.push(entry_path.to_path_buf());
                }
            }
        } else if path.is_file() && is_python(path) {
            if let Some(set) = exclude {
                if set.is_match(path) {
                    continue;
                }
            }
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn is_python(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => matches!(ext.to_lowercase().as_str(), "py" | "pyi"),
        None => false,
    }
}

fn print_human_report(path: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!("{}", style(path).bold());
    for diag in diagnostics {
        // Columns are stored 0-based; editors count from 1.
        println!(
            "  {}:{}: {} {}",
            diag.position.line,
            diag.position.column + 1,
            style(diag.code).yellow(),
            diag.message
        );
    }
}
