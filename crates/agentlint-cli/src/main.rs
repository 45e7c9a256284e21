//! agentlint CLI
//!
//! Loads the configuration, runs the pre-pass, validates files and maps the
//! outcome to an exit code: `0` clean, `1` lint failures, `2` fatal errors.

mod output;

use agentlint_core::config::{CONFIG_FILE_NAMES, OutputFormat, discover};
use agentlint_core::{
    CollectingSink, Configuration, FileKind, LintOptions, LintSummary, Linter, RuleRegistry,
    detect_file_kind, generate_schema, resolve_with_extends,
};
use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "AGENTLINT_LOG";

#[derive(Parser)]
#[command(name = "agentlint")]
#[command(about = "Linter for agent configuration files: skills, hooks, plugins and instructions")]
#[command(version)]
struct Cli {
    /// Files or directories to lint
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Configuration file (default: first of .agentlint.{json,yaml,yml,toml})
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write fixed content back to disk
    #[arg(long)]
    fix: bool,

    /// Output format (default: the configuration's `output.format`, else text)
    #[arg(short, long)]
    format: Option<Format>,

    /// Warn about directives that suppress nothing
    #[arg(long)]
    report_unused_disable_directives: bool,

    /// Fail when more warnings than this are reported
    #[arg(long)]
    max_warnings: Option<usize>,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,

    /// Print the configuration JSON Schema and exit
    #[arg(long)]
    print_config_schema: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Format::Text,
            OutputFormat::Json => Format::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("agentlint: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.print_config_schema {
        println!("{}", serde_json::to_string_pretty(&generate_schema())?);
        return Ok(ExitCode::SUCCESS);
    }

    let (config, root) = load_config(cli.config.as_deref())?;
    let output_config = config.output.clone().unwrap_or_default();
    if output_config.color == Some(false) {
        colored::control::set_override(false);
    }
    let format = cli
        .format
        .or(output_config.format.map(Format::from))
        .unwrap_or(Format::Text);
    let max_warnings = cli.max_warnings.or(config.max_warnings);

    let sink = Arc::new(CollectingSink::new());
    let registry = Arc::new(RuleRegistry::with_defaults());
    let linter = Linter::from_config(config, &root, registry, sink.clone())?.with_options(
        LintOptions {
            fix: cli.fix,
            report_unused_disable_directives: cli.report_unused_disable_directives.then_some(true),
            ..LintOptions::default()
        },
    );

    let files = collect_files(&cli.paths)?;
    tracing::debug!(files = files.len(), root = %root.display(), "collected files");
    let results = linter.validate_files(&files);

    if cli.fix {
        let fixed = output::write_fixes(&results)?;
        if fixed > 0 && format == Format::Text {
            eprintln!("Fixed {} file(s)", fixed);
        }
    }

    let summary = LintSummary::from_results(&results, max_warnings);
    match format {
        Format::Text => output::print_text(&results, &summary, cli.quiet),
        Format::Json => output::print_json(&results, &summary)?,
    }
    for note in sink.diagnostics() {
        eprintln!("note: {}", note);
    }

    Ok(if summary.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Merged configuration and the directory its patterns are relative to.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<(Configuration, PathBuf)> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover(&cwd),
    };
    let Some(path) = path else {
        tracing::debug!(candidates = ?CONFIG_FILE_NAMES, "no configuration file found");
        return Ok((Configuration::default(), cwd));
    };

    let config = resolve_with_extends(&path)?;
    let root = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(std::path::absolute)
        .transpose()?
        .unwrap_or(cwd);
    Ok((config, root))
}

/// Expand directories into the lintable files below them, honoring
/// `.gitignore`. Explicit file arguments are kept as given.
fn collect_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("path not found: {}", path.display());
        }
        let walker = ignore::WalkBuilder::new(path)
            .hidden(false)
            .filter_entry(|entry| !matches!(entry.file_name().to_str(), Some(".git" | "node_modules")))
            .build();
        let mut found: Vec<PathBuf> = Vec::new();
        for entry in walker {
            let entry = entry?;
            let is_file = entry.file_type().is_some_and(|t| t.is_file());
            if is_file && detect_file_kind(entry.path()) != FileKind::Unknown {
                found.push(entry.into_path());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}
