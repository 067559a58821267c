//! CLI entry point for tracecheck.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `tracecheck-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use tracecheck_app::{
    CheckInput, apply_fixes, format_explain, parse_report_json, render_github_annotations,
    render_markdown, render_text, run_check, run_explain, runtime_error_report, serialize_report,
    verdict_exit_code,
};
use tracecheck_settings::Overrides;
use tracecheck_types::TracecheckReport;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "tracecheck",
    version,
    about = "Structured-logging key/value and trace correlation checker"
)]
struct Cli {
    /// Path to tracecheck config TOML (missing file means defaults).
    #[arg(long, default_value = "tracecheck.toml")]
    config: Utf8PathBuf,

    /// Override profile (default|strict).
    #[arg(long)]
    profile: Option<String>,

    /// Comma-separated policy names to disable (replaces the configured list).
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Rule file with one function pattern per line.
    #[arg(long)]
    rulefile: Option<String>,

    /// Inline rule pattern; repeatable.
    #[arg(long = "rule")]
    rules: Vec<String>,

    /// Require logging keys to be constant strings.
    #[arg(long = "requirestringkey")]
    require_string_key: bool,

    /// Forbid printf-style format specifiers in logging arguments.
    #[arg(long = "noprintflike")]
    no_printf_like: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Github,
    Markdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SchemaKind {
    Config,
    Report,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a resolved syntax model and report diagnostics.
    Check {
        /// Path to the `tracecheck.input.v1` JSON model.
        #[arg(long)]
        input: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Output format on stdout.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Apply suggested fixes to the source files.
        #[arg(long)]
        fix: bool,

        /// Directory the model's file paths are relative to (used with --fix).
        #[arg(long, default_value = ".")]
        root: Utf8PathBuf,

        /// Maximum number of annotations for `--format github`.
        #[arg(long, default_value = "10")]
        max_annotations: usize,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a category or code with remediation guidance.
    Explain {
        /// The category (e.g. "logging") or code (e.g. "missing_trace_id") to explain.
        identifier: String,
    },

    /// Print the JSON schema of the config file or the report.
    Schema {
        #[arg(value_enum)]
        kind: SchemaKind,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.cmd {
        Commands::Check {
            input,
            report_out,
            format,
            fix,
            root,
            max_annotations,
        } => cmd_check(
            &cli,
            input,
            report_out.as_deref(),
            *format,
            *fix,
            root,
            *max_annotations,
        ),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(report, *max),
        Commands::Explain { identifier } => cmd_explain(identifier),
        Commands::Schema { kind } => cmd_schema(*kind),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        profile: cli.profile.clone(),
        disable: cli.disable.clone(),
        rulefile: cli.rulefile.clone(),
        rules: cli.rules.clone(),
        require_string_key: cli.require_string_key.then_some(true),
        no_printf_like: cli.no_printf_like.then_some(true),
    }
}

fn cmd_check(
    cli: &Cli,
    input: &Utf8Path,
    report_out: Option<&Utf8Path>,
    format: Format,
    fix: bool,
    root: &Utf8Path,
    max_annotations: usize,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let input_text = std::fs::read_to_string(input)
            .with_context(|| format!("read input model: {input}"))?;
        // Missing config file is allowed (defaults apply).
        let cfg_text = match std::fs::read_to_string(&cli.config) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(config = %cli.config, error = %err, "config not loaded, using defaults");
                String::new()
            }
        };

        let output = run_check(CheckInput {
            input_text: &input_text,
            config_text: &cfg_text,
            overrides: overrides(cli),
            base_dir: Utf8Path::new("."),
        })?;

        if let Some(path) = report_out {
            write_report_file(path, &output.report).context("write report json")?;
        }

        let mut stdout = std::io::stdout().lock();
        match format {
            Format::Text => write!(stdout, "{}", render_text(&output.report))?,
            Format::Json => {
                stdout.write_all(&serialize_report(&output.report)?)?;
                writeln!(stdout)?;
            }
            Format::Github => {
                for annotation in render_github_annotations(&output.report, max_annotations) {
                    writeln!(stdout, "{annotation}")?;
                }
            }
            Format::Markdown => write!(stdout, "{}", render_markdown(&output.report))?,
        }

        if fix {
            let outcome = apply_fixes(root, &output.report.diagnostics, &output.files)
                .context("apply fixes")?;
            eprintln!(
                "tracecheck: applied {} fix(es) to {} file(s), skipped {}",
                outcome.fixes_applied,
                outcome.files_changed.len(),
                outcome.fixes_skipped
            );
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            if let Some(path) = report_out {
                let report = runtime_error_report(&format!("{err:#}"));
                let _ = write_report_file(path, &report);
            }
            eprintln!("tracecheck error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &TracecheckReport) -> anyhow::Result<()> {
    let data = serialize_report(report).context("serialize report")?;
    write_file(path, &data)
}

fn write_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write file: {path}"))?;
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<TracecheckReport> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let md = render_markdown(&read_report(report_path)?);

    if let Some(out_path) = output {
        write_file(out_path, md.as_bytes()).context("write markdown output")?;
    } else {
        print!("{md}");
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    for annotation in render_github_annotations(&read_report(report_path)?, max) {
        println!("{annotation}");
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    let output = run_explain(identifier);
    if output.is_found() {
        print!("{}", format_explain(&output));
        Ok(())
    } else {
        eprint!("{}", format_explain(&output));
        std::process::exit(1);
    }
}

fn cmd_schema(kind: SchemaKind) -> anyhow::Result<()> {
    let schema = match kind {
        SchemaKind::Config => schemars::schema_for!(tracecheck_settings::TracecheckConfigV1),
        SchemaKind::Report => schemars::schema_for!(TracecheckReport),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
