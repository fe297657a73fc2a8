//! stablekey - arch keyword stabilization checks
//!
//! The `stablekey` command reads a JSON feed of package versions and reports
//! keyword stabilization findings.
//!
//! ## Commands
//!
//! - `scan`: Run checks over a feed file
//! - `checks`: List available checks

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};

use stablekey_core::{
    run_scan, ArchConfig, CheckKind, CheckSet, FeedDocument, ScanConfig, ScanReport,
};

#[derive(Parser)]
#[command(name = "stablekey")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Arch keyword stabilization checks", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run keyword checks over a feed file
    Scan {
        /// Path to the feed (JSON array of versions, or {"packages": [...]})
        feed: PathBuf,

        /// Every recognized arch, comma separated
        #[arg(long, env = "STABLEKEY_ARCHES", value_delimiter = ',', required = true)]
        arches: Vec<String>,

        /// Arches checked for lag and promotion (default: all arches)
        #[arg(long, env = "STABLEKEY_STABLE_ARCHES", value_delimiter = ',')]
        stable_arches: Option<Vec<String>>,

        /// Arches a reference version must be stable on (default: stable arches)
        #[arg(long, env = "STABLEKEY_SOURCE_ARCHES", value_delimiter = ',')]
        source_arches: Option<Vec<String>>,

        /// Check to run; repeat for several (default: all)
        #[arg(long = "check")]
        checks: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Feeds scanned at once; 1 scans sequentially
        #[arg(short, long, default_value = "4")]
        jobs: usize,

        /// Write the rendered report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available checks
    Checks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Options for one `scan` invocation.
struct ScanArgs {
    feed: PathBuf,
    arches: Vec<String>,
    stable_arches: Option<Vec<String>>,
    source_arches: Option<Vec<String>>,
    checks: Vec<String>,
    format: OutputFormat,
    jobs: usize,
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    stablekey_core::init_tracing(cli.json_logs, level);

    match cli.command {
        Commands::Scan {
            feed,
            arches,
            stable_arches,
            source_arches,
            checks,
            format,
            jobs,
            output,
        } => {
            let args = ScanArgs {
                feed,
                arches,
                stable_arches,
                source_arches,
                checks,
                format,
                jobs,
                output,
            };
            let report = cmd_scan(&args).await?;
            emit_report(&report, args.format, args.output.as_deref())
        }
        Commands::Checks => {
            print!("{}", render_checks());
            Ok(())
        }
    }
}

async fn cmd_scan(args: &ScanArgs) -> Result<ScanReport> {
    if args.jobs == 0 {
        bail!("--jobs must be at least 1");
    }

    let arches = ArchConfig::new(
        &args.arches,
        args.stable_arches.as_ref(),
        args.source_arches.as_ref(),
    )
    .context("Invalid arch configuration")?;
    let kinds = parse_checks(&args.checks)?;
    let checks = Arc::new(CheckSet::new(&kinds, Arc::new(arches)));

    let feeds = read_feed_file(&args.feed)?;
    info!(
        path = %args.feed.display(),
        feeds = feeds.len(),
        "feed loaded"
    );

    let config = ScanConfig {
        max_concurrent: args.jobs,
    };
    let report = run_scan(checks, feeds, &config)
        .await
        .context("Scan failed")?;
    Ok(report)
}

fn parse_checks(names: &[String]) -> Result<Vec<CheckKind>> {
    if names.is_empty() {
        return Ok(CheckKind::ALL.to_vec());
    }
    names
        .iter()
        .map(|name| {
            name.parse::<CheckKind>()
                .with_context(|| format!("Unknown check: {name}"))
        })
        .collect()
}

fn read_feed_file(path: &Path) -> Result<Vec<stablekey_core::PackageFeed>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed file: {:?}", path))?;
    let document =
        FeedDocument::from_json(&content).with_context(|| format!("Invalid feed in {:?}", path))?;
    document
        .into_feeds()
        .with_context(|| format!("Malformed feed in {:?}", path))
}

fn render_report(report: &ScanReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.render_text()),
        OutputFormat::Json => {
            let mut json = report.to_json_pretty()?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn emit_report(report: &ScanReport, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let rendered = render_report(report, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            info!(
                path = %path.display(),
                findings = report.findings.len(),
                "report written"
            );
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn render_checks() -> String {
    let mut out = String::new();
    for kind in CheckKind::ALL {
        out.push_str(&format!("{}\n", kind.name()));
        out.push_str(&format!("  {}\n", kind.description()));
        out.push_str(&format!("  findings: {}\n", kind.findings().join(", ")));
    }
    out
}
