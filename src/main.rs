//! ripcondense CLI - condense a Swift repository into one ranked artifact
//!
//! Orchestrates the full pipeline:
//!
//! 1. Config: ripcondense.toml in the root, overridden by flags
//! 2. Discovery: list and classify files respecting .gitignore
//! 3. Condensation: analyze, rank, order and render (library `pipeline`)
//! 4. Output: framed artifact (or a JSON ranking report) to stdout or a file

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ripcondense::discovery::list_units;
use ripcondense::pipeline::{Condensed, condense};
use ripcondense::rendering::Framer;
use ripcondense::Config;

/// Condense a Swift repository into one LLM-ready text artifact
///
/// Files are ranked by how central they are (type references, PageRank,
/// public surface, complexity, entrypoints). Important files keep their
/// function bodies, less important ones are reduced to signatures with
/// deterministic `/* elided */` sentinels. Dependencies come first.
///
/// Examples:
///   ripcondense .                        # Condense the current package
///   ripcondense MyApp -o context.txt     # Write to a file
///   ripcondense --order-only             # Show ranking as JSON
#[derive(Parser, Debug)]
#[command(name = "ripcondense")]
#[command(version)]
#[command(about, long_about = None)]
pub struct Cli {
    /// Repository root (or a single file)
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Write the artifact here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Files larger than this are replaced by a size placeholder
    ///
    /// Overrides `max-file-bytes` from ripcondense.toml (default 512 KiB).
    #[arg(long, value_name = "BYTES")]
    pub max_file_bytes: Option<u64>,

    /// Disable coloured headers
    ///
    /// Colour is only ever used when writing to a terminal.
    #[arg(long)]
    pub no_color: bool,

    /// Log stage progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Log per-file decisions to stderr (very verbose)
    #[arg(long)]
    pub diagnose: bool,

    /// Print a summary to stderr when done
    ///
    /// Files per kind, resolved edges, elided bodies, input/output bytes.
    #[arg(long)]
    pub stats: bool,

    /// Print the emission order with scores and policies as JSON
    #[arg(long)]
    pub order_only: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.diagnose {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RIPCONDENSE_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let condensed = run(&cli)?;

    if cli.stats {
        print_stats(&condensed);
    }
    Ok(())
}

/// Execute the pipeline and write its output.
fn run(cli: &Cli) -> Result<Condensed> {
    let config_dir = if cli.root.is_file() {
        cli.root.parent().map(PathBuf::from).unwrap_or_default()
    } else {
        cli.root.clone()
    };
    let mut config = Config::load(&config_dir)
        .with_context(|| format!("Failed to load config from '{}'", config_dir.display()))?;
    if let Some(max) = cli.max_file_bytes {
        config.max_file_bytes = max;
    }
    info!(root = %cli.root.display(), "{}", config.display_summary());

    let units = list_units(&cli.root, &config)
        .with_context(|| format!("Failed to list files under '{}'", cli.root.display()))?;
    let condensed = condense(units, &config.json).context("Failed to condense repository")?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            let mut out = BufWriter::new(file);
            write_output(cli, &condensed, &mut out, false)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let color = !cli.no_color && stdout.is_terminal();
            let mut out = BufWriter::new(stdout.lock());
            write_output(cli, &condensed, &mut out, color)?;
            out.flush()?;
        }
    }

    Ok(condensed)
}

fn write_output<W: Write>(cli: &Cli, condensed: &Condensed, out: &mut W, color: bool) -> Result<()> {
    if cli.order_only {
        serde_json::to_writer_pretty(&mut *out, &condensed.reports)
            .context("Failed to write ranking report")?;
        writeln!(out)?;
    } else {
        Framer::new(color)
            .write_all(out, &condensed.files)
            .context("Failed to write artifact")?;
    }
    Ok(())
}

fn print_stats(condensed: &Condensed) {
    let stats = &condensed.stats;
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("Files:");
    for (kind, count) in &stats.units_by_kind {
        eprintln!("  {kind:<16} {count}");
    }
    eprintln!("Symbols:          {}", stats.symbols);
    eprintln!("Edges:            {}", stats.edges);
    eprintln!("Bodies elided:    {}", stats.bodies_elided);
    eprintln!(
        "Bytes:            {} → {} ({:.1}%)",
        stats.input_bytes,
        stats.output_bytes,
        percent(stats.output_bytes as f64, stats.input_bytes as f64)
    );
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}
