//! Binary entrypoint: read an access log (file or stdin), write a report to stdout.
//!
//! Diagnostics go to stderr through tracing so stdout carries only the report.

use access_insight::report::{render_json, render_text};
use access_insight::{Analyzer, Config, RecordStore};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
  Text,
  Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
  Text,
  Json,
}

#[derive(Parser, Debug)]
#[command(name = "access-insight", version, about = "Batch analyzer for combined-format access logs")]
struct Cli {
  /// Access log to read; omit or pass "-" for stdin
  path: Option<PathBuf>,

  /// Report format
  #[arg(long, value_enum, default_value = "text")]
  format: OutputFormat,

  /// Sliding window length in seconds
  #[arg(long, env = "ACCESS_INSIGHT_WINDOW_SECS")]
  window_secs: Option<u64>,

  /// Flag a source when its peak window count is above this
  #[arg(long, env = "ACCESS_INSIGHT_THRESHOLD")]
  threshold: Option<usize>,

  /// Entries kept in the source and status rankings
  #[arg(long, env = "ACCESS_INSIGHT_TOP")]
  top: Option<usize>,

  /// Include the per-second traffic series (JSON output)
  #[arg(long)]
  timeline: bool,

  /// Log level, overridden by RUST_LOG
  #[arg(long, default_value = "info")]
  log_level: String,

  /// Diagnostic log format on stderr
  #[arg(long, value_enum, default_value = "text")]
  log_format: LogFormat,
}

impl Cli {
  fn config(&self) -> Config {
    let defaults = Config::default();
    Config {
      window_secs: self.window_secs.unwrap_or(defaults.window_secs),
      suspect_threshold: self.threshold.unwrap_or(defaults.suspect_threshold),
      top_n: self.top.unwrap_or(defaults.top_n),
      timeline: self.timeline,
    }
  }
}

fn init_logging(level: &str, format: LogFormat) {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(false);
  match format {
    LogFormat::Text => builder.init(),
    LogFormat::Json => builder.json().flatten_event(true).init(),
  }
}

fn open_input(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn BufRead>> {
  match path {
    Some(p) if p.as_os_str() != "-" => {
      let file = File::open(p).with_context(|| format!("opening {}", p.display()))?;
      Ok(Box::new(BufReader::new(file)))
    }
    _ => Ok(Box::new(BufReader::new(io::stdin()))),
  }
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_logging(&cli.log_level, cli.log_format);

  let analyzer = Analyzer::new(cli.config())?;
  let config = analyzer.config();
  info!(
    window_secs = config.window_secs,
    threshold = config.suspect_threshold,
    top_n = config.top_n,
    "starting analysis"
  );

  let input = open_input(cli.path.as_ref())?;
  let (store, summary) = RecordStore::from_reader(input).context("reading input")?;
  let report = analyzer.analyze(&store, summary);

  let rendered = match cli.format {
    OutputFormat::Text => render_text(&report),
    OutputFormat::Json => render_json(&report)? + "\n",
  };
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());
  out.write_all(rendered.as_bytes())?;
  out.flush()?;
  Ok(())
}
