//! Plain-text rendering of a Report for terminal output.

use std::fmt::Write;

use crate::error::AnalyzerError;
use crate::types::{ClientBreakdown, RankedValue, Report};

const RULE_WIDTH: usize = 53;

fn heading(out: &mut String, title: &str) {
  let _ = writeln!(out, "{:-^width$}", title, width = RULE_WIDTH);
}

fn ranked(out: &mut String, values: &[RankedValue]) {
  for v in values {
    let _ = writeln!(out, "{:20} : {}", v.value, v.count);
  }
  out.push('\n');
}

fn clients(out: &mut String, c: &ClientBreakdown) {
  let rows: [(&str, usize); 9] = [
    ("Bot", c.bot),
    ("Mobile", c.mobile),
    ("Desktop", c.desktop),
    ("Chrome", c.chrome),
    ("Firefox", c.firefox),
    ("Bing", c.bing),
    ("Mobile %", c.mobile_pct),
    ("Desktop %", c.desktop_pct),
    ("Bot %", c.bot_pct),
  ];
  for (label, value) in rows {
    let _ = writeln!(out, "{:20} : {}", label, value);
  }
  out.push('\n');
}

pub fn render_text(report: &Report) -> String {
  let mut out = String::new();

  heading(&mut out, "Top sources");
  ranked(&mut out, &report.top_sources);

  heading(&mut out, "Top status codes");
  ranked(&mut out, &report.top_statuses);

  heading(&mut out, "Clients");
  match &report.clients {
    Some(c) => clients(&mut out, c),
    None => out.push_str("                 No client breakdown\n\n"),
  }

  heading(&mut out, "Request bursts");
  if report.alerts.is_empty() {
    out.push_str("                 No suspicious source\n");
  } else {
    for (source, alert) in &report.alerts {
      let _ = writeln!(out, "{:20} : {}", source, alert);
    }
  }
  out.push('\n');

  if let Some(peak) = &report.busiest_second {
    let _ = writeln!(
      out,
      "Busiest second: {} ({} requests)",
      peak.second.to_rfc3339(),
      peak.count
    );
  }

  let s = &report.summary;
  let _ = writeln!(
    out,
    "{} records from {} lines; {} skipped, {} degraded, {} blank",
    report.records, s.total_lines, s.skipped, s.degraded, s.blank
  );
  for note in &report.notes {
    let _ = writeln!(out, "note: {}", note);
  }
  out
}

pub fn render_json(report: &Report) -> Result<String, AnalyzerError> {
  Ok(serde_json::to_string_pretty(report)?)
}
