//! Report generation module for screener results.
//!
//! Generates reports in various formats:
//! - Markdown (for documentation)
//! - JSON (for programmatic use)
//! - Plain-text table (for the terminal)

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::engine::{AssetOutcome, AssetResult, ScreenerResult};

// ============================================================================
// Report Format
// ============================================================================

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown format (human-readable)
    Markdown,
    /// JSON format (machine-readable)
    Json,
    /// Aligned plain-text table
    Table,
}

impl ReportFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Table => "txt",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "table" | "text" | "txt" => Ok(Self::Table),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

const NO_RESULTS: &str = "No assets qualified";

fn opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}%", v * 100.0))
}

/// Highlight line for the best-ranked asset.
pub fn top_pick_line(result: &AssetResult) -> String {
    format!(
        "Top Opportunity: {} ({}) | Score: {}",
        result.name, result.ticker, result.score
    )
}

// ============================================================================
// Screener Report
// ============================================================================

/// Report generator for screener results.
pub struct ScreenerReport {
    result: ScreenerResult,
    max_rows: usize,
}

impl ScreenerReport {
    /// Create a new report from screener results.
    pub fn new(result: ScreenerResult) -> Self {
        Self {
            result,
            max_rows: 50,
        }
    }

    /// Limit the rows rendered by markdown and table output.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Generate report in the specified format.
    pub fn generate(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => self.to_markdown(),
            ReportFormat::Json => self.to_json(),
            ReportFormat::Table => self.to_table(),
        }
    }

    /// Save report to file, adding the format's extension if missing.
    pub fn save_to_file(&self, path: &Path, format: ReportFormat) -> Result<PathBuf> {
        let content = self.generate(format);

        let file_path = if path.extension().is_none() {
            path.with_extension(format.extension())
        } else {
            path.to_path_buf()
        };

        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create report directory")?;
        }

        std::fs::write(&file_path, content).context("Failed to write report file")?;

        Ok(file_path)
    }

    /// Generate markdown report.
    pub fn to_markdown(&self) -> String {
        let r = &self.result;
        let mut md = String::new();

        let _ = write!(
            md,
            "# Market Scout Report\n\n**Run ID**: {}\n**Time**: {}\n**Duration**: {:.1}s\n\n",
            r.id,
            r.completed_at.format("%Y-%m-%d %H:%M:%S"),
            r.duration_secs
        );

        md.push_str("## Summary\n\n");
        let _ = writeln!(md, "- **Universe**: {} assets", r.counts.total);
        let _ = writeln!(md, "- **Scored**: {}", r.counts.recorded);
        let _ = writeln!(md, "- **Skipped**: {}", r.counts.skipped);
        let _ = writeln!(md, "- **Failed**: {}", r.counts.failed);
        let _ = writeln!(md, "- **Settings**: {}\n", r.config_summary);

        md.push_str("## Ranking\n\n");
        match r.top_pick() {
            Some(top) => {
                let _ = writeln!(md, "**{}**\n", top_pick_line(top));
                md.push_str("| # | Ticker | Name | Score | Price | RSI | P/E | Growth | Signals |\n");
                md.push_str("|---|--------|------|-------|-------|-----|-----|--------|---------|\n");
                for (i, a) in r.results.iter().take(self.max_rows).enumerate() {
                    let signals: Vec<_> = a.breakdown.fired().map(|rule| rule.label()).collect();
                    let _ = writeln!(
                        md,
                        "| {} | {} | {} | {} | {:.2} | {} | {} | {} | {} |",
                        i + 1,
                        a.ticker,
                        a.name,
                        a.score,
                        a.price,
                        opt(a.rsi, 1),
                        opt(a.pe, 1),
                        percent(a.revenue_growth),
                        if signals.is_empty() { "-".to_string() } else { signals.join(", ") },
                    );
                }
                if let Some(more) = self.hidden_rows() {
                    let _ = writeln!(md, "\n_... and {} more_", more);
                }
                md.push('\n');
            }
            None => {
                let _ = writeln!(md, "{}\n", NO_RESULTS);
            }
        }

        let excluded: Vec<_> = r.outcomes.iter().filter(|o| !o.is_recorded()).collect();
        if !excluded.is_empty() {
            md.push_str("## Excluded\n\n");
            md.push_str("| Ticker | Name | Status | Reason |\n");
            md.push_str("|--------|------|--------|--------|\n");
            for outcome in excluded {
                match outcome {
                    AssetOutcome::Skipped { ticker, name, reason } => {
                        let _ = writeln!(md, "| {} | {} | skipped | {} |", ticker, name, reason);
                    }
                    AssetOutcome::Failed { ticker, name, reason, .. } => {
                        let _ = writeln!(md, "| {} | {} | failed | {} |", ticker, name, reason);
                    }
                    AssetOutcome::Recorded(_) => {}
                }
            }
            md.push('\n');
        }

        md
    }

    /// Generate JSON report.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Generate an aligned plain-text table.
    pub fn to_table(&self) -> String {
        let r = &self.result;
        let Some(top) = r.top_pick() else {
            return format!("{}\n", NO_RESULTS);
        };

        let headers = ["#", "Ticker", "Name", "Score", "Price", "RSI", "P/E", "Growth"];
        let rows: Vec<[String; 8]> = r
            .results
            .iter()
            .take(self.max_rows)
            .enumerate()
            .map(|(i, a)| {
                [
                    (i + 1).to_string(),
                    a.ticker.clone(),
                    a.name.clone(),
                    a.score.to_string(),
                    format!("{:.2}", a.price),
                    opt(a.rsi, 1),
                    opt(a.pe, 1),
                    percent(a.revenue_growth),
                ]
            })
            .collect();

        let mut widths = headers.map(str::len);
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let render = |cells: &[&str]| -> String {
            cells
                .iter()
                .zip(widths)
                .map(|(cell, w)| format!("{:<w$}", cell, w = w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}\n", top_pick_line(top));
        let _ = writeln!(out, "{}", render(&headers));
        let _ = writeln!(
            out,
            "{}",
            widths.map(|w| "-".repeat(w)).join("  ")
        );
        for row in &rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            let _ = writeln!(out, "{}", render(&cells));
        }
        if let Some(more) = self.hidden_rows() {
            let _ = writeln!(out, "... and {} more", more);
        }

        out
    }

    /// Ranked rows cut by `max_rows`, if any.
    fn hidden_rows(&self) -> Option<usize> {
        self.result
            .results
            .len()
            .checked_sub(self.max_rows)
            .filter(|n| *n > 0)
    }

    /// Get the underlying result.
    pub fn result(&self) -> &ScreenerResult {
        &self.result
    }
}

// ============================================================================
// Tests
// ============================================================================
