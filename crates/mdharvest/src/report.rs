//! Run report accumulation and persistence
//!
//! The report is a plain value owned by the runner loop. It is mutated as
//! each URL completes and serialized exactly once at the end of the run,
//! to a timestamped snapshot and to `report_latest.json`.

use crate::error::HarvestError;
use crate::extractor::ExtractionResult;
use crate::metrics::{compression_label, compression_percent};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Destination roots recorded in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDirectories {
    pub raw: PathBuf,
    pub clean: PathBuf,
    pub reports: PathBuf,
}

/// Raw and clean destinations for one URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputPaths {
    pub raw: PathBuf,
    pub clean: PathBuf,
}

/// Per-URL outcome, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ReportEntry {
    Success {
        url: String,
        file_name: String,
        clean_size: usize,
        raw_size: usize,
        compression: String,
        paths: OutputPaths,
    },
    Error {
        url: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

/// Aggregate report for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run start time
    pub timestamp: DateTime<Utc>,
    /// Number of input URLs
    pub total: usize,
    pub successes: usize,
    pub errors: usize,
    pub directories: OutputDirectories,
    pub details: Vec<ReportEntry>,
}

impl RunReport {
    /// Create an empty report for a run over `total` URLs
    pub fn new(total: usize, directories: OutputDirectories) -> Self {
        Self {
            timestamp: Utc::now(),
            total,
            successes: 0,
            errors: 0,
            directories,
            details: Vec::with_capacity(total),
        }
    }

    /// Append a success entry for an extraction result
    pub fn record_success(&mut self, result: &ExtractionResult) {
        self.details.push(ReportEntry::Success {
            url: result.source_url.clone(),
            file_name: result.file_name.clone(),
            clean_size: result.clean_markdown.len(),
            raw_size: result.raw_markdown.len(),
            compression: compression_label(result.raw_markdown.len(), result.clean_markdown.len()),
            paths: OutputPaths {
                raw: result.raw_path.clone(),
                clean: result.clean_path.clone(),
            },
        });
        self.successes += 1;
    }

    /// Append an error entry with the failure message
    pub fn record_error(&mut self, url: impl Into<String>, message: impl Into<String>) {
        self.details.push(ReportEntry::Error {
            url: url.into(),
            error: message.into(),
            timestamp: Utc::now(),
        });
        self.errors += 1;
    }

    /// Timestamp usable in a file name (ISO 8601 with colons replaced)
    pub fn file_stamp(&self) -> String {
        self.timestamp
            .to_rfc3339_opts(SecondsFormat::Secs, true)
            .replace(':', "-")
    }

    /// Write the report to the timestamped snapshot and the latest pointer
    ///
    /// Returns the two paths written. `report_latest.json` is overwritten
    /// on every run.
    pub async fn save(&self, reports_dir: &Path) -> Result<(PathBuf, PathBuf), HarvestError> {
        let json = serde_json::to_string_pretty(self)?;

        let snapshot = reports_dir.join(format!("report_{}.json", self.file_stamp()));
        let latest = reports_dir.join("report_latest.json");

        tokio::fs::write(&snapshot, &json).await?;
        tokio::fs::write(&latest, &json).await?;

        Ok((snapshot, latest))
    }

    /// Console summary printed at the end of a run
    pub fn summary(&self) -> String {
        let rate = if self.total > 0 {
            self.successes as f64 / self.total as f64 * 100.0
        } else {
            0.0
        };

        let mut out = format!(
            "Run complete: {} succeeded, {} failed out of {} ({:.1}% success rate)",
            self.successes, self.errors, self.total, rate
        );

        if self.successes > 0 {
            let mut clean_total = 0usize;
            let mut percents = Vec::new();
            for entry in &self.details {
                if let ReportEntry::Success {
                    clean_size,
                    raw_size,
                    ..
                } = entry
                {
                    clean_total += clean_size;
                    if let Some(pct) = compression_percent(*raw_size, *clean_size) {
                        percents.push(pct);
                    }
                }
            }
            out.push_str(&format!(
                "\nAverage clean size: {} bytes",
                clean_total / self.successes
            ));
            if !percents.is_empty() {
                let avg = percents.iter().sum::<f64>() / percents.len() as f64;
                out.push_str(&format!("\nAverage compression: {:.1}%", avg));
            }
        }

        out
    }
}
