//! Structured run report for downstream tool consumption.
//!
//! Writes a JSON file alongside the output containing the resolved
//! configuration and the per-run statistics.

use serde::Serialize;
use std::path::Path;

use crate::conversion::{ConversionConfig, ConversionSummary};

/// Complete report of a conversion run.
/// Serialized to JSON alongside the output file.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Tool version
    pub version: String,
    /// Timestamp of run (ISO 8601)
    pub timestamp: String,

    pub input: InputInfo,
    pub output: OutputInfo,

    /// Column resolution actually used for the run
    pub columns: ColumnInfo,
    /// Row-handling policy flags
    pub policy: PolicyInfo,

    pub statistics: Statistics,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputInfo {
    pub path: String,
    pub chr_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snp_name: Option<String>,
    pub r2_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub variant_column: String,
    pub p_value_column: String,
    pub variant_delim: String,
    pub bp_field_index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyInfo {
    pub zero_p_sentinel: f64,
    pub skip_nonpositive_p: bool,
    pub allow_missing_bp: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub total_rows: usize,
    pub emitted_rows: usize,
    pub missing_bp_rows: usize,
    pub short_rows: usize,
    pub skipped_bad_bp: usize,
    pub skipped_invalid_p: usize,
}

impl From<&ConversionSummary> for Statistics {
    fn from(s: &ConversionSummary) -> Self {
        Statistics {
            total_rows: s.total_rows,
            emitted_rows: s.emitted_rows,
            missing_bp_rows: s.missing_bp_rows,
            short_rows: s.short_rows,
            skipped_bad_bp: s.skipped_bad_bp,
            skipped_invalid_p: s.skipped_invalid_p,
        }
    }
}

impl RunReport {
    pub fn new(config: &ConversionConfig, summary: &ConversionSummary) -> Self {
        let now = time::OffsetDateTime::now_utc();
        let timestamp = now
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        RunReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp,
            input: InputInfo {
                path: config.input.display().to_string(),
            },
            output: OutputInfo {
                path: config.output.display().to_string(),
                chr_label: config.chr_label.clone(),
                snp_name: config.snp_name.clone(),
                r2_label: config.r2_label.clone(),
            },
            columns: ColumnInfo {
                variant_column: config.variant_col.clone(),
                p_value_column: summary.p_value_column.clone(),
                variant_delim: config.variant_delim.clone(),
                bp_field_index: config.bp_field_index,
            },
            policy: PolicyInfo {
                zero_p_sentinel: config.zero_p_sentinel,
                skip_nonpositive_p: config.skip_nonpositive_p,
                allow_missing_bp: config.allow_missing_bp,
            },
            statistics: Statistics::from(summary),
        }
    }

    /// Write the report as JSON to a file alongside the output.
    /// For output.plot, writes output_report.json
    pub fn write(&self, output_path: &Path) -> std::io::Result<()> {
        let stem = output_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy();
        let report_name = format!("{}_report.json", stem);
        let report_path = output_path.with_file_name(report_name);

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        std::fs::write(&report_path, json)?;
        tracing::info!("wrote run report to {}", report_path.display());

        Ok(())
    }
}
