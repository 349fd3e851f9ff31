use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use thiserror::Error;

use crate::{
    gwas::{self, Columns, GwasRecord, Reader, SchemaError},
    plot::{PlotRow, PlotWriter},
    smart_reader::open_input,
    transform,
};

/// Configuration required to drive a conversion.
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Header name of the variant-identifier column.
    pub variant_col: String,
    /// Explicit p-value column; `None` enables auto-detection.
    pub pcol: Option<String>,
    /// Delimiter used inside variant identifiers.
    pub variant_delim: String,
    /// 0-based index of the BP sub-field in the split identifier.
    pub bp_field_index: usize,
    /// Constant emitted in the #CHR column.
    pub chr_label: String,
    /// Constant SNP label; `None` emits the raw variant identifier.
    pub snp_name: Option<String>,
    /// Constant emitted in the r^2 column.
    pub r2_label: String,
    /// Magnitude substituted for p-values reported as exactly zero.
    pub zero_p_sentinel: f64,
    /// Drop rows with non-numeric, negative, or non-finite p instead of failing.
    pub skip_nonpositive_p: bool,
    /// Emit rows with unparsable BP using a placeholder instead of dropping them.
    pub allow_missing_bp: bool,
    /// Write a JSON run report next to the output.
    pub report: bool,
}

impl ConversionConfig {
    /// A config with the external-interface defaults for the given paths.
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            variant_col: String::from("variant"),
            pcol: None,
            variant_delim: String::from("_"),
            bp_field_index: 1,
            chr_label: String::from("26"),
            snp_name: None,
            r2_label: String::from("0"),
            zero_p_sentinel: transform::DEFAULT_ZERO_P_SENTINEL,
            skip_nonpositive_p: false,
            allow_missing_bp: false,
            report: false,
        }
    }
}

/// Per-run counters surfaced after the pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionSummary {
    pub total_rows: usize,
    pub emitted_rows: usize,
    /// Rows emitted with a placeholder BP under `allow_missing_bp`.
    pub missing_bp_rows: usize,
    /// Rows too short to cover the resolved columns.
    pub short_rows: usize,
    /// Rows dropped because the BP sub-field was absent or non-integer.
    pub skipped_bad_bp: usize,
    /// Rows dropped under `skip_nonpositive_p`.
    pub skipped_invalid_p: usize,
    /// Name of the p-value column actually used.
    pub p_value_column: String,
}

impl ConversionSummary {
    pub fn skipped_rows(&self) -> usize {
        self.short_rows + self.skipped_bad_bp + self.skipped_invalid_p
    }
}

/// Fatal per-row failures (policy flags disabled).
#[derive(Debug, Error)]
pub enum RowError {
    #[error(
        "line {line}: p-value '{raw}' in column '{column}' is not numeric (variant={variant})"
    )]
    UnparsablePValue {
        line: u64,
        raw: String,
        column: String,
        variant: String,
    },
    #[error(
        "line {line}: {source} (variant={variant}); rerun with --skip-nonpositive-p to drop such rows"
    )]
    InvalidPValue {
        line: u64,
        variant: String,
        #[source]
        source: transform::InvalidPValue,
    },
}

/// Convert a Pyseer GWAS table into a Phandango `.plot` track.
///
/// Single pass, order preserving. Fatal errors abort before the output file
/// becomes visible.
pub fn convert_gwas_file(config: &ConversionConfig) -> Result<ConversionSummary> {
    tracing::info!(
        input = %config.input.display(),
        output = %config.output.display(),
        variant_col = %config.variant_col,
        pcol = config.pcol.as_deref().unwrap_or("<auto>"),
        "starting conversion",
    );

    if config.variant_delim.is_empty() {
        bail!("variant delimiter must not be empty");
    }

    let input = open_input(&config.input)
        .with_context(|| format!("failed to open input {}", config.input.display()))?;
    let mut reader = Reader::new(input);

    let header = reader
        .read_header()
        .with_context(|| format!("failed to read header from {}", config.input.display()))?
        .ok_or(SchemaError::EmptyInput)?;
    let columns = Columns::resolve(&header, &config.variant_col, config.pcol.as_deref())?;
    tracing::debug!(
        variant_index = columns.variant,
        p_value_column = %columns.p_value_name,
        "resolved columns",
    );

    let mut writer = PlotWriter::create(&config.output)?;
    let mut summary = ConversionSummary {
        p_value_column: columns.p_value_name.clone(),
        ..ConversionSummary::default()
    };

    for result in &mut reader {
        let row =
            result.with_context(|| format!("failed to read {}", config.input.display()))?;
        summary.total_rows += 1;

        if row.fields.len() < columns.min_fields() {
            summary.short_rows += 1;
            tracing::debug!(line = row.line, fields = row.fields.len(), "row too short");
            continue;
        }

        let variant = row.fields[columns.variant].as_str();
        let p_raw = row.fields[columns.p_value].as_str();

        let position =
            match gwas::parse_position(variant, &config.variant_delim, config.bp_field_index) {
                Ok(bp) => Some(bp),
                Err(e) if config.allow_missing_bp => {
                    summary.missing_bp_rows += 1;
                    tracing::debug!(line = row.line, error = %e, "emitting row with missing BP");
                    None
                }
                Err(e) => {
                    summary.skipped_bad_bp += 1;
                    tracing::warn!(line = row.line, error = %e, "dropping row");
                    continue;
                }
            };

        let p_value = match p_raw.trim().parse::<f64>() {
            Ok(p) => p,
            Err(_) if config.skip_nonpositive_p => {
                summary.skipped_invalid_p += 1;
                tracing::warn!(line = row.line, p = p_raw, "dropping row with non-numeric p");
                continue;
            }
            Err(_) => {
                return Err(RowError::UnparsablePValue {
                    line: row.line,
                    raw: p_raw.to_string(),
                    column: columns.p_value_name.clone(),
                    variant: variant.to_string(),
                }
                .into());
            }
        };

        let magnitude = match transform::neg_log10(p_value, config.zero_p_sentinel) {
            Ok(magnitude) => magnitude,
            Err(e) if config.skip_nonpositive_p => {
                summary.skipped_invalid_p += 1;
                tracing::warn!(line = row.line, error = %e, "dropping row");
                continue;
            }
            Err(source) => {
                return Err(RowError::InvalidPValue {
                    line: row.line,
                    variant: variant.to_string(),
                    source,
                }
                .into());
            }
        };

        let record = GwasRecord {
            variant_id: variant.to_string(),
            position,
            p_value,
        };

        writer
            .write_row(&PlotRow {
                chr: config.chr_label.clone(),
                snp: config
                    .snp_name
                    .clone()
                    .unwrap_or_else(|| record.variant_id.clone()),
                bp: record.position,
                min_log10_p: magnitude,
                log10_p: magnitude,
                r2: config.r2_label.clone(),
            })
            .context("failed to write .plot row")?;
        summary.emitted_rows += 1;
    }

    writer.finish()?;

    if config.report {
        let report = crate::report::RunReport::new(config, &summary);
        report
            .write(&config.output)
            .context("failed to write run report")?;
    }

    tracing::info!(
        emitted = summary.emitted_rows,
        skipped = summary.skipped_rows(),
        pcol = %summary.p_value_column,
        "conversion complete",
    );

    Ok(summary)
}
