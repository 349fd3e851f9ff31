use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{ConversionConfig, ConversionSummary, convert_gwas_file, transform};

#[derive(Debug, Parser)]
#[command(author, version, about = "Convert Pyseer GWAS output to a Phandango .plot track", long_about = None)]
struct Cli {
    /// Pyseer output TSV with header (may be gzipped)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output .plot file path
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Column name containing variant IDs
    #[arg(long, default_value = "variant")]
    variant_col: String,

    /// P-value column name. Auto-detected from common Pyseer columns
    /// (lrt-pvalue, pvalue, wald-pvalue, ...) if not set.
    #[arg(long, value_name = "NAME")]
    pcol: Option<String>,

    /// Delimiter used inside variant IDs
    #[arg(long, default_value = "_")]
    variant_delim: String,

    /// 0-based index of the field in the split variant ID that contains BP.
    /// Example: contig_12345_A_T => BP field is 1.
    #[arg(long, default_value_t = 1)]
    bp_field_index: usize,

    /// Constant value to put in the #CHR column
    #[arg(long, default_value = "26", value_name = "LABEL")]
    chr_label: String,

    /// Constant value to put in the SNP column (default: the raw variant ID)
    #[arg(long, value_name = "LABEL")]
    snp_name: Option<String>,

    /// Constant value to put in the r^2 column
    #[arg(long, default_value = "0")]
    r2: String,

    /// Magnitude substituted when a p-value is reported as exactly zero
    #[arg(long, default_value_t = transform::DEFAULT_ZERO_P_SENTINEL, value_name = "MAG")]
    zero_p_sentinel: f64,

    /// Skip rows with non-numeric, negative, or non-finite p-values
    /// instead of erroring
    #[arg(long)]
    skip_nonpositive_p: bool,

    /// Emit rows where BP cannot be parsed using a '.' placeholder
    /// (default: such rows are dropped and counted)
    #[arg(long)]
    allow_missing_bp: bool,

    /// Write a JSON run report next to the output
    #[arg(long)]
    report: bool,

    /// Logging verbosity (e.g. error, warn, info, debug)
    #[arg(long, default_value = "info")]
    log_level: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = ConversionConfig {
        input: cli.input,
        output: cli.output,
        variant_col: cli.variant_col,
        pcol: cli.pcol,
        variant_delim: cli.variant_delim,
        bp_field_index: cli.bp_field_index,
        chr_label: cli.chr_label,
        snp_name: cli.snp_name,
        r2_label: cli.r2,
        zero_p_sentinel: cli.zero_p_sentinel,
        skip_nonpositive_p: cli.skip_nonpositive_p,
        allow_missing_bp: cli.allow_missing_bp,
        report: cli.report,
    };

    let summary = convert_gwas_file(&config)?;
    print_summary(&summary);

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

fn print_summary(summary: &ConversionSummary) {
    println!(
        "Wrote {emitted} of {total} rows (p-value column '{pcol}').",
        emitted = summary.emitted_rows,
        total = summary.total_rows,
        pcol = summary.p_value_column,
    );

    if summary.missing_bp_rows > 0 {
        println!(
            "Emitted {count} rows with a placeholder BP.",
            count = summary.missing_bp_rows
        );
    }

    if summary.skipped_bad_bp > 0 {
        println!(
            "Skipped {count} rows with unparsable BP.",
            count = summary.skipped_bad_bp
        );
    }

    if summary.skipped_invalid_p > 0 {
        println!(
            "Skipped {count} rows with non-positive or non-numeric p-values.",
            count = summary.skipped_invalid_p
        );
    }

    if summary.short_rows > 0 {
        println!(
            "Ignored {count} rows with too few fields.",
            count = summary.short_rows
        );
    }
}
