//! Phandango `.plot` track serialization.
//!
//! The output is written to a temp file in the destination directory and
//! renamed into place on success, so a failed run never leaves a partial
//! track visible to a concurrent reader.

use std::{
    fmt,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Fixed header expected by Phandango for GWAS tracks.
pub const PLOT_HEADER: &str = "#CHR\tSNP\tBP\tminLOG10(P)\tlog10(p)\tr^2";

/// Placeholder emitted in the BP column when missing BP is allowed.
/// A non-empty token keeps the row six-field parseable under
/// whitespace-delimited readers.
pub const MISSING_BP: &str = ".";

/// One serialized track row.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotRow {
    pub chr: String,
    pub snp: String,
    pub bp: Option<u64>,
    pub min_log10_p: f64,
    pub log10_p: f64,
    pub r2: String,
}

impl fmt::Display for PlotRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bp {
            Some(bp) => write!(
                f,
                "{}\t{}\t{}\t{}\t{}\t{}",
                self.chr, self.snp, bp, self.min_log10_p, self.log10_p, self.r2
            ),
            None => write!(
                f,
                "{}\t{}\t{}\t{}\t{}\t{}",
                self.chr, self.snp, MISSING_BP, self.min_log10_p, self.log10_p, self.r2
            ),
        }
    }
}

/// Buffered, atomic writer for a `.plot` file.
pub struct PlotWriter {
    inner: BufWriter<NamedTempFile>,
    dest: PathBuf,
}

impl PlotWriter {
    /// Create the writer and emit the track header. The temp file lives in
    /// the destination directory so the final rename stays on one filesystem.
    pub fn create(dest: &Path) -> Result<Self> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;

        let mut writer = Self {
            inner: BufWriter::new(temp),
            dest: dest.to_path_buf(),
        };
        writeln!(writer.inner, "{PLOT_HEADER}")
            .context("failed to write .plot header")?;
        Ok(writer)
    }

    pub fn write_row(&mut self, row: &PlotRow) -> io::Result<()> {
        writeln!(self.inner, "{row}")
    }

    /// Flush and rename the temp file into place. Dropping the writer
    /// without calling this removes the temp file and leaves no output.
    pub fn finish(self) -> Result<()> {
        let temp = self
            .inner
            .into_inner()
            .map_err(|e| e.into_error())
            .context("failed to flush .plot output")?;
        temp.persist(&self.dest)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to persist output to {}", self.dest.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn row(bp: Option<u64>) -> PlotRow {
        PlotRow {
            chr: "26".to_string(),
            snp: "AE017143.1_12345_A_T".to_string(),
            bp,
            min_log10_p: 5.0,
            log10_p: 5.0,
            r2: "0".to_string(),
        }
    }

    #[test]
    fn row_formats_six_fields() {
        let line = row(Some(12345)).to_string();
        assert_eq!(line, "26\tAE017143.1_12345_A_T\t12345\t5\t5\t0");
        assert_eq!(line.split('\t').count(), 6);
    }

    #[test]
    fn missing_bp_uses_placeholder() {
        let line = row(None).to_string();
        assert_eq!(line.split('\t').nth(2), Some(MISSING_BP));
    }

    #[test]
    fn writer_persists_on_finish() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.plot");

        let mut writer = PlotWriter::create(&dest).unwrap();
        writer.write_row(&row(Some(42))).unwrap();
        assert!(!dest.exists());
        writer.finish().unwrap();

        let contents = fs::read_to_string(&dest).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some(PLOT_HEADER));
        assert!(lines.next().unwrap().starts_with("26\t"));
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn dropped_writer_leaves_no_output() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.plot");

        let writer = PlotWriter::create(&dest).unwrap();
        drop(writer);

        assert!(!dest.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
