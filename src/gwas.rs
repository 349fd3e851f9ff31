use std::{
    io::{self, BufRead},
    num::ParseIntError,
};

use thiserror::Error;

/// P-value column names emitted by common Pyseer models, in detection
/// priority order. Matched case-insensitively against the input header.
pub const P_VALUE_CANDIDATES: &[&str] = &[
    "lrt-pvalue",
    "pvalue",
    "p-value",
    "pval",
    "wald-pvalue",
    "score-pvalue",
    "filter-pvalue",
];

/// A validated per-row unit of work. Only constructed after both the
/// position and the p-value have passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct GwasRecord {
    pub variant_id: String,
    /// `None` when BP parsing failed and missing BP is allowed.
    pub position: Option<u64>,
    pub p_value: f64,
}

/// Column indices resolved once per run from the input header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Columns {
    pub variant: usize,
    pub p_value: usize,
    pub p_value_name: String,
}

impl Columns {
    pub fn resolve(
        header: &[String],
        variant_col: &str,
        pcol: Option<&str>,
    ) -> Result<Self, SchemaError> {
        let variant = header
            .iter()
            .position(|name| name.as_str() == variant_col)
            .ok_or_else(|| SchemaError::MissingVariantColumn {
                name: variant_col.to_string(),
                available: header.to_vec(),
            })?;

        let (p_value, p_value_name) = match pcol {
            Some(name) => {
                let index = header.iter().position(|h| h.as_str() == name).ok_or_else(|| {
                    SchemaError::MissingPValueColumn {
                        name: name.to_string(),
                        available: header.to_vec(),
                    }
                })?;
                (index, name.to_string())
            }
            None => {
                detect_p_value_column(header).ok_or_else(|| SchemaError::NoPValueColumn {
                    available: header.to_vec(),
                })?
            }
        };

        Ok(Self {
            variant,
            p_value,
            p_value_name,
        })
    }

    /// Smallest field count a data row needs to cover both columns.
    pub fn min_fields(&self) -> usize {
        self.variant.max(self.p_value) + 1
    }
}

/// Scan the header for the most likely p-value column: ranked known names
/// first, then a looser heuristic for nonstandard pipelines.
fn detect_p_value_column(header: &[String]) -> Option<(usize, String)> {
    for candidate in P_VALUE_CANDIDATES {
        if let Some(index) = header
            .iter()
            .position(|name| name.eq_ignore_ascii_case(candidate))
        {
            return Some((index, header[index].clone()));
        }
    }

    header
        .iter()
        .position(|name| {
            let lower = name.to_ascii_lowercase();
            lower.contains("pvalue") || lower == "p" || lower == "pval"
        })
        .map(|index| (index, header[index].clone()))
}

/// Fatal header-resolution failures. Raised before any output exists.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("input table is empty (no header line)")]
    EmptyInput,
    #[error(
        "variant column '{name}' not found; available columns: {}",
        .available.join(", ")
    )]
    MissingVariantColumn { name: String, available: Vec<String> },
    #[error(
        "p-value column '{name}' not found; available columns: {}",
        .available.join(", ")
    )]
    MissingPValueColumn { name: String, available: Vec<String> },
    #[error(
        "could not determine the p-value column; specify one explicitly. Available columns: {}",
        .available.join(", ")
    )]
    NoPValueColumn { available: Vec<String> },
}

/// One data line, tab-split, with its 1-based line number in the source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Row {
    pub line: u64,
    pub fields: Vec<String>,
}

/// Line-oriented iterator over the data rows of a tab-delimited table.
/// `read_header` must be called first; blank lines are skipped.
pub struct Reader<R> {
    inner: R,
    line: u64,
    buf: String,
}

impl<R> Reader<R>
where
    R: BufRead,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// Read the header line and split it into column names.
    /// Returns `None` at end of input.
    pub fn read_header(&mut self) -> io::Result<Option<Vec<String>>> {
        Ok(self
            .next_line()?
            .map(|line| line.split('\t').map(str::to_string).collect()))
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            self.buf.clear();
            if self.inner.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let trimmed = self.buf.trim_end_matches(['\n', '\r']);
            if trimmed.trim().is_empty() {
                continue;
            }
            return Ok(Some(trimmed.to_string()));
        }
    }
}

impl<R> Iterator for Reader<R>
where
    R: BufRead,
{
    type Item = io::Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_line() {
            Ok(Some(line)) => Some(Ok(Row {
                line: self.line,
                fields: line.split('\t').map(str::to_string).collect(),
            })),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Per-row position extraction failures.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("variant '{variant}' has no field {index} when split on '{delim}'")]
    MissingField {
        variant: String,
        delim: String,
        index: usize,
    },
    #[error("BP field '{raw}' from variant '{variant}' is not an integer")]
    NotAnInteger {
        raw: String,
        variant: String,
        #[source]
        source: ParseIntError,
    },
}

/// Extract the genomic position from a delimiter-encoded variant ID.
/// Example: `AE017143.1_12345_A_T` with delim `_`, index 1 → 12345.
pub fn parse_position(variant: &str, delim: &str, index: usize) -> Result<u64, PositionError> {
    let raw = variant
        .split(delim)
        .nth(index)
        .ok_or_else(|| PositionError::MissingField {
            variant: variant.to_string(),
            delim: delim.to_string(),
            index,
        })?;

    raw.parse::<u64>().map_err(|source| PositionError::NotAnInteger {
        raw: raw.to_string(),
        variant: variant.to_string(),
        source,
    })
}
