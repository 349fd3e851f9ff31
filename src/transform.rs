//! The -log10(p) transform and its zero/invalid p-value policy.

use thiserror::Error;

/// Magnitude substituted when a p-value is reported as exactly zero.
///
/// Upstream GWAS tools routinely round extremely small p-values to 0; mapping
/// those to a fixed large magnitude keeps the track numerically well formed
/// and sortable where -log10 would produce infinity. The value is stable
/// across versions so historical outputs do not shift.
pub const DEFAULT_ZERO_P_SENTINEL: f64 = 300.0;

/// A p-value that cannot be plotted: negative or non-finite.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("p-value {value} is {reason}")]
pub struct InvalidPValue {
    pub value: f64,
    pub reason: &'static str,
}

/// Compute the -log10 magnitude for one p-value.
///
/// * `p > 0` and finite: `-log10(p)`.
/// * `p == 0`: the `zero_sentinel` magnitude (reported-as-zero accommodation).
/// * negative or non-finite: `InvalidPValue`.
pub fn neg_log10(p: f64, zero_sentinel: f64) -> Result<f64, InvalidPValue> {
    if p.is_nan() {
        return Err(InvalidPValue {
            value: p,
            reason: "not a number",
        });
    }
    if p.is_infinite() {
        return Err(InvalidPValue {
            value: p,
            reason: "not finite",
        });
    }
    if p < 0.0 {
        return Err(InvalidPValue {
            value: p,
            reason: "negative",
        });
    }
    if p == 0.0 {
        return Ok(zero_sentinel);
    }
    Ok(-p.log10())
}
